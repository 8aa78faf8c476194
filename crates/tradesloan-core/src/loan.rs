//! Business loan calculator: profile-adjusted rate, repayment schedule,
//! eligibility and chart series in one payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{amortize, schedule, yearly_summary, AmortizationRow, LoanResult, YearSummary};
use crate::eligibility::{self, EligibilityResult};
use crate::policy::PolicyConfig;
use crate::profile::{BorrowerProfile, BusinessAge, CreditProfile, TurnoverBand};
use crate::rates::{rate_breakdown, RateBreakdown};
use crate::types::*;
use crate::TradesLoanResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessLoanInput {
    pub loan_amount: Money,
    pub term_months: u32,
    pub business_age: BusinessAge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover: Option<TurnoverBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_profile: Option<CreditProfile>,
    /// Overrides the policy base rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Percent>,
    /// Overrides the turnover band's reference facility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_amount: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessLoanOutput {
    pub rate: RateBreakdown,
    pub loan: LoanResult,
    pub eligibility: EligibilityResult,
    pub schedule: Vec<AmortizationRow>,
    pub yearly: Vec<YearSummary>,
    /// Principal against interest over the life of the loan.
    pub cost_breakdown: Vec<ChartSegment>,
}

pub fn calculate_business_loan(
    input: &BusinessLoanInput,
    policy: &PolicyConfig,
) -> TradesLoanResult<ComputationOutput<BusinessLoanOutput>> {
    let start = Instant::now();
    policy.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let profile = BorrowerProfile {
        business_age: input.business_age,
        turnover: input.turnover,
        credit_profile: input.credit_profile,
        equipment_value: None,
        vehicle_type: None,
    };

    let terms = &policy.business_loan;
    let base = input.base_rate.unwrap_or(terms.base_rate);
    let rate = rate_breakdown(base, &profile, &terms.rate_band);
    if rate.clamped {
        warnings.push(format!(
            "Adjusted rate {}% clamped to {}%.",
            rate.unclamped_rate, rate.adjusted_rate
        ));
    }

    let loan = amortize(input.loan_amount, input.term_months, rate.adjusted_rate);
    if loan.is_zero() {
        warnings.push("Loan amount and term must both be positive; results are zero.".into());
    }
    let rows: Vec<AmortizationRow> = schedule(input.loan_amount, input.term_months, rate.adjusted_rate).collect();
    let yearly = yearly_summary(&rows);

    let reference = input.reference_amount.unwrap_or_else(|| profile.reference_amount());
    let eligibility = eligibility::score(&profile, input.loan_amount, reference);

    let principal = if loan.is_zero() {
        Decimal::ZERO
    } else {
        round_money(input.loan_amount)
    };
    let cost_breakdown = vec![
        ChartSegment::new("Principal", principal, palette::PRINCIPAL),
        ChartSegment::new("Interest", loan.total_interest, palette::INTEREST),
    ];

    let output = BusinessLoanOutput {
        rate,
        loan,
        eligibility,
        schedule: rows,
        yearly,
        cost_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "base_rate": base.to_string(),
        "rate_floor": terms.rate_band.floor.to_string(),
        "rate_ceiling": terms.rate_band.ceiling.to_string(),
        "reference_amount": reference.to_string(),
    });

    Ok(with_metadata(
        "Level-payment amortisation with profile-adjusted rate",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> BusinessLoanInput {
        BusinessLoanInput {
            loan_amount: dec!(50_000),
            term_months: 36,
            business_age: BusinessAge::TwoToFiveYears,
            turnover: Some(TurnoverBand::From100kTo500k),
            credit_profile: None,
            base_rate: None,
            reference_amount: None,
        }
    }

    #[test]
    fn test_neutral_profile_keeps_base_rate() {
        let out = calculate_business_loan(&sample(), &PolicyConfig::default()).unwrap();
        let result = &out.result;
        assert_eq!(result.rate.adjusted_rate, dec!(9.9));
        assert_eq!(result.loan.monthly_payment, dec!(1611.01));
        assert_eq!(result.schedule.len(), 36);
        assert_eq!(result.yearly.len(), 3);
        assert_eq!(result.eligibility.score, 95);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_breakdown_matches_totals() {
        let out = calculate_business_loan(&sample(), &PolicyConfig::default()).unwrap();
        let result = &out.result;
        let total: Decimal = result.cost_breakdown.iter().map(|s| s.value).sum();
        assert_eq!(total, result.loan.total_amount);
    }

    #[test]
    fn test_zero_amount_warns_not_errors() {
        let mut input = sample();
        input.loan_amount = Decimal::ZERO;
        let out = calculate_business_loan(&input, &PolicyConfig::default()).unwrap();
        assert_eq!(out.result.loan, LoanResult::zero());
        assert!(out.result.schedule.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_reference_override() {
        let mut input = sample();
        input.reference_amount = Some(dec!(60_000));
        let out = calculate_business_loan(&input, &PolicyConfig::default()).unwrap();
        // ratio 0.83 -> -10 instead of +10
        assert_eq!(out.result.eligibility.score, 75);
    }

    #[test]
    fn test_very_long_term_at_ceiling_is_total() {
        let mut input = sample();
        input.term_months = 3_600;
        input.base_rate = Some(dec!(24.9));
        let out = calculate_business_loan(&input, &PolicyConfig::default()).unwrap();
        let result = &out.result;
        assert_eq!(result.rate.adjusted_rate, dec!(24.9));
        // 50,000 * 0.02075
        assert_eq!(result.loan.monthly_payment, dec!(1037.50));
        assert_eq!(result.schedule.len(), 3_600);
        assert_eq!(result.yearly.len(), 300);
        assert_eq!(result.schedule[3_599].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let mut policy = PolicyConfig::default();
        policy.business_loan.rate_band.floor = dec!(30);
        assert!(calculate_business_loan(&sample(), &policy).is_err());
    }
}
