//! Equipment finance: hire purchase against a finance lease, with the
//! capital-allowance position of buying outright.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::tax::{tax_benefit, TaxBenefit};
use super::{compare, AssetClass, ComparisonContext, ComparisonResult};
use crate::policy::PolicyConfig;
use crate::profile::{BorrowerProfile, BusinessAge, CreditProfile, EquipmentValueBand, TurnoverBand};
use crate::rates::{rate_breakdown, RateBreakdown};
use crate::types::*;
use crate::TradesLoanResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentFinanceInput {
    pub equipment_cost: Money,
    #[serde(default)]
    pub deposit: Money,
    pub term_months: u32,
    pub vat_registered: bool,
    pub business_age: BusinessAge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover: Option<TurnoverBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_profile: Option<CreditProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentFinanceOutput {
    pub finance_amount: Money,
    pub equipment_value_band: EquipmentValueBand,
    pub rate: RateBreakdown,
    pub comparison: ComparisonResult,
    /// Tax position when the equipment is bought on hire purchase.
    pub tax_benefit: TaxBenefit,
}

pub fn calculate_equipment_finance(
    input: &EquipmentFinanceInput,
    policy: &PolicyConfig,
) -> TradesLoanResult<ComputationOutput<EquipmentFinanceOutput>> {
    let start = Instant::now();
    policy.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let finance_amount = (input.equipment_cost - input.deposit).max(Decimal::ZERO);
    if finance_amount.is_zero() {
        warnings.push("Deposit covers the equipment cost; nothing to finance.".into());
    }
    if input.term_months == 0 {
        warnings.push("Term is zero months; payments are shown as zero.".into());
    }

    let value_band = EquipmentValueBand::from_value(input.equipment_cost);
    let mut profile = BorrowerProfile::new(input.business_age).with_equipment_value(value_band);
    profile.turnover = input.turnover;
    profile.credit_profile = input.credit_profile;

    let terms = &policy.equipment_finance;
    let base = input.base_rate.unwrap_or(terms.base_rate);
    let rate = rate_breakdown(base, &profile, &terms.rate_band);
    if rate.clamped {
        warnings.push(format!(
            "Adjusted rate {}% clamped to {}%.",
            rate.unclamped_rate, rate.adjusted_rate
        ));
    }

    let context = ComparisonContext {
        asset: AssetClass::Equipment,
        asset_value: input.equipment_cost,
        vat_registered: input.vat_registered,
    };
    let comparison = compare(finance_amount, input.term_months, rate.adjusted_rate, &context, policy);

    let total_cost_of_ownership = comparison.hire_purchase.total_payable + input.deposit.max(Decimal::ZERO);
    let tax_benefit = tax_benefit(input.equipment_cost, total_cost_of_ownership, &policy.tax);

    let output = EquipmentFinanceOutput {
        finance_amount: round_money(finance_amount),
        equipment_value_band: value_band,
        rate,
        comparison,
        tax_benefit,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "lease_residual_ratio": policy.lease.residual_ratio.to_string(),
        "lease_rate_discount_pp": policy.lease.rate_discount.to_string(),
        "aia_cap": policy.tax.aia_cap.to_string(),
        "corporation_tax_rate": policy.tax.corporation_tax_rate.to_string(),
    });

    Ok(with_metadata(
        "Equipment finance comparison (HP / finance lease) with AIA relief",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
