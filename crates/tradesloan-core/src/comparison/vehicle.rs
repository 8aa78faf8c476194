//! Vehicle finance: hire purchase, finance lease and contract hire.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{compare, strings, AssetClass, ComparisonContext, ComparisonResult, FinanceKind, ProductOption, ProsAndCons};
use crate::policy::{ContractHirePolicy, PolicyConfig};
use crate::profile::{BorrowerProfile, BusinessAge, CreditProfile, MileageBand, TurnoverBand, VehicleType};
use crate::rates::{rate_breakdown, RateBreakdown};
use crate::types::*;
use crate::TradesLoanResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleFinanceInput {
    pub vehicle_price: Money,
    #[serde(default)]
    pub deposit: Money,
    pub term_months: u32,
    pub vat_registered: bool,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub annual_mileage: MileageBand,
    pub business_age: BusinessAge,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover: Option<TurnoverBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_profile: Option<CreditProfile>,
    /// Overrides the policy base rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleFinanceOutput {
    pub finance_amount: Money,
    pub rate: RateBreakdown,
    pub comparison: ComparisonResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_vehicle_finance(
    input: &VehicleFinanceInput,
    policy: &PolicyConfig,
) -> TradesLoanResult<ComputationOutput<VehicleFinanceOutput>> {
    let start = Instant::now();
    policy.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let finance_amount = (input.vehicle_price - input.deposit).max(Decimal::ZERO);
    if finance_amount.is_zero() {
        warnings.push("Deposit covers the vehicle price; nothing to finance.".into());
    }
    if input.term_months == 0 {
        warnings.push("Term is zero months; payments are shown as zero.".into());
    }

    let mut profile = BorrowerProfile::new(input.business_age).with_vehicle_type(input.vehicle_type);
    profile.turnover = input.turnover;
    profile.credit_profile = input.credit_profile;

    let terms = &policy.vehicle_finance;
    let base = input.base_rate.unwrap_or(terms.base_rate);
    let rate = rate_breakdown(base, &profile, &terms.rate_band);
    if rate.clamped {
        warnings.push(format!(
            "Adjusted rate {}% clamped to {}%.",
            rate.unclamped_rate, rate.adjusted_rate
        ));
    }

    let context = ComparisonContext {
        asset: AssetClass::Vehicle {
            annual_mileage: input.annual_mileage,
        },
        asset_value: input.vehicle_price,
        vat_registered: input.vat_registered,
    };
    let comparison = compare(finance_amount, input.term_months, rate.adjusted_rate, &context, policy);

    let output = VehicleFinanceOutput {
        finance_amount: round_money(finance_amount),
        rate,
        comparison,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "lease_residual_ratio": policy.lease.residual_ratio.to_string(),
        "lease_rate_discount_pp": policy.lease.rate_discount.to_string(),
        "contract_hire_depreciation_ratio": policy.contract_hire.depreciation_ratio.to_string(),
        "mileage_multiplier": input.annual_mileage.multiplier().to_string(),
    });

    Ok(with_metadata(
        "Vehicle finance comparison (HP / finance lease / contract hire)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Contract hire
// ---------------------------------------------------------------------------

/// Cost-plus rental: yearly depreciation, servicing and margin as shares of
/// the vehicle price, spread monthly and scaled by the mileage band.
pub(crate) fn contract_hire_option(
    asset_value: Money,
    term_months: u32,
    mileage: MileageBand,
    policy: &ContractHirePolicy,
) -> ProductOption {
    let value = if term_months == 0 {
        Decimal::ZERO
    } else {
        asset_value.max(Decimal::ZERO)
    };
    let multiplier = mileage.multiplier();

    let depreciation = value * policy.depreciation_ratio / MONTHS_PER_YEAR * multiplier;
    let service = value * policy.service_ratio / MONTHS_PER_YEAR * multiplier;
    let margin = value * policy.margin_ratio / MONTHS_PER_YEAR * multiplier;
    let monthly = depreciation + service + margin;
    let n = Decimal::from(term_months);

    ProductOption {
        kind: FinanceKind::ContractHire,
        monthly_payment: round_money(monthly),
        total_payable: round_money(monthly * n),
        annual_rate: None,
        residual_value: None,
        owns_asset_at_end: false,
        vat_recovery_description:
            "VAT is charged on each rental; businesses typically reclaim half on cars and all of it on commercial vehicles."
                .into(),
        pros_and_cons: ProsAndCons {
            pros: strings(&[
                "Lowest monthly cost in most cases",
                "Maintenance and servicing bundled in",
                "No resale or depreciation risk",
            ]),
            cons: strings(&[
                "The vehicle is returned at the end of the term",
                "Excess mileage and damage charges apply",
            ]),
        },
        cost_breakdown: vec![
            ChartSegment::new("Depreciation", round_money(depreciation * n), palette::PRINCIPAL),
            ChartSegment::new("Servicing", round_money(service * n), palette::NEW_PAYMENT),
            ChartSegment::new("Provider margin", round_money(margin * n), palette::INTEREST),
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
