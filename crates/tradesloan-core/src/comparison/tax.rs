//! Capital-allowance relief on purchased equipment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::TaxPolicy;
use crate::types::{round_money, Money, Ratio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBenefit {
    /// Qualifying expenditure, capped at the Annual Investment Allowance.
    pub capital_allowance: Money,
    pub tax_rate: Ratio,
    pub tax_saving: Money,
    pub total_cost_of_ownership: Money,
    pub net_cost_after_tax: Money,
}

/// Full-expensing estimate: the asset cost up to the AIA cap is deducted from
/// taxable profit at the flat corporation tax rate.
pub fn tax_benefit(asset_value: Money, total_cost_of_ownership: Money, policy: &TaxPolicy) -> TaxBenefit {
    let allowance = asset_value.max(Decimal::ZERO).min(policy.aia_cap);
    let saving = allowance * policy.corporation_tax_rate;

    TaxBenefit {
        capital_allowance: round_money(allowance),
        tax_rate: policy.corporation_tax_rate,
        tax_saving: round_money(saving),
        total_cost_of_ownership: round_money(total_cost_of_ownership),
        net_cost_after_tax: round_money(total_cost_of_ownership - saving),
    }
}
