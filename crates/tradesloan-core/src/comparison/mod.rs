//! Side-by-side asset-finance comparison.
//!
//! For one financed amount and term, prices hire purchase, a finance lease
//! with a residual balloon and (for vehicles) cost-plus contract hire, then
//! picks a recommendation:
//!
//! 1. Hire purchase when the term reaches the ownership horizon.
//! 2. Finance lease when VAT-registered, the term is short enough and the
//!    lease is materially cheaper per month than HP.
//! 3. Contract hire when it is cheaper per month than HP.
//! 4. Hire purchase otherwise.

pub mod equipment;
pub mod tax;
pub mod vehicle;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{amortize, exact_payment};
use crate::policy::{LeasePolicy, PolicyConfig};
use crate::profile::MileageBand;
use crate::types::*;

use self::vehicle::contract_hire_option;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    HirePurchase,
    FinanceLease,
    ContractHire,
}

impl FinanceKind {
    pub fn label(&self) -> &'static str {
        match self {
            FinanceKind::HirePurchase => "Hire purchase",
            FinanceKind::FinanceLease => "Finance lease",
            FinanceKind::ContractHire => "Contract hire",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetClass {
    Equipment,
    Vehicle {
        #[serde(default)]
        annual_mileage: MileageBand,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonContext {
    pub asset: AssetClass,
    /// Full asset price; contract hire is costed on this, not the financed
    /// amount.
    pub asset_value: Money,
    pub vat_registered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProsAndCons {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOption {
    pub kind: FinanceKind,
    pub monthly_payment: Money,
    pub total_payable: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_value: Option<Money>,
    pub owns_asset_at_end: bool,
    pub vat_recovery_description: String,
    pub pros_and_cons: ProsAndCons,
    /// What the total payable is made of.
    pub cost_breakdown: Vec<ChartSegment>,
}

/// Cumulative amount paid under each option by the end of a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCostPoint {
    pub month: u32,
    pub hire_purchase: Money,
    pub finance_lease: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_hire: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub finance_amount: Money,
    pub term_months: u32,
    pub hire_purchase: ProductOption,
    pub finance_lease: ProductOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_hire: Option<ProductOption>,
    pub recommended: FinanceKind,
    pub reason: String,
    pub cumulative_cost_series: Vec<CumulativeCostPoint>,
}

impl ComparisonResult {
    pub fn option(&self, kind: FinanceKind) -> Option<&ProductOption> {
        match kind {
            FinanceKind::HirePurchase => Some(&self.hire_purchase),
            FinanceKind::FinanceLease => Some(&self.finance_lease),
            FinanceKind::ContractHire => self.contract_hire.as_ref(),
        }
    }

    pub fn recommended_option(&self) -> &ProductOption {
        self.option(self.recommended).unwrap_or(&self.hire_purchase)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price every applicable structure and choose one.
pub fn compare(
    finance_amount: Money,
    term_months: u32,
    base_rate: Percent,
    context: &ComparisonContext,
    policy: &PolicyConfig,
) -> ComparisonResult {
    let hire_purchase = hire_purchase_option(finance_amount, term_months, base_rate);
    let finance_lease = finance_lease_option(finance_amount, term_months, base_rate, &policy.lease);
    let contract_hire = match &context.asset {
        AssetClass::Vehicle { annual_mileage } => Some(contract_hire_option(
            context.asset_value,
            term_months,
            *annual_mileage,
            &policy.contract_hire,
        )),
        AssetClass::Equipment => None,
    };

    let (recommended, reason) = recommend(
        term_months,
        context,
        &hire_purchase,
        &finance_lease,
        contract_hire.as_ref(),
        policy,
    );
    tracing::debug!(
        recommended = recommended.label(),
        term_months,
        "asset finance recommendation"
    );

    let cumulative_cost_series = cumulative_series(
        term_months,
        &hire_purchase,
        &finance_lease,
        contract_hire.as_ref(),
    );

    ComparisonResult {
        finance_amount: round_money(finance_amount.max(Decimal::ZERO)),
        term_months,
        hire_purchase,
        finance_lease,
        contract_hire,
        recommended,
        reason,
        cumulative_cost_series,
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

fn hire_purchase_option(amount: Money, term_months: u32, rate: Percent) -> ProductOption {
    let loan = amortize(amount, term_months, rate);
    let principal = if loan.is_zero() {
        Decimal::ZERO
    } else {
        round_money(amount)
    };

    ProductOption {
        kind: FinanceKind::HirePurchase,
        monthly_payment: loan.monthly_payment,
        total_payable: loan.total_amount,
        annual_rate: Some(rate),
        residual_value: None,
        owns_asset_at_end: true,
        vat_recovery_description:
            "VAT is paid upfront on the purchase price; VAT-registered businesses reclaim it on their next return."
                .into(),
        pros_and_cons: ProsAndCons {
            pros: strings(&[
                "You own the asset once the final payment is made",
                "Capital allowances can be claimed from the start",
                "Fixed payments make budgeting simple",
            ]),
            cons: strings(&[
                "Higher monthly payments than leasing",
                "Interest is paid on the full amount financed",
            ]),
        },
        cost_breakdown: vec![
            ChartSegment::new("Amount financed", principal, palette::PRINCIPAL),
            ChartSegment::new("Interest", loan.total_interest, palette::INTEREST),
        ],
    }
}

fn finance_lease_option(amount: Money, term_months: u32, base_rate: Percent, policy: &LeasePolicy) -> ProductOption {
    let lease_rate = (base_rate - policy.rate_discount).max(Decimal::ZERO);
    let degenerate = amount <= Decimal::ZERO || term_months == 0;

    let (residual, monthly_exact) = if degenerate {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let residual = amount * policy.residual_ratio;
        let amortised = amount - residual;
        let n = Decimal::from(term_months);
        (residual, exact_payment(amortised, term_months, lease_rate) + residual / n)
    };
    let total_exact = monthly_exact * Decimal::from(term_months);
    let financed = (amount - residual).max(Decimal::ZERO);
    let finance_charge = if degenerate {
        Decimal::ZERO
    } else {
        total_exact - amount
    };

    ProductOption {
        kind: FinanceKind::FinanceLease,
        monthly_payment: round_money(monthly_exact),
        total_payable: round_money(total_exact),
        annual_rate: Some(lease_rate),
        residual_value: Some(round_money(residual)),
        owns_asset_at_end: false,
        vat_recovery_description:
            "VAT is charged on each rental; VAT-registered businesses reclaim it as rentals are paid.".into(),
        pros_and_cons: ProsAndCons {
            pros: strings(&[
                "Lower monthly payments than hire purchase",
                "Rentals can be offset against taxable profit",
                "Flexible options at the end of the term",
            ]),
            cons: strings(&[
                "The asset is not owned at the end of the term",
                "Residual value risk sits with the lessee",
            ]),
        },
        cost_breakdown: vec![
            ChartSegment::new("Amortised portion", round_money(financed), palette::PRINCIPAL),
            ChartSegment::new("Residual spread over term", round_money(residual), palette::BUFFER),
            ChartSegment::new("Finance charge", round_money(finance_charge), palette::INTEREST),
        ],
    }
}

// ---------------------------------------------------------------------------
// Recommendation and series
// ---------------------------------------------------------------------------

fn recommend(
    term_months: u32,
    context: &ComparisonContext,
    hire_purchase: &ProductOption,
    finance_lease: &ProductOption,
    contract_hire: Option<&ProductOption>,
    policy: &PolicyConfig,
) -> (FinanceKind, String) {
    let rules = &policy.recommendation;

    if term_months >= rules.ownership_horizon_months {
        return (
            FinanceKind::HirePurchase,
            format!(
                "Over {term_months} months the asset is likely to stay in use after the final payment, so ownership through hire purchase is worth its full finance cost."
            ),
        );
    }

    let lease_threshold = hire_purchase.monthly_payment * rules.lease_payment_ratio;
    if context.vat_registered
        && term_months <= rules.lease_max_term_months
        && finance_lease.monthly_payment < lease_threshold
    {
        return (
            FinanceKind::FinanceLease,
            format!(
                "As a VAT-registered business on a short {term_months}-month term, the lease saves £{} a month against hire purchase and its rentals are fully VAT-recoverable.",
                hire_purchase.monthly_payment - finance_lease.monthly_payment
            ),
        );
    }

    if let Some(contract_hire) = contract_hire {
        if contract_hire.monthly_payment < hire_purchase.monthly_payment {
            return (
                FinanceKind::ContractHire,
                "Contract hire has the lowest monthly cost and bundles depreciation and maintenance into one fixed rental."
                    .into(),
            );
        }
    }

    (
        FinanceKind::HirePurchase,
        "Hire purchase gives ownership at the end for a monthly cost in line with the alternatives.".into(),
    )
}

/// Straight-line accumulation of each option's total payable, so the last
/// point equals the option's total exactly.
fn cumulative_series(
    term_months: u32,
    hire_purchase: &ProductOption,
    finance_lease: &ProductOption,
    contract_hire: Option<&ProductOption>,
) -> Vec<CumulativeCostPoint> {
    if term_months == 0 {
        return Vec::new();
    }
    let n = Decimal::from(term_months);
    let paid_by = |total: Money, month: u32| -> Money {
        if month == term_months {
            total
        } else {
            round_money(total * Decimal::from(month) / n)
        }
    };

    (1..=term_months)
        .map(|month| CumulativeCostPoint {
            month,
            hire_purchase: paid_by(hire_purchase.total_payable, month),
            finance_lease: paid_by(finance_lease.total_payable, month),
            contract_hire: contract_hire.map(|ch| paid_by(ch.total_payable, month)),
        })
        .collect()
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
