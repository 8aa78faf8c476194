//! Cash-flow affordability.
//!
//! Free cash flow after existing debt sets a comfortable new monthly payment
//! (40% of free cash flow, never negative). That payment, scaled by the
//! borrower's age and credit multipliers, is converted into a maximum
//! borrowable amount per product by inverting the annuity at the product's
//! sizing term and base rate. The revolving invoice facility is sized from
//! turnover instead.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::amortization::max_principal_for_payment;
use crate::eligibility::factor_lists;
use crate::policy::PolicyConfig;
use crate::profile::{BandRule, BusinessAge, CreditProfile, FactorKind};
use crate::types::*;
use crate::TradesLoanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Share of free cash flow treated as a comfortable new repayment. Fixed.
pub const COMFORTABLE_PAYMENT_RATIO: Decimal = dec!(0.40);

const BASE_SCORE: i32 = 50;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInputs {
    pub monthly_revenue: Money,
    pub monthly_expenses: Money,
    #[serde(default)]
    pub existing_debt_payments: Money,
    pub business_age: BusinessAge,
    pub credit_profile: CreditProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub net_profit: Money,
    /// Net profit after existing debt. May be negative.
    pub free_cash_flow: Money,
    pub profit_margin_percent: Percent,
    pub max_comfortable_payment: Money,
    pub debt_service_coverage_ratio: Ratio,
    /// Age multiplier times credit multiplier.
    pub combined_multiplier: Ratio,
    pub score: u32,
    pub tier: Tier,
    pub recommendation: String,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    pub per_product_max_amount: BTreeMap<FinanceProduct, Money>,
    /// Where monthly revenue goes: expenses, existing debt, the comfortable
    /// payment and the retained buffer.
    pub cash_flow_breakdown: Vec<ChartSegment>,
    /// Per-product maxima as a bar series.
    pub capacity_series: Vec<ChartSegment>,
}

/// Size of free cash flow, for the recommendation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CashFlowMagnitude {
    Negative,
    Thin,
    Healthy,
    Strong,
}

impl CashFlowMagnitude {
    fn of(free_cash_flow: Money) -> Self {
        if free_cash_flow <= Decimal::ZERO {
            CashFlowMagnitude::Negative
        } else if free_cash_flow < dec!(1_000) {
            CashFlowMagnitude::Thin
        } else if free_cash_flow < dec!(5_000) {
            CashFlowMagnitude::Healthy
        } else {
            CashFlowMagnitude::Strong
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse affordability. Total over its input domain: zero revenue or zero
/// obligations produce zero ratios rather than errors.
pub fn analyze(inputs: &AffordabilityInputs, policy: &PolicyConfig) -> AffordabilityResult {
    let net_profit = inputs.monthly_revenue - inputs.monthly_expenses;
    let free_cash_flow = net_profit - inputs.existing_debt_payments;

    let max_comfortable_payment = round_pounds(free_cash_flow * COMFORTABLE_PAYMENT_RATIO).max(Decimal::ZERO);

    let obligations = inputs.existing_debt_payments + max_comfortable_payment;
    let dscr = if obligations.is_zero() {
        Decimal::ZERO
    } else {
        net_profit / obligations
    };

    let profit_margin = if inputs.monthly_revenue.is_zero() {
        Decimal::ZERO
    } else {
        net_profit / inputs.monthly_revenue * dec!(100)
    };

    let multiplier = inputs.business_age.capacity_multiplier() * inputs.credit_profile.capacity_multiplier();
    let adjusted_payment = max_comfortable_payment * multiplier;

    let mut per_product = BTreeMap::new();
    for product in [
        FinanceProduct::BusinessLoan,
        FinanceProduct::EquipmentFinance,
        FinanceProduct::VehicleFinance,
    ] {
        if let Some(terms) = policy.terms(product) {
            let payment = adjusted_payment * terms.payment_scale;
            per_product.insert(
                product,
                max_principal_for_payment(payment, terms.term_months, terms.base_rate),
            );
        }
    }
    let invoice_facility = inputs.monthly_revenue.max(Decimal::ZERO) * policy.invoice_advance_ratio * multiplier;
    per_product.insert(FinanceProduct::InvoiceFinance, round_money(invoice_facility));

    let rules = score_rules(inputs, free_cash_flow);
    let score = clamp_score(BASE_SCORE + rules.iter().map(|r| r.points).sum::<i32>());
    let tier = Tier::from_score(score);
    let (positive_factors, negative_factors) = factor_lists(&rules);

    let recommendation = recommendation_text(
        tier,
        CashFlowMagnitude::of(free_cash_flow),
        inputs.business_age,
        inputs.credit_profile,
    );

    let cash_flow_breakdown = vec![
        ChartSegment::new("Operating expenses", round_money(inputs.monthly_expenses), palette::EXPENSES),
        ChartSegment::new(
            "Existing debt payments",
            round_money(inputs.existing_debt_payments),
            palette::EXISTING_DEBT,
        ),
        ChartSegment::new("Comfortable new payment", max_comfortable_payment, palette::NEW_PAYMENT),
        ChartSegment::new(
            "Retained buffer",
            round_money((free_cash_flow - max_comfortable_payment).max(Decimal::ZERO)),
            palette::BUFFER,
        ),
    ];

    let capacity_series = per_product
        .iter()
        .map(|(product, amount)| ChartSegment::new(product.label(), *amount, palette::PRODUCT))
        .collect();

    AffordabilityResult {
        net_profit: round_money(net_profit),
        free_cash_flow: round_money(free_cash_flow),
        profit_margin_percent: round_rate(profit_margin),
        max_comfortable_payment,
        debt_service_coverage_ratio: round_rate(dscr),
        combined_multiplier: multiplier,
        score,
        tier,
        recommendation: recommendation.to_string(),
        positive_factors,
        negative_factors,
        per_product_max_amount: per_product,
        cash_flow_breakdown,
        capacity_series,
    }
}

/// Affordability calculator entry point with the standard envelope.
pub fn calculate_affordability(
    inputs: &AffordabilityInputs,
    policy: &PolicyConfig,
) -> TradesLoanResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    policy.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let result = analyze(inputs, policy);

    if result.free_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Outgoings exceed income by £{} a month; no new borrowing is affordable.",
            -result.free_cash_flow
        ));
    }
    if inputs.monthly_revenue.is_zero() {
        warnings.push("Monthly revenue is zero; margin and invoice facility are zero.".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "comfortable_payment_ratio": COMFORTABLE_PAYMENT_RATIO.to_string(),
        "invoice_advance_ratio": policy.invoice_advance_ratio.to_string(),
        "business_loan_term_months": policy.business_loan.term_months,
        "equipment_finance_term_months": policy.equipment_finance.term_months,
        "vehicle_finance_term_months": policy.vehicle_finance.term_months,
    });

    Ok(with_metadata(
        "Free-cash-flow affordability with inverse-annuity sizing",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Scoring rules
// ---------------------------------------------------------------------------

fn score_rules(inputs: &AffordabilityInputs, free_cash_flow: Money) -> Vec<BandRule> {
    let mut rules = Vec::with_capacity(4);

    let revenue = inputs.monthly_revenue;
    let fcf_ratio = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        free_cash_flow / revenue
    };
    let debt_ratio = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        inputs.existing_debt_payments / revenue
    };

    let (points, label) = if fcf_ratio >= dec!(0.30) {
        (20, "Strong free cash flow (30%+ of revenue)")
    } else if fcf_ratio >= dec!(0.15) {
        (10, "Healthy free cash flow (15-30% of revenue)")
    } else if fcf_ratio > Decimal::ZERO {
        (0, "Thin free cash flow")
    } else {
        (-30, "No free cash flow after existing commitments")
    };
    rules.push(rule(FactorKind::CashFlow, points, label));

    let (points, label) = if debt_ratio <= dec!(0.10) {
        (10, "Low existing debt burden")
    } else if debt_ratio <= dec!(0.25) {
        (0, "Moderate existing debt burden")
    } else {
        (-15, "High existing debt burden (over 25% of revenue)")
    };
    rules.push(rule(FactorKind::DebtBurden, points, label));

    // Own point scale for age and credit, band labels from the profile rules.
    let points = match inputs.business_age {
        BusinessAge::UnderOneYear => -10,
        BusinessAge::OneToTwoYears => 0,
        BusinessAge::TwoToFiveYears => 5,
        BusinessAge::OverFiveYears => 10,
    };
    rules.push(rule(FactorKind::BusinessAge, points, inputs.business_age.rule().label));

    let points = match inputs.credit_profile {
        CreditProfile::Excellent => 15,
        CreditProfile::Good => 5,
        CreditProfile::Fair => -10,
        CreditProfile::Challenged => -20,
    };
    rules.push(rule(FactorKind::Credit, points, inputs.credit_profile.rule().label));

    rules
}

fn rule(factor: FactorKind, points: i32, label: &'static str) -> BandRule {
    BandRule {
        factor,
        rate_adjustment: Decimal::ZERO,
        points,
        label,
    }
}

fn recommendation_text(
    tier: Tier,
    cash_flow: CashFlowMagnitude,
    age: BusinessAge,
    credit: CreditProfile,
) -> &'static str {
    use CashFlowMagnitude::*;

    match (tier, cash_flow, age, credit) {
        (_, Negative, _, _) => {
            "Outgoings currently exceed income after existing debt. Improve cash flow before taking on new borrowing."
        }
        (Tier::Low, _, _, CreditProfile::Challenged) => {
            "Specialist lenders may consider challenged credit; expect higher rates and consider a guarantor or security."
        }
        (Tier::Low, _, BusinessAge::UnderOneYear, _) => {
            "Start-up finance or a small equipment facility may suit a young business; build a trading record before larger borrowing."
        }
        (Tier::Low, _, _, _) => {
            "Borrowing looks stretched. Consider a smaller amount or a longer term to keep repayments comfortable."
        }
        (Tier::Medium, Thin, _, _) => {
            "Headroom is limited. Asset finance secured on equipment or vehicles may be easier to obtain than an unsecured loan."
        }
        (Tier::Medium, _, _, CreditProfile::Fair | CreditProfile::Challenged) => {
            "Affordability is reasonable, but improving your credit profile would unlock better rates."
        }
        (Tier::Medium, _, _, _) => {
            "You should be able to borrow comfortably within the amounts shown. Compare hire purchase and leasing for asset purchases."
        }
        (Tier::High, Strong, BusinessAge::OverFiveYears, CreditProfile::Excellent | CreditProfile::Good) => {
            "Excellent position: an established record and strong cash flow should give access to the most competitive rates."
        }
        (Tier::High, _, _, _) => "Strong affordability: you are well placed to borrow up to the amounts shown.",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
