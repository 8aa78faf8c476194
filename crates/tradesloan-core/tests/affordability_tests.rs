use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradesloan_core::affordability::{analyze, calculate_affordability, AffordabilityInputs};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::profile::{BusinessAge, CreditProfile};
use tradesloan_core::{FinanceProduct, Tier};

fn workshop() -> AffordabilityInputs {
    AffordabilityInputs {
        monthly_revenue: dec!(10_000),
        monthly_expenses: dec!(6_000),
        existing_debt_payments: dec!(500),
        business_age: BusinessAge::TwoToFiveYears,
        credit_profile: CreditProfile::Good,
    }
}

#[test]
fn test_headline_capacity() {
    let result = analyze(&workshop(), &PolicyConfig::default());

    assert_eq!(result.net_profit, dec!(4_000));
    assert_eq!(result.free_cash_flow, dec!(3_500));
    assert_eq!(result.max_comfortable_payment, dec!(1_400));
    // 4000 / (500 + 1400)
    assert_eq!(result.debt_service_coverage_ratio, dec!(2.11));
    assert_eq!(result.profit_margin_percent, dec!(40));
    assert_eq!(result.combined_multiplier, dec!(1.0));
}

#[test]
fn test_every_product_gets_a_maximum() {
    let result = analyze(&workshop(), &PolicyConfig::default());
    let products: Vec<FinanceProduct> = result.per_product_max_amount.keys().copied().collect();

    assert_eq!(
        products,
        vec![
            FinanceProduct::BusinessLoan,
            FinanceProduct::EquipmentFinance,
            FinanceProduct::VehicleFinance,
            FinanceProduct::InvoiceFinance,
        ]
    );
    assert!(result.per_product_max_amount.values().all(|v| *v > Decimal::ZERO));
    assert_eq!(result.per_product_max_amount[&FinanceProduct::InvoiceFinance], dec!(8_000));
    assert_eq!(result.capacity_series.len(), 4);
}

#[test]
fn test_negative_cash_flow_never_negative_payment() {
    let mut inputs = workshop();
    inputs.monthly_expenses = dec!(11_000);
    let result = analyze(&inputs, &PolicyConfig::default());

    assert_eq!(result.net_profit, dec!(-1_000));
    assert_eq!(result.free_cash_flow, dec!(-1_500));
    assert_eq!(result.max_comfortable_payment, Decimal::ZERO);
    assert!(result.per_product_max_amount.values().all(|v| *v >= Decimal::ZERO));
}

#[test]
fn test_zero_revenue_and_obligations() {
    let inputs = AffordabilityInputs {
        monthly_revenue: Decimal::ZERO,
        monthly_expenses: Decimal::ZERO,
        existing_debt_payments: Decimal::ZERO,
        business_age: BusinessAge::UnderOneYear,
        credit_profile: CreditProfile::Challenged,
    };
    let result = analyze(&inputs, &PolicyConfig::default());

    assert_eq!(result.profit_margin_percent, Decimal::ZERO);
    assert_eq!(result.debt_service_coverage_ratio, Decimal::ZERO);
    assert_eq!(result.tier, Tier::Low);
}

#[test]
fn test_envelope_carries_result() {
    let out = calculate_affordability(&workshop(), &PolicyConfig::default()).unwrap();
    assert_eq!(out.result.max_comfortable_payment, dec!(1_400));
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}
