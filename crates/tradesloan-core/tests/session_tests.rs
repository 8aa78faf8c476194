use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tradesloan_core::loan::{calculate_business_loan, BusinessLoanInput, BusinessLoanOutput};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::profile::{BusinessAge, TurnoverBand};
use tradesloan_core::session::{
    clear_calculation, load_calculation, save_calculation, MemorySessionStore, SavedCalculation, SessionStore,
};
use tradesloan_core::{CalculatorKind, TradesLoanError};

fn loan_input() -> BusinessLoanInput {
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
fn test_calculation_survives_round_trip() {
    let input = loan_input();
    let output = calculate_business_loan(&input, &PolicyConfig::default()).unwrap().result;

    let mut store = MemorySessionStore::new();
    let saved = SavedCalculation {
        inputs: input,
        results: output,
    };
    save_calculation(&mut store, CalculatorKind::BusinessLoan, &saved).unwrap();

    let loaded: SavedCalculation<BusinessLoanInput, BusinessLoanOutput> =
        load_calculation(&store, CalculatorKind::BusinessLoan).unwrap();
    assert_eq!(loaded.inputs.loan_amount, dec!(50_000));
    assert_eq!(loaded.results.loan, saved.results.loan);
    assert_eq!(loaded.results.schedule.len(), 36);
}

#[test]
fn test_calculators_use_separate_keys() {
    let mut store = MemorySessionStore::new();
    let loan = SavedCalculation { inputs: "loan", results: 1 };
    let vehicle = SavedCalculation { inputs: "vehicle", results: 2 };
    save_calculation(&mut store, CalculatorKind::BusinessLoan, &loan).unwrap();
    save_calculation(&mut store, CalculatorKind::VehicleFinance, &vehicle).unwrap();

    clear_calculation(&mut store, CalculatorKind::BusinessLoan);
    let gone: Option<SavedCalculation<String, u32>> = load_calculation(&store, CalculatorKind::BusinessLoan);
    let kept: Option<SavedCalculation<String, u32>> = load_calculation(&store, CalculatorKind::VehicleFinance);

    assert!(gone.is_none());
    assert_eq!(kept.unwrap().results, 2);
}

#[test]
fn test_wrong_shape_is_absent() {
    let mut store = MemorySessionStore::new();
    store
        .set("tradesloan:business-loan", r#"{"inputs": 1}"#.to_string())
        .unwrap();
    let loaded: Option<SavedCalculation<BusinessLoanInput, BusinessLoanOutput>> =
        load_calculation(&store, CalculatorKind::BusinessLoan);
    assert!(loaded.is_none());
}

#[test]
fn test_full_store_reports_storage_error() {
    let mut store = MemorySessionStore::with_quota(64);
    let input = loan_input();
    let output = calculate_business_loan(&input, &PolicyConfig::default()).unwrap().result;
    let saved = SavedCalculation {
        inputs: input,
        results: output,
    };

    let err = save_calculation(&mut store, CalculatorKind::BusinessLoan, &saved).unwrap_err();
    assert!(matches!(err, TradesLoanError::Storage(_)));
}
