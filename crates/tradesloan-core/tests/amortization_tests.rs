use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradesloan_core::amortization::{amortize, max_principal_for_payment, schedule, yearly_summary, LoanRequest, LoanResult};

// ===========================================================================
// Headline figures
// ===========================================================================

#[test]
fn test_fifty_thousand_over_three_years() {
    let result = amortize(dec!(50_000), 36, dec!(9.9));

    assert_eq!(result.monthly_payment, dec!(1611.01));
    assert_eq!(result.total_amount, dec!(57996.46));
    assert_eq!(result.total_interest, dec!(7996.46));
    assert_eq!(result.effective_annual_rate, dec!(10.36));
}

#[test]
fn test_zero_rate_is_straight_line() {
    let result = amortize(dec!(10_000), 10, Decimal::ZERO);

    assert_eq!(
        result,
        LoanResult {
            monthly_payment: dec!(1000.00),
            total_interest: dec!(0),
            total_amount: dec!(10000.00),
            effective_annual_rate: dec!(0),
        }
    );
    let rows: Vec<_> = schedule(dec!(10_000), 10, Decimal::ZERO).collect();
    assert!(rows.iter().all(|r| r.interest_portion.is_zero()));
    assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_zero_principal_is_all_zero() {
    assert_eq!(amortize(Decimal::ZERO, 36, dec!(9.9)), LoanResult::zero());
    assert_eq!(schedule(Decimal::ZERO, 36, dec!(9.9)).count(), 0);
}

#[test]
fn test_negative_principal_and_zero_term_are_tolerated() {
    assert!(amortize(dec!(-5_000), 12, dec!(9.9)).is_zero());
    assert!(amortize(dec!(5_000), 0, dec!(9.9)).is_zero());
    assert_eq!(schedule(dec!(5_000), 0, dec!(9.9)).len(), 0);
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

fn assert_schedule_invariants(principal: Decimal, term: u32, rate: Decimal) {
    let rows: Vec<_> = LoanRequest::new(principal, term, rate).schedule().collect();
    assert_eq!(rows.len(), term as usize);

    // Principal portions sum to the principal within a penny per month.
    let repaid: Decimal = rows.iter().map(|r| r.principal_portion).sum();
    let tolerance = Decimal::from(term) * dec!(0.01);
    assert!(
        (repaid - principal).abs() <= tolerance,
        "repaid {repaid} vs principal {principal}"
    );

    // Balance never increases and finishes at zero.
    for pair in rows.windows(2) {
        assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
    }
    let last = rows.last().unwrap();
    assert_eq!(last.remaining_balance, Decimal::ZERO);
    assert!(rows.iter().all(|r| r.remaining_balance >= Decimal::ZERO));

    // Totals agree with the headline figures.
    let result = amortize(principal, term, rate);
    let paid = result.monthly_payment * Decimal::from(term);
    assert!((result.total_amount - paid).abs() <= dec!(0.01) * Decimal::from(term));
    assert_eq!(result.total_interest, result.total_amount - principal);
}

#[test]
fn test_schedule_invariants_across_terms() {
    assert_schedule_invariants(dec!(50_000), 36, dec!(9.9));
    assert_schedule_invariants(dec!(12_345.67), 7, dec!(24.9));
    assert_schedule_invariants(dec!(250_000), 120, dec!(4.9));
    assert_schedule_invariants(dec!(999), 1, dec!(12));
}

#[test]
fn test_yearly_summary_rolls_up_schedule() {
    let rows: Vec<_> = schedule(dec!(50_000), 30, dec!(9.9)).collect();
    let years = yearly_summary(&rows);

    assert_eq!(years.len(), 3);
    assert_eq!(years[2].closing_balance, Decimal::ZERO);
    let interest: Decimal = years.iter().map(|y| y.interest_paid).sum();
    let row_interest: Decimal = rows.iter().map(|r| r.interest_portion).sum();
    assert_eq!(interest, row_interest);
}

// ===========================================================================
// Long terms
// ===========================================================================

#[test]
fn test_long_terms_at_ceiling_rate_do_not_overflow() {
    for term in [3_200u32, 4_000, 12_000] {
        let result = amortize(dec!(10_000), term, dec!(24.9));
        assert!(result.monthly_payment >= dec!(207.50), "term {term}");
        assert_eq!(result.total_interest, result.total_amount - dec!(10_000));
        assert_eq!(schedule(dec!(10_000), term, dec!(24.9)).count(), term as usize);
        assert!(max_principal_for_payment(dec!(500), term, dec!(24.9)) > Decimal::ZERO);
    }
}

#[test]
fn test_long_term_payment_converges_on_interest_only() {
    let result = amortize(dec!(10_000), 4_000, dec!(24.9));
    assert_eq!(result.monthly_payment, dec!(207.50));
    assert_eq!(max_principal_for_payment(dec!(207.50), 4_000, dec!(24.9)), dec!(10_000));
}
