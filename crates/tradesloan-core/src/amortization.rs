//! Level-payment amortisation.
//!
//! Converts (principal, term, annual rate) into a monthly payment, summary
//! totals and a month-by-month schedule, and inverts the annuity to size the
//! principal a given payment can support. Intermediate values are carried at
//! full `Decimal` precision; rounding to pence happens only when a value is
//! returned.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{round_money, round_rate, Money, Percent};

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Immutable input to the amortisation engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    pub term_months: u32,
    pub annual_rate: Percent,
}

impl LoanRequest {
    pub fn new(principal: Money, term_months: u32, annual_rate: Percent) -> Self {
        LoanRequest {
            principal,
            term_months,
            annual_rate,
        }
    }

    pub fn amortize(&self) -> LoanResult {
        amortize(self.principal, self.term_months, self.annual_rate)
    }

    pub fn schedule(&self) -> Schedule {
        schedule(self.principal, self.term_months, self.annual_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    /// Compounded annual rate implied by the monthly rate, in percent.
    pub effective_annual_rate: Percent,
}

impl LoanResult {
    pub fn zero() -> Self {
        LoanResult {
            monthly_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            effective_annual_rate: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.monthly_payment.is_zero() && self.total_amount.is_zero()
    }
}

/// A single month of the repayment schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Schedule rows folded into a loan year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Payment and totals for a level-payment loan.
///
/// Non-positive principal or a zero term yields an all-zero result rather
/// than an error.
pub fn amortize(principal: Money, term_months: u32, annual_rate: Percent) -> LoanResult {
    if principal <= Decimal::ZERO || term_months == 0 {
        return LoanResult::zero();
    }

    let r = monthly_rate(annual_rate);
    let payment = exact_payment(principal, term_months, annual_rate);
    let total = payment * Decimal::from(term_months);

    let effective = if r.is_zero() {
        Decimal::ZERO
    } else {
        compound(Decimal::ONE + r, MONTHS_PER_YEAR)
            .and_then(|factor| (factor - Decimal::ONE).checked_mul(dec!(100)))
            .unwrap_or(Decimal::MAX)
    };

    LoanResult {
        monthly_payment: round_money(payment),
        total_interest: round_money(total - principal),
        total_amount: round_money(total),
        effective_annual_rate: round_rate(effective),
    }
}

/// Month-by-month schedule. The iterator is finite (exactly `term_months`
/// rows, none for a degenerate loan) and can be restarted by cloning it or
/// calling `schedule` again.
pub fn schedule(principal: Money, term_months: u32, annual_rate: Percent) -> Schedule {
    let degenerate = principal <= Decimal::ZERO || term_months == 0;
    Schedule {
        balance: if degenerate { Decimal::ZERO } else { principal },
        payment: if degenerate {
            Decimal::ZERO
        } else {
            exact_payment(principal, term_months, annual_rate)
        },
        monthly_rate: monthly_rate(annual_rate),
        month: 0,
        term_months: if degenerate { 0 } else { term_months },
    }
}

/// Largest principal a fixed monthly payment can service (inverse annuity).
pub fn max_principal_for_payment(payment: Money, term_months: u32, annual_rate: Percent) -> Money {
    if payment <= Decimal::ZERO || term_months == 0 {
        return Decimal::ZERO;
    }
    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return round_money(payment * Decimal::from(term_months));
    }
    let discount = annuity_discount(r, term_months);
    if discount.is_zero() {
        return round_money(payment * Decimal::from(term_months));
    }
    round_money(payment * discount / r)
}

/// Fold a schedule into loan years for chart series.
pub fn yearly_summary(rows: &[AmortizationRow]) -> Vec<YearSummary> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(i, chunk)| YearSummary {
            year: i as u32 + 1,
            principal_paid: chunk.iter().map(|r| r.principal_portion).sum(),
            interest_paid: chunk.iter().map(|r| r.interest_portion).sum(),
            closing_balance: chunk
                .last()
                .map(|r| r.remaining_balance)
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Schedule iterator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Schedule {
    balance: Decimal,
    payment: Decimal,
    monthly_rate: Decimal,
    month: u32,
    term_months: u32,
}

impl Iterator for Schedule {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.term_months {
            return None;
        }
        self.month += 1;

        let interest = self.balance * self.monthly_rate;
        // The final row clears whatever balance the level payments left.
        let principal = if self.month == self.term_months {
            self.balance
        } else {
            self.payment - interest
        };
        self.balance = (self.balance - principal).max(Decimal::ZERO);

        Some(AmortizationRow {
            month: self.month,
            payment: round_money(principal + interest),
            principal_portion: round_money(principal),
            interest_portion: round_money(interest),
            remaining_balance: round_money(self.balance),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.term_months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Schedule {}

// ---------------------------------------------------------------------------
// Crate-internal helpers
// ---------------------------------------------------------------------------

/// Annual percentage to a monthly decimal rate (9.9 -> 0.00825).
pub(crate) fn monthly_rate(annual_rate: Percent) -> Decimal {
    annual_rate.max(Decimal::ZERO) / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Unrounded level payment. Callers guarantee `term_months > 0`.
pub(crate) fn exact_payment(principal: Money, term_months: u32, annual_rate: Percent) -> Decimal {
    let n = Decimal::from(term_months);
    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return principal / n;
    }
    let discount = annuity_discount(r, term_months);
    if discount.is_zero() {
        return principal / n;
    }
    principal * r / discount
}

/// (1 + r)^n, or `None` once it passes `Decimal::MAX`.
fn compound(one_plus_r: Decimal, periods: u32) -> Option<Decimal> {
    one_plus_r.checked_powu(u64::from(periods))
}

/// 1 - (1 + r)^-n. Tends to 1 on long terms, which is the value used once
/// the compound factor overflows; zero when `r` is below `Decimal` precision.
fn annuity_discount(r: Decimal, term_months: u32) -> Decimal {
    match compound(Decimal::ONE + r, term_months) {
        Some(factor) => Decimal::ONE - Decimal::ONE / factor,
        None => Decimal::ONE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
