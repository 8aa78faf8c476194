//! Eligibility scoring.
//!
//! Base 50 points, plus each band's points, plus a loan-size adjustment from
//! the ratio of the requested amount to the band's reference facility,
//! clamped to 0-100. Positive and negative factor lists are read off the same
//! rule entries that produced the points.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profile::{BandRule, BorrowerProfile, FactorKind};
use crate::types::{clamp_score, Money, Ratio, Tier};

pub const BASE_SCORE: i32 = 50;

const SMALL_LOAN_RATIO: Decimal = dec!(0.25);
const LARGE_LOAN_RATIO: Decimal = dec!(0.75);
const LOAN_SIZE_POINTS: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub score: u32,
    pub tier: Tier,
    pub message: String,
    pub positive_factors: Vec<String>,
    pub negative_factors: Vec<String>,
    /// Requested amount over reference amount (0 when no reference).
    pub loan_to_reference_ratio: Ratio,
}

/// Score a request against a profile. `reference_amount` is the typical
/// facility for the borrower's band; see
/// [`BorrowerProfile::reference_amount`].
pub fn score(profile: &BorrowerProfile, requested_amount: Money, reference_amount: Money) -> EligibilityResult {
    let ratio = loan_to_reference_ratio(requested_amount, reference_amount);

    let mut rules: Vec<BandRule> = profile.rules();
    rules.extend(loan_size_rule(ratio));

    let points = BASE_SCORE + rules.iter().map(|r| r.points).sum::<i32>();
    let score = clamp_score(points);
    let tier = Tier::from_score(score);

    let (positive_factors, negative_factors) = factor_lists(&rules);

    EligibilityResult {
        score,
        tier,
        message: tier_message(tier).to_string(),
        positive_factors,
        negative_factors,
        loan_to_reference_ratio: ratio,
    }
}

/// Score using the reference amount implied by the profile's turnover band.
pub fn score_for_band(profile: &BorrowerProfile, requested_amount: Money) -> EligibilityResult {
    score(profile, requested_amount, profile.reference_amount())
}

/// Split rules into human-readable positive and negative factors, preserving
/// rule order. Zero-point rules are neither.
pub(crate) fn factor_lists(rules: &[BandRule]) -> (Vec<String>, Vec<String>) {
    let positive = rules
        .iter()
        .filter(|r| r.points > 0)
        .map(|r| r.label.to_string())
        .collect();
    let negative = rules
        .iter()
        .filter(|r| r.points < 0)
        .map(|r| r.label.to_string())
        .collect();
    (positive, negative)
}

fn loan_to_reference_ratio(requested: Money, reference: Money) -> Ratio {
    if reference <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    requested.max(Decimal::ZERO) / reference
}

fn loan_size_rule(ratio: Ratio) -> Option<BandRule> {
    if ratio < SMALL_LOAN_RATIO {
        Some(BandRule {
            factor: FactorKind::LoanSize,
            rate_adjustment: Decimal::ZERO,
            points: LOAN_SIZE_POINTS,
            label: "Modest amount relative to turnover",
        })
    } else if ratio > LARGE_LOAN_RATIO {
        Some(BandRule {
            factor: FactorKind::LoanSize,
            rate_adjustment: Decimal::ZERO,
            points: -LOAN_SIZE_POINTS,
            label: "Large amount relative to turnover",
        })
    } else {
        None
    }
}

fn tier_message(tier: Tier) -> &'static str {
    match tier {
        Tier::High => "Strong eligibility: you are likely to be offered competitive rates.",
        Tier::Medium => {
            "Reasonable eligibility: approval is likely, though terms may depend on further checks."
        }
        Tier::Low => {
            "Limited eligibility: consider a smaller amount, a guarantor, or a specialist lender."
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BusinessAge, CreditProfile, TurnoverBand};

    #[test]
    fn test_established_business_small_request() {
        let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears).with_turnover(TurnoverBand::From100kTo500k);
        let result = score(&profile, dec!(50_000), dec!(250_000));
        // 50 + 15 (age) + 20 (turnover) + 10 (ratio 0.2)
        assert_eq!(result.score, 95);
        assert_eq!(result.tier, Tier::High);
        assert_eq!(result.loan_to_reference_ratio, dec!(0.2));
    }

    #[test]
    fn test_mid_ratio_has_no_size_factor() {
        let profile = BorrowerProfile::new(BusinessAge::OneToTwoYears);
        let result = score(&profile, dec!(50_000), dec!(100_000));
        assert_eq!(result.score, 55);
        assert_eq!(result.tier, Tier::Medium);
        assert_eq!(result.positive_factors, vec!["Trading for one to two years"]);
        assert!(result.negative_factors.is_empty());
    }

    #[test]
    fn test_score_floors_at_zero() {
        let profile = BorrowerProfile::new(BusinessAge::UnderOneYear)
            .with_turnover(TurnoverBand::Under50k)
            .with_credit(CreditProfile::Challenged);
        // 50 - 10 - 10 - 20 - 10 = 0
        let result = score(&profile, dec!(40_000), dec!(25_000));
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, Tier::Low);
        assert_eq!(result.negative_factors.len(), 4);
    }

    #[test]
    fn test_score_caps_at_hundred() {
        let profile = BorrowerProfile::new(BusinessAge::OverFiveYears)
            .with_turnover(TurnoverBand::Over500k)
            .with_credit(CreditProfile::Excellent);
        let result = score(&profile, dec!(10_000), dec!(1_000_000));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_zero_reference_ratio_defaults_to_zero() {
        let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears);
        let result = score(&profile, dec!(80_000), Decimal::ZERO);
        assert_eq!(result.loan_to_reference_ratio, Decimal::ZERO);
        assert_eq!(result.score, 75);
    }

    #[test]
    fn test_score_for_band_uses_turnover_reference() {
        let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears).with_turnover(TurnoverBand::From50kTo100k);
        // 45k / 50k = 0.9 -> -10
        let result = score_for_band(&profile, dec!(45_000));
        assert_eq!(result.score, 65);
        assert!(result
            .negative_factors
            .contains(&"Large amount relative to turnover".to_string()));
    }
}
