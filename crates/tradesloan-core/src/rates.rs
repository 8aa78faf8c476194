//! Profile-based rate adjustment.
//!
//! The adjusted rate is the base rate plus the sum of each present band's
//! adjustment, clamped once into the product's band. Summation order does not
//! matter.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::RateBand;
use crate::profile::{BorrowerProfile, FactorKind};
use crate::types::Percent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    pub factor: FactorKind,
    pub label: String,
    /// Percentage points added to (or taken off) the base rate.
    pub adjustment: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBreakdown {
    pub base_rate: Percent,
    pub adjustments: Vec<RateAdjustment>,
    pub unclamped_rate: Percent,
    pub adjusted_rate: Percent,
    pub clamped: bool,
    pub band: RateBand,
}

/// Itemised rate build-up for a profile.
pub fn rate_breakdown(base_rate: Percent, profile: &BorrowerProfile, band: &RateBand) -> RateBreakdown {
    let adjustments: Vec<RateAdjustment> = profile
        .rules()
        .into_iter()
        .filter(|rule| !rule.rate_adjustment.is_zero())
        .map(|rule| RateAdjustment {
            factor: rule.factor,
            label: rule.label.to_string(),
            adjustment: rule.rate_adjustment,
        })
        .collect();

    let total: Decimal = adjustments.iter().map(|a| a.adjustment).sum();
    let unclamped = base_rate + total;
    let adjusted = band.clamp(unclamped);
    let clamped = adjusted != unclamped;

    if clamped {
        tracing::debug!(
            unclamped = %unclamped,
            adjusted = %adjusted,
            floor = %band.floor,
            ceiling = %band.ceiling,
            "rate clamped into product band"
        );
    }

    RateBreakdown {
        base_rate,
        adjustments,
        unclamped_rate: unclamped,
        adjusted_rate: adjusted,
        clamped,
        band: *band,
    }
}

/// Adjusted annual rate (percent), always within `band`.
pub fn adjust_rate(base_rate: Percent, profile: &BorrowerProfile, band: &RateBand) -> Percent {
    rate_breakdown(base_rate, profile, band).adjusted_rate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BusinessAge, CreditProfile, TurnoverBand, VehicleType};
    use rust_decimal_macros::dec;

    fn loan_band() -> RateBand {
        RateBand::new(dec!(4.9), dec!(24.9))
    }

    #[test]
    fn test_additive_adjustment() {
        // <1y +4.0, <£50k +2.0
        let profile = BorrowerProfile::new(BusinessAge::UnderOneYear).with_turnover(TurnoverBand::Under50k);
        assert_eq!(adjust_rate(dec!(9.9), &profile, &loan_band()), dec!(15.9));
    }

    #[test]
    fn test_neutral_bands_are_omitted() {
        let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears)
            .with_turnover(TurnoverBand::From100kTo500k)
            .with_credit(CreditProfile::Good);
        let breakdown = rate_breakdown(dec!(9.9), &profile, &loan_band());
        assert!(breakdown.adjustments.is_empty());
        assert_eq!(breakdown.adjusted_rate, dec!(9.9));
        assert!(!breakdown.clamped);
    }

    #[test]
    fn test_clamped_to_ceiling() {
        let profile = BorrowerProfile::new(BusinessAge::UnderOneYear)
            .with_turnover(TurnoverBand::Under50k)
            .with_credit(CreditProfile::Challenged)
            .with_vehicle_type(VehicleType::Specialist);
        let breakdown = rate_breakdown(dec!(19.9), &profile, &loan_band());
        assert_eq!(breakdown.unclamped_rate, dec!(33.4));
        assert_eq!(breakdown.adjusted_rate, dec!(24.9));
        assert!(breakdown.clamped);
    }

    #[test]
    fn test_clamped_to_floor() {
        let profile = BorrowerProfile::new(BusinessAge::OverFiveYears)
            .with_turnover(TurnoverBand::Over500k)
            .with_credit(CreditProfile::Excellent);
        // 5.0 - 0.5 - 1.0 - 1.0 = 2.5 -> 4.9
        assert_eq!(adjust_rate(dec!(5.0), &profile, &loan_band()), dec!(4.9));
    }

    #[test]
    fn test_always_within_band() {
        let band = loan_band();
        for age in [
            BusinessAge::UnderOneYear,
            BusinessAge::OneToTwoYears,
            BusinessAge::TwoToFiveYears,
            BusinessAge::OverFiveYears,
        ] {
            for credit in [
                CreditProfile::Excellent,
                CreditProfile::Good,
                CreditProfile::Fair,
                CreditProfile::Challenged,
            ] {
                for base in [dec!(0), dec!(9.9), dec!(60)] {
                    let profile = BorrowerProfile::new(age).with_credit(credit);
                    assert!(band.contains(adjust_rate(base, &profile, &band)));
                }
            }
        }
    }
}
