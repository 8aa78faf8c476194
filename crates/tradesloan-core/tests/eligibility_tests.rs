use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tradesloan_core::eligibility::{score, score_for_band};
use tradesloan_core::profile::{Band, BorrowerProfile, BusinessAge, CreditProfile, TurnoverBand};
use tradesloan_core::Tier;

#[test]
fn test_established_mid_turnover_small_request() {
    let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears).with_turnover(TurnoverBand::From100kTo500k);
    let result = score(&profile, dec!(50_000), dec!(250_000));

    assert_eq!(result.score, 95);
    assert_eq!(result.tier, Tier::High);
    assert_eq!(result.loan_to_reference_ratio, dec!(0.2));
    assert_eq!(result.positive_factors.len(), 3);
    assert!(result.negative_factors.is_empty());
}

#[test]
fn test_band_reference_matches_explicit() {
    let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears).with_turnover(TurnoverBand::From100kTo500k);
    assert_eq!(
        score_for_band(&profile, dec!(50_000)),
        score(&profile, dec!(50_000), dec!(250_000))
    );
}

#[test]
fn test_score_always_in_range() {
    for age in BusinessAge::ALL {
        for turnover in TurnoverBand::ALL {
            for credit in CreditProfile::ALL {
                for amount in [dec!(0), dec!(10_000), dec!(400_000), dec!(5_000_000)] {
                    let profile = BorrowerProfile::new(*age).with_turnover(*turnover).with_credit(*credit);
                    let result = score_for_band(&profile, amount);
                    assert!(result.score <= 100);
                    assert_eq!(result.tier, Tier::from_score(result.score));
                }
            }
        }
    }
}

#[test]
fn test_weakest_profile_floors_at_zero() {
    let profile = BorrowerProfile::new(BusinessAge::UnderOneYear)
        .with_turnover(TurnoverBand::Under50k)
        .with_credit(CreditProfile::Challenged);
    let result = score_for_band(&profile, dec!(100_000));

    // 50 - 10 - 10 - 20 - 10
    assert_eq!(result.score, 0);
    assert_eq!(result.tier, Tier::Low);
    assert_eq!(result.negative_factors.len(), 4);
}

#[test]
fn test_tiers_are_monotonic() {
    let mut last = Tier::Low;
    for s in 0..=100 {
        let tier = Tier::from_score(s);
        assert!(rank(tier) >= rank(last), "tier fell at score {s}");
        last = tier;
    }
    assert_eq!(Tier::from_score(39), Tier::Low);
    assert_eq!(Tier::from_score(40), Tier::Medium);
    assert_eq!(Tier::from_score(69), Tier::Medium);
    assert_eq!(Tier::from_score(70), Tier::High);
}

fn rank(tier: Tier) -> u8 {
    match tier {
        Tier::Low => 0,
        Tier::Medium => 1,
        Tier::High => 2,
    }
}
