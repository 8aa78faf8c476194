//! Borrower and asset bands.
//!
//! Each band resolves, through one exhaustive `match`, to a single
//! [`BandRule`] holding its rate adjustment, its eligibility points and the
//! label shown to the borrower. The rate adjuster, the score accumulator and
//! the factor lists all read the same entry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Money, Percent, Ratio};

// ---------------------------------------------------------------------------
// Band plumbing
// ---------------------------------------------------------------------------

/// A closed set of bands with stable string codes.
pub trait Band: Sized + Copy + 'static {
    const ALL: &'static [Self];

    /// Code used on the wire and in the CLI, e.g. `"2-5"`.
    fn code(&self) -> &'static str;

    fn parse_code(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.code() == s.trim())
    }
}

/// Which profile attribute a rule comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    BusinessAge,
    Turnover,
    Credit,
    EquipmentValue,
    VehicleType,
    LoanSize,
    CashFlow,
    DebtBurden,
}

/// The single source of truth for one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandRule {
    pub factor: FactorKind,
    /// Percentage points added to the base rate.
    pub rate_adjustment: Percent,
    /// Eligibility points added to the base score.
    pub points: i32,
    pub label: &'static str,
}

macro_rules! band_str {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Band>::parse_code(s).ok_or_else(|| {
                    let codes: Vec<&str> = <$ty as Band>::ALL.iter().map(|b| b.code()).collect();
                    format!("unknown band '{}', expected one of: {}", s, codes.join(", "))
                })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Business age
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessAge {
    #[serde(rename = "<1")]
    UnderOneYear,
    #[serde(rename = "1-2")]
    OneToTwoYears,
    #[serde(rename = "2-5")]
    TwoToFiveYears,
    #[serde(rename = ">5")]
    OverFiveYears,
}

impl Band for BusinessAge {
    const ALL: &'static [Self] = &[
        BusinessAge::UnderOneYear,
        BusinessAge::OneToTwoYears,
        BusinessAge::TwoToFiveYears,
        BusinessAge::OverFiveYears,
    ];

    fn code(&self) -> &'static str {
        match self {
            BusinessAge::UnderOneYear => "<1",
            BusinessAge::OneToTwoYears => "1-2",
            BusinessAge::TwoToFiveYears => "2-5",
            BusinessAge::OverFiveYears => ">5",
        }
    }
}

impl BusinessAge {
    pub fn rule(&self) -> BandRule {
        let (rate_adjustment, points, label) = match self {
            BusinessAge::UnderOneYear => (dec!(4.0), -10, "Trading for less than a year"),
            BusinessAge::OneToTwoYears => (dec!(2.0), 5, "Trading for one to two years"),
            BusinessAge::TwoToFiveYears => (dec!(0.0), 15, "Established trading history (2-5 years)"),
            BusinessAge::OverFiveYears => (dec!(-0.5), 20, "Long trading history (over 5 years)"),
        };
        BandRule {
            factor: FactorKind::BusinessAge,
            rate_adjustment,
            points,
            label,
        }
    }

    /// Borrowing-capacity multiplier used by affordability sizing.
    pub fn capacity_multiplier(&self) -> Ratio {
        match self {
            BusinessAge::UnderOneYear => dec!(0.6),
            BusinessAge::OneToTwoYears => dec!(0.8),
            BusinessAge::TwoToFiveYears => dec!(1.0),
            BusinessAge::OverFiveYears => dec!(1.15),
        }
    }
}

band_str!(BusinessAge);

// ---------------------------------------------------------------------------
// Turnover
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnoverBand {
    #[serde(rename = "<50k")]
    Under50k,
    #[serde(rename = "50k-100k")]
    From50kTo100k,
    #[serde(rename = "100k-500k")]
    From100kTo500k,
    #[serde(rename = ">500k")]
    Over500k,
}

impl Band for TurnoverBand {
    const ALL: &'static [Self] = &[
        TurnoverBand::Under50k,
        TurnoverBand::From50kTo100k,
        TurnoverBand::From100kTo500k,
        TurnoverBand::Over500k,
    ];

    fn code(&self) -> &'static str {
        match self {
            TurnoverBand::Under50k => "<50k",
            TurnoverBand::From50kTo100k => "50k-100k",
            TurnoverBand::From100kTo500k => "100k-500k",
            TurnoverBand::Over500k => ">500k",
        }
    }
}

impl TurnoverBand {
    pub fn rule(&self) -> BandRule {
        let (rate_adjustment, points, label) = match self {
            TurnoverBand::Under50k => (dec!(2.0), -10, "Annual turnover under £50k"),
            TurnoverBand::From50kTo100k => (dec!(1.0), 10, "Annual turnover £50k-£100k"),
            TurnoverBand::From100kTo500k => (dec!(0.0), 20, "Healthy annual turnover (£100k-£500k)"),
            TurnoverBand::Over500k => (dec!(-1.0), 25, "Strong annual turnover (over £500k)"),
        };
        BandRule {
            factor: FactorKind::Turnover,
            rate_adjustment,
            points,
            label,
        }
    }

    /// Typical maximum facility for the band; the denominator of the
    /// loan-size ratio.
    pub fn reference_amount(&self) -> Money {
        match self {
            TurnoverBand::Under50k => dec!(25_000),
            TurnoverBand::From50kTo100k => dec!(50_000),
            TurnoverBand::From100kTo500k => dec!(250_000),
            TurnoverBand::Over500k => dec!(1_000_000),
        }
    }
}

band_str!(TurnoverBand);

// ---------------------------------------------------------------------------
// Credit profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditProfile {
    Excellent,
    Good,
    Fair,
    Challenged,
}

impl Band for CreditProfile {
    const ALL: &'static [Self] = &[
        CreditProfile::Excellent,
        CreditProfile::Good,
        CreditProfile::Fair,
        CreditProfile::Challenged,
    ];

    fn code(&self) -> &'static str {
        match self {
            CreditProfile::Excellent => "excellent",
            CreditProfile::Good => "good",
            CreditProfile::Fair => "fair",
            CreditProfile::Challenged => "challenged",
        }
    }
}

impl CreditProfile {
    pub fn rule(&self) -> BandRule {
        let (rate_adjustment, points, label) = match self {
            CreditProfile::Excellent => (dec!(-1.0), 20, "Excellent credit profile"),
            CreditProfile::Good => (dec!(0.0), 10, "Good credit profile"),
            CreditProfile::Fair => (dec!(3.0), -5, "Fair credit profile"),
            CreditProfile::Challenged => (dec!(6.0), -20, "Challenged credit history"),
        };
        BandRule {
            factor: FactorKind::Credit,
            rate_adjustment,
            points,
            label,
        }
    }

    pub fn capacity_multiplier(&self) -> Ratio {
        match self {
            CreditProfile::Excellent => dec!(1.2),
            CreditProfile::Good => dec!(1.0),
            CreditProfile::Fair => dec!(0.75),
            CreditProfile::Challenged => dec!(0.5),
        }
    }
}

band_str!(CreditProfile);

// ---------------------------------------------------------------------------
// Equipment value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentValueBand {
    #[serde(rename = "<10k")]
    Under10k,
    #[serde(rename = "10k-50k")]
    From10kTo50k,
    #[serde(rename = "50k-250k")]
    From50kTo250k,
    #[serde(rename = ">250k")]
    Over250k,
}

impl Band for EquipmentValueBand {
    const ALL: &'static [Self] = &[
        EquipmentValueBand::Under10k,
        EquipmentValueBand::From10kTo50k,
        EquipmentValueBand::From50kTo250k,
        EquipmentValueBand::Over250k,
    ];

    fn code(&self) -> &'static str {
        match self {
            EquipmentValueBand::Under10k => "<10k",
            EquipmentValueBand::From10kTo50k => "10k-50k",
            EquipmentValueBand::From50kTo250k => "50k-250k",
            EquipmentValueBand::Over250k => ">250k",
        }
    }
}

impl EquipmentValueBand {
    pub fn from_value(value: Money) -> Self {
        if value < dec!(10_000) {
            EquipmentValueBand::Under10k
        } else if value < dec!(50_000) {
            EquipmentValueBand::From10kTo50k
        } else if value <= dec!(250_000) {
            EquipmentValueBand::From50kTo250k
        } else {
            EquipmentValueBand::Over250k
        }
    }

    /// Asset value bands move price only; they carry no eligibility points.
    pub fn rule(&self) -> BandRule {
        let (rate_adjustment, label) = match self {
            EquipmentValueBand::Under10k => (dec!(1.0), "Small-ticket equipment (under £10k)"),
            EquipmentValueBand::From10kTo50k => (dec!(0.0), "Equipment value £10k-£50k"),
            EquipmentValueBand::From50kTo250k => (dec!(-0.5), "Equipment value £50k-£250k"),
            EquipmentValueBand::Over250k => (dec!(-1.0), "High-value equipment (over £250k)"),
        };
        BandRule {
            factor: FactorKind::EquipmentValue,
            rate_adjustment,
            points: 0,
            label,
        }
    }
}

band_str!(EquipmentValueBand);

// ---------------------------------------------------------------------------
// Vehicle type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Van,
    Pickup,
    Hgv,
    Specialist,
}

impl Band for VehicleType {
    const ALL: &'static [Self] = &[
        VehicleType::Car,
        VehicleType::Van,
        VehicleType::Pickup,
        VehicleType::Hgv,
        VehicleType::Specialist,
    ];

    fn code(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Van => "van",
            VehicleType::Pickup => "pickup",
            VehicleType::Hgv => "hgv",
            VehicleType::Specialist => "specialist",
        }
    }
}

impl VehicleType {
    pub fn rule(&self) -> BandRule {
        let (rate_adjustment, label) = match self {
            VehicleType::Car => (dec!(0.0), "Car"),
            VehicleType::Van => (dec!(0.0), "Light commercial van"),
            VehicleType::Pickup => (dec!(0.25), "Pickup truck"),
            VehicleType::Hgv => (dec!(0.75), "Heavy goods vehicle"),
            VehicleType::Specialist => (dec!(1.5), "Specialist vehicle"),
        };
        BandRule {
            factor: FactorKind::VehicleType,
            rate_adjustment,
            points: 0,
            label,
        }
    }
}

band_str!(VehicleType);

// ---------------------------------------------------------------------------
// Annual mileage (contract hire)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MileageBand {
    #[serde(rename = "10k")]
    Up10k,
    #[default]
    #[serde(rename = "15k")]
    Up15k,
    #[serde(rename = "20k")]
    Up20k,
    #[serde(rename = "25k+")]
    Over25k,
}

impl Band for MileageBand {
    const ALL: &'static [Self] = &[
        MileageBand::Up10k,
        MileageBand::Up15k,
        MileageBand::Up20k,
        MileageBand::Over25k,
    ];

    fn code(&self) -> &'static str {
        match self {
            MileageBand::Up10k => "10k",
            MileageBand::Up15k => "15k",
            MileageBand::Up20k => "20k",
            MileageBand::Over25k => "25k+",
        }
    }
}

impl MileageBand {
    pub fn multiplier(&self) -> Ratio {
        match self {
            MileageBand::Up10k => dec!(0.95),
            MileageBand::Up15k => dec!(1.0),
            MileageBand::Up20k => dec!(1.08),
            MileageBand::Over25k => dec!(1.18),
        }
    }
}

band_str!(MileageBand);

// ---------------------------------------------------------------------------
// Borrower profile
// ---------------------------------------------------------------------------

/// Borrower and asset attributes. Calculators fill the subset they collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub business_age: BusinessAge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<TurnoverBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_profile: Option<CreditProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_value: Option<EquipmentValueBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
}

impl BorrowerProfile {
    pub fn new(business_age: BusinessAge) -> Self {
        BorrowerProfile {
            business_age,
            turnover: None,
            credit_profile: None,
            equipment_value: None,
            vehicle_type: None,
        }
    }

    pub fn with_turnover(mut self, turnover: TurnoverBand) -> Self {
        self.turnover = Some(turnover);
        self
    }

    pub fn with_credit(mut self, credit: CreditProfile) -> Self {
        self.credit_profile = Some(credit);
        self
    }

    pub fn with_equipment_value(mut self, band: EquipmentValueBand) -> Self {
        self.equipment_value = Some(band);
        self
    }

    pub fn with_vehicle_type(mut self, vehicle: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle);
        self
    }

    /// Rules for every attribute present, in a fixed order.
    pub fn rules(&self) -> Vec<BandRule> {
        let mut rules = vec![self.business_age.rule()];
        rules.extend(self.turnover.map(|t| t.rule()));
        rules.extend(self.credit_profile.map(|c| c.rule()));
        rules.extend(self.equipment_value.map(|e| e.rule()));
        rules.extend(self.vehicle_type.map(|v| v.rule()));
        rules
    }

    /// Reference facility for the loan-size ratio; zero when turnover is
    /// unknown.
    pub fn reference_amount(&self) -> Money {
        self.turnover
            .map(|t| t.reference_amount())
            .unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_parse_back() {
        for age in BusinessAge::ALL {
            assert_eq!(age.code().parse::<BusinessAge>().unwrap(), *age);
        }
        for band in MileageBand::ALL {
            assert_eq!(band.code().parse::<MileageBand>().unwrap(), *band);
        }
        assert!("6-10".parse::<BusinessAge>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&TurnoverBand::From100kTo500k).unwrap();
        assert_eq!(json, "\"100k-500k\"");
        let age: BusinessAge = serde_json::from_str("\">5\"").unwrap();
        assert_eq!(age, BusinessAge::OverFiveYears);
    }

    #[test]
    fn test_equipment_band_from_value() {
        assert_eq!(EquipmentValueBand::from_value(dec!(9_999)), EquipmentValueBand::Under10k);
        assert_eq!(EquipmentValueBand::from_value(dec!(10_000)), EquipmentValueBand::From10kTo50k);
        assert_eq!(EquipmentValueBand::from_value(dec!(250_000)), EquipmentValueBand::From50kTo250k);
        assert_eq!(EquipmentValueBand::from_value(dec!(250_001)), EquipmentValueBand::Over250k);
    }

    #[test]
    fn test_rules_follow_profile_order() {
        let profile = BorrowerProfile::new(BusinessAge::TwoToFiveYears)
            .with_credit(CreditProfile::Fair)
            .with_turnover(TurnoverBand::Under50k);
        let factors: Vec<FactorKind> = profile.rules().iter().map(|r| r.factor).collect();
        assert_eq!(
            factors,
            vec![FactorKind::BusinessAge, FactorKind::Turnover, FactorKind::Credit]
        );
    }

    #[test]
    fn test_reference_amount() {
        let profile = BorrowerProfile::new(BusinessAge::OverFiveYears);
        assert_eq!(profile.reference_amount(), Decimal::ZERO);
        let profile = profile.with_turnover(TurnoverBand::From100kTo500k);
        assert_eq!(profile.reference_amount(), dec!(250_000));
    }
}
