use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// All monetary values, in pounds sterling.
pub type Money = Decimal;

/// Interest rates expressed as percentages (9.9 = 9.9%). Never as decimals.
pub type Percent = Decimal;

/// Plain ratios and multipliers (0.40 = 40%).
pub type Ratio = Decimal;

/// Round to the nearest penny, half away from zero.
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to whole pounds, half away from zero.
pub fn round_pounds(value: Decimal) -> Money {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a percentage or ratio for display (2 dp).
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The calculators exposed to the presentation layer. The key doubles as the
/// session-storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    BusinessLoan,
    EquipmentFinance,
    VehicleFinance,
    Affordability,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 4] = [
        CalculatorKind::BusinessLoan,
        CalculatorKind::EquipmentFinance,
        CalculatorKind::VehicleFinance,
        CalculatorKind::Affordability,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CalculatorKind::BusinessLoan => "business-loan",
            CalculatorKind::EquipmentFinance => "equipment-finance",
            CalculatorKind::VehicleFinance => "vehicle-finance",
            CalculatorKind::Affordability => "affordability",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CalculatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalculatorKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| format!("unknown calculator '{s}'"))
    }
}

/// Finance products for which a maximum borrowable amount is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceProduct {
    BusinessLoan,
    EquipmentFinance,
    VehicleFinance,
    /// Revolving invoice facility, sized from turnover rather than an annuity.
    InvoiceFinance,
}

impl FinanceProduct {
    pub fn label(&self) -> &'static str {
        match self {
            FinanceProduct::BusinessLoan => "Business loan",
            FinanceProduct::EquipmentFinance => "Equipment finance",
            FinanceProduct::VehicleFinance => "Vehicle finance",
            FinanceProduct::InvoiceFinance => "Invoice finance",
        }
    }
}

/// Score tier shared by eligibility and affordability scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub const HIGH_THRESHOLD: u32 = 70;
    pub const MEDIUM_THRESHOLD: u32 = 40;

    pub fn from_score(score: u32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Tier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

/// Clamp an accumulated point total into a 0-100 score.
pub fn clamp_score(points: i32) -> u32 {
    points.clamp(0, 100) as u32
}

/// One slice of a categorical chart (pie/donut/bar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSegment {
    pub label: String,
    pub value: Money,
    pub color: String,
}

impl ChartSegment {
    pub fn new(label: &str, value: Money, color: &str) -> Self {
        ChartSegment {
            label: label.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// Chart palette.
pub mod palette {
    pub const PRINCIPAL: &str = "#1d4ed8";
    pub const INTEREST: &str = "#f97316";
    pub const EXPENSES: &str = "#64748b";
    pub const EXISTING_DEBT: &str = "#dc2626";
    pub const NEW_PAYMENT: &str = "#16a34a";
    pub const BUFFER: &str = "#0ea5e9";
    pub const PRODUCT: &str = "#7c3aed";
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(100), Tier::High);
        assert_eq!(Tier::from_score(70), Tier::High);
        assert_eq!(Tier::from_score(69), Tier::Medium);
        assert_eq!(Tier::from_score(40), Tier::Medium);
        assert_eq!(Tier::from_score(39), Tier::Low);
        assert_eq!(Tier::from_score(0), Tier::Low);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-25), 0);
        assert_eq!(clamp_score(55), 55);
        assert_eq!(clamp_score(140), 100);
    }

    #[test]
    fn test_calculator_key_round_trip() {
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.key().parse::<CalculatorKind>().unwrap(), kind);
        }
        assert!("mortgage".parse::<CalculatorKind>().is_err());
    }
}
