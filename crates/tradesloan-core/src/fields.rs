//! Input-domain tables for each calculator.
//!
//! These bound the sliders and selects a presentation layer offers. The
//! engines themselves do not reject out-of-range values; callers that want
//! to can use [`FieldSpec::clamp`] before invoking a calculator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::profile::{Band, BusinessAge, CreditProfile, MileageBand, TurnoverBand, VehicleType};
use crate::types::CalculatorKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum FieldControl {
    Range {
        min: Decimal,
        max: Decimal,
        step: Decimal,
        default: Decimal,
    },
    Select {
        default: String,
        options: Vec<FieldOption>,
    },
    Toggle {
        default: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub control: FieldControl,
}

impl FieldSpec {
    fn range(name: &str, label: &str, min: Decimal, max: Decimal, step: Decimal, default: Decimal) -> Self {
        FieldSpec {
            name: name.into(),
            label: label.into(),
            control: FieldControl::Range { min, max, step, default },
        }
    }

    fn select<B: Band>(name: &str, label: &str, default: B, labels: &[&str]) -> Self {
        let options = B::ALL
            .iter()
            .zip(labels)
            .map(|(band, label)| FieldOption {
                value: band.code().to_string(),
                label: label.to_string(),
            })
            .collect();
        FieldSpec {
            name: name.into(),
            label: label.into(),
            control: FieldControl::Select {
                default: default.code().to_string(),
                options,
            },
        }
    }

    fn toggle(name: &str, label: &str, default: bool) -> Self {
        FieldSpec {
            name: name.into(),
            label: label.into(),
            control: FieldControl::Toggle { default },
        }
    }

    /// Clamp a numeric value into a range field's bounds. Non-range fields
    /// return the value unchanged.
    pub fn clamp(&self, value: Decimal) -> Decimal {
        match &self.control {
            FieldControl::Range { min, max, .. } => value.max(*min).min(*max),
            _ => value,
        }
    }
}

const AGE_LABELS: [&str; 4] = ["Less than 1 year", "1-2 years", "2-5 years", "More than 5 years"];
const TURNOVER_LABELS: [&str; 4] = ["Under £50k", "£50k-£100k", "£100k-£500k", "Over £500k"];
const CREDIT_LABELS: [&str; 4] = ["Excellent", "Good", "Fair", "Challenged"];
const VEHICLE_LABELS: [&str; 5] = ["Car", "Van", "Pickup", "HGV", "Specialist"];
const MILEAGE_LABELS: [&str; 4] = ["10,000 miles", "15,000 miles", "20,000 miles", "25,000+ miles"];

/// The field table for one calculator.
pub fn calculator_fields(kind: CalculatorKind) -> Vec<FieldSpec> {
    match kind {
        CalculatorKind::BusinessLoan => vec![
            FieldSpec::range("loan_amount", "Loan amount (£)", dec!(1_000), dec!(500_000), dec!(1_000), dec!(50_000)),
            FieldSpec::range("term_months", "Term (months)", dec!(6), dec!(120), dec!(6), dec!(36)),
            FieldSpec::select("business_age", "Time trading", BusinessAge::TwoToFiveYears, &AGE_LABELS),
            FieldSpec::select("turnover", "Annual turnover", TurnoverBand::From100kTo500k, &TURNOVER_LABELS),
            FieldSpec::select("credit_profile", "Credit profile", CreditProfile::Good, &CREDIT_LABELS),
        ],
        CalculatorKind::EquipmentFinance => vec![
            FieldSpec::range(
                "equipment_cost",
                "Equipment cost (£)",
                dec!(1_000),
                dec!(1_000_000),
                dec!(1_000),
                dec!(50_000),
            ),
            FieldSpec::range("deposit", "Deposit (£)", dec!(0), dec!(250_000), dec!(500), dec!(5_000)),
            FieldSpec::range("term_months", "Term (months)", dec!(12), dec!(84), dec!(12), dec!(48)),
            FieldSpec::toggle("vat_registered", "VAT registered", true),
            FieldSpec::select("business_age", "Time trading", BusinessAge::TwoToFiveYears, &AGE_LABELS),
            FieldSpec::select("turnover", "Annual turnover", TurnoverBand::From100kTo500k, &TURNOVER_LABELS),
            FieldSpec::select("credit_profile", "Credit profile", CreditProfile::Good, &CREDIT_LABELS),
        ],
        CalculatorKind::VehicleFinance => vec![
            FieldSpec::range(
                "vehicle_price",
                "Vehicle price (£)",
                dec!(5_000),
                dec!(250_000),
                dec!(500),
                dec!(30_000),
            ),
            FieldSpec::range("deposit", "Deposit (£)", dec!(0), dec!(100_000), dec!(500), dec!(3_000)),
            FieldSpec::range("term_months", "Term (months)", dec!(12), dec!(60), dec!(12), dec!(36)),
            FieldSpec::toggle("vat_registered", "VAT registered", true),
            FieldSpec::select("vehicle_type", "Vehicle type", VehicleType::Van, &VEHICLE_LABELS),
            FieldSpec::select("annual_mileage", "Annual mileage", MileageBand::Up15k, &MILEAGE_LABELS),
            FieldSpec::select("business_age", "Time trading", BusinessAge::TwoToFiveYears, &AGE_LABELS),
            FieldSpec::select("turnover", "Annual turnover", TurnoverBand::From100kTo500k, &TURNOVER_LABELS),
            FieldSpec::select("credit_profile", "Credit profile", CreditProfile::Good, &CREDIT_LABELS),
        ],
        CalculatorKind::Affordability => vec![
            FieldSpec::range(
                "monthly_revenue",
                "Monthly revenue (£)",
                dec!(0),
                dec!(500_000),
                dec!(500),
                dec!(10_000),
            ),
            FieldSpec::range(
                "monthly_expenses",
                "Monthly expenses (£)",
                dec!(0),
                dec!(500_000),
                dec!(500),
                dec!(6_000),
            ),
            FieldSpec::range(
                "existing_debt_payments",
                "Existing debt payments (£/month)",
                dec!(0),
                dec!(100_000),
                dec!(100),
                dec!(0),
            ),
            FieldSpec::select("business_age", "Time trading", BusinessAge::TwoToFiveYears, &AGE_LABELS),
            FieldSpec::select("credit_profile", "Credit profile", CreditProfile::Good, &CREDIT_LABELS),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_calculator_has_fields() {
        for kind in CalculatorKind::ALL {
            assert!(!calculator_fields(kind).is_empty(), "{kind} has no fields");
        }
    }

    #[test]
    fn test_range_defaults_within_bounds() {
        for kind in CalculatorKind::ALL {
            for field in calculator_fields(kind) {
                if let FieldControl::Range { min, max, default, step } = field.control {
                    assert!(min <= default && default <= max, "{} default out of range", field.name);
                    assert!(step > Decimal::ZERO);
                }
            }
        }
    }

    #[test]
    fn test_select_covers_every_band() {
        let fields = calculator_fields(CalculatorKind::VehicleFinance);
        let vehicle = fields.iter().find(|f| f.name == "vehicle_type").unwrap();
        match &vehicle.control {
            FieldControl::Select { options, default } => {
                assert_eq!(options.len(), VehicleType::ALL.len());
                assert_eq!(default, "van");
            }
            other => panic!("Expected select, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_inputs_have_fields() {
        for kind in [
            CalculatorKind::BusinessLoan,
            CalculatorKind::EquipmentFinance,
            CalculatorKind::VehicleFinance,
        ] {
            let names: Vec<String> = calculator_fields(kind).into_iter().map(|f| f.name).collect();
            for name in ["business_age", "turnover", "credit_profile"] {
                assert!(names.iter().any(|n| n == name), "{kind} is missing {name}");
            }
        }
    }

    #[test]
    fn test_clamp() {
        let fields = calculator_fields(CalculatorKind::BusinessLoan);
        let amount = &fields[0];
        assert_eq!(amount.clamp(dec!(900_000)), dec!(500_000));
        assert_eq!(amount.clamp(dec!(10)), dec!(1_000));
        assert_eq!(amount.clamp(dec!(20_000)), dec!(20_000));
    }
}
