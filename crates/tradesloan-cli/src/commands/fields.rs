use clap::Args;
use serde_json::Value;

use tradesloan_core::fields::calculator_fields;
use tradesloan_core::CalculatorKind;

/// Arguments for the field-table lookup
#[derive(Args)]
pub struct FieldsArgs {
    /// Calculator: business-loan, equipment-finance, vehicle-finance or affordability
    pub calculator: CalculatorKind,
}

pub fn run_fields(args: FieldsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(calculator_fields(args.calculator))?)
}
