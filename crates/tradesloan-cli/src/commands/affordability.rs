use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use tradesloan_core::affordability::{self, AffordabilityInputs};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::profile::{BusinessAge, CreditProfile};

use crate::input;

/// Arguments for the affordability analyser
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Average monthly revenue (£)
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Average monthly operating expenses (£)
    #[arg(long)]
    pub expenses: Option<Decimal>,

    /// Existing monthly debt repayments (£)
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub existing_debt: Decimal,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: Option<BusinessAge>,

    /// Credit profile: excellent, good, fair or challenged
    #[arg(long)]
    pub credit: Option<CreditProfile>,
}

pub fn run_affordability(
    args: AffordabilityArgs,
    policy: &PolicyConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: AffordabilityInputs = input::resolve(args.input.as_deref(), || {
        Ok(AffordabilityInputs {
            monthly_revenue: args.revenue.ok_or("--revenue is required (or provide --input)")?,
            monthly_expenses: args.expenses.ok_or("--expenses is required (or provide --input)")?,
            existing_debt_payments: args.existing_debt,
            business_age: args
                .business_age
                .ok_or("--business-age is required (or provide --input)")?,
            credit_profile: args.credit.ok_or("--credit is required (or provide --input)")?,
        })
    })?;

    let result = affordability::calculate_affordability(&inputs, policy)?;
    Ok(serde_json::to_value(result)?)
}
