use clap::{ArgAction, Args};
use rust_decimal::Decimal;
use serde_json::Value;

use tradesloan_core::comparison::equipment::{self, EquipmentFinanceInput};
use tradesloan_core::comparison::vehicle::{self, VehicleFinanceInput};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::profile::{BusinessAge, CreditProfile, MileageBand, TurnoverBand, VehicleType};

use crate::input;

/// Arguments for the equipment finance comparison
#[derive(Args)]
pub struct EquipmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Equipment cost (£)
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Deposit (£)
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub deposit: Decimal,

    /// Term in months (defaults to the policy's equipment finance term)
    #[arg(long)]
    pub term: Option<u32>,

    /// Whether the business is VAT-registered
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub vat_registered: bool,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: Option<BusinessAge>,

    /// Annual turnover band
    #[arg(long)]
    pub turnover: Option<TurnoverBand>,

    /// Credit profile
    #[arg(long)]
    pub credit: Option<CreditProfile>,

    /// Base rate override (%)
    #[arg(long)]
    pub base_rate: Option<Decimal>,
}

/// Arguments for the vehicle finance comparison
#[derive(Args)]
pub struct VehicleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price (£)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Deposit (£)
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub deposit: Decimal,

    /// Term in months (defaults to the policy's vehicle finance term)
    #[arg(long)]
    pub term: Option<u32>,

    /// Whether the business is VAT-registered
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub vat_registered: bool,

    /// Vehicle type: car, van, pickup, hgv or specialist
    #[arg(long)]
    pub vehicle_type: Option<VehicleType>,

    /// Annual mileage: 10k, 15k, 20k or 25k+
    #[arg(long, default_value = "15k")]
    pub mileage: MileageBand,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: Option<BusinessAge>,

    /// Annual turnover band
    #[arg(long)]
    pub turnover: Option<TurnoverBand>,

    /// Credit profile
    #[arg(long)]
    pub credit: Option<CreditProfile>,

    /// Base rate override (%)
    #[arg(long)]
    pub base_rate: Option<Decimal>,
}

pub fn run_equipment(args: EquipmentArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let equipment_input: EquipmentFinanceInput = input::resolve(args.input.as_deref(), || {
        Ok(EquipmentFinanceInput {
            equipment_cost: args.cost.ok_or("--cost is required (or provide --input)")?,
            deposit: args.deposit,
            term_months: args.term.unwrap_or(policy.equipment_finance.term_months),
            vat_registered: args.vat_registered,
            business_age: args
                .business_age
                .ok_or("--business-age is required (or provide --input)")?,
            turnover: args.turnover,
            credit_profile: args.credit,
            base_rate: args.base_rate,
        })
    })?;

    let result = equipment::calculate_equipment_finance(&equipment_input, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_vehicle(args: VehicleArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicle_input: VehicleFinanceInput = input::resolve(args.input.as_deref(), || {
        Ok(VehicleFinanceInput {
            vehicle_price: args.price.ok_or("--price is required (or provide --input)")?,
            deposit: args.deposit,
            term_months: args.term.unwrap_or(policy.vehicle_finance.term_months),
            vat_registered: args.vat_registered,
            vehicle_type: args
                .vehicle_type
                .ok_or("--vehicle-type is required (or provide --input)")?,
            annual_mileage: args.mileage,
            business_age: args
                .business_age
                .ok_or("--business-age is required (or provide --input)")?,
            turnover: args.turnover,
            credit_profile: args.credit,
            base_rate: args.base_rate,
        })
    })?;

    let result = vehicle::calculate_vehicle_finance(&vehicle_input, policy)?;
    Ok(serde_json::to_value(result)?)
}
