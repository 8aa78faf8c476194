use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use tradesloan_core::amortization::{schedule, yearly_summary, AmortizationRow};
use tradesloan_core::eligibility;
use tradesloan_core::loan::{self, BusinessLoanInput};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::profile::{
    BorrowerProfile, BusinessAge, CreditProfile, EquipmentValueBand, TurnoverBand, VehicleType,
};
use tradesloan_core::rates::rate_breakdown;

use crate::input;

/// Arguments for the business loan calculator
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount to borrow (£)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months (defaults to the policy's business loan term)
    #[arg(long)]
    pub term: Option<u32>,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: Option<BusinessAge>,

    /// Annual turnover: <50k, 50k-100k, 100k-500k or >500k
    #[arg(long)]
    pub turnover: Option<TurnoverBand>,

    /// Credit profile: excellent, good, fair or challenged
    #[arg(long)]
    pub credit: Option<CreditProfile>,

    /// Base rate override (%)
    #[arg(long)]
    pub base_rate: Option<Decimal>,

    /// Reference facility for the loan-size check (£)
    #[arg(long)]
    pub reference_amount: Option<Decimal>,
}

/// Arguments for a plain amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Principal (£)
    #[arg(long)]
    pub amount: Decimal,

    /// Term in months
    #[arg(long)]
    pub term: u32,

    /// Annual rate (%)
    #[arg(long)]
    pub rate: Decimal,

    /// Summarise by loan year instead of by month
    #[arg(long)]
    pub yearly: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RateProduct {
    BusinessLoan,
    EquipmentFinance,
    VehicleFinance,
}

/// Arguments for the rate adjuster
#[derive(Args)]
pub struct RateArgs {
    /// Product whose base rate and clamp band apply
    #[arg(long, default_value = "business-loan")]
    pub product: RateProduct,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: BusinessAge,

    /// Annual turnover band
    #[arg(long)]
    pub turnover: Option<TurnoverBand>,

    /// Credit profile
    #[arg(long)]
    pub credit: Option<CreditProfile>,

    /// Equipment cost (£); equipment finance only
    #[arg(long)]
    pub equipment_value: Option<Decimal>,

    /// Vehicle type: car, van, pickup, hgv or specialist; vehicle finance only
    #[arg(long)]
    pub vehicle_type: Option<VehicleType>,

    /// Base rate override (%)
    #[arg(long)]
    pub base_rate: Option<Decimal>,
}

/// Arguments for eligibility scoring
#[derive(Args)]
pub struct EligibilityArgs {
    /// Requested amount (£)
    #[arg(long)]
    pub amount: Decimal,

    /// Time trading: <1, 1-2, 2-5 or >5
    #[arg(long)]
    pub business_age: BusinessAge,

    /// Annual turnover band
    #[arg(long)]
    pub turnover: Option<TurnoverBand>,

    /// Credit profile
    #[arg(long)]
    pub credit: Option<CreditProfile>,

    /// Reference facility (£); defaults to the turnover band's typical facility
    #[arg(long)]
    pub reference_amount: Option<Decimal>,
}

pub fn run_loan(args: LoanArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: BusinessLoanInput = input::resolve(args.input.as_deref(), || {
        Ok(BusinessLoanInput {
            loan_amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            term_months: args.term.unwrap_or(policy.business_loan.term_months),
            business_age: args
                .business_age
                .ok_or("--business-age is required (or provide --input)")?,
            turnover: args.turnover,
            credit_profile: args.credit,
            base_rate: args.base_rate,
            reference_amount: args.reference_amount,
        })
    })?;

    let result = loan::calculate_business_loan(&loan_input, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<AmortizationRow> = schedule(args.amount, args.term, args.rate).collect();
    if rows.is_empty() {
        tracing::warn!("amount and term must both be positive; schedule is empty");
    }
    if args.yearly {
        Ok(serde_json::to_value(yearly_summary(&rows))?)
    } else {
        Ok(serde_json::to_value(rows)?)
    }
}

pub fn run_rate(args: RateArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut profile = BorrowerProfile::new(args.business_age);
    profile.turnover = args.turnover;
    profile.credit_profile = args.credit;

    let terms = match args.product {
        RateProduct::BusinessLoan => &policy.business_loan,
        RateProduct::EquipmentFinance => {
            profile.equipment_value = args.equipment_value.map(EquipmentValueBand::from_value);
            &policy.equipment_finance
        }
        RateProduct::VehicleFinance => {
            profile.vehicle_type = args.vehicle_type;
            &policy.vehicle_finance
        }
    };

    let base = args.base_rate.unwrap_or(terms.base_rate);
    let breakdown = rate_breakdown(base, &profile, &terms.rate_band);
    Ok(serde_json::to_value(breakdown)?)
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut profile = BorrowerProfile::new(args.business_age);
    profile.turnover = args.turnover;
    profile.credit_profile = args.credit;

    let reference = args.reference_amount.unwrap_or_else(|| profile.reference_amount());
    let result = eligibility::score(&profile, args.amount, reference);
    Ok(serde_json::to_value(result)?)
}
