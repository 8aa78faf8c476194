use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;
use serde_json::Value;

use tradesloan_core::amortization::{yearly_summary, AmortizationRow, LoanRequest, LoanResult, YearSummary};
use tradesloan_core::policy::PolicyConfig;
use tradesloan_core::session::{self, MemorySessionStore, SavedCalculation};
use tradesloan_core::CalculatorKind;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Defaults when no override is given; a partial override fills the rest
/// from the defaults.
fn parse_policy(policy_json: Option<String>) -> NapiResult<PolicyConfig> {
    match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error),
        None => Ok(PolicyConfig::default()),
    }
}

fn parse_kind(calculator: &str) -> NapiResult<CalculatorKind> {
    calculator.parse().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn business_loan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: tradesloan_core::loan::BusinessLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = tradesloan_core::loan::calculate_business_loan(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn equipment_finance(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: tradesloan_core::comparison::equipment::EquipmentFinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = tradesloan_core::comparison::equipment::calculate_equipment_finance(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn vehicle_finance(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: tradesloan_core::comparison::vehicle::VehicleFinanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = tradesloan_core::comparison::vehicle::calculate_vehicle_finance(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn affordability(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: tradesloan_core::affordability::AffordabilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = parse_policy(policy_json)?;
    let output = tradesloan_core::affordability::calculate_affordability(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortisation and field tables
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ScheduleOutput {
    summary: LoanResult,
    rows: Vec<AmortizationRow>,
    yearly: Vec<YearSummary>,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let request: LoanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows: Vec<AmortizationRow> = request.schedule().collect();
    let output = ScheduleOutput {
        summary: request.amortize(),
        yearly: yearly_summary(&rows),
        rows,
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculator_fields(calculator: String) -> NapiResult<String> {
    let kind = parse_kind(&calculator)?;
    serde_json::to_string(&tradesloan_core::fields::calculator_fields(kind)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Latest inputs and results per calculator for one browsing session.
#[napi]
pub struct Session {
    store: MemorySessionStore,
}

#[napi]
impl Session {
    #[napi(constructor)]
    pub fn new(quota_bytes: Option<u32>) -> Self {
        let store = match quota_bytes {
            Some(quota) => MemorySessionStore::with_quota(quota as usize),
            None => MemorySessionStore::new(),
        };
        Session { store }
    }

    #[napi]
    pub fn save(&mut self, calculator: String, inputs_json: String, results_json: String) -> NapiResult<()> {
        let kind = parse_kind(&calculator)?;
        let saved = SavedCalculation {
            inputs: serde_json::from_str::<Value>(&inputs_json).map_err(to_napi_error)?,
            results: serde_json::from_str::<Value>(&results_json).map_err(to_napi_error)?,
        };
        session::save_calculation(&mut self.store, kind, &saved).map_err(to_napi_error)
    }

    /// `{"inputs": ..., "results": ...}`, or null when nothing usable is saved.
    #[napi]
    pub fn load(&self, calculator: String) -> NapiResult<Option<String>> {
        let kind = parse_kind(&calculator)?;
        let saved: Option<SavedCalculation<Value, Value>> = session::load_calculation(&self.store, kind);
        saved
            .map(|s| serde_json::to_string(&s).map_err(to_napi_error))
            .transpose()
    }

    #[napi]
    pub fn clear(&mut self, calculator: String) -> NapiResult<()> {
        let kind = parse_kind(&calculator)?;
        session::clear_calculation(&mut self.store, kind);
        Ok(())
    }
}
