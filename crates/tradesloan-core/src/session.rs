//! Session-scoped persistence of the latest input/result pair per calculator.
//!
//! Storage is a port: the engine only needs string get/set/clear. Loads are
//! fail-soft, so a missing or unreadable blob comes back as `None`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TradesLoanError;
use crate::types::CalculatorKind;
use crate::TradesLoanResult;

const KEY_PREFIX: &str = "tradesloan:";

pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> TradesLoanResult<()>;
    fn clear(&mut self, key: &str);
}

/// In-memory store with an optional byte quota across all entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        MemorySessionStore {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> TradesLoanResult<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(TradesLoanError::Storage(format!(
                    "writing '{key}' needs {needed} bytes, quota is {quota}"
                )));
            }
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation<I, R> {
    pub inputs: I,
    pub results: R,
}

pub fn session_key(kind: CalculatorKind) -> String {
    format!("{KEY_PREFIX}{}", kind.key())
}

/// Replace the saved pair for `kind`.
pub fn save_calculation<S, I, R>(store: &mut S, kind: CalculatorKind, saved: &SavedCalculation<I, R>) -> TradesLoanResult<()>
where
    S: SessionStore + ?Sized,
    I: Serialize,
    R: Serialize,
{
    let blob = serde_json::to_string(saved)?;
    store.set(&session_key(kind), blob)
}

/// The saved pair for `kind`, or `None` when absent or malformed.
pub fn load_calculation<S, I, R>(store: &S, kind: CalculatorKind) -> Option<SavedCalculation<I, R>>
where
    S: SessionStore + ?Sized,
    I: DeserializeOwned,
    R: DeserializeOwned,
{
    let key = session_key(kind);
    let blob = store.get(&key)?;
    match serde_json::from_str(&blob) {
        Ok(saved) => Some(saved),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "discarding unreadable saved calculation");
            None
        }
    }
}

pub fn clear_calculation<S: SessionStore + ?Sized>(store: &mut S, kind: CalculatorKind) {
    store.clear(&session_key(kind));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_key_format() {
        assert_eq!(session_key(CalculatorKind::VehicleFinance), "tradesloan:vehicle-finance");
    }

    #[test]
    fn test_save_replaces_previous() {
        let mut store = MemorySessionStore::new();
        let first = SavedCalculation { inputs: json!({"a": 1}), results: json!({"b": 1}) };
        let second = SavedCalculation { inputs: json!({"a": 2}), results: json!({"b": 2}) };
        save_calculation(&mut store, CalculatorKind::BusinessLoan, &first).unwrap();
        save_calculation(&mut store, CalculatorKind::BusinessLoan, &second).unwrap();

        let loaded: SavedCalculation<Value, Value> = load_calculation(&store, CalculatorKind::BusinessLoan).unwrap();
        assert_eq!(loaded, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_malformed_blob_is_absent() {
        let mut store = MemorySessionStore::new();
        store.set("tradesloan:affordability", "{not json".into()).unwrap();
        let loaded: Option<SavedCalculation<Value, Value>> = load_calculation(&store, CalculatorKind::Affordability);
        assert!(loaded.is_none());
    }

    #[test]
    fn test_quota_exceeded() {
        let mut store = MemorySessionStore::with_quota(16);
        let err = store.set("k", "x".repeat(32)).unwrap_err();
        assert!(matches!(err, TradesLoanError::Storage(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        let mut store = MemorySessionStore::with_quota(10);
        store.set("k", "12345678".into()).unwrap();
        // Overwriting the same key does not double-count the old value.
        store.set("k", "87654321".into()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("87654321"));
    }

    #[test]
    fn test_clear() {
        let mut store = MemorySessionStore::new();
        let saved = SavedCalculation { inputs: 1u32, results: 2u32 };
        save_calculation(&mut store, CalculatorKind::EquipmentFinance, &saved).unwrap();
        clear_calculation(&mut store, CalculatorKind::EquipmentFinance);
        let loaded: Option<SavedCalculation<u32, u32>> = load_calculation(&store, CalculatorKind::EquipmentFinance);
        assert!(loaded.is_none());
    }
}
