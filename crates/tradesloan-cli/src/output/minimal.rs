use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, descending one level
/// into nested sections (e.g. `loan.monthly_payment`), then falls back to
/// the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "monthly_payment",
        "recommended",
        "max_comfortable_payment",
        "adjusted_rate",
        "score",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = find_key(map, key) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_key<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
        return Some(val);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|nested| nested.get(key).filter(|v| !v.is_null()))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_key_descends_into_sections() {
        let result = json!({
            "adjusted_rate": "11.4",
            "loan": {"monthly_payment": "1611.01"},
        });
        let map = result.as_object().unwrap();
        assert_eq!(find_key(map, "monthly_payment"), Some(&json!("1611.01")));
        assert_eq!(find_key(map, "adjusted_rate"), Some(&json!("11.4")));
        assert_eq!(find_key(map, "score"), None);
    }

    #[test]
    fn test_find_key_skips_null() {
        let result = json!({"monthly_payment": null, "comparison": {"monthly_payment": "820.50"}});
        let map = result.as_object().unwrap();
        assert_eq!(find_key(map, "monthly_payment"), Some(&json!("820.50")));
    }
}
