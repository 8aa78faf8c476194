use serde_json::Value;
use std::io::{self, Read};

/// Piped JSON document on stdin, if any. An interactive terminal, or a pipe
/// that closes without data, yields `None` so the caller falls back to flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let document = buffer.trim();
    if document.is_empty() {
        tracing::debug!("stdin closed without input, using flags");
        return Ok(None);
    }

    let value: Value = serde_json::from_str(document)
        .map_err(|e| format!("Failed to parse JSON from stdin: {}", e))?;
    tracing::debug!(bytes = document.len(), "read input document from stdin");
    Ok(Some(value))
}
