use std::collections::HashMap;

use crate::core::errors::{FocusError, Result};

/// Reads `.env` files holding bot credentials.
///
/// Supports:
/// - `KEY=value` entries, with an optional `export ` prefix
/// - Quoted values (`KEY="value"` and `KEY='value'`)
/// - Comment lines (`# ...`) and blank lines
///
/// Later entries override earlier ones.
pub struct DotenvParser;

impl DotenvParser {
    pub fn parse(content: &str) -> Result<HashMap<String, String>> {
        let mut vars = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let body = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = body.split_once('=') else {
                return Err(FocusError::InvalidConfig {
                    detail: format!(".env line {line_number}: expected KEY=value"),
                });
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(FocusError::InvalidConfig {
                    detail: format!(".env line {line_number}: empty key"),
                });
            }

            vars.insert(key.to_string(), strip_quotes(value.trim()));
        }

        Ok(vars)
    }
}

/// Remove matching surrounding quotes (single or double) from a value.
fn strip_quotes(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}
