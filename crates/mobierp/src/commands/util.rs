//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::path::Path;

use serde_json::{Map, Value};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Refuse to prompt when nobody can answer; `--yes` skips the prompt.
pub fn require_confirmation(global: &GlobalOpts, action: &str) -> Result<(), CliError> {
    if global.yes || io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.to_owned(),
        })
    }
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("{} must contain a JSON object", path.display()),
        }),
    }
}

/// Parse one `key=value` assignment. The value is taken as JSON when it
/// parses (`3`, `true`, `{"a":1}`) and as a plain string otherwise.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "set".into(),
            reason: format!("missing field name in '{raw}'"),
        });
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

/// Form fields from `--from-file`, then `--set` assignments on top.
pub fn collect_fields(
    assignments: &[String],
    from_file: Option<&Path>,
) -> Result<Map<String, Value>, CliError> {
    let mut fields = match from_file {
        Some(path) => read_json_object(path)?,
        None => Map::new(),
    };
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        fields.insert(key, value);
    }
    Ok(fields)
}
