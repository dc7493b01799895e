//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use mobierp_core::Entity;

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are a
/// field/value listing rather than a row.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Record rows ──────────────────────────────────────────────────────

/// One line of a record list. Every kind shares the same columns.
#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

pub fn record_row<E: Entity>(record: &E) -> RecordRow {
    RecordRow {
        id: record.id().to_string(),
        code: record.code().to_owned(),
        title: record.title().to_owned(),
        status: record.facet().filter(|s| !s.is_empty()).unwrap_or("-").to_owned(),
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "FIELD")]
    field: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

/// Field/value table for one record, with relations collapsed to their
/// display name and the statuses it can move to next.
pub fn record_detail<E: Entity>(record: &E) -> String {
    let mut rows: Vec<FieldRow> = match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => fields
            .iter()
            .map(|(field, value)| FieldRow {
                field: field.clone(),
                value: summarize(value),
            })
            .collect(),
        _ => Vec::new(),
    };

    if let (Some(lifecycle), Some(status)) = (E::lifecycle(), record.status()) {
        let next: Vec<&str> = lifecycle.targets_from(status).collect();
        rows.push(FieldRow {
            field: "next statuses".into(),
            value: if next.is_empty() {
                "-".into()
            } else {
                next.join(", ")
            },
        });
    }

    render_table(&rows)
}

/// One-cell rendition of a JSON value.
fn summarize(value: &Value) -> String {
    match value {
        Value::Null => "-".into(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => ["name", "fullName", "code"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(|| format!("{{{} fields}}", map.len()), str::to_owned),
        Value::Array(items) => match items.len() {
            0 => "-".into(),
            1 => "1 item".into(),
            n => format!("{n} items"),
        },
    }
}

// ── Format-specific renderers ────────────────────────────────────────

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.expect("serialization should not fail")
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn relations_collapse_to_their_name() {
        assert_eq!(summarize(&json!({ "id": 3, "name": "Acme Corp" })), "Acme Corp");
        assert_eq!(summarize(&json!({ "id": 7, "fullName": "Lan Tran" })), "Lan Tran");
        assert_eq!(summarize(&json!({ "id": 1 })), "{1 fields}");
    }

    #[test]
    fn scalars_and_arrays() {
        assert_eq!(summarize(&Value::Null), "-");
        assert_eq!(summarize(&json!(12.5)), "12.5");
        assert_eq!(summarize(&json!([])), "-");
        assert_eq!(summarize(&json!([1, 2, 3])), "3 items");
    }

    #[test]
    fn unreported_status_shows_a_dash() {
        let record = mobierp_core::PurchaseReceive {
            code: "PO-5".into(),
            ..mobierp_core::PurchaseReceive::default()
        };
        assert_eq!(record_row(&record).status, "-");
    }
}
