//! Output formatting: plain text (human-readable) and JSON.

use pingdom_lib::format_timestamp_display;
use serde_json::Value;
use std::fmt::Write;

/// Keys whose integer values are UNIX timestamps in Pingdom responses.
const TIMESTAMP_KEYS: [&str; 7] = [
    "time",
    "timefrom",
    "timeto",
    "starttime",
    "created",
    "lasttesttime",
    "lasterrortime",
];

/// Widest a table cell may get before it is truncated.
const MAX_CELL: usize = 32;

/// Value of `-o/--output`, parsed by clap through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and key-value
    Plain,
    /// JSON (pretty-printed)
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" | "p" => Ok(OutputFormat::Plain),
            "json" | "j" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// Format value as plain text: arrays of objects become tables, objects become
/// key-value lines. Timestamp fields are rendered as dates.
pub fn format_plain(value: &Value, use_utc: bool) -> String {
    let mut out = String::new();
    format_plain_impl(value, &mut out, 0, use_utc);
    out
}

fn format_plain_impl(v: &Value, out: &mut String, indent: usize, use_utc: bool) {
    let pad = "  ".repeat(indent);
    match v {
        Value::Array(arr) if arr.is_empty() => {
            let _ = writeln!(out, "{}<empty>", pad);
        }
        Value::Array(arr) if arr.iter().all(Value::is_object) => {
            write_table(arr, out, &pad, use_utc);
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    let _ = writeln!(out, "{}[{}]", pad, i + 1);
                    format_plain_impl(item, out, indent + 1, use_utc);
                } else {
                    let _ = writeln!(out, "{}{}", pad, scalar(item));
                }
            }
        }
        Value::Object(map) => {
            for (k, val) in map {
                if val.is_object() || val.is_array() {
                    let _ = writeln!(out, "{}{}:", pad, k);
                    format_plain_impl(val, out, indent + 1, use_utc);
                } else {
                    let _ = writeln!(out, "{}{}: {}", pad, k, cell(k, val, use_utc));
                }
            }
        }
        scalar_value => {
            let _ = writeln!(out, "{}{}", pad, scalar(scalar_value));
        }
    }
}

/// Columns are the union of keys in first-seen order; nested values show as `…`.
fn write_table(rows: &[Value], out: &mut String, pad: &str, use_utc: bool) {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows.iter().filter_map(Value::as_object) {
        for k in row.keys() {
            if !columns.contains(&k.as_str()) {
                columns.push(k);
            }
        }
    }
    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter_map(Value::as_object)
        .map(|row| {
            columns
                .iter()
                .map(|c| match row.get(*c) {
                    Some(v) if v.is_object() || v.is_array() => "…".to_string(),
                    Some(v) => truncate(&cell(c, v, use_utc), MAX_CELL),
                    None => "-".to_string(),
                })
                .collect()
        })
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let header = line(columns.clone());
    let _ = writeln!(out, "{}{}", pad, header);
    let _ = writeln!(out, "{}{}", pad, "-".repeat(header.chars().count()));
    for row in &cells {
        let _ = writeln!(out, "{}{}", pad, line(row.iter().map(String::as_str).collect()));
    }
}

fn cell(key: &str, v: &Value, use_utc: bool) -> String {
    match v.as_i64() {
        Some(ts) if TIMESTAMP_KEYS.contains(&key) => format_timestamp_display(ts, use_utc),
        _ => scalar(v),
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Format value as JSON (pretty).
pub fn format_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_format_from_str() {
        assert_eq!(
            "plain".parse::<OutputFormat>().unwrap(),
            OutputFormat::Plain
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("p".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("j".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn format_plain_scalars() {
        assert!(format_plain(&Value::Null, true).contains("null"));
        assert!(format_plain(&json!(true), true).contains("true"));
        assert_eq!(format_plain(&json!("hello"), true), "hello\n");
    }

    #[test]
    fn format_plain_empty_array() {
        assert!(format_plain(&json!([]), true).contains("<empty>"));
    }

    #[test]
    fn format_plain_object_renders_timestamps() {
        let v = json!({"totalup": 5000, "created": 1700000000, "name": "api"});
        let out = format_plain(&v, true);
        assert!(out.contains("totalup: 5000"));
        assert!(out.contains("created: 2023-11-14 22:13:20 UTC"));
        assert!(out.contains("name: api"));
    }

    #[test]
    fn format_plain_table_uses_union_of_columns() {
        let v = json!([
            {"id": 1, "name": "a"},
            {"id": 2, "status": "down"}
        ]);
        let out = format_plain(&v, true);
        let mut lines = out.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id"));
        assert!(header.contains("name"));
        assert!(header.contains("status"));
        assert!(lines.next().unwrap().starts_with("--"));
        assert!(lines.next().unwrap().contains('a'));
        let last = lines.next().unwrap();
        assert!(last.contains('-'));
        assert!(last.contains("down"));
    }

    #[test]
    fn format_plain_table_single_row() {
        let v = json!([{"timefrom": 0, "timeto": 60, "status": "up"}]);
        let out = format_plain(&v, true);
        assert!(out.contains("1970-01-01 00:01:00 UTC"));
        assert!(out.contains("up"));
    }

    #[test]
    fn truncate_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn format_json_roundtrip() {
        let v = json!({"x": 1, "y": [2, 3]});
        let s = format_json(&v).unwrap();
        let parsed: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(parsed, v);
    }
}
