//! Writer for frontmatter documents; the inverse of [`super::parse`].

use std::fmt::Write as _;

use serde_json::Value;

use super::parse::is_plain_integer;
use super::{Metadata, DELIMITER};

const INDENT: usize = 2;

/// Render metadata and body as a frontmatter document.
///
/// Strings, integers, booleans, string arrays and nested objects of those
/// survive a `parse(serialize(..))` round trip. Arrays holding anything
/// other than strings are written inline as JSON. Null values and empty
/// objects are omitted. Values are single-line; embedded newlines are
/// folded to spaces.
#[must_use]
pub fn serialize(metadata: &Metadata, body: &str) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');
    write_mapping(&mut out, metadata, 0);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    out
}

fn write_mapping(out: &mut String, map: &Metadata, indent: usize) {
    let pad = " ".repeat(indent);
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Object(inner) if inner.is_empty() => {}
            Value::Object(inner) => {
                let _ = writeln!(out, "{pad}{key}:");
                write_mapping(out, inner, indent + INDENT);
            }
            Value::Array(items) if items.is_empty() => {
                let _ = writeln!(out, "{pad}{key}: []");
            }
            Value::Array(items) if items.iter().all(Value::is_string) => {
                let _ = writeln!(out, "{pad}{key}:");
                let item_pad = " ".repeat(indent + INDENT);
                for item in items.iter().filter_map(Value::as_str) {
                    let _ = writeln!(out, "{item_pad}- {}", render_string(item));
                }
            }
            Value::Array(_) => {
                let _ = writeln!(out, "{pad}{key}: {value}");
            }
            Value::String(s) => {
                let _ = writeln!(out, "{pad}{key}: {}", render_string(s));
            }
            Value::Bool(_) | Value::Number(_) => {
                let _ = writeln!(out, "{pad}{key}: {value}");
            }
        }
    }
}

/// Quote a string when writing it bare would change how it parses back.
fn render_string(raw: &str) -> String {
    let s = if raw.contains(['\n', '\r']) {
        raw.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        raw.to_string()
    };

    if !needs_quotes(&s) {
        return s;
    }
    if !s.contains('"') {
        format!("\"{s}\"")
    } else if !s.contains('\'') {
        format!("'{s}'")
    } else {
        s
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s != s.trim()
        || s == "true"
        || s == "false"
        || s == "-"
        || is_plain_integer(s)
        || s.starts_with(['[', '"', '\'', '#'])
        || s.starts_with("- ")
}
