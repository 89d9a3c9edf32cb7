//! Helpers for working with configuration documents.
//!
//! A configuration document is any JSON-compatible tree. It is represented as
//! a [`serde_json::Value`], so every traversal handles the six node kinds
//! (null, bool, number, string, array, object) exhaustively.

use std::path::Path;

use serde_json::Map;
use serde_json::Value;

use crate::PreconfError;
use crate::PreconfResult;

/// Resolve a dotted `path` against `doc`, descending one mapping key at a
/// time. Returns `None` when any segment is missing or `null`, or when an
/// intermediate node is not a mapping.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
	let mut current = doc;

	for key in path.split('.') {
		current = match current.as_object()?.get(key)? {
			Value::Null => return None,
			value => value,
		};
	}

	Some(current)
}

/// Write `value` at the dotted `path`, creating intermediate mappings as
/// needed. An intermediate node that is not a mapping is replaced by one.
pub fn set_path(doc: &mut Value, path: &str, value: Value) {
	let mut segments: Vec<&str> = path.split('.').collect();
	let Some(last) = segments.pop() else {
		return;
	};

	let mut current = doc;
	for key in segments {
		current = ensure_object(current)
			.entry(key)
			.or_insert_with(|| Value::Object(Map::new()));
	}

	ensure_object(current).insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
	if !value.is_object() {
		*value = Value::Object(Map::new());
	}

	match value {
		Value::Object(map) => map,
		_ => unreachable!("value was just replaced by an object"),
	}
}

/// Read a document from disk, choosing the parser from the file extension.
pub fn load_document(path: &Path) -> PreconfResult<Value> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		PreconfError::DocumentParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;
	let format = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	parse_document(&content, &format, &path.display().to_string())
}

/// Parse document `content` written in `format`.
pub fn parse_document(content: &str, format: &str, path_display: &str) -> PreconfResult<Value> {
	match format {
		"json" => {
			serde_json::from_str(content).map_err(|e| {
				PreconfError::DocumentParse {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})
		}
		"toml" => {
			let table: toml::Table = toml::from_str(content).map_err(|e| {
				PreconfError::DocumentParse {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})?;
			toml_to_json(toml::Value::Table(table), path_display)
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(content).map_err(|e| {
				PreconfError::DocumentParse {
					path: path_display.to_string(),
					reason: e.to_string(),
				}
			})
		}
		other => Err(PreconfError::UnsupportedFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`. Datetimes become
/// strings.
pub(crate) fn toml_to_json(value: toml::Value, path_display: &str) -> PreconfResult<Value> {
	let json = match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::from(i),
		toml::Value::Float(f) => {
			Value::Number(serde_json::Number::from_f64(f).ok_or_else(|| {
				PreconfError::UnconvertibleFloat {
					path: path_display.to_string(),
					value: f.to_string(),
				}
			})?)
		}
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: PreconfResult<Vec<Value>> = arr
				.into_iter()
				.map(|v| toml_to_json(v, path_display))
				.collect();
			Value::Array(items?)
		}
		toml::Value::Table(table) => {
			let mut map = Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v, path_display)?);
			}
			Value::Object(map)
		}
	};

	Ok(json)
}
