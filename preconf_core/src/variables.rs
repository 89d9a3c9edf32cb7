use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::PreconfError;
use crate::PreconfResult;

/// Field names promoted to variables when no other candidates are configured.
pub const DEFAULT_VARIABLE_CANDIDATES: [&str; 7] = [
	"customerName",
	"rakId",
	"pid",
	"gatewayModel",
	"wisdmOrgName",
	"wisdmUrl",
	"gatewayName",
];

/// The input control used to collect a variable's value.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
	#[default]
	Text,
	Select,
	Date,
	Number,
}

impl fmt::Display for VariableType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Text => "text",
			Self::Select => "select",
			Self::Date => "date",
			Self::Number => "number",
		};
		f.write_str(name)
	}
}

/// Metadata describing one substitutable value in a template.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
	/// Unique within a template. Appears in documents as `{{name}}`.
	pub name: String,
	#[serde(rename = "type", default)]
	pub r#type: VariableType,
	#[serde(default)]
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
	/// Choices offered by `select` variables.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<Vec<String>>,
	#[serde(default)]
	pub required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

impl VariableDefinition {
	/// A required text variable labelled after its name.
	pub fn text(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			label: label_for(&name),
			name,
			r#type: VariableType::Text,
			default_value: None,
			options: None,
			required: true,
			description: None,
		}
	}

	/// The label shown to users, falling back to the name when empty.
	pub fn display_label(&self) -> &str {
		if self.label.is_empty() {
			&self.name
		} else {
			&self.label
		}
	}

	/// The `{{name}}` token standing in for this variable.
	pub fn placeholder(&self) -> String {
		placeholder(&self.name)
	}
}

/// Build the placeholder token for a variable name.
pub fn placeholder(name: &str) -> String {
	format!("{{{{{name}}}}}")
}

/// Upper-case the first character of `name`.
fn label_for(name: &str) -> String {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Result of promoting concrete values to variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
	/// The input document with every qualifying value replaced by its
	/// placeholder.
	pub templated: Value,
	/// One definition per distinct variable, in first-encounter order.
	pub variables: Vec<VariableDefinition>,
}

/// Replace non-blank strings stored under a candidate key with placeholders.
///
/// The key of a value is the mapping key it is stored under. Array elements
/// inherit the key of the array. Mapping keys are visited in the map's
/// iteration order and array elements by index, so the returned definitions
/// are deterministic. A name seen more than once yields a single definition
/// carrying the first value encountered, while every occurrence is replaced.
pub fn extract_variables<S: AsRef<str>>(config: &Value, candidates: &[S]) -> Extraction {
	let candidates: HashSet<&str> = candidates.iter().map(|candidate| candidate.as_ref()).collect();
	let mut extractor = Extractor {
		candidates,
		seen: HashSet::new(),
		variables: Vec::new(),
	};
	let templated = extractor.visit(None, config);

	tracing::debug!(
		variables = extractor.variables.len(),
		"extracted template variables"
	);

	Extraction {
		templated,
		variables: extractor.variables,
	}
}

struct Extractor<'a> {
	candidates: HashSet<&'a str>,
	seen: HashSet<String>,
	variables: Vec<VariableDefinition>,
}

impl Extractor<'_> {
	fn visit(&mut self, key: Option<&str>, value: &Value) -> Value {
		match value {
			Value::String(text) => {
				match key {
					Some(name) if !text.trim().is_empty() && self.candidates.contains(name) => {
						self.record(name, text);
						Value::String(placeholder(name))
					}
					_ => value.clone(),
				}
			}
			Value::Array(items) => {
				Value::Array(items.iter().map(|item| self.visit(key, item)).collect())
			}
			Value::Object(map) => {
				let mut copy = Map::new();
				for (child_key, child) in map {
					copy.insert(child_key.clone(), self.visit(Some(child_key.as_str()), child));
				}
				Value::Object(copy)
			}
			Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
		}
	}

	fn record(&mut self, name: &str, original: &str) {
		if !self.seen.insert(name.to_string()) {
			return;
		}

		let mut definition = VariableDefinition::text(name);
		definition.default_value = Some(original.to_string());
		self.variables.push(definition);
	}
}

/// Replace placeholders in every string of `templated` with the supplied
/// values.
///
/// Replacement is literal substring replacement, so variable names are never
/// interpreted as patterns. Variables are applied in name order, so a value
/// that contains another placeholder may be expanded by a later variable.
/// Placeholders without a value stay in place and unused values are ignored.
#[allow(clippy::implicit_hasher)]
pub fn substitute_variables(templated: &Value, values: &HashMap<String, String>) -> Value {
	let mut ordered: Vec<(String, &str)> = values
		.iter()
		.map(|(name, value)| (placeholder(name), value.as_str()))
		.collect();
	ordered.sort();

	let concrete = substitute_value(templated, &ordered);

	if tracing::enabled!(tracing::Level::DEBUG) {
		let unresolved = find_placeholders(&concrete);
		if !unresolved.is_empty() {
			tracing::debug!(?unresolved, "placeholders left without a value");
		}
	}

	concrete
}

fn substitute_value(value: &Value, replacements: &[(String, &str)]) -> Value {
	match value {
		Value::String(text) => {
			let mut replaced = text.clone();
			for (token, replacement) in replacements {
				if replaced.contains(token.as_str()) {
					replaced = replaced.replace(token.as_str(), replacement);
				}
			}
			Value::String(replaced)
		}
		Value::Array(items) => {
			Value::Array(
				items
					.iter()
					.map(|item| substitute_value(item, replacements))
					.collect(),
			)
		}
		Value::Object(map) => {
			Value::Object(
				map.iter()
					.map(|(key, item)| (key.clone(), substitute_value(item, replacements)))
					.collect(),
			)
		}
		Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
	}
}

/// Outcome of checking that every required variable has a value.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ValidationReport {
	/// Labels of required variables without a usable value, in declaration
	/// order.
	pub missing: Vec<String>,
}

impl ValidationReport {
	/// Returns true when no required variable is missing.
	pub fn is_ok(&self) -> bool {
		self.missing.is_empty()
	}
}

/// Check that each required variable has a value that is not blank.
#[allow(clippy::implicit_hasher)]
pub fn validate_variables(
	definitions: &[VariableDefinition],
	values: &HashMap<String, String>,
) -> ValidationReport {
	let missing = definitions
		.iter()
		.filter(|definition| definition.required)
		.filter(|definition| {
			values
				.get(&definition.name)
				.is_none_or(|value| value.trim().is_empty())
		})
		.map(|definition| definition.display_label().to_string())
		.collect();

	ValidationReport { missing }
}

/// Starting values for a set of definitions: each variable's default, or an
/// empty string.
pub fn initial_values(definitions: &[VariableDefinition]) -> HashMap<String, String> {
	definitions
		.iter()
		.map(|definition| {
			(
				definition.name.clone(),
				definition.default_value.clone().unwrap_or_default(),
			)
		})
		.collect()
}

/// Names of all `{{name}}` tokens found in the strings of `doc`, sorted and
/// without duplicates.
pub fn find_placeholders(doc: &Value) -> Vec<String> {
	let mut names = BTreeSet::new();
	collect_placeholders(doc, &mut names);
	names.into_iter().collect()
}

fn collect_placeholders(value: &Value, names: &mut BTreeSet<String>) {
	match value {
		Value::String(text) => {
			let mut rest = text.as_str();
			while let Some(start) = rest.find("{{") {
				let after = &rest[start + 2..];
				let Some(end) = after.find("}}") else {
					break;
				};
				let name = &after[..end];
				if !name.is_empty() && !name.contains("{{") {
					names.insert(name.to_string());
					rest = &after[end + 2..];
				} else {
					rest = after;
				}
			}
		}
		Value::Array(items) => {
			for item in items {
				collect_placeholders(item, names);
			}
		}
		Value::Object(map) => {
			for item in map.values() {
				collect_placeholders(item, names);
			}
		}
		Value::Null | Value::Bool(_) | Value::Number(_) => {}
	}
}

/// Reject definition lists with repeated names or `select` variables that
/// offer no options.
pub fn check_definitions(definitions: &[VariableDefinition]) -> PreconfResult<()> {
	let mut names = HashSet::new();

	for definition in definitions {
		if !names.insert(definition.name.as_str()) {
			return Err(PreconfError::DuplicateVariable(definition.name.clone()));
		}

		if definition.r#type == VariableType::Select
			&& definition.options.as_ref().is_none_or(Vec::is_empty)
		{
			return Err(PreconfError::MissingSelectOptions(definition.name.clone()));
		}
	}

	Ok(())
}
