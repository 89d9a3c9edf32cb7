use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::PreconfError;
use crate::PreconfResult;
use crate::form::FormData;
use crate::form::FormDefaults;
use crate::form::config_to_form;
use crate::path_map::PathMap;
use crate::variables::VariableDefinition;
use crate::variables::check_definitions;
use crate::variables::extract_variables;
use crate::variables::find_placeholders;
use crate::variables::substitute_variables;
use crate::variables::validate_variables;

/// Category given to templates created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A saved template as stored by the request service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
	/// Empty for templates read back from a local draft.
	#[serde(default)]
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default = "default_category")]
	pub category: String,
	/// Configuration document containing `{{name}}` placeholders.
	pub config_data: Value,
	#[serde(default)]
	pub variables: Vec<VariableDefinition>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub is_public: bool,
	#[serde(default)]
	pub created_by: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_by_name: Option<String>,
	#[serde(default)]
	pub created_at: String,
	#[serde(default)]
	pub updated_at: String,
	#[serde(default = "default_version")]
	pub version: u32,
	#[serde(default)]
	pub usage_count: u64,
}

fn default_category() -> String {
	DEFAULT_CATEGORY.to_string()
}

fn default_version() -> u32 {
	1
}

impl Template {
	/// Check that every required variable has a value, substitute the values
	/// into the configuration and flatten it into form fields, filling unset
	/// fields from `defaults`.
	#[allow(clippy::implicit_hasher)]
	pub fn apply(
		&self,
		values: &HashMap<String, String>,
		map: &PathMap,
		defaults: &FormDefaults,
	) -> PreconfResult<FormData> {
		let report = validate_variables(&self.variables, values);
		if !report.is_ok() {
			return Err(PreconfError::MissingVariables(report.missing));
		}

		let concrete = substitute_variables(&self.config_data, values);
		let form = config_to_form(map, &concrete);

		tracing::debug!(template = %self.name, "applied template");
		Ok(defaults.merge(form))
	}

	/// Placeholders used in the configuration that no variable defines.
	pub fn undefined_placeholders(&self) -> Vec<String> {
		find_placeholders(&self.config_data)
			.into_iter()
			.filter(|name| !self.variables.iter().any(|v| &v.name == name))
			.collect()
	}

	/// Validate the variable definitions themselves.
	pub fn check(&self) -> PreconfResult<()> {
		check_definitions(&self.variables)
	}
}

/// A template about to be created, before the service assigns an id and
/// bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDraft {
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	pub config_data: Value,
	#[serde(default)]
	pub variables: Vec<VariableDefinition>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tags: Option<Vec<String>>,
	#[serde(default)]
	pub is_public: bool,
}

impl TemplateDraft {
	/// Create a draft from a concrete configuration, promoting values stored
	/// under `candidates` to variables.
	pub fn from_config<S: AsRef<str>>(
		name: impl Into<String>,
		config: &Value,
		candidates: &[S],
	) -> Self {
		let extraction = extract_variables(config, candidates);

		Self {
			name: name.into(),
			description: None,
			category: None,
			config_data: extraction.templated,
			variables: extraction.variables,
			tags: None,
			is_public: false,
		}
	}

	#[must_use]
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}
}
