use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

use crate::PreconfError;
use crate::PreconfResult;
use crate::document::toml_to_json;
use crate::form::FormDefaults;
use crate::path_map::PathMap;
use crate::variables::DEFAULT_VARIABLE_CANDIDATES;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"preconf.toml",
	".preconf.toml",
	".config/preconf.toml",
];

/// Configuration loaded from a `preconf.toml` file.
///
/// ```toml
/// [variables]
/// candidates = ["customerName", "rakId", "gatewayName"]
///
/// [form.defaults]
/// wanWifi = true
/// logExpiration = "3-months"
///
/// [mapping]
/// "custom.siteCode" = "siteCode"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct PreconfConfig {
	/// Which fields become variables when a template is extracted.
	#[serde(default)]
	pub variables: VariablesConfig,
	/// Form defaults applied when a template is turned into form fields.
	#[serde(default)]
	pub form: FormConfig,
	/// Additional scalar path map entries, keyed by dotted path.
	#[serde(default)]
	pub mapping: BTreeMap<String, String>,
}

/// The `[variables]` section.
#[derive(Debug, Deserialize)]
pub struct VariablesConfig {
	/// Field names promoted to variables during extraction.
	#[serde(default = "default_candidates")]
	pub candidates: Vec<String>,
}

impl Default for VariablesConfig {
	fn default() -> Self {
		Self {
			candidates: default_candidates(),
		}
	}
}

fn default_candidates() -> Vec<String> {
	DEFAULT_VARIABLE_CANDIDATES
		.iter()
		.map(ToString::to_string)
		.collect()
}

/// The `[form]` section.
#[derive(Debug, Default, Deserialize)]
pub struct FormConfig {
	/// Overrides for individual built-in form defaults.
	#[serde(default)]
	pub defaults: toml::Table,
}

impl PreconfConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> PreconfResult<Option<PreconfConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			tracing::debug!(root = %root.display(), "no config file found");
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> PreconfResult<PreconfConfig> {
		toml::from_str(content).map_err(|e| PreconfError::ConfigParse(e.to_string()))
	}

	/// The built-in path map extended with the `[mapping]` entries.
	pub fn path_map(&self) -> PreconfResult<PathMap> {
		PathMap::gateway().with_extra(
			self.mapping
				.iter()
				.map(|(path, field)| (path.as_str(), field.as_str())),
		)
	}

	/// The built-in form defaults with the `[form.defaults]` overrides.
	pub fn form_defaults(&self) -> PreconfResult<FormDefaults> {
		let overrides = self.default_overrides()?;
		Ok(FormDefaults::builtin().with_overrides(&overrides))
	}

	/// Field names promoted to variables during extraction.
	pub fn candidates(&self) -> &[String] {
		&self.variables.candidates
	}

	/// The `[form.defaults]` overrides converted to JSON values.
	pub fn default_overrides(&self) -> PreconfResult<Map<String, Value>> {
		match toml_to_json(
			toml::Value::Table(self.form.defaults.clone()),
			"[form.defaults]",
		)? {
			Value::Object(map) => Ok(map),
			_ => Ok(Map::new()),
		}
	}
}
