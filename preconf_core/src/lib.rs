//! `preconf_core` is the engine behind gateway pre-configuration templates.
//! A filled request form can be saved as a reusable template whose
//! customer-specific values are replaced by named variables, and a saved
//! template can later be re-applied with new values to pre-populate a form.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Saving a template:
//!   concrete config → extract_variables → templated config + variable definitions
//!
//! Applying a template:
//!   variable values → validate_variables
//!   templated config + values → substitute_variables → concrete config
//!   concrete config → config_to_form (via PathMap) → form fields (+ defaults)
//! ```
//!
//! ## Modules
//!
//! - [`path_map`]: The fixed table of dotted configuration paths and the flat
//!   form fields they feed.
//! - [`document`]: Dotted-path access into configuration documents and
//!   loading them from JSON, TOML, or YAML files.
//! - [`form`]: Flattening documents into form fields and back, plus form
//!   defaults.
//! - [`variables`]: Variable extraction, placeholder substitution, and
//!   completeness checks.
//! - [`template`]: Saved template records and template drafts.
//! - [`config`]: Configuration loaded from `preconf.toml`.
//!
//! ## Placeholders
//!
//! A placeholder is the literal text `{{name}}` inside a string value.
//! Substitution is plain substring replacement: names are never interpreted
//! as patterns, and placeholders without a value are left untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use preconf_core::FormDefaults;
//! use preconf_core::PathMap;
//! use preconf_core::TemplateDraft;
//! use preconf_core::config_to_form;
//! use preconf_core::substitute_variables;
//! use serde_json::json;
//!
//! let config = json!({ "general": { "customerName": "Acme" } });
//! let draft = TemplateDraft::from_config("Acme gateways", &config, &["customerName"]);
//! assert_eq!(draft.config_data["general"]["customerName"], "{{customerName}}");
//!
//! let values = HashMap::from([("customerName".to_string(), "Globex".to_string())]);
//! let concrete = substitute_variables(&draft.config_data, &values);
//! let form = FormDefaults::builtin().merge(config_to_form(&PathMap::gateway(), &concrete));
//! assert_eq!(form["customerName"], "Globex");
//! ```

pub use config::*;
pub use document::*;
pub use error::*;
pub use form::*;
pub use path_map::*;
pub use template::*;
pub use variables::*;

pub mod config;
pub mod document;
#[allow(unused_assignments)]
mod error;
pub mod form;
pub mod path_map;
pub mod template;
pub mod variables;
