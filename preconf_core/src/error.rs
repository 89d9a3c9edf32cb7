use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PreconfError {
	#[error(transparent)]
	#[diagnostic(code(preconf::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(preconf::config_parse),
		help("check that preconf.toml is valid TOML with [variables], [form] and/or [mapping] sections")
	)]
	ConfigParse(String),

	#[error("failed to load document `{path}`: {reason}")]
	#[diagnostic(code(preconf::document_parse))]
	DocumentParse { path: String, reason: String },

	#[error("unsupported document format: `{0}`")]
	#[diagnostic(
		code(preconf::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedFormat(String),

	#[error("unconvertible float value in document `{path}`: {value}")]
	#[diagnostic(
		code(preconf::unconvertible_float),
		help("NaN and Infinity are not valid JSON numbers")
	)]
	UnconvertibleFloat { path: String, value: String },

	#[error("duplicate form field `{field}`: mapped from `{first_path}` and `{second_path}`")]
	#[diagnostic(
		code(preconf::duplicate_field),
		help("each form field may be fed by exactly one configuration path")
	)]
	DuplicateField {
		field: String,
		first_path: String,
		second_path: String,
	},

	#[error("duplicate configuration path: `{0}`")]
	#[diagnostic(
		code(preconf::duplicate_path),
		help("remove the repeated entry from the [mapping] section")
	)]
	DuplicatePath(String),

	#[error("duplicate variable definition: `{0}`")]
	#[diagnostic(
		code(preconf::duplicate_variable),
		help("variable names must be unique within a template")
	)]
	DuplicateVariable(String),

	#[error("select variable `{0}` has no options")]
	#[diagnostic(
		code(preconf::missing_select_options),
		help("add an `options` list or change the variable type to `text`")
	)]
	MissingSelectOptions(String),

	#[error("missing required variables: {}", .0.join(", "))]
	#[diagnostic(
		code(preconf::missing_variables),
		help("supply a value for each required variable with `--var name=value`")
	)]
	MissingVariables(Vec<String>),

	#[error("invalid variable assignment: `{0}`")]
	#[diagnostic(
		code(preconf::invalid_assignment),
		help("variables are assigned as `name=value`")
	)]
	InvalidAssignment(String),

	#[error("failed to serialize output: {0}")]
	#[diagnostic(code(preconf::serialize))]
	Serialize(String),
}

pub type PreconfResult<T> = Result<T, PreconfError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
