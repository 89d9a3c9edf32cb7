use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Save gateway pre-configurations as templates and re-apply them.",
	long_about = "preconf turns a filled gateway pre-configuration into a reusable template \
	              whose customer-specific values become named variables, and re-applies saved \
	              templates with new values to produce pre-populated form fields.\n\nQuick \
	              start:\n  preconf extract gateway.json > template.json   Save a template\n  \
	              preconf validate template.json --var rakId=RAK-1  Check variable values\n  \
	              preconf apply template.json --var rakId=RAK-1     Produce form fields"
)]
pub struct PreconfCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `preconf.toml` is looked up.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `preconf.toml` in the project root.
	///
	/// Does nothing when a config file already exists.
	Init,
	/// List every configuration path and the form field it feeds.
	Fields {
		/// Output format. Use `text` for a table or `json` for programmatic
		/// consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Flatten a configuration document into form fields.
	///
	/// Fields whose configuration path is absent are omitted. The result is
	/// printed as JSON.
	Flatten {
		/// Configuration document (`.json`, `.toml`, `.yaml` or `.yml`).
		config: PathBuf,
	},
	/// Build a configuration document from form fields.
	Unflatten {
		/// Form fields document (`.json`, `.toml`, `.yaml` or `.yml`).
		form: PathBuf,
	},
	/// Create a template from a configuration document.
	///
	/// Every non-blank value stored under a candidate field name is replaced by
	/// a `{{name}}` placeholder and recorded as a variable with the original
	/// value as its default. Candidates come from `--candidate`, then from
	/// `[variables] candidates` in `preconf.toml`, then from the built-in list.
	Extract {
		/// Configuration document (`.json`, `.toml`, `.yaml` or `.yml`).
		config: PathBuf,

		/// Field name to promote to a variable. May be repeated.
		#[arg(long = "candidate", short = 'c')]
		candidates: Vec<String>,

		/// Template name. Defaults to the document's file stem.
		#[arg(long)]
		name: Option<String>,

		/// Template category.
		#[arg(long)]
		category: Option<String>,

		/// Template description.
		#[arg(long)]
		description: Option<String>,

		/// Show a line diff between the original and templated configuration.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Check that every required variable of a template has a value.
	///
	/// Exits with status 1 and lists the missing variables when any required
	/// value is absent or blank.
	Validate {
		/// Saved template (`.json`, `.toml`, `.yaml` or `.yml`).
		template: PathBuf,

		/// Variable value as `name=value`. May be repeated.
		#[arg(long = "var", value_name = "NAME=VALUE")]
		vars: Vec<String>,

		/// Output format for the validation report.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Apply a template and print the resulting form fields.
	///
	/// Variable values start from each variable's default and are overridden
	/// by `--var`. Fields the template leaves unset are filled from the form
	/// defaults.
	Apply {
		/// Saved template (`.json`, `.toml`, `.yaml` or `.yml`).
		template: PathBuf,

		/// Variable value as `name=value`. May be repeated.
		#[arg(long = "var", value_name = "NAME=VALUE")]
		vars: Vec<String>,

		/// Print the substituted configuration document instead of form
		/// fields.
		#[arg(long, default_value_t = false)]
		config: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
