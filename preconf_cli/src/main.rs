use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use preconf_cli::Commands;
use preconf_cli::OutputFormat;
use preconf_cli::PreconfCli;
use preconf_core::EntryKind;
use preconf_core::FormData;
use preconf_core::PreconfConfig;
use preconf_core::PreconfError;
use preconf_core::PreconfResult;
use preconf_core::Template;
use preconf_core::TemplateDraft;
use preconf_core::config_to_form;
use preconf_core::form_to_config;
use preconf_core::initial_values;
use preconf_core::load_document;
use preconf_core::substitute_variables;
use preconf_core::validate_variables;
use serde_json::Value;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = PreconfCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.wrap_lines(false)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Fields { format }) => run_fields(&args, *format),
		Some(Commands::Flatten { config }) => run_flatten(&args, config),
		Some(Commands::Unflatten { form }) => run_unflatten(&args, form),
		Some(Commands::Extract {
			config,
			candidates,
			name,
			category,
			description,
			diff,
		}) => {
			run_extract(
				&args,
				config,
				&ExtractOptions {
					candidates,
					name: name.as_deref(),
					category: category.as_deref(),
					description: description.as_deref(),
					diff: *diff,
				},
			)
		}
		Some(Commands::Validate {
			template,
			vars,
			format,
		}) => run_validate(&args, template, vars, *format),
		Some(Commands::Apply {
			template,
			vars,
			config,
		}) => run_apply(&args, template, vars, *config),
		None => {
			eprintln!("No subcommand specified. Run `preconf --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<PreconfError>() {
			Ok(preconf_err) => {
				let code = if matches!(*preconf_err, PreconfError::MissingVariables(_)) {
					1
				} else {
					2
				};
				let report: miette::Report = (*preconf_err).into();
				eprintln!("{report:?}");
				process::exit(code);
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
				process::exit(2);
			}
		}
	}
}

/// Log to stderr so JSON written to stdout stays parseable. `RUST_LOG` takes
/// precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &PreconfCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &PreconfCli) -> PreconfResult<PreconfConfig> {
	let root = resolve_root(args);
	let config = PreconfConfig::load(&root)?;

	if args.verbose {
		match PreconfConfig::resolve_path(&root) {
			Some(path) => eprintln!("Using config: {}", path.display()),
			None => eprintln!("No config file found, using built-in settings"),
		}
	}

	Ok(config.unwrap_or_default())
}

fn print_json(value: &impl serde::Serialize) -> PreconfResult<()> {
	let output =
		serde_json::to_string_pretty(value).map_err(|e| PreconfError::Serialize(e.to_string()))?;
	println!("{output}");
	Ok(())
}

fn run_init(args: &PreconfCli) -> CliResult {
	let root = resolve_root(args);

	if let Some(existing) = PreconfConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let sample_config = "# preconf configuration\n\n# Field names promoted to variables by \
	                     `preconf extract`.\n[variables]\ncandidates = [\"customerName\", \
	                     \"rakId\", \"pid\", \"gatewayModel\", \"wisdmOrgName\", \"wisdmUrl\", \
	                     \"gatewayName\"]\n\n# Override form defaults used by `preconf \
	                     apply`.\n# [form.defaults]\n# wanWifi = true\n\n# Map extra \
	                     configuration paths to form fields.\n# [mapping]\n# \"custom.siteCode\" \
	                     = \"siteCode\"\n";

	let config_path = root.join("preconf.toml");
	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());

	Ok(())
}

fn run_fields(args: &PreconfCli, format: OutputFormat) -> CliResult {
	let config = load_config(args)?;
	let map = config.path_map()?;

	match format {
		OutputFormat::Json => {
			let entries: Vec<Value> = map
				.entries()
				.iter()
				.map(|entry| {
					serde_json::json!({
						"path": entry.path,
						"field": entry.field,
						"kind": kind_name(entry.kind),
					})
				})
				.collect();
			print_json(&entries)?;
		}
		OutputFormat::Text => {
			println!("{}", colored!(format!("{} field mappings", map.len()), bold));
			for entry in map.entries() {
				let marker = match entry.kind {
					EntryKind::Scalar => String::new(),
					kind => format!(" ({})", kind_name(kind)),
				};
				println!("  {:<54} {}{marker}", entry.path, entry.field);
			}
		}
	}

	Ok(())
}

fn kind_name(kind: EntryKind) -> &'static str {
	match kind {
		EntryKind::Scalar => "scalar",
		EntryKind::FileList => "file list",
		EntryKind::FileDescriptor => "file",
	}
}

fn run_flatten(args: &PreconfCli, path: &Path) -> CliResult {
	let config = load_config(args)?;
	let map = config.path_map()?;
	let document = load_document(path)?;

	let form = config_to_form(&map, &document);
	if args.verbose {
		eprintln!("Flattened {} field(s)", form.len());
	}
	print_json(&form)?;

	Ok(())
}

fn run_unflatten(args: &PreconfCli, path: &Path) -> CliResult {
	let config = load_config(args)?;
	let map = config.path_map()?;

	let Value::Object(fields) = load_document(path)? else {
		return Err(PreconfError::DocumentParse {
			path: path.display().to_string(),
			reason: "expected a mapping of form fields".to_string(),
		}
		.into());
	};

	let document = form_to_config(&map, &FormData::from(fields));
	print_json(&document)?;

	Ok(())
}

struct ExtractOptions<'a> {
	candidates: &'a [String],
	name: Option<&'a str>,
	category: Option<&'a str>,
	description: Option<&'a str>,
	diff: bool,
}

fn run_extract(args: &PreconfCli, path: &Path, options: &ExtractOptions<'_>) -> CliResult {
	let config = load_config(args)?;
	let document = load_document(path)?;

	let candidates = if options.candidates.is_empty() {
		config.candidates()
	} else {
		options.candidates
	};
	let name = options.name.map_or_else(
		|| {
			path.file_stem()
				.map_or_else(|| "template".to_string(), |s| s.to_string_lossy().to_string())
		},
		ToString::to_string,
	);

	let mut draft = TemplateDraft::from_config(name, &document, candidates);
	if let Some(category) = options.category {
		draft = draft.with_category(category);
	}
	if let Some(description) = options.description {
		draft = draft.with_description(description);
	}

	if options.diff {
		print_diff(
			&pretty(&document)?,
			&pretty(&draft.config_data)?,
		);
	}

	if args.verbose || draft.variables.is_empty() {
		eprintln!(
			"{} variable(s) extracted from {}",
			draft.variables.len(),
			path.display()
		);
	}

	print_json(&draft)?;

	Ok(())
}

fn pretty(value: &Value) -> PreconfResult<String> {
	serde_json::to_string_pretty(value)
		.map(|mut s| {
			s.push('\n');
			s
		})
		.map_err(|e| PreconfError::Serialize(e.to_string()))
}

fn load_template(path: &Path) -> PreconfResult<Template> {
	let value = load_document(path)?;
	let template: Template =
		serde_json::from_value(value).map_err(|e| PreconfError::DocumentParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;

	tracing::debug!(
		path = %path.display(),
		variables = template.variables.len(),
		"loaded template"
	);
	template.check()?;

	for name in template.undefined_placeholders() {
		eprintln!(
			"{} placeholder `{{{{{name}}}}}` has no variable definition",
			colored!("warning:", yellow)
		);
	}

	Ok(template)
}

/// Start from each variable's default and apply `name=value` overrides.
fn resolve_values(template: &Template, vars: &[String]) -> PreconfResult<HashMap<String, String>> {
	let mut values = initial_values(&template.variables);

	for assignment in vars {
		let Some((name, value)) = assignment.split_once('=') else {
			return Err(PreconfError::InvalidAssignment(assignment.clone()));
		};
		let name = name.trim();
		if name.is_empty() {
			return Err(PreconfError::InvalidAssignment(assignment.clone()));
		}
		values.insert(name.to_string(), value.to_string());
	}

	Ok(values)
}

fn run_validate(
	_args: &PreconfCli,
	path: &Path,
	vars: &[String],
	format: OutputFormat,
) -> CliResult {
	let template = load_template(path)?;
	let values = resolve_values(&template, vars)?;
	let report = validate_variables(&template.variables, &values);

	match format {
		OutputFormat::Json => {
			print_json(&serde_json::json!({
				"ok": report.is_ok(),
				"missing": report.missing,
			}))?;
		}
		OutputFormat::Text => {
			if report.is_ok() {
				println!(
					"{} all {} variable(s) of `{}` have values",
					colored!("ok:", green),
					template.variables.len(),
					template.name
				);
			} else {
				eprintln!(
					"{} missing required variables:",
					colored!("error:", red)
				);
				for label in &report.missing {
					eprintln!("  - {label}");
				}
			}
		}
	}

	if !report.is_ok() {
		process::exit(1);
	}

	Ok(())
}

fn run_apply(args: &PreconfCli, path: &Path, vars: &[String], print_config: bool) -> CliResult {
	let config = load_config(args)?;
	let template = load_template(path)?;
	let values = resolve_values(&template, vars)?;

	if print_config {
		let report = validate_variables(&template.variables, &values);
		if !report.is_ok() {
			return Err(PreconfError::MissingVariables(report.missing).into());
		}
		print_json(&substitute_variables(&template.config_data, &values))?;
		return Ok(());
	}

	let map = config.path_map()?;
	let defaults = config.form_defaults()?;
	let form = template.apply(&values, &map, &defaults)?;
	print_json(&form)?;

	Ok(())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
