mod common;

use preconf_core::AnyEmptyResult;
use preconf_core::PreconfConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::preconf_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let content = std::fs::read_to_string(tmp.path().join("preconf.toml"))?;
	assert!(content.contains("[variables]"));

	// The generated config must load with the built-in candidates.
	let config = PreconfConfig::parse(&content)?;
	assert!(config.candidates().iter().any(|name| name == "rakId"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = common::write_file(tmp.path(), ".preconf.toml", "existing config")?;

	common::preconf_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");
	assert!(!tmp.path().join("preconf.toml").exists());

	Ok(())
}

#[test]
fn missing_subcommand_fails() {
	common::preconf_cmd()
		.assert()
		.failure()
		.stderr(predicates::str::contains("No subcommand specified"));
}
