mod common;

use preconf_core::AnyEmptyResult;
use serde_json::Value;
use serde_json::json;

#[test]
fn extract_replaces_candidate_values() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = common::write_file(tmp.path(), "north.json", common::GATEWAY_JSON)?;

	let output = common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let draft: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(draft["name"], json!("north"));
	assert_eq!(
		draft["configData"]["general"],
		json!({
			"customerName": "{{customerName}}",
			"pid": "{{pid}}",
			"rakId": "{{rakId}}",
		})
	);
	assert_eq!(draft["configData"]["lora"]["region"], json!("EU868"));

	let names: Vec<&str> = draft["variables"]
		.as_array()
		.into_iter()
		.flatten()
		.filter_map(|variable| variable["name"].as_str())
		.collect();
	assert_eq!(names, vec!["customerName", "pid", "rakId", "gatewayName"]);
	assert_eq!(draft["variables"][0]["defaultValue"], json!("Acme"));

	Ok(())
}

#[test]
fn extract_candidates_from_arguments_win() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"preconf.toml",
		"[variables]\ncandidates = [\"pid\"]\n",
	)?;
	let config = common::write_file(tmp.path(), "north.json", common::GATEWAY_JSON)?;

	let output = common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("-c")
		.arg("region")
		.arg("--name")
		.arg("Regions")
		.arg("--category")
		.arg("lora")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let draft: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(draft["name"], json!("Regions"));
	assert_eq!(draft["category"], json!("lora"));
	assert_eq!(draft["configData"]["lora"]["region"], json!("{{region}}"));
	assert_eq!(draft["configData"]["general"]["pid"], json!("PID-7"));
	assert_eq!(draft["variables"].as_array().map(Vec::len), Some(1));

	Ok(())
}

#[test]
fn extract_uses_config_file_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"preconf.toml",
		"[variables]\ncandidates = [\"pid\"]\n",
	)?;
	let config = common::write_file(tmp.path(), "north.json", common::GATEWAY_JSON)?;

	let output = common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let draft: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(draft["configData"]["general"]["pid"], json!("{{pid}}"));
	assert_eq!(draft["configData"]["general"]["rakId"], json!("RAK-001"));

	Ok(())
}

#[test]
fn extract_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = common::write_file(tmp.path(), "north.json", common::GATEWAY_JSON)?;

	common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("-    \"rakId\": \"RAK-001\""))
		.stderr(predicates::str::contains("+    \"rakId\": \"{{rakId}}\""));

	Ok(())
}

#[test]
fn extract_reports_when_nothing_matches() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = common::write_file(tmp.path(), "plain.json", r#"{ "lora": { "region": "US915" } }"#)?;

	let output = common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());
	assert!(String::from_utf8(output.stderr)?.contains("0 variable(s) extracted"));

	let draft: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(draft["configData"], json!({ "lora": { "region": "US915" } }));
	assert_eq!(draft["variables"], json!([]));

	Ok(())
}
