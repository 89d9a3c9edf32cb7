mod common;

use preconf_core::AnyEmptyResult;
use serde_json::Value;
use serde_json::json;

#[test]
fn validate_passes_with_values() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	common::preconf_cmd()
		.arg("validate")
		.arg(&template)
		.arg("--var")
		.arg("rakId=RAK-42")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("ok: all 2 variable(s) of `North sites` have values"));

	Ok(())
}

#[test]
fn validate_lists_missing_variables() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	common::preconf_cmd()
		.arg("validate")
		.arg(&template)
		.arg("--var")
		.arg("customerName=   ")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("missing required variables"))
		.stderr(predicates::str::contains("- Customer Name"))
		.stderr(predicates::str::contains("- RAK ID"));

	Ok(())
}

#[test]
fn validate_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	let output = common::preconf_cmd()
		.arg("validate")
		.arg(&template)
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let report: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(report, json!({ "ok": false, "missing": ["RAK ID"] }));

	Ok(())
}

#[test]
fn validate_rejects_malformed_assignments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	common::preconf_cmd()
		.arg("validate")
		.arg(&template)
		.arg("--var")
		.arg("rakId")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("invalid variable assignment"));

	Ok(())
}

#[test]
fn apply_produces_form_fields_with_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	let output = common::preconf_cmd()
		.arg("apply")
		.arg(&template)
		.arg("--var")
		.arg("rakId=RAK-42")
		.arg("--var")
		.arg("customerName=Globex")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let form: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(form["rakId"], json!("RAK-42"));
	assert_eq!(form["customerName"], json!("Globex"));
	assert_eq!(form["loraRegion"], json!("EU868"));
	assert_eq!(form["loraSubmode"], json!("udp-gwmp"));
	assert_eq!(form["wanEthernet"], json!(true));

	Ok(())
}

#[test]
fn apply_uses_default_values_and_config_overrides() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"preconf.toml",
		"[form.defaults]\nloraSubmode = \"basic-station\"\n",
	)?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	let output = common::preconf_cmd()
		.arg("apply")
		.arg(&template)
		.arg("--var")
		.arg("rakId=RAK-42")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let form: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(form["customerName"], json!("Acme"));
	assert_eq!(form["loraSubmode"], json!("basic-station"));

	Ok(())
}

#[test]
fn apply_prints_substituted_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	let output = common::preconf_cmd()
		.arg("apply")
		.arg(&template)
		.arg("--config")
		.arg("--var")
		.arg("rakId=RAK-42")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let config: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(
		config,
		json!({
			"general": { "customerName": "Acme", "rakId": "RAK-42" },
			"lora": { "region": "EU868" },
		})
	);

	Ok(())
}

#[test]
fn apply_fails_when_required_values_are_missing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(tmp.path(), "template.json", common::TEMPLATE_JSON)?;

	let output = common::preconf_cmd()
		.arg("apply")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8(output.stderr)?.contains("missing required variables: RAK ID"));

	Ok(())
}

#[test]
fn apply_accepts_extracted_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config = common::write_file(tmp.path(), "north.json", common::GATEWAY_JSON)?;

	let extracted = common::preconf_cmd()
		.arg("extract")
		.arg(&config)
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(extracted.status.success());
	std::fs::write(tmp.path().join("north.template.json"), &extracted.stdout)?;

	let output = common::preconf_cmd()
		.arg("apply")
		.arg(tmp.path().join("north.template.json"))
		.arg("--var")
		.arg("gatewayName=gw-south")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let form: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(form["gatewayName"], json!("gw-south"));
	assert_eq!(form["rakId"], json!("RAK-001"));
	assert_eq!(form["pid"], json!("PID-7"));

	Ok(())
}

#[test]
fn apply_warns_about_undefined_placeholders() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let template = common::write_file(
		tmp.path(),
		"template.json",
		r#"{ "name": "Loose", "configData": { "general": { "pid": "{{pid}}" } } }"#,
	)?;

	common::preconf_cmd()
		.arg("apply")
		.arg(&template)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("placeholder `{{pid}}` has no variable definition"))
		.stdout(predicates::str::contains("\"pid\": \"{{pid}}\""));

	Ok(())
}
