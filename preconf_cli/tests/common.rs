#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn preconf_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("preconf"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub const GATEWAY_JSON: &str = r#"{
  "general": {
    "customerName": "Acme",
    "pid": "PID-7",
    "rakId": "RAK-001"
  },
  "lora": { "region": "EU868" },
  "network": { "wan": { "ethernet": { "enabled": true } } },
  "system": { "gatewayName": "gw-north" }
}
"#;

pub const TEMPLATE_JSON: &str = r#"{
  "id": "tpl-1",
  "name": "North sites",
  "configData": {
    "general": { "customerName": "{{customerName}}", "rakId": "{{rakId}}" },
    "lora": { "region": "EU868" }
  },
  "variables": [
    { "name": "customerName", "type": "text", "label": "Customer Name", "defaultValue": "Acme", "required": true },
    { "name": "rakId", "type": "text", "label": "RAK ID", "required": true }
  ]
}
"#;

pub fn write_file(dir: &Path, name: &str, content: &str) -> std::io::Result<PathBuf> {
	let path = dir.join(name);
	std::fs::write(&path, content)?;
	Ok(path)
}
