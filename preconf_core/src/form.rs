use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::document::get_path;
use crate::document::set_path;
use crate::path_map::EntryKind;
use crate::path_map::PathEntry;
use crate::path_map::PathMap;
use crate::path_map::file_list_companion;

/// Flat mapping of form field names to values.
///
/// Field order carries no meaning.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct FormData(
	#[deref]
	#[deref_mut]
	Map<String, Value>,
);

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn into_inner(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for FormData {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Flatten a configuration document into form fields.
///
/// Every entry of `map` is resolved against `config` in declaration order.
/// Entries whose path is absent or `null` at any level leave their field
/// unset. The input is never modified.
pub fn config_to_form(map: &PathMap, config: &Value) -> FormData {
	let mut form = FormData::new();

	for entry in map.entries() {
		let Some(value) = get_path(config, &entry.path) else {
			continue;
		};

		match entry.kind {
			EntryKind::Scalar => {
				form.insert(entry.field.clone(), value.clone());
			}
			EntryKind::FileList => flatten_file_list(&mut form, entry, value),
			EntryKind::FileDescriptor => flatten_file_descriptor(&mut form, entry, value),
		}
	}

	tracing::debug!(fields = form.len(), "flattened configuration into form");
	form
}

fn flatten_file_list(form: &mut FormData, entry: &PathEntry, value: &Value) {
	let Value::Array(files) = value else {
		form.insert(entry.field.clone(), value.clone());
		return;
	};

	let names: Vec<Value> = files
		.iter()
		.map(|file| file_attribute(file, "name", json!("")))
		.collect();
	let sizes: Vec<Value> = files
		.iter()
		.map(|file| file_attribute(file, "size", json!(0)))
		.collect();

	form.insert(entry.field.clone(), value.clone());
	form.insert(
		file_list_companion(&entry.field, "Names"),
		Value::Array(names),
	);
	form.insert(
		file_list_companion(&entry.field, "Sizes"),
		Value::Array(sizes),
	);
}

fn flatten_file_descriptor(form: &mut FormData, entry: &PathEntry, value: &Value) {
	if !value.is_object() {
		return;
	}

	form.insert(
		format!("{}Name", entry.field),
		file_attribute(value, "name", json!("")),
	);
	form.insert(
		format!("{}Id", entry.field),
		file_attribute(value, "id", json!("")),
	);
	form.insert(
		format!("{}Size", entry.field),
		file_attribute(value, "size", json!(0)),
	);
}

/// Read `key` from a file descriptor, substituting `fallback` when it is
/// missing or `null`.
fn file_attribute(file: &Value, key: &str, fallback: Value) -> Value {
	match file.get(key) {
		None | Some(Value::Null) => fallback,
		Some(value) => value.clone(),
	}
}

/// Build a configuration document from form fields by walking `map` in
/// declaration order.
///
/// Unset and `null` fields are skipped. File descriptors are rebuilt from
/// their `Name`, `Id` and `Size` fields when any of them is present. The
/// synthesized name and size arrays of file lists are derived data and are
/// not written back.
pub fn form_to_config(map: &PathMap, form: &FormData) -> Value {
	let mut config = Value::Object(Map::new());

	for entry in map.entries() {
		match entry.kind {
			EntryKind::Scalar | EntryKind::FileList => {
				if let Some(value) = present(form, &entry.field) {
					set_path(&mut config, &entry.path, value.clone());
				}
			}
			EntryKind::FileDescriptor => {
				let name = present(form, &format!("{}Name", entry.field));
				let id = present(form, &format!("{}Id", entry.field));
				let size = present(form, &format!("{}Size", entry.field));

				if name.is_none() && id.is_none() && size.is_none() {
					continue;
				}

				let descriptor = json!({
					"name": name.cloned().unwrap_or_else(|| json!("")),
					"id": id.cloned().unwrap_or_else(|| json!("")),
					"size": size.cloned().unwrap_or_else(|| json!(0)),
				});
				set_path(&mut config, &entry.path, descriptor);
			}
		}
	}

	config
}

fn present<'a>(form: &'a FormData, field: &str) -> Option<&'a Value> {
	form.get(field).filter(|value| !value.is_null())
}

/// Fallback values for form fields that a template leaves unset.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FormDefaults(FormData);

impl FormDefaults {
	/// Defaults matching a freshly opened request form.
	pub fn builtin() -> Self {
		let Value::Object(map) = json!({
			"wanEthernet": true,
			"wanWifi": false,
			"wanCellular": true,
			"lanEthernet": false,
			"wifiApEnabled": true,
			"ethernetTrackingMethod": "icmp",
			"wifiTrackingMethod": "icmp",
			"cellularTrackingMethod": "icmp",
			"ethernetTrackingAddresses": [],
			"wifiTrackingAddresses": [],
			"cellularTrackingAddresses": [],
			"loraSubmode": "udp-gwmp",
			"wifiEncryption": "none",
			"wifiApEncryption": "none",
			"basicStationServerType": "lns",
			"basicStationAuthMode": "none",
			"mqttProtocol": "chirpstack-v3-json",
			"mqttVersion": "3.1.1",
			"mqttSslMode": "none",
			"mqttTlsVersion": "1.2",
			"ntpEnabled": true,
			"ntpServers": ["0.openwrt.pool.ntp.org"],
			"logExpiration": "1-month",
			"wisdmEnabled": false,
			"wisdmConnect": false,
			"shareLog": false,
			"sshDisable": false,
		}) else {
			unreachable!("object literal");
		};

		Self(FormData::from(map))
	}

	/// No defaults at all.
	pub fn empty() -> Self {
		Self(FormData::new())
	}

	/// Return these defaults with `overrides` replacing individual fields.
	#[must_use]
	pub fn with_overrides(mut self, overrides: &Map<String, Value>) -> Self {
		for (field, value) in overrides {
			self.0.insert(field.clone(), value.clone());
		}
		self
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	/// Fill every field unset in `form` from the defaults. Values already in
	/// `form` win.
	pub fn merge(&self, mut form: FormData) -> FormData {
		for (field, value) in self.0.iter() {
			if !form.contains_key(field) {
				form.insert(field.clone(), value.clone());
			}
		}
		form
	}
}

impl Default for FormDefaults {
	fn default() -> Self {
		Self::builtin()
	}
}
