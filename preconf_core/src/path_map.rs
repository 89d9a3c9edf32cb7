use std::collections::HashMap;

use crate::PreconfError;
use crate::PreconfResult;

/// How the value found at a [`PathEntry`]'s path is laid out in the form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntryKind {
	/// The value is copied verbatim under the field name.
	Scalar,
	/// A list of file descriptors. Besides the verbatim copy, parallel arrays
	/// of names and sizes are synthesized.
	FileList,
	/// A single `{ name, id, size }` file descriptor, expanded into
	/// `<field>Name`, `<field>Id` and `<field>Size`.
	FileDescriptor,
}

/// A single dotted-path to form-field correspondence.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PathEntry {
	/// Dotted path into the configuration document, e.g.
	/// `network.wan.wifi.ssid`.
	pub path: String,
	/// Flat form field fed by the path, e.g. `wifiSsid`.
	pub field: String,
	pub kind: EntryKind,
}

impl PathEntry {
	pub fn new(path: impl Into<String>, field: impl Into<String>, kind: EntryKind) -> Self {
		Self {
			path: path.into(),
			field: field.into(),
			kind,
		}
	}

	/// Split the dotted path into its key segments.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.path.split('.')
	}
}

/// Immutable table of dotted paths and the flat form fields they feed.
///
/// Both paths and field names are unique within one table. Entries keep their
/// declaration order, which is also the order flattening assigns fields in.
#[derive(Debug, Clone)]
pub struct PathMap {
	entries: Vec<PathEntry>,
	by_path: HashMap<String, usize>,
	by_field: HashMap<String, usize>,
}

impl PathMap {
	/// Build a table from the given entries, rejecting repeated paths or field
	/// names.
	pub fn new(entries: Vec<PathEntry>) -> PreconfResult<Self> {
		let mut by_path = HashMap::with_capacity(entries.len());
		let mut by_field = HashMap::with_capacity(entries.len());

		for (index, entry) in entries.iter().enumerate() {
			if by_path.insert(entry.path.clone(), index).is_some() {
				return Err(PreconfError::DuplicatePath(entry.path.clone()));
			}

			if let Some(previous) = by_field.insert(entry.field.clone(), index) {
				return Err(PreconfError::DuplicateField {
					field: entry.field.clone(),
					first_path: entries[previous].path.clone(),
					second_path: entry.path.clone(),
				});
			}
		}

		Ok(Self {
			entries,
			by_path,
			by_field,
		})
	}

	/// The built-in gateway pre-configuration table.
	pub fn gateway() -> Self {
		let entries = GATEWAY_ENTRIES
			.iter()
			.map(|(path, field, kind)| PathEntry::new(*path, *field, *kind))
			.collect();

		Self::new(entries).unwrap_or_else(|e| panic!("built-in path map is invalid: {e}"))
	}

	/// Return a new table with `extra` scalar entries appended after the
	/// existing ones.
	pub fn with_extra<'a>(
		&self,
		extra: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> PreconfResult<Self> {
		let mut entries = self.entries.clone();
		entries.extend(
			extra
				.into_iter()
				.map(|(path, field)| PathEntry::new(path, field, EntryKind::Scalar)),
		);

		Self::new(entries)
	}

	/// Look up the form field fed by a dotted path.
	pub fn lookup(&self, path: &str) -> Option<&str> {
		self.by_path
			.get(path)
			.map(|index| self.entries[*index].field.as_str())
	}

	/// Reverse lookup: the dotted path feeding a form field.
	pub fn path_of(&self, field: &str) -> Option<&str> {
		self.by_field
			.get(field)
			.map(|index| self.entries[*index].path.as_str())
	}

	/// All entries in declaration order.
	pub fn entries(&self) -> &[PathEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Default for PathMap {
	fn default() -> Self {
		Self::gateway()
	}
}

/// Name of the companion field holding `suffix` values for a file-list
/// field. `extensionFiles` with `Names` becomes `extensionFileNames`.
pub fn file_list_companion(field: &str, suffix: &str) -> String {
	let stem = field.strip_suffix('s').unwrap_or(field);
	format!("{stem}{suffix}")
}

use EntryKind::FileDescriptor;
use EntryKind::FileList;
use EntryKind::Scalar;

#[rustfmt::skip]
const GATEWAY_ENTRIES: &[(&str, &str, EntryKind)] = &[
	// General
	("general.pid", "pid", Scalar),
	("general.barcode", "barcode", Scalar),
	("general.rakId", "rakId", Scalar),
	("general.gatewayModel", "gatewayModel", Scalar),
	("general.customerName", "customerName", Scalar),
	("general.priority", "priority", Scalar),
	("general.orderDescription", "orderDescription", Scalar),
	("general.password", "generalPassword", Scalar),

	// Network WAN
	("network.wan.priority", "wanPriority", Scalar),
	("network.wan.ethernet.enabled", "wanEthernet", Scalar),
	("network.wan.ethernet.trackingMethod", "ethernetTrackingMethod", Scalar),
	("network.wan.ethernet.trackingAddresses", "ethernetTrackingAddresses", Scalar),
	("network.wan.wifi.enabled", "wanWifi", Scalar),
	("network.wan.wifi.ssid", "wifiSsid", Scalar),
	("network.wan.wifi.encryption", "wifiEncryption", Scalar),
	("network.wan.wifi.password", "wifiPassword", Scalar),
	("network.wan.wifi.trackingMethod", "wifiTrackingMethod", Scalar),
	("network.wan.wifi.trackingAddresses", "wifiTrackingAddresses", Scalar),
	("network.wan.cellular.enabled", "wanCellular", Scalar),
	("network.wan.cellular.apn", "cellularApn", Scalar),
	("network.wan.cellular.trackingMethod", "cellularTrackingMethod", Scalar),
	("network.wan.cellular.trackingAddresses", "cellularTrackingAddresses", Scalar),

	// Network LAN
	("network.lan.ethernet", "lanEthernet", Scalar),
	("network.lan.wifiAp.enabled", "wifiApEnabled", Scalar),
	("network.lan.wifiAp.ssid", "wifiApSsid", Scalar),
	("network.lan.wifiAp.encryption", "wifiApEncryption", Scalar),
	("network.lan.wifiAp.password", "wifiApPassword", Scalar),

	// LoRa
	("lora.country", "loraCountry", Scalar),
	("lora.region", "loraRegion", Scalar),
	("lora.mode", "loraMode", Scalar),
	("lora.whitelist.enabled", "loraWhitelistMode", Scalar),
	("lora.whitelist.ouiList", "whitelistOuiList", Scalar),
	("lora.whitelist.networkIdList", "whitelistNetworkIdList", Scalar),

	// Basic Station
	("lora.basicStation.serverType", "basicStationServerType", Scalar),
	("lora.basicStation.serverUrl", "basicStationServerUrl", Scalar),
	("lora.basicStation.serverPort", "basicStationServerPort", Scalar),
	("lora.basicStation.authMode", "basicStationAuthMode", Scalar),
	("lora.basicStation.ztp", "basicStationZtp", Scalar),
	("lora.basicStation.batchTtn", "basicStationBatchTtn", Scalar),
	("lora.basicStation.batchAwsIot", "basicStationBatchAwsIot", Scalar),
	("lora.basicStation.trustCaCertificate", "trustCaCertificate", FileDescriptor),
	("lora.basicStation.clientCertificate", "clientCertificate", FileDescriptor),
	("lora.basicStation.clientKey", "clientKey", FileDescriptor),
	("lora.basicStation.batchTtnFile", "batchTtnFile", FileDescriptor),
	("lora.basicStation.batchAwsFile", "batchAwsFile", FileDescriptor),

	// Basic Station: TTN
	("lora.basicStation.ttnConfig.adminToken", "ttnAdminToken", Scalar),
	("lora.basicStation.ttnConfig.frequencyPlan", "ttnFrequencyPlan", Scalar),
	("lora.basicStation.ttnConfig.gatewayId", "ttnGatewayId", Scalar),
	("lora.basicStation.ttnConfig.gatewayName", "ttnGatewayName", Scalar),

	// Basic Station: AWS IoT
	("lora.basicStation.awsConfig.accessKeyId", "awsAccessKeyId", Scalar),
	("lora.basicStation.awsConfig.secretAccessKey", "awsSecretAccessKey", Scalar),
	("lora.basicStation.awsConfig.defaultRegion", "awsDefaultRegion", Scalar),
	("lora.basicStation.awsConfig.gatewayNameRule", "awsGatewayNameRule", Scalar),
	("lora.basicStation.awsConfig.gatewayDescriptionRule", "awsGatewayDescriptionRule", Scalar),
	("lora.basicStation.awsConfig.useClassBMode", "awsUseClassBMode", Scalar),

	// Packet forwarder: UDP GWMP
	("lora.packetForwarder.submode", "loraSubmode", Scalar),
	("lora.packetForwarder.udpGwmp.statisticInterval", "udpStatisticInterval", Scalar),
	("lora.packetForwarder.udpGwmp.serverAddress", "udpServerAddress", Scalar),
	("lora.packetForwarder.udpGwmp.portUp", "udpPortUp", Scalar),
	("lora.packetForwarder.udpGwmp.portDown", "udpPortDown", Scalar),
	("lora.packetForwarder.udpGwmp.pushTimeout", "udpPushTimeout", Scalar),
	("lora.packetForwarder.udpGwmp.keepalive", "udpKeepalive", Scalar),
	("lora.packetForwarder.udpGwmp.mtu", "udpMtu", Scalar),
	("lora.packetForwarder.udpGwmp.restartThreshold", "udpRestartThreshold", Scalar),
	("lora.packetForwarder.udpGwmp.autoDataRecovery", "udpAutoDataRecovery", Scalar),

	// Packet forwarder: MQTT bridge
	("lora.packetForwarder.mqttBridge.statisticInterval", "mqttStatisticInterval", Scalar),
	("lora.packetForwarder.mqttBridge.protocol", "mqttProtocol", Scalar),
	("lora.packetForwarder.mqttBridge.brokerAddress", "mqttBrokerAddress", Scalar),
	("lora.packetForwarder.mqttBridge.brokerPort", "mqttBrokerPort", Scalar),
	("lora.packetForwarder.mqttBridge.version", "mqttVersion", Scalar),
	("lora.packetForwarder.mqttBridge.sslMode", "mqttSslMode", Scalar),
	("lora.packetForwarder.mqttBridge.tlsVersion", "mqttTlsVersion", Scalar),
	("lora.packetForwarder.mqttBridge.username", "mqttUsername", Scalar),
	("lora.packetForwarder.mqttBridge.password", "mqttPassword", Scalar),
	("lora.packetForwarder.mqttBridge.caCertificate", "mqttCaCertificate", FileDescriptor),
	("lora.packetForwarder.mqttBridge.clientCertificate", "mqttClientCertificate", FileDescriptor),
	("lora.packetForwarder.mqttBridge.clientKey", "mqttClientKey", FileDescriptor),

	// System
	("system.wisdmEnabled", "wisdmEnabled", Scalar),
	("system.wisdmConnect", "wisdmConnect", Scalar),
	("system.wisdmOrgName", "wisdmOrgName", Scalar),
	("system.wisdmUrl", "wisdmUrl", Scalar),
	("system.logExpiration", "logExpiration", Scalar),
	("system.shareLog", "shareLog", Scalar),
	("system.logRetrievalCycle", "logRetrievalCycle", Scalar),
	("system.fileRotationCycle", "fileRotationCycle", Scalar),
	("system.systemTime", "systemTime", Scalar),
	("system.ntpEnabled", "ntpEnabled", Scalar),
	("system.ntpServers", "ntpServers", Scalar),
	("system.gatewayName", "gatewayName", Scalar),
	("system.sshDisable", "sshDisable", Scalar),
	("system.sshDescription", "sshDescription", Scalar),

	// Extensions
	("extensions.rakBreathingLight", "rakBreathingLight", Scalar),
	("extensions.rakCountrySettings", "rakCountrySettings", Scalar),
	("extensions.rakCustomLogo", "rakCustomLogo", Scalar),
	("extensions.failoverReboot", "failoverReboot", Scalar),
	("extensions.fieldTestDataProcessor", "fieldTestDataProcessor", Scalar),
	("extensions.rakOpenClosePort", "rakOpenClosePort", Scalar),
	("extensions.rakOpenvpnClient", "rakOpenvpnClient", Scalar),
	("extensions.operationAndMaintenance", "operationAndMaintenance", Scalar),
	("extensions.rakSolarBattery", "rakSolarBattery", Scalar),
	("extensions.rfSpectrumScanner", "rfSpectrumScanner", Scalar),
	("extensions.wifiReboot", "wifiReboot", Scalar),
	("extensions.rakWireguard", "rakWireguard", Scalar),
	("extensions.loraPacketLogger", "loraPacketLogger", Scalar),
	("extensions.configDescription", "configDescription", Scalar),
	("extensions.extensionFiles", "extensionFiles", FileList),

	// Other
	("other.requirements", "requirements", Scalar),
	("other.configFiles", "configFiles", FileList),
	("other.configFileNames", "configFileNames", Scalar),
	("other.configFileSizes", "configFileSizes", Scalar),
];
