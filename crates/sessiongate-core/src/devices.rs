// ABOUTME: MAC-keyed device collections: LAN hosts, WiFi access points and clients, BLE and HID devices.
// ABOUTME: Keys are lower-cased on insert and on lookup so identifiers match in any letter case.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::model::Endpoint;

/// Serialize a keyed map as a plain sequence of its values, in key order.
fn values_as_seq<S, V>(map: &BTreeMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}

fn key(mac: &str) -> String {
    mac.to_lowercase()
}

/// Hosts discovered on the local network.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lan {
    #[serde(serialize_with = "values_as_seq")]
    pub hosts: BTreeMap<String, Endpoint>,
}

impl Lan {
    pub fn add(&mut self, host: Endpoint) {
        self.hosts.insert(key(&host.mac), host);
    }

    pub fn get(&self, mac: &str) -> Option<&Endpoint> {
        self.hosts.get(&key(mac))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// A WiFi station record, used both for access points and for their clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub mac: String,
    pub hostname: String,
    pub vendor: String,
    pub channel: u16,
    pub frequency: u32,
    pub rssi: i8,
    pub encryption: String,
    pub sent: u64,
    pub received: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Station {
    pub fn new(mac: &str, hostname: impl Into<String>, channel: u16) -> Self {
        let now = Utc::now();
        Self {
            mac: key(mac),
            hostname: hostname.into(),
            vendor: String::new(),
            channel,
            frequency: channel_to_frequency(channel),
            rssi: 0,
            encryption: String::new(),
            sent: 0,
            received: 0,
            first_seen: now,
            last_seen: now,
        }
    }
}

fn channel_to_frequency(channel: u16) -> u32 {
    match channel {
        14 => 2484,
        1..=13 => 2407 + 5 * u32::from(channel),
        36..=177 => 5000 + 5 * u32::from(channel),
        _ => 0,
    }
}

/// An access point with the clients currently associated to it.
#[derive(Debug, Clone, Serialize)]
pub struct AccessPoint {
    #[serde(flatten)]
    pub station: Station,
    #[serde(serialize_with = "values_as_seq")]
    pub clients: BTreeMap<String, Station>,
}

impl AccessPoint {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            clients: BTreeMap::new(),
        }
    }

    pub fn add_client(&mut self, client: Station) {
        self.clients.insert(key(&client.mac), client);
    }
}

/// Wireless access points and, nested under each, their clients.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WiFi {
    #[serde(serialize_with = "values_as_seq")]
    pub aps: BTreeMap<String, AccessPoint>,
}

impl WiFi {
    pub fn add(&mut self, ap: AccessPoint) {
        self.aps.insert(key(&ap.station.mac), ap);
    }

    /// Look up an access point by its own MAC.
    pub fn get(&self, mac: &str) -> Option<&AccessPoint> {
        self.aps.get(&key(mac))
    }

    /// Look up a client station associated to any access point.
    pub fn get_client(&self, mac: &str) -> Option<&Station> {
        let mac = key(mac);
        self.aps.values().find_map(|ap| ap.clients.get(&mac))
    }
}

/// A Bluetooth Low Energy device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BleDevice {
    pub mac: String,
    pub name: String,
    pub vendor: String,
    pub rssi: i16,
    pub connectable: bool,
    pub last_seen: DateTime<Utc>,
}

impl BleDevice {
    pub fn new(mac: &str, name: impl Into<String>) -> Self {
        Self {
            mac: key(mac),
            name: name.into(),
            vendor: String::new(),
            rssi: 0,
            connectable: false,
            last_seen: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Ble {
    #[serde(serialize_with = "values_as_seq")]
    pub devices: BTreeMap<String, BleDevice>,
}

impl Ble {
    pub fn add(&mut self, dev: BleDevice) {
        self.devices.insert(key(&dev.mac), dev);
    }

    pub fn get(&self, mac: &str) -> Option<&BleDevice> {
        self.devices.get(&key(mac))
    }
}

/// A wireless HID device (keyboard, mouse) seen over the air.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HidDevice {
    pub address: String,
    pub device_type: String,
    pub channels: Vec<u16>,
    pub payloads_size: u64,
    pub last_seen: DateTime<Utc>,
}

impl HidDevice {
    pub fn new(address: &str, device_type: impl Into<String>) -> Self {
        Self {
            address: key(address),
            device_type: device_type.into(),
            channels: Vec::new(),
            payloads_size: 0,
            last_seen: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Hid {
    #[serde(serialize_with = "values_as_seq")]
    pub devices: BTreeMap<String, HidDevice>,
}

impl Hid {
    pub fn add(&mut self, dev: HidDevice) {
        self.devices.insert(key(&dev.address), dev);
    }

    pub fn get(&self, address: &str) -> Option<&HidDevice> {
        self.devices.get(&key(address))
    }
}
