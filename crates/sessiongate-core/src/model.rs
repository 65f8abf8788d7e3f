// ABOUTME: Plain session substructures: network endpoints, environment variables, options, and modules.
// ABOUTME: These are the leaf records the gateway serializes when projecting session state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A network endpoint: the local interface, the default gateway, or a LAN host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub ipv4: String,
    pub ipv6: String,
    pub mac: String,
    pub hostname: String,
    pub alias: String,
    pub vendor: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub meta: BTreeMap<String, String>,
}

impl Endpoint {
    /// Create an endpoint seen for the first time now. The MAC is stored lower-cased.
    pub fn new(ipv4: impl Into<String>, mac: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            ipv4: ipv4.into(),
            ipv6: String::new(),
            mac: mac.into().to_lowercase(),
            hostname: String::new(),
            alias: String::new(),
            vendor: String::new(),
            first_seen: now,
            last_seen: now,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Session variables, set and read through the `set`/`get` commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Environment {
    pub data: BTreeMap<String, String>,
}

impl Environment {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }

    /// Set a variable, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.data.insert(name.into(), value.into())
    }
}

/// Startup options the session was launched with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    pub interface: String,
    pub gateway: String,
    pub caplet: String,
    pub script: String,
    pub commands: String,
    pub env_file: String,
    pub debug: bool,
    pub silent: bool,
    pub no_colors: bool,
    pub no_history: bool,
}

/// A session module that can be started and stopped by command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: String,
    pub description: String,
    pub running: bool,
}

impl Module {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            running: false,
        }
    }
}
