// ABOUTME: The shared session: all runtime substructures behind one reader/writer lock, plus the event pool.
// ABOUTME: Readers take the shared side for a consistent multi-field snapshot; the interpreter takes the exclusive side.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::devices::{Ble, Hid, Lan, WiFi};
use crate::event::EventPool;
use crate::model::{Endpoint, Environment, Module, Options};
use crate::packets::PacketQueue;

/// Everything the session knows at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub options: Options,
    pub interface: Endpoint,
    pub gateway: Endpoint,
    pub env: Environment,
    pub lan: Lan,
    pub wifi: WiFi,
    pub ble: Ble,
    pub hid: Hid,
    pub packets: PacketQueue,
    pub started_at: DateTime<Utc>,
    pub modules: Vec<Module>,
}

impl SessionState {
    pub fn new(options: Options, interface: Endpoint, gateway: Endpoint) -> Self {
        Self {
            options,
            interface,
            gateway,
            env: Environment::default(),
            lan: Lan::default(),
            wifi: WiFi::default(),
            ble: Ble::default(),
            hid: Hid::default(),
            packets: PacketQueue::default(),
            started_at: Utc::now(),
            modules: Vec::new(),
        }
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.modules.iter_mut().find(|m| m.name == name)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Options::default(), Endpoint::default(), Endpoint::default())
    }
}

/// The shared, continuously mutating session.
pub struct Session {
    state: RwLock<SessionState>,
    events: EventPool,
}

impl Session {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: RwLock::new(state),
            events: EventPool::new(),
        }
    }

    /// Acquire the shared side of the session lock.
    pub async fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    /// Acquire the exclusive side of the session lock.
    pub async fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().await
    }

    pub fn events(&self) -> &EventPool {
        &self.events
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}
