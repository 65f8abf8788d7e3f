// ABOUTME: Summary of captured packet metadata: global counters, per-protocol counts, per-host traffic.
// ABOUTME: Counters are updated by the capture side and only read by the gateway.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub sent: u64,
    pub received: u64,
    pub pkt_received: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Traffic {
    pub sent: u64,
    pub received: u64,
}

/// Aggregated view of the packet capture queue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PacketQueue {
    pub stats: Stats,
    pub protos: BTreeMap<String, u64>,
    pub traffic: BTreeMap<String, Traffic>,
}

impl PacketQueue {
    /// Account for one captured packet of `size` bytes between two addresses.
    pub fn track(&mut self, proto: &str, src: &str, dst: &str, size: u64) {
        self.stats.pkt_received += 1;
        self.stats.received += size;
        *self.protos.entry(proto.to_string()).or_default() += 1;
        self.traffic.entry(src.to_string()).or_default().sent += size;
        self.traffic.entry(dst.to_string()).or_default().received += size;
    }
}
