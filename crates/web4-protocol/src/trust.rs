//! Per-peer trust state machine
//!
//! Every peer moves through unknown -> probing -> trusted, with a blocked
//! state reachable on repeated conflict. The map is mutated only through
//! the transition methods here; runtimes share one instance behind an
//! `Arc`. Entries are created lazily on first contact and persist for the
//! process lifetime.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A peer's current standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Never seen, or demoted back to the start
    Unknown,
    /// Handshake received, verification pending
    Probing,
    /// Knowledge verified; deferred updates may be released
    Trusted,
    /// Conflicted while not trusted; ignored until operator action
    Blocked,
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TrustLevel::Unknown => "unknown",
            TrustLevel::Probing => "probing",
            TrustLevel::Trusted => "trusted",
            TrustLevel::Blocked => "blocked",
        };
        write!(f, "{name}")
    }
}

/// Record of one trust transition (or explicit non-transition).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustLink {
    /// Peer the transition applies to
    pub peer_id: String,
    /// Level after the transition
    pub level: TrustLevel,
    /// Reason code, e.g. `"handshake"` or `"no_propagation"`
    pub reason: &'static str,
}

/// Trust state machine over all known peers.
#[derive(Debug, Default)]
pub struct TrustFsm {
    levels: Mutex<HashMap<String, TrustLevel>>,
}

impl TrustFsm {
    /// Create an FSM with no known peers
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level for a peer; never-seen peers read as unknown without
    /// creating an entry
    pub fn get(&self, peer_id: &str) -> TrustLevel {
        Self::level_of(&self.levels.lock(), peer_id)
    }

    fn level_of(levels: &HashMap<String, TrustLevel>, peer_id: &str) -> TrustLevel {
        levels.get(peer_id).copied().unwrap_or(TrustLevel::Unknown)
    }

    fn transition(
        levels: &mut HashMap<String, TrustLevel>,
        peer_id: &str,
        level: TrustLevel,
        reason: &'static str,
    ) -> TrustLink {
        levels.insert(peer_id.to_string(), level);
        debug!(peer_id, level = %level, reason, "trust transition");
        TrustLink {
            peer_id: peer_id.to_string(),
            level,
            reason,
        }
    }

    /// A valid handshake arrived: unknown peers start probing, every other
    /// level is unchanged
    pub fn on_handshake(&self, peer_id: &str) -> TrustLink {
        let mut levels = self.levels.lock();
        let level = match Self::level_of(&levels, peer_id) {
            TrustLevel::Unknown => TrustLevel::Probing,
            current => current,
        };
        Self::transition(&mut levels, peer_id, level, "handshake")
    }

    /// Knowledge was verified: the peer becomes trusted unconditionally
    pub fn on_verified(&self, peer_id: &str) -> TrustLink {
        let mut levels = self.levels.lock();
        Self::transition(&mut levels, peer_id, TrustLevel::Trusted, "verified")
    }

    /// A conflict was detected: trusted peers are demoted one step to
    /// probing, anyone else is blocked.
    ///
    /// Read and write happen under one guard, so two racing conflicts on a
    /// trusted peer serialize into probing then blocked.
    pub fn on_conflict(&self, peer_id: &str) -> TrustLink {
        let mut levels = self.levels.lock();
        let level = match Self::level_of(&levels, peer_id) {
            TrustLevel::Trusted => TrustLevel::Probing,
            _ => TrustLevel::Blocked,
        };
        Self::transition(&mut levels, peer_id, level, "conflict")
    }

    /// Trust propagation: a trusted source vouches for a target as if the
    /// target had completed a handshake; untrusted sources change nothing
    pub fn on_propagate(&self, source_peer: &str, target_peer: &str) -> TrustLink {
        let mut levels = self.levels.lock();
        if Self::level_of(&levels, source_peer) == TrustLevel::Trusted {
            let level = match Self::level_of(&levels, target_peer) {
                TrustLevel::Unknown => TrustLevel::Probing,
                current => current,
            };
            return Self::transition(&mut levels, target_peer, level, "handshake");
        }
        TrustLink {
            peer_id: target_peer.to_string(),
            level: Self::level_of(&levels, target_peer),
            reason: "no_propagation",
        }
    }
}
