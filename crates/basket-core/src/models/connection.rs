//! Connection state tracked by the connectivity monitor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monitor status. Transitions are owned by the connectivity monitor in
/// `basket-sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Connecting,
    Reconnecting,
    Error,
}

/// Derived, non-authoritative label summarizing recent connection stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Offline,
}

/// Unified connectivity signal: browser network reachability plus backend
/// reachability from health probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub last_connected_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub retry_attempt: u32,
    pub network_reachable: bool,
    pub backend_reachable: bool,
}

impl ConnectionState {
    /// Initial state derived from the host's current network flag.
    pub fn initial(network_reachable: bool) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            last_connected_at: None,
            last_error: None,
            retry_attempt: 0,
            network_reachable,
            backend_reachable: false,
        }
    }

    /// Fully connected: status, network, and backend all agree.
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
            && self.network_reachable
            && self.backend_reachable
    }

    /// Offline for the purposes of mutation routing.
    pub fn is_offline(&self) -> bool {
        !self.network_reachable || self.status == ConnectionStatus::Disconnected
    }

    /// Quality estimation per recent stability.
    pub fn quality(&self) -> ConnectionQuality {
        if !self.network_reachable || !self.backend_reachable {
            return ConnectionQuality::Offline;
        }
        match self.status {
            ConnectionStatus::Connected if self.retry_attempt == 0 => ConnectionQuality::Excellent,
            ConnectionStatus::Connected if self.retry_attempt < 3 => ConnectionQuality::Good,
            ConnectionStatus::Reconnecting if self.retry_attempt < 5 => ConnectionQuality::Fair,
            _ => ConnectionQuality::Poor,
        }
    }
}
