//! Connectivity monitor — the unified connection-quality signal.
//!
//! Poll-driven: the monitor owns probe scheduling (`probe_due`,
//! `next_probe_at`) but never performs I/O itself. The sync engine asks
//! whether a probe is due, runs the gateway's health call, and feeds the
//! outcome back through `record_success` / `record_failure`.

use chrono::{DateTime, Duration, Utc};

use basket_core::config::HealthConfig;
use basket_core::errors::SyncError;
use basket_core::models::{ConnectionQuality, ConnectionState, ConnectionStatus};
use basket_core::signal::Signal;
use basket_core::traits::{Notice, NoticeLevel, Notifier};

pub struct ConnectionMonitor {
    config: HealthConfig,
    state: Signal<ConnectionState>,
    next_probe_at: Option<DateTime<Utc>>,
    ever_connected: bool,
}

impl ConnectionMonitor {
    /// Initial status derives from the host's network flag; the first probe
    /// is due immediately.
    pub fn new(config: HealthConfig, network_reachable: bool) -> Self {
        Self {
            config,
            state: Signal::new(ConnectionState::initial(network_reachable)),
            next_probe_at: None,
            ever_connected: false,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        self.state.get()
    }

    /// Replay-latest stream of the connection state.
    pub fn signal(&mut self) -> &mut Signal<ConnectionState> {
        &mut self.state
    }

    pub fn quality(&self) -> ConnectionQuality {
        self.state.get().quality()
    }

    /// Browser network reachability flipped. Unreachable forces
    /// `Disconnected` regardless of prior state; reachable makes a probe due
    /// immediately.
    pub fn set_network_reachable(&mut self, reachable: bool, notifier: &mut dyn Notifier) {
        if reachable {
            self.update(|s| s.network_reachable = true);
            self.next_probe_at = None;
            tracing::info!("monitor: network reachable, probing backend");
        } else {
            self.update(|s| {
                s.network_reachable = false;
                s.backend_reachable = false;
                s.status = ConnectionStatus::Disconnected;
            });
            tracing::info!("monitor: network unreachable");
            notifier.notify(Notice::new(
                NoticeLevel::Warning,
                "Offline Mode",
                "You are now offline. Changes will be saved and synced when you reconnect.",
            ));
        }
    }

    /// Whether a health probe should run now. Probes only run while the
    /// network is reachable.
    pub fn probe_due(&self, now: DateTime<Utc>) -> bool {
        self.state.get().network_reachable && self.next_probe_at.map_or(true, |at| now >= at)
    }

    /// Mark a probe as in flight. Anything not already connected shows as
    /// `Connecting`.
    pub fn begin_probe(&mut self) {
        if self.state.get().status != ConnectionStatus::Connected {
            self.update(|s| s.status = ConnectionStatus::Connecting);
        }
    }

    /// A health probe succeeded.
    pub fn record_success(&mut self, now: DateTime<Utc>, notifier: &mut dyn Notifier) {
        let previous = self.state.get().status;
        if previous != ConnectionStatus::Connected {
            self.update(|s| {
                s.status = ConnectionStatus::Connected;
                s.last_connected_at = Some(now);
                s.last_error = None;
                s.retry_attempt = 0;
                s.backend_reachable = true;
            });
            tracing::info!("monitor: connected");

            // Restored, not established: the very first successful probe of
            // the session stays quiet.
            let was_down = matches!(
                previous,
                ConnectionStatus::Disconnected | ConnectionStatus::Reconnecting
            );
            if was_down && self.ever_connected {
                notifier.notify(Notice::new(
                    NoticeLevel::Success,
                    "Back Online",
                    "Connection restored. Syncing your changes...",
                ));
            }
        } else {
            self.update(|s| {
                s.last_connected_at = Some(now);
                s.backend_reachable = true;
            });
        }
        self.ever_connected = true;
        self.next_probe_at = Some(now + Duration::seconds(self.config.interval_secs as i64));
    }

    /// A health probe failed.
    pub fn record_failure(
        &mut self,
        now: DateTime<Utc>,
        reason: impl Into<String>,
        notifier: &mut dyn Notifier,
    ) {
        let reason = reason.into();
        let was_connected = self.state.get().status == ConnectionStatus::Connected;
        self.update(|s| {
            s.status = ConnectionStatus::Error;
            s.last_error = Some(reason.clone());
            s.backend_reachable = false;
            s.retry_attempt += 1;
        });
        tracing::warn!(
            attempt = self.state.get().retry_attempt,
            "monitor: health probe failed: {reason}"
        );

        if was_connected {
            notifier.notify(Notice::new(
                NoticeLevel::Error,
                "Connection Lost",
                "Connection lost. Attempting to reconnect...",
            ));
        }

        if !self.state.get().network_reachable {
            return;
        }

        let attempt = self.state.get().retry_attempt;
        if attempt >= self.config.max_reconnect_attempts {
            let exhausted = SyncError::ReconnectExhausted { attempts: attempt };
            self.update(|s| {
                s.status = ConnectionStatus::Disconnected;
                s.last_error = Some(exhausted.to_string());
            });
            notifier.notify(Notice::new(
                NoticeLevel::Error,
                "Connection Failed",
                "Connection failed. Please check your internet connection.",
            ));
            // Settle back to the regular probe cadence.
            self.next_probe_at = Some(now + Duration::seconds(self.config.interval_secs as i64));
        } else {
            self.update(|s| s.status = ConnectionStatus::Reconnecting);
            let delay_ms = (1000u64 << attempt.min(31)).min(self.config.max_backoff_ms);
            self.next_probe_at = Some(now + Duration::milliseconds(delay_ms as i64));
            tracing::debug!(attempt, delay_ms, "monitor: reconnecting with backoff");
        }
    }

    /// Reset the retry counter and error and make a probe due immediately.
    pub fn force_reconnect(&mut self) {
        self.update(|s| {
            s.retry_attempt = 0;
            s.last_error = None;
        });
        self.next_probe_at = None;
        tracing::info!("monitor: forced reconnect");
    }

    /// Next scheduled probe time, if one is pending rather than due now.
    pub fn next_probe_at(&self) -> Option<DateTime<Utc>> {
        self.next_probe_at
    }

    fn update(&mut self, mutate: impl FnOnce(&mut ConnectionState)) {
        let mut state = self.state.get().clone();
        mutate(&mut state);
        self.state.set(state);
    }
}

impl std::fmt::Debug for ConnectionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionMonitor")
            .field("state", self.state.get())
            .field("next_probe_at", &self.next_probe_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_fixtures::CollectingNotifier;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn monitor() -> ConnectionMonitor {
        ConnectionMonitor::new(HealthConfig::default(), true)
    }

    #[test]
    fn first_probe_is_due_immediately() {
        let monitor = monitor();
        assert!(monitor.probe_due(at(0)));
    }

    #[test]
    fn success_schedules_next_probe_one_interval_out() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        assert!(!monitor.probe_due(at(29)));
        assert!(monitor.probe_due(at(30)));
    }

    #[test]
    fn first_success_of_the_session_stays_quiet() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        assert!(monitor.state().is_connected());
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn restored_connection_notifies() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        monitor.record_failure(at(30), "probe timed out", &mut notifier);
        monitor.record_failure(at(32), "probe timed out", &mut notifier);
        monitor.record_success(at(36), &mut notifier);
        assert_eq!(notifier.titles(), vec!["Connection Lost", "Back Online"]);
        let restored = &notifier.notices()[1];
        assert_eq!(restored.message, "Connection restored. Syncing your changes...");
    }

    #[test]
    fn failure_while_connected_notifies_once() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        monitor.record_failure(at(30), "down", &mut notifier);
        monitor.record_failure(at(32), "down", &mut notifier);
        assert_eq!(notifier.titles(), vec!["Connection Lost"]);
        assert_eq!(monitor.state().status, ConnectionStatus::Reconnecting);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = HealthConfig {
            max_reconnect_attempts: 100,
            ..HealthConfig::default()
        };
        let mut monitor = ConnectionMonitor::new(config, true);
        let mut notifier = CollectingNotifier::new();

        let expected_ms = [2_000, 4_000, 8_000, 16_000, 30_000, 30_000];
        for &delay in &expected_ms {
            monitor.record_failure(at(0), "down", &mut notifier);
            let next = monitor.next_probe_at().expect("probe scheduled");
            assert_eq!((next - at(0)).num_milliseconds(), delay);
        }
    }

    #[test]
    fn exhausted_retries_settle_into_disconnected() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        for _ in 0..5 {
            monitor.record_failure(at(0), "down", &mut notifier);
        }
        assert_eq!(monitor.state().status, ConnectionStatus::Disconnected);
        assert!(notifier.titles().contains(&"Connection Failed".to_string()));
        // Back to the ordinary probe cadence rather than backoff.
        let next = monitor.next_probe_at().expect("probe scheduled");
        assert_eq!((next - at(0)).num_seconds(), 30);
    }

    #[test]
    fn unreachable_network_forces_disconnected() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        monitor.set_network_reachable(false, &mut notifier);
        assert_eq!(monitor.state().status, ConnectionStatus::Disconnected);
        assert_eq!(monitor.quality(), ConnectionQuality::Offline);
        assert!(notifier.titles().contains(&"Offline Mode".to_string()));
        // No probes while the network is down, however much time passes.
        assert!(!monitor.probe_due(at(3_600)));
    }

    #[test]
    fn reachable_again_makes_probe_due_immediately() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_success(at(0), &mut notifier);
        monitor.set_network_reachable(false, &mut notifier);
        monitor.set_network_reachable(true, &mut notifier);
        assert!(monitor.probe_due(at(1)));
    }

    #[test]
    fn begin_probe_shows_connecting_unless_connected() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.begin_probe();
        assert_eq!(monitor.state().status, ConnectionStatus::Connecting);

        monitor.record_success(at(0), &mut notifier);
        monitor.begin_probe();
        assert_eq!(monitor.state().status, ConnectionStatus::Connected);
    }

    #[test]
    fn force_reconnect_resets_backoff() {
        let mut monitor = monitor();
        let mut notifier = CollectingNotifier::new();
        monitor.record_failure(at(0), "down", &mut notifier);
        monitor.record_failure(at(2), "down", &mut notifier);
        assert!(!monitor.probe_due(at(3)));

        monitor.force_reconnect();
        assert_eq!(monitor.state().retry_attempt, 0);
        assert!(monitor.probe_due(at(3)));
    }
}
