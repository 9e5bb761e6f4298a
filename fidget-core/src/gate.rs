//! Interval Gate und Verbindungs-Drossel
//!
//! Entscheidet anhand der verstrichenen Zeit, ob ein neuer Abfrage-Zyklus
//! (bzw. ein neuer Verbindungsversuch) starten darf.

/// `true` genau dann wenn seit `last_run_ms` mehr als `interval_ms` vergangen sind
///
/// `last_run_ms` darf negativ sein (Startup-Bias, siehe [`IntervalGate::with_first_poll_after`]).
pub fn should_poll(now_ms: u64, last_run_ms: i64, interval_ms: u64) -> bool {
    let elapsed = i128::from(now_ms) - i128::from(last_run_ms);
    elapsed > i128::from(interval_ms)
}

/// Tor für den Abfrage-Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalGate {
    last_run_ms: i64,
    interval_ms: u64,
}

impl IntervalGate {
    /// Tor, das zum ersten Mal `first_poll_after_ms` nach `now_ms` öffnet
    ///
    /// Der letzte Lauf wird dafür in die Vergangenheit gelegt:
    /// `last_run = now + first_poll_after - interval`.
    pub fn with_first_poll_after(now_ms: u64, interval_ms: u64, first_poll_after_ms: u64) -> Self {
        let last_run_ms = to_i64(now_ms)
            .saturating_add(to_i64(first_poll_after_ms))
            .saturating_sub(to_i64(interval_ms));
        Self {
            last_run_ms,
            interval_ms,
        }
    }

    pub fn should_poll(&self, now_ms: u64) -> bool {
        should_poll(now_ms, self.last_run_ms, self.interval_ms)
    }

    /// Nach jedem Zyklus aufrufen, egal ob ein Descriptor gefunden wurde
    pub fn reset(&mut self, now_ms: u64) {
        self.last_run_ms = to_i64(now_ms);
    }

    pub fn last_run_ms(&self) -> i64 {
        self.last_run_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

/// Zustand der WLAN-Verbindung aus Sicht der Schleife
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionState {
    pub is_connected: bool,
    pub last_attempt_ms: u64,
}

impl ConnectionState {
    pub fn new(boot_ms: u64) -> Self {
        Self {
            is_connected: false,
            last_attempt_ms: boot_ms,
        }
    }

    /// Ein neuer Verbindungsversuch ist erst nach `delay_ms` erlaubt
    pub fn may_attempt(&self, now_ms: u64, delay_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_attempt_ms) > delay_ms
    }

    pub fn record_failure(&mut self, now_ms: u64) {
        self.is_connected = false;
        self.last_attempt_ms = now_ms;
    }
}

fn to_i64(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_poll_is_strictly_greater() {
        assert!(!should_poll(300_000, 0, 300_000));
        assert!(should_poll(300_001, 0, 300_000));
    }

    #[test]
    fn test_should_poll_with_negative_last_run() {
        // Startup-Bias: 5 s nach Boot
        assert!(!should_poll(5_000, 5_000 - 300_000, 300_000));
        assert!(should_poll(5_001, 5_000 - 300_000, 300_000));
    }

    #[test]
    fn test_gate_opens_shortly_after_boot() {
        let gate = IntervalGate::with_first_poll_after(0, 300_000, 5_000);
        assert_eq!(gate.last_run_ms(), -295_000);
        assert!(!gate.should_poll(0));
        assert!(!gate.should_poll(4_999));
        assert!(gate.should_poll(5_001));
    }

    #[test]
    fn test_gate_reset_closes_for_full_interval() {
        let mut gate = IntervalGate::with_first_poll_after(0, 300_000, 5_000);
        gate.reset(6_000);
        assert!(!gate.should_poll(6_100));
        assert!(!gate.should_poll(306_000));
        assert!(gate.should_poll(306_001));
    }

    #[test]
    fn test_connection_attempts_are_spaced() {
        let mut state = ConnectionState::new(0);
        assert!(!state.may_attempt(500, 500));
        assert!(state.may_attempt(501, 500));

        state.record_failure(501);
        assert!(!state.may_attempt(900, 500));
        assert!(state.may_attempt(1_002, 500));
    }
}
