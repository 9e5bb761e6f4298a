//! Laufzeit-Konfiguration des Preis-Fidgets
//!
//! Die Firmware befüllt Zugangsdaten aus Build-Zeit-Variablen,
//! Tests setzen eigene Werte. Alles andere hat Geräte-Defaults.

use crate::classify::SERVO_MIDPOINT;
use crate::motion::{ANIMATION_SPEED_MS_PER_DEGREE, IntroMotion};
use crate::reader::ReadLimits;

/// Standard-Größe des Response-Buffers (inkl. Terminator)
pub const RESPONSE_BUFFER_SIZE: usize = 1024;

/// Abfrage-Intervall: alle 5 Minuten
pub const POLL_INTERVAL_MS: u64 = 300_000;

/// Erste Abfrage nach dem Boot (Startanimation muss fertig sein)
pub const FIRST_POLL_AFTER_MS: u64 = 5_000;

/// Mindestabstand zwischen WLAN-Verbindungsversuchen
pub const CONNECT_DELAY_MS: u64 = 500;

/// Endpunkt der Preis-API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub host: &'static str,
    pub port: u16,
    pub site_id: &'static str,
    pub api_key: &'static str,
    pub user_agent: &'static str,
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self {
            host: "api.amber.com.au",
            port: 443,
            site_id: "",
            api_key: "",
            user_agent: "AmberFidget",
        }
    }
}

/// Gesamte Konfiguration des Regelkreises
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FidgetConfig {
    pub wifi_ssid: &'static str,
    pub wifi_passkey: &'static str,
    pub api: ApiEndpoint,
    pub poll_interval_ms: u64,
    pub first_poll_after_ms: u64,
    pub connect_delay_ms: u64,
    pub read_limits: ReadLimits,
    /// Millisekunden pro Grad Servo-Weg
    pub animation_speed: f32,
    pub midpoint: f32,
    pub intro: IntroMotion,
}

impl Default for FidgetConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: "",
            wifi_passkey: "",
            api: ApiEndpoint::default(),
            poll_interval_ms: POLL_INTERVAL_MS,
            first_poll_after_ms: FIRST_POLL_AFTER_MS,
            connect_delay_ms: CONNECT_DELAY_MS,
            read_limits: ReadLimits::default(),
            animation_speed: ANIMATION_SPEED_MS_PER_DEGREE,
            midpoint: SERVO_MIDPOINT,
            intro: IntroMotion::default(),
        }
    }
}
