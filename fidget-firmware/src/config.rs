// Projekt-Konfiguration: Konstanten, Hardware-Zuordnungen und Zugangsdaten

use fidget_core::{ApiEndpoint, FidgetConfig};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel), fest verdrahtet in `main`
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
/// Die Farben der Stufen-Tabelle werden damit skaliert
pub const LED_BRIGHTNESS: u8 = 40;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 1;

// ============================================================================
// Servo Konfiguration
// ============================================================================

/// GPIO-Pin für das Servo-Signal, fest verdrahtet in `main`
pub const SERVO_GPIO_PIN: u8 = 1;

/// PWM-Frequenz für Standard-Servos (20 ms Periode)
pub const SERVO_PWM_HZ: u32 = 50;

/// Pulsbreite bei 0°
pub const SERVO_MIN_PULSE_US: u32 = 500;

/// Pulsbreite bei 180°
pub const SERVO_MAX_PULSE_US: u32 = 2500;

/// Maximaler Servo-Winkel in Grad
pub const SERVO_MAX_ANGLE: f32 = 180.0;

// ============================================================================
// Regelkreis
// ============================================================================

/// Pause zwischen zwei Durchläufen der Hauptschleife (~60 Hz Servo-Updates)
pub const LOOP_TICK_MS: u64 = 16;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wie lange `connect` auf eine IP-Konfiguration wartet
/// Kurz halten: die Animation steht während des Wartens
pub const WIFI_CONNECT_WAIT_MS: u64 = 250;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Amber API
// ============================================================================

/// API-Key (psk_...)
/// Wird zur Build-Zeit aus der Environment Variable AMBER_API_KEY geladen
pub const AMBER_API_KEY: &str = env!(
    "AMBER_API_KEY",
    "Amber API Key nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Site-ID des Stromanschlusses
/// Wird zur Build-Zeit aus der Environment Variable AMBER_SITE_ID geladen
pub const AMBER_SITE_ID: &str = env!(
    "AMBER_SITE_ID",
    "Amber Site ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Lokaler Test-Server (nur mit Feature `debug-server`)
/// Wird zur Build-Zeit aus der Environment Variable DEBUG_HOST geladen
#[cfg(feature = "debug-server")]
pub const DEBUG_HOST: &str = env!(
    "DEBUG_HOST",
    "Feature debug-server braucht DEBUG_HOST! Erstelle .env file (siehe .env.example)"
);

/// Port des lokalen Test-Servers
#[cfg(feature = "debug-server")]
pub const DEBUG_PORT: u16 = 8000;

// ============================================================================
// Netzwerk-Puffer und Timeouts
// ============================================================================

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Timeout für den TCP-Verbindungsaufbau in Sekunden
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// TCP RX/TX Buffer-Größen in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 4096;
pub const TCP_TX_BUFFER_SIZE: usize = 4096;

/// TLS Record-Buffer zum Lesen
/// 16 KB Record + Header, der Server verhandelt keine kleineren Fragmente
pub const TLS_READ_BUFFER_SIZE: usize = 16640;

/// TLS Record-Buffer zum Schreiben (nur der Request)
pub const TLS_WRITE_BUFFER_SIZE: usize = 4096;

/// Puffer für den serialisierten HTTP-Request
pub const REQUEST_BUFFER_SIZE: usize = 512;

// ============================================================================
// Regelkreis-Konfiguration
// ============================================================================

/// API-Endpunkt: HTTPS an Amber, mit `debug-server` Plain-HTTP an DEBUG_HOST
pub fn api_endpoint() -> ApiEndpoint {
    let api = ApiEndpoint {
        site_id: AMBER_SITE_ID,
        api_key: AMBER_API_KEY,
        ..ApiEndpoint::default()
    };

    #[cfg(feature = "debug-server")]
    let api = ApiEndpoint {
        host: DEBUG_HOST,
        port: DEBUG_PORT,
        ..api
    };

    api
}

/// Gesamte Laufzeit-Konfiguration des Regelkreises
pub fn fidget_config() -> FidgetConfig {
    FidgetConfig {
        wifi_ssid: WIFI_SSID,
        wifi_passkey: WIFI_PASSWORD,
        api: api_endpoint(),
        ..FidgetConfig::default()
    }
}
