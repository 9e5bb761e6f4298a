//! Hardware- und Netzwerk-Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen zu den externen Kollaborateuren
//! (WLAN, HTTPS, Uhr, Servo, LED) ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** fidget-firmware (esp-hal, embassy-net, embedded-tls)
//! - **Testing:** Mocks in fidget-tests (simulierte Zeit, skriptbare Streams)

#![allow(async_fn_in_trait)]

use rgb::RGB8;

use crate::error::{ConnectivityError, FetchError};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Fehler-Typ für Servo-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoError {
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff (Status-Anzeige)
///
/// Abstrahiert den Zugriff auf die einzelne RGB LED (WS2812/Neopixel).
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED und zeigt sie sofort an
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;

    /// Schaltet die LED aus
    fn clear(&mut self) -> Result<(), LedError> {
        self.write(RGB8::default())
    }
}

/// Eine fehlende LED (Init beim Boot fehlgeschlagen) verwirft alle Farben,
/// Servo und Polling laufen weiter.
impl<L: SmartLedWriter> SmartLedWriter for Option<L> {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        match self {
            Some(led) => led.write(color),
            None => Ok(()),
        }
    }
}

/// Trait für den Servo (Zeiger des Fidgets)
pub trait ServoWriter {
    /// Setzt den Servo auf `angle` Grad. Wird in jedem Tick aufgerufen.
    fn set_position(&mut self, angle: f32) -> Result<(), ServoError>;
}

/// Ein fehlender Servo (Init beim Boot fehlgeschlagen) schluckt alle Positionen,
/// damit Polling und LED weiterlaufen.
impl<S: ServoWriter> ServoWriter for Option<S> {
    fn set_position(&mut self, angle: f32) -> Result<(), ServoError> {
        match self {
            Some(servo) => servo.set_position(angle),
            None => Ok(()),
        }
    }
}

/// Monotone Uhr in Millisekunden seit Boot
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wartet eine Zeitspanne und gibt die CPU ab
pub trait Delay {
    async fn sleep_ms(&mut self, ms: u64);
}

/// Lesbarer Byte-Stream einer offenen Verbindung
pub trait ByteStream {
    /// Liest aktuell verfügbare Bytes nach `buf`
    ///
    /// Gibt die Anzahl gelesener Bytes zurück, `0` wenn gerade nichts
    /// ansteht. Darf kurz auf Daten warten, muss aber nach begrenzter
    /// Zeit zurückkehren.
    async fn try_read(&mut self, buf: &mut [u8]) -> usize;

    /// `true` solange die Gegenstelle noch Daten liefern kann
    fn is_open(&self) -> bool;

    /// Schließt die Verbindung und gibt Ressourcen frei
    async fn close(&mut self);
}

/// HTTP-Request an die Preis-API
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
}

/// Antwort eines gestarteten Requests
///
/// Der Status ist nach `HttpFetcher::request` bereits bekannt,
/// der Body wird über `ByteStream` gelesen.
pub trait HttpResponse: ByteStream {
    fn status_code(&self) -> u16;

    /// Überspringt die Response-Header bis zum Body
    async fn skip_response_headers(&mut self) -> Result<(), FetchError>;
}

/// HTTP(S)-Client für einen einzelnen GET-Request
pub trait HttpFetcher {
    type Response<'s>: HttpResponse
    where
        Self: 's;

    /// Verbindet, sendet den Request und liest die Status-Zeile
    async fn request<'s>(
        &'s mut self,
        request: &HttpRequest<'_>,
    ) -> Result<Self::Response<'s>, FetchError>;
}

/// WLAN-Verbindung
pub trait Connectivity {
    fn is_connected(&self) -> bool;

    /// Versucht eine Verbindung aufzubauen (keine eigene Retry-Logik)
    async fn connect(&mut self, ssid: &str, passkey: &str) -> Result<(), ConnectivityError>;

    /// `true` sobald die Uhrzeit per Netzwerk synchronisiert ist
    fn time_synced(&self) -> bool;
}
