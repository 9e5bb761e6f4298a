//! HTTP/1.0 Framing
//!
//! Reine Hilfsfunktionen für den HTTPS-Client der Firmware: Request
//! zusammenbauen, Status-Zeile lesen, Ende der Header erkennen.
//! HTTP/1.0 damit der Server weder Chunked Encoding noch Keep-Alive nutzt.

use core::fmt::Write;

use crate::error::ProtocolError;
use crate::traits::HttpRequest;

/// Maximale Länge der Status-Zeile inkl. `\r\n`
pub const STATUS_LINE_CAPACITY: usize = 128;

/// Maximale Größe des Header-Blocks, danach wird abgebrochen
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Schreibt einen `GET`-Request inkl. Leerzeile in einen String fester Größe
pub fn write_request<const N: usize>(
    request: &HttpRequest<'_>,
) -> Result<heapless::String<N>, ProtocolError> {
    let mut out = heapless::String::new();
    format_request(&mut out, request).map_err(|_| ProtocolError::RequestTooLarge)?;
    Ok(out)
}

fn format_request<W: Write>(out: &mut W, request: &HttpRequest<'_>) -> core::fmt::Result {
    write!(out, "GET {} HTTP/1.0\r\n", request.path)?;
    write!(out, "Host: {}\r\n", request.host)?;
    for (name, value) in request.headers {
        write!(out, "{}: {}\r\n", name, value)?;
    }
    write!(out, "Connection: close\r\n\r\n")
}

/// `HTTP/1.1 200 OK\r\n` → `200`
pub fn parse_status_line(line: &[u8]) -> Result<u16, ProtocolError> {
    let line = core::str::from_utf8(line).map_err(|_| ProtocolError::MalformedStatusLine)?;
    let mut parts = line.trim_end().splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(ProtocolError::MalformedStatusLine);
    }

    let code = parts.next().unwrap_or_default();
    if code.len() != 3 {
        return Err(ProtocolError::MalformedStatusLine);
    }
    match code.parse::<u16>() {
        Ok(status @ 100..=599) => Ok(status),
        _ => Err(ProtocolError::MalformedStatusLine),
    }
}

/// Erkennt die Leerzeile am Ende des Header-Blocks, Byte für Byte
///
/// Startet am Zeilenanfang (direkt nach der Status-Zeile). Akzeptiert
/// `\r\n` und nacktes `\n` als Zeilenende.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEnd {
    line_ends: u8,
    consumed: usize,
}

impl Default for HeaderEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderEnd {
    pub const fn new() -> Self {
        Self {
            line_ends: 1,
            consumed: 0,
        }
    }

    /// `Ok(true)` sobald die Leerzeile gelesen wurde
    pub fn feed(&mut self, byte: u8) -> Result<bool, ProtocolError> {
        self.consumed += 1;
        if self.consumed > MAX_HEADER_BYTES {
            return Err(ProtocolError::HeaderSkipFailed);
        }

        match byte {
            b'\r' => {}
            b'\n' => self.line_ends += 1,
            _ => self.line_ends = 0,
        }
        Ok(self.line_ends >= 2)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}
