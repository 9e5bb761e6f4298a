//! Fehler-Taxonomie für einen Abfrage-Zyklus
//!
//! Jeder dieser Fehler wird am Ort des Auftretens abgefangen und in
//! "kein Descriptor in diesem Zyklus" umgewandelt. Keiner beendet die Schleife.

use core::fmt;

/// Netzwerk nicht verfügbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityError {
    NotConnected,
}

/// Verbindungsfehler während eines Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    DnsFailed,
    ConnectionFailed,
    HandshakeFailed,
    WriteFailed,
    ReadFailed,
    TimedOut,
}

/// HTTP-Ebene: Status oder Header unbrauchbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Status-Code ungleich 200
    Status(u16),
    MalformedStatusLine,
    HeaderSkipFailed,
    RequestTooLarge,
}

/// Antwort-Body enthält keinen verwertbaren Descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    Empty,
    NotAnArray,
    Malformed,
    GeneralChannelMissing,
    DescriptorMissing,
    DescriptorTooLong,
}

/// Alle Fehler die einen Abfrage-Zyklus ohne Descriptor beenden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    Connectivity(ConnectivityError),
    Transport(TransportError),
    Protocol(ProtocolError),
    Parse(ParseError),
}

impl From<ConnectivityError> for FetchError {
    fn from(e: ConnectivityError) -> Self {
        FetchError::Connectivity(e)
    }
}

impl From<TransportError> for FetchError {
    fn from(e: TransportError) -> Self {
        FetchError::Transport(e)
    }
}

impl From<ProtocolError> for FetchError {
    fn from(e: ProtocolError) -> Self {
        FetchError::Protocol(e)
    }
}

impl From<ParseError> for FetchError {
    fn from(e: ParseError) -> Self {
        FetchError::Parse(e)
    }
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityError::NotConnected => write!(f, "network not connected"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::DnsFailed => write!(f, "DNS resolution failed"),
            TransportError::ConnectionFailed => write!(f, "unable to connect to the API"),
            TransportError::HandshakeFailed => write!(f, "TLS handshake failed"),
            TransportError::WriteFailed => write!(f, "failed to send request"),
            TransportError::ReadFailed => write!(f, "failed to read response"),
            TransportError::TimedOut => write!(f, "connection timed out"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Status(code) => write!(f, "received status code {}", code),
            ProtocolError::MalformedStatusLine => write!(f, "invalid response received"),
            ProtocolError::HeaderSkipFailed => write!(f, "unable to skip response headers"),
            ProtocolError::RequestTooLarge => write!(f, "request does not fit the buffer"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "response body is empty"),
            ParseError::NotAnArray => write!(f, "returned JSON is not an array"),
            ParseError::Malformed => write!(f, "returned JSON is malformed or truncated"),
            ParseError::GeneralChannelMissing => write!(f, "general channel not found"),
            ParseError::DescriptorMissing => write!(f, "general channel has no descriptor"),
            ParseError::DescriptorTooLong => write!(f, "descriptor exceeds capacity"),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Connectivity(e) => write!(f, "connectivity: {}", e),
            FetchError::Transport(e) => write!(f, "transport: {}", e),
            FetchError::Protocol(e) => write!(f, "protocol: {}", e),
            FetchError::Parse(e) => write!(f, "parse: {}", e),
        }
    }
}
