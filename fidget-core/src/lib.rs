//! Fidget Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits für WLAN, HTTPS, Uhr, Servo und LED sowie
//! den kompletten Regelkreis: Interval Gate, Bounded Reader, Descriptor
//! Extractor, Tier Classifier und Motion Sequencer, dazu das HTTP/1.0
//! Framing für den HTTPS-Client der Firmware.

#![no_std]

pub mod classify;
pub mod config;
pub mod controller;
pub mod easing;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod gate;
pub mod http;
pub mod motion;
pub mod reader;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use classify::{SERVO_MIDPOINT, TIER_TABLE, classify, profile, tier_for};
pub use config::{ApiEndpoint, FidgetConfig, RESPONSE_BUFFER_SIZE};
pub use controller::{CycleReport, FidgetIo, PriceFidget, StepEvent, StepReport};
pub use easing::{CurveKind, EasingSpec};
pub use error::{ConnectivityError, FetchError, ParseError, ProtocolError, TransportError};
pub use extract::{extract_descriptor, scan_descriptor};
pub use fetch::{Fetched, fetch_descriptor};
pub use gate::{ConnectionState, IntervalGate, should_poll};
pub use http::{HeaderEnd, parse_status_line, write_request};
pub use motion::{IntroMotion, MotionPhase, MotionSequencer, MotionState, plan_motion};
pub use reader::{ReadLimits, ReadOutcome, ReadStop, read_bounded};
pub use traits::{
    ByteStream, Clock, Connectivity, Delay, HttpFetcher, HttpRequest, HttpResponse, LedError,
    ServoError, ServoWriter, SmartLedWriter,
};
pub use types::{Classification, DangerTier, Descriptor, PriceRecord, TierProfile};
