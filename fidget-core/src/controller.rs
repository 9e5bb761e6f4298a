//! Regelkreis des Preis-Fidgets
//!
//! Ein einzelner kooperativer Zustandsautomat. Jeder Aufruf von
//! [`PriceFidget::step`] tickt zuerst die Servo-Animation und kümmert sich
//! danach um WLAN und (wenn das Interval Gate offen ist) um einen
//! Abfrage-Zyklus. Kein Fehler beendet die Schleife.

use crate::classify::{classify, profile};
use crate::config::{FidgetConfig, RESPONSE_BUFFER_SIZE};
use crate::error::{ConnectivityError, FetchError};
use crate::fetch::{Fetched, fetch_descriptor};
use crate::gate::{ConnectionState, IntervalGate};
use crate::motion::MotionSequencer;
use crate::reader::ReadOutcome;
use crate::traits::{
    Clock, Connectivity, Delay, HttpFetcher, LedError, ServoError, ServoWriter, SmartLedWriter,
};
use crate::types::{Classification, DangerTier, Descriptor};

/// Alle externen Kollaborateure des Regelkreises
pub struct FidgetIo<W, H, C, D, S, L> {
    pub wifi: W,
    pub http: H,
    pub clock: C,
    pub delay: D,
    pub servo: S,
    pub led: L,
}

/// Ergebnis eines erfolgreichen Abfrage-Zyklus
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub descriptor: Descriptor,
    pub classification: Classification,
    /// `false` wenn die Stufe schon das aktuelle Ziel war
    pub retargeted: bool,
    pub read: ReadOutcome,
    pub led_fault: Option<LedError>,
}

/// Was in einem Schleifendurchlauf neben dem Tick passiert ist
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    /// Nichts zu tun (Gate geschlossen)
    Idle,
    /// WLAN weg, letzter Versuch ist zu frisch
    ConnectDeferred,
    ConnectFailed(ConnectivityError),
    AwaitingTimeSync,
    /// Descriptor gelesen, LED und Servo-Ziel aktualisiert
    Updated(CycleReport),
    /// Zyklus ohne Descriptor; Ausgabe bleibt unverändert
    NoDescriptor(FetchError),
}

/// Ergebnis von [`PriceFidget::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// An den Servo geschriebene Position
    pub position: f32,
    pub servo_fault: Option<ServoError>,
    pub event: StepEvent,
}

/// Der Regelkreis mit allem Zustand (keine globalen Variablen)
///
/// `B` ist die Größe des Response-Buffers inkl. Terminator.
pub struct PriceFidget<W, H, C, D, S, L, const B: usize = RESPONSE_BUFFER_SIZE> {
    io: FidgetIo<W, H, C, D, S, L>,
    config: FidgetConfig,
    gate: IntervalGate,
    connection: ConnectionState,
    motion: MotionSequencer,
    last_tick_ms: u64,
    current: Option<Classification>,
    buffer: [u8; B],
}

impl<W, H, C, D, S, L, const B: usize> PriceFidget<W, H, C, D, S, L, B>
where
    W: Connectivity,
    H: HttpFetcher,
    C: Clock,
    D: Delay,
    S: ServoWriter,
    L: SmartLedWriter,
{
    /// Erstellt den Regelkreis und startet die Startanimation
    ///
    /// Der Servo fährt vom Mittelpunkt auf `NoDanger`, die erste Abfrage
    /// erfolgt `config.first_poll_after_ms` nach diesem Aufruf. Die LED
    /// bleibt unberührt bis zur ersten Klassifizierung.
    pub fn new(io: FidgetIo<W, H, C, D, S, L>, config: FidgetConfig) -> Self {
        let now = io.clock.now_ms();

        let motion = MotionSequencer::with_intro(
            profile(DangerTier::NoDanger).angle,
            config.midpoint,
            config.animation_speed,
            config.intro,
        );

        Self {
            gate: IntervalGate::with_first_poll_after(
                now,
                config.poll_interval_ms,
                config.first_poll_after_ms,
            ),
            connection: ConnectionState::new(now),
            motion,
            last_tick_ms: now,
            current: None,
            buffer: [0; B],
            io,
            config,
        }
    }

    /// Ein Durchlauf der Hauptschleife
    ///
    /// Der Animations-Tick läuft immer vor einem möglichen Netzwerk-Zugriff.
    pub async fn step(&mut self) -> StepReport {
        let now = self.io.clock.now_ms();
        let dt = u32::try_from(now.saturating_sub(self.last_tick_ms)).unwrap_or(u32::MAX);
        self.last_tick_ms = now;

        let position = self.motion.tick(dt);
        let servo_fault = self.io.servo.set_position(position).err();

        let event = self.service_network(now).await;

        StepReport {
            position,
            servo_fault,
            event,
        }
    }

    async fn service_network(&mut self, now: u64) -> StepEvent {
        self.connection.is_connected = self.io.wifi.is_connected();

        if !self.connection.is_connected {
            if !self
                .connection
                .may_attempt(now, self.config.connect_delay_ms)
            {
                return StepEvent::ConnectDeferred;
            }
            if let Err(e) = self
                .io
                .wifi
                .connect(self.config.wifi_ssid, self.config.wifi_passkey)
                .await
            {
                self.connection.record_failure(now);
                return StepEvent::ConnectFailed(e);
            }
            self.connection.is_connected = true;
        }

        if !self.io.wifi.time_synced() {
            return StepEvent::AwaitingTimeSync;
        }

        if !self.gate.should_poll(now) {
            return StepEvent::Idle;
        }

        let result = fetch_descriptor(
            &mut self.io.http,
            &self.io.clock,
            &mut self.io.delay,
            &self.config.api,
            &mut self.buffer,
            self.config.read_limits,
        )
        .await;

        // Gate zählt ab Ende des Zyklus, auch ohne Descriptor
        self.gate.reset(self.io.clock.now_ms());

        match result {
            Ok(fetched) => StepEvent::Updated(self.apply(fetched)),
            Err(e) => StepEvent::NoDescriptor(e),
        }
    }

    fn apply(&mut self, fetched: Fetched) -> CycleReport {
        let classification = classify(&fetched.descriptor);
        let led_fault = self.io.led.write(classification.color).err();
        let retargeted = self.motion.retarget(classification.angle);
        self.current = Some(classification);

        CycleReport {
            descriptor: fetched.descriptor,
            classification,
            retargeted,
            read: fetched.read,
            led_fault,
        }
    }

    /// Letzte erfolgreiche Klassifizierung
    pub fn current(&self) -> Option<Classification> {
        self.current
    }

    pub fn motion(&self) -> &MotionSequencer {
        &self.motion
    }

    pub fn gate(&self) -> &IntervalGate {
        &self.gate
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn config(&self) -> &FidgetConfig {
        &self.config
    }

    pub fn io(&self) -> &FidgetIo<W, H, C, D, S, L> {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut FidgetIo<W, H, C, D, S, L> {
        &mut self.io
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for CycleReport {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "CycleReport {{ descriptor: {}, {}, retargeted: {}, read: {} }}",
            self.descriptor.as_str(),
            self.classification,
            self.retargeted,
            self.read
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StepEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StepEvent::Idle => defmt::write!(fmt, "Idle"),
            StepEvent::ConnectDeferred => defmt::write!(fmt, "ConnectDeferred"),
            StepEvent::ConnectFailed(e) => defmt::write!(fmt, "ConnectFailed({})", e),
            StepEvent::AwaitingTimeSync => defmt::write!(fmt, "AwaitingTimeSync"),
            StepEvent::Updated(report) => defmt::write!(fmt, "Updated({})", report),
            StepEvent::NoDescriptor(e) => defmt::write!(fmt, "NoDescriptor({})", e),
        }
    }
}
