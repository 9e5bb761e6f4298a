// Servo-Zeiger über LEDC PWM (Low-Speed, 50 Hz)
//
// Implementiert `fidget_core::ServoWriter`. Winkel werden auf 0-180°
// begrenzt und linear auf 500-2500 µs Pulsbreite abgebildet.

use esp_hal::gpio::DriveMode;
use esp_hal::ledc::channel::{self, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use fidget_core::{ServoError, ServoWriter};
use static_cell::StaticCell;

use crate::config::{SERVO_MAX_ANGLE, SERVO_MAX_PULSE_US, SERVO_MIN_PULSE_US, SERVO_PWM_HZ};

/// Auflösung des Duty-Cycles
const DUTY_BITS: u32 = 14;
const MAX_DUTY: u32 = 1 << DUTY_BITS;

/// Periodendauer bei SERVO_PWM_HZ
const PERIOD_US: u32 = 1_000_000 / SERVO_PWM_HZ;

/// Fehler beim Initialisieren des Servos
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ServoInitError {
    Timer,
    Channel,
    AlreadyInitialized,
}

/// Winkel (Grad) → Pulsbreite (µs)
pub fn pulse_for_angle(angle: f32) -> u32 {
    let angle = angle.clamp(0.0, SERVO_MAX_ANGLE);
    let span = (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US) as f32;
    SERVO_MIN_PULSE_US + (angle / SERVO_MAX_ANGLE * span) as u32
}

/// Pulsbreite (µs) → LEDC Duty-Wert
pub fn duty_for_pulse(pulse_us: u32) -> u32 {
    pulse_us * MAX_DUTY / PERIOD_US
}

static LEDC: StaticCell<Ledc<'static>> = StaticCell::new();
static TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Servo an einem LEDC Low-Speed Kanal
pub struct LedcServo {
    channel: channel::Channel<'static, LowSpeed>,
    last_duty: Option<u32>,
}

impl LedcServo {
    /// Konfiguriert Timer0 + Channel0 und gibt den Servo zurück
    ///
    /// Darf nur einmal aufgerufen werden (Timer und LEDC liegen in StaticCells).
    pub fn new(
        ledc_peripheral: esp_hal::peripherals::LEDC<'static>,
        pin: esp_hal::peripherals::GPIO1<'static>,
    ) -> Result<Self, ServoInitError> {
        let ledc = LEDC
            .try_init(Ledc::new(ledc_peripheral))
            .ok_or(ServoInitError::AlreadyInitialized)?;
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
        let ledc: &'static Ledc<'static> = ledc;

        let timer = TIMER
            .try_init(ledc.timer::<LowSpeed>(timer::Number::Timer0))
            .ok_or(ServoInitError::AlreadyInitialized)?;
        timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty14Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_hz(SERVO_PWM_HZ),
            })
            .map_err(|_| ServoInitError::Timer)?;
        let timer: &'static timer::Timer<'static, LowSpeed> = timer;

        let mut channel = ledc.channel(channel::Number::Channel0, pin);
        channel
            .configure(channel::config::Config {
                timer,
                duty_pct: 0,
                drive_mode: DriveMode::PushPull,
            })
            .map_err(|_| ServoInitError::Channel)?;

        Ok(Self {
            channel,
            last_duty: None,
        })
    }
}

impl ServoWriter for LedcServo {
    fn set_position(&mut self, angle: f32) -> Result<(), ServoError> {
        let duty = duty_for_pulse(pulse_for_angle(angle));
        // Wird jeden Tick aufgerufen, Register nur bei Änderung schreiben
        if self.last_duty == Some(duty) {
            return Ok(());
        }
        self.channel.set_duty_hw(duty);
        self.last_duty = Some(duty);
        Ok(())
    }
}
