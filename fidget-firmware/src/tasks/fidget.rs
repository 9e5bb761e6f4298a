// Fidget Task - Regelkreis aus Servo-Animation, LED und Preis-Abfrage
use core::mem::discriminant;

use defmt::{error, info, warn};
use embassy_net::Stack;
use embassy_time::Timer;
use esp_hal_smartled::smart_led_buffer;
use fidget_core::{
    Clock, Connectivity, Delay, FidgetIo, HttpFetcher, PriceFidget, RESPONSE_BUFFER_SIZE,
    ServoWriter, SmartLedWriter, StepEvent, StepReport,
};

use crate::config::{
    LED_BRIGHTNESS, LED_COUNT, LED_GPIO_PIN, LOOP_TICK_MS, RMT_CLOCK_MHZ, SERVO_GPIO_PIN,
    fidget_config,
};
use crate::hal::{EmbassyClock, EmbassyDelay, LedcServo, RmtLedWriter};
use crate::net::{HttpsFetcher, StackConnectivity};

/// Loggt einen Schleifendurchlauf
///
/// Wiederholte Zustände (WLAN weg, warten auf Zeit) nur beim Wechsel,
/// damit der 16 ms Takt das Log nicht flutet.
fn log_step(report: &StepReport, previous: &mut Option<StepEvent>, servo_faulted: &mut bool) {
    match (report.servo_fault, *servo_faulted) {
        (Some(e), false) => warn!("Servo: Write failed: {}", e),
        (None, true) => info!("Servo: Recovered"),
        _ => {}
    }
    *servo_faulted = report.servo_fault.is_some();

    let repeated = previous
        .as_ref()
        .is_some_and(|p| discriminant(p) == discriminant(&report.event));

    match &report.event {
        StepEvent::Idle | StepEvent::ConnectDeferred => {}
        StepEvent::ConnectFailed(e) if !repeated => {
            warn!("Fidget: WiFi not connected ({}), retrying", e)
        }
        StepEvent::AwaitingTimeSync if !repeated => info!("Fidget: Waiting for time sync"),
        StepEvent::Updated(cycle) => {
            info!("Fidget: {}", cycle);
            if let Some(e) = cycle.led_fault {
                error!("LED: Failed to write: {}", e);
            }
        }
        StepEvent::NoDescriptor(e) => warn!("Fidget: No descriptor this cycle: {}", e),
        _ => {}
    }

    if !matches!(report.event, StepEvent::Idle | StepEvent::ConnectDeferred) {
        *previous = Some(report.event.clone());
    }
}

/// Fidget Logic - Hauptschleife ohne Hardware-Abhängigkeit
///
/// Ruft `step()` im festen Takt auf. Kein Fehler beendet die Schleife,
/// der Regelkreis selbst entscheidet über Retry und Polling.
pub async fn fidget_logic<W, H, C, D, S, L, const B: usize>(
    mut fidget: PriceFidget<W, H, C, D, S, L, B>,
) -> !
where
    W: Connectivity,
    H: HttpFetcher,
    C: Clock,
    D: Delay,
    S: ServoWriter,
    L: SmartLedWriter,
{
    let mut previous = None;
    let mut servo_faulted = false;

    loop {
        let report = fidget.step().await;
        log_step(&report, &mut previous, &mut servo_faulted);

        // Async Delay: gibt CPU an WiFi- und Netzwerk-Tasks zurück
        Timer::after_millis(LOOP_TICK_MS).await;
    }
}

/// Fidget Task - Embassy Task für den Regelkreis
///
/// Übernimmt die Hardware-Initialisierung (LED, Servo, HTTPS-Puffer) und
/// ruft dann `fidget_logic()` auf.
///
/// # Parameter
/// - `stack`: embassy-net Stack (WLAN-Status + HTTPS)
/// - `gpio8` / `rmt_peripheral`: Datenleitung und Timing der RGB LED
/// - `ledc_peripheral` / `gpio1`: PWM-Ausgang für den Servo
#[embassy_executor::task]
pub async fn fidget_task(
    stack: Stack<'static>,
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    ledc_peripheral: esp_hal::peripherals::LEDC<'static>,
    gpio1: esp_hal::peripherals::GPIO1<'static>,
) {
    // Buffer für SmartLED Daten, lebt so lange wie der Task
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);
    // Ohne LED laufen Servo und Abfrage trotzdem weiter
    let led = match RmtLedWriter::new(
        gpio8,
        rmt_peripheral,
        RMT_CLOCK_MHZ,
        &mut rmt_buffer,
        LED_BRIGHTNESS,
    ) {
        Ok(mut led) => {
            // LED startet aus, bis die erste Klassifizierung vorliegt
            if let Err(e) = led.clear() {
                error!("LED: Failed to clear: {}", e);
            }
            Some(led)
        }
        Err(e) => {
            error!("LED: Init on GPIO{} failed: {}", LED_GPIO_PIN, e);
            None
        }
    };

    // Ohne Servo laufen Abfrage und LED trotzdem weiter
    let servo = match LedcServo::new(ledc_peripheral, gpio1) {
        Ok(servo) => {
            info!("Servo: Ready on GPIO{}", SERVO_GPIO_PIN);
            Some(servo)
        }
        Err(e) => {
            error!("Servo: Init on GPIO{} failed: {}", SERVO_GPIO_PIN, e);
            None
        }
    };

    let Some(http) = HttpsFetcher::new(stack) else {
        error!("Fidget: HTTPS buffers already taken");
        return;
    };

    let config = fidget_config();
    info!(
        "Fidget: Polling {}:{} every {} s",
        config.api.host,
        config.api.port,
        config.poll_interval_ms / 1000
    );

    let io = FidgetIo {
        wifi: StackConnectivity::new(stack),
        http,
        clock: EmbassyClock,
        delay: EmbassyDelay,
        servo,
        led,
    };

    fidget_logic(PriceFidget::<_, _, _, _, _, _, RESPONSE_BUFFER_SIZE>::new(io, config)).await
}
