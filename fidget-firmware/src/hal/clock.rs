// Zeitquelle für den Regelkreis (embassy-time)

use embassy_time::{Instant, Timer};
use fidget_core::{Clock, Delay};

/// Millisekunden seit Boot
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

/// Async Sleep, gibt die CPU an andere Tasks ab
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyDelay;

impl Delay for EmbassyDelay {
    async fn sleep_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
