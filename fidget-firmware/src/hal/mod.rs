// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus fidget-core für die echte Hardware.
// Die Mocks für Host-Tests liegen in fidget-tests.

pub mod clock;
pub mod led_writer;
pub mod servo;

pub use clock::{EmbassyClock, EmbassyDelay};
pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter};
pub use servo::{LedcServo, ServoInitError};
