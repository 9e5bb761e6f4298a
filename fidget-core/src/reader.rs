//! Bounded Response Reader
//!
//! Liest den Response-Body in einen Buffer fester Größe. Langsame oder
//! stückweise Lieferung wird toleriert, ein hängender Server nicht:
//! nach `inactivity_timeout_ms` ohne neues Byte wird abgebrochen.

use crate::traits::{ByteStream, Clock, Delay};

/// Timeout ohne neues Byte (gemessen ab dem letzten gelesenen Byte)
pub const READ_INACTIVITY_TIMEOUT_MS: u64 = 30_000;

/// Wartezeit wenn gerade keine Daten anstehen
pub const READ_IDLE_WAIT_MS: u64 = 1_000;

/// Grenzen für einen Lesevorgang
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadLimits {
    pub inactivity_timeout_ms: u64,
    pub idle_wait_ms: u64,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: READ_INACTIVITY_TIMEOUT_MS,
            idle_wait_ms: READ_IDLE_WAIT_MS,
        }
    }
}

/// Warum der Lesevorgang endete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadStop {
    /// `B-1` Bytes gelesen, Rest verworfen
    BufferFull,
    /// Gegenstelle hat geschlossen und nichts steht mehr an
    StreamEnded,
    /// Kein Byte innerhalb des Inaktivitäts-Timeouts
    TimedOut,
}

/// Ergebnis eines Lesevorgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadOutcome {
    /// Anzahl gespeicherter Bytes; `buf[len]` ist der Terminator
    pub len: usize,
    pub stop: ReadStop,
}

/// Liest aus `stream` nach `buf` bis Buffer voll, Stream zu oder Timeout
///
/// Ein Byte in `buf` bleibt immer für den `0`-Terminator reserviert, der
/// am Ende an der Schreibposition gesetzt wird. Der Stream wird in jedem
/// Fall geschlossen. Kein Retry auf dieser Ebene.
pub async fn read_bounded<S, C, D>(
    stream: &mut S,
    clock: &C,
    delay: &mut D,
    buf: &mut [u8],
    limits: ReadLimits,
) -> ReadOutcome
where
    S: ByteStream,
    C: Clock,
    D: Delay,
{
    let capacity = buf.len().saturating_sub(1);
    let mut len = 0;
    let mut last_byte_ms = clock.now_ms();

    let stop = loop {
        if len >= capacity {
            break ReadStop::BufferFull;
        }

        let read = stream.try_read(&mut buf[len..capacity]).await;
        if read > 0 {
            len += read.min(capacity - len);
            last_byte_ms = clock.now_ms();
            continue;
        }

        if !stream.is_open() {
            break ReadStop::StreamEnded;
        }

        if clock.now_ms().saturating_sub(last_byte_ms) > limits.inactivity_timeout_ms {
            break ReadStop::TimedOut;
        }

        // Keine Daten, Verbindung offen: CPU abgeben statt busy-spin
        delay.sleep_ms(limits.idle_wait_ms).await;
    };

    if let Some(terminator) = buf.get_mut(len) {
        *terminator = 0;
    }

    stream.close().await;

    ReadOutcome { len, stop }
}
