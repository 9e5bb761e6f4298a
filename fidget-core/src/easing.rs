//! Easing-Kurven für die Servo-Animation
//!
//! Beide Kurven sind stetig, beginnen bei `0.0` und enden exakt bei `1.0`.
//! Reine Polynome, kein `libm` nötig.

/// Art der Kurve eines Segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurveKind {
    /// Erreicht das Ziel früh und federt in abklingenden Sprüngen darüber hinaus
    BounceAway,
    /// Holt kurz entgegen der Richtung aus, schießt über das Ziel und setzt sich
    BackInOut,
}

const BOUNCE_N: f32 = 7.5625;
const BOUNCE_D: f32 = 2.75;
const BACK_OVERSHOOT: f32 = 1.70158 * 1.525;

impl CurveKind {
    /// Fortschritt `t` (0..=1) → Anteil der Strecke
    pub fn ease(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            CurveKind::BounceAway => bounce_away(t),
            CurveKind::BackInOut => back_in_out(t),
        }
    }
}

/// Klassische Bounce-Out-Kurve (Ball fällt auf den Boden)
fn bounce_out(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D {
        BOUNCE_N * t * t
    } else if t < 2.0 / BOUNCE_D {
        let t = t - 1.5 / BOUNCE_D;
        BOUNCE_N * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D {
        let t = t - 2.25 / BOUNCE_D;
        BOUNCE_N * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D;
        BOUNCE_N * t * t + 0.984375
    }
}

/// Bounce-Out, nach dem ersten Aufprall an `1.0` gespiegelt
///
/// Die Sprünge gehen über das Ziel hinaus (Spitzen bei 1.25, 1.0625, 1.015625).
fn bounce_away(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D {
        bounce_out(t)
    } else {
        2.0 - bounce_out(t)
    }
}

fn back_in_out(t: f32) -> f32 {
    if t < 0.5 {
        let x = 2.0 * t;
        x * x * ((BACK_OVERSHOOT + 1.0) * x - BACK_OVERSHOOT) / 2.0
    } else {
        let x = 2.0 * t - 2.0;
        (x * x * ((BACK_OVERSHOOT + 1.0) * x + BACK_OVERSHOOT) + 2.0) / 2.0
    }
}

/// Ein animiertes Segment von `start` nach `end`
///
/// Unveränderlich nach dem Erzeugen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EasingSpec {
    pub kind: CurveKind,
    pub start: f32,
    pub end: f32,
    pub duration_ms: u32,
}

impl EasingSpec {
    pub fn new(kind: CurveKind, start: f32, end: f32, duration_ms: u32) -> Self {
        Self {
            kind,
            start,
            end,
            duration_ms,
        }
    }

    /// Position nach `elapsed_ms`; ab `duration_ms` exakt `end`
    pub fn value_at(&self, elapsed_ms: u32) -> f32 {
        if elapsed_ms >= self.duration_ms {
            return self.end;
        }
        let t = elapsed_ms as f32 / self.duration_ms as f32;
        self.start + (self.end - self.start) * self.kind.ease(t)
    }

    pub fn is_finished(&self, elapsed_ms: u32) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
