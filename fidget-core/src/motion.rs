//! Motion Sequencer
//!
//! Zustandsautomat `Idle ↔ Animating` für den Servo-Zeiger. Ein Retarget
//! ersetzt die laufende Animation durch zwei Segmente: einen sofortigen
//! Keyframe an der aktuellen Position und einen Easing-Übergang zum Ziel.
//! Die Position ist eine reine Funktion der aufsummierten Tick-Zeit.

use crate::easing::{CurveKind, EasingSpec};

/// Animations-Geschwindigkeit in Millisekunden pro Grad (größer = langsamer)
pub const ANIMATION_SPEED_MS_PER_DEGREE: f32 = 15.0;

/// Startanimation nach dem Boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntroMotion {
    /// Wartezeit am Mittelpunkt vor dem Losfahren
    pub hold_ms: u32,
    pub duration_ms: u32,
}

impl Default for IntroMotion {
    fn default() -> Self {
        Self {
            hold_ms: 1_000,
            duration_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    Idle,
    Animating,
}

/// Aktiver Animationszustand (es gibt immer genau einen)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    pub current_position: f32,
    pub target_position: f32,
    /// Zeit seit Beginn der Animation (inkl. `hold_ms`)
    pub elapsed_ms: u32,
    /// Haltezeit auf `segment.start` vor dem Easing
    pub hold_ms: u32,
    pub segment: EasingSpec,
}

/// Wählt Kurve und Dauer für eine Bewegung von `start` nach `target`
///
/// Liegen beide auf derselben Seite von `midpoint` und führt die Bewegung
/// vom Mittelpunkt weg, federt der Zeiger aus (`BounceAway`). Sonst
/// (Seitenwechsel oder Bewegung zum Mittelpunkt hin) holt er aus und
/// schwingt über (`BackInOut`) mit doppelter Dauer. Ein Start genau auf
/// dem Mittelpunkt zählt zur oberen Seite.
pub fn plan_motion(start: f32, target: f32, midpoint: f32, speed_ms_per_degree: f32) -> EasingSpec {
    let moving_away = if start < midpoint {
        target < midpoint && target < start
    } else {
        target > midpoint && target > start
    };

    let distance = if start > target {
        start - target
    } else {
        target - start
    };

    let (kind, duration) = if moving_away {
        (CurveKind::BounceAway, distance * speed_ms_per_degree)
    } else {
        (CurveKind::BackInOut, distance * speed_ms_per_degree * 2.0)
    };

    EasingSpec::new(kind, start, target, duration as u32)
}

/// Sequencer für die Servo-Position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSequencer {
    midpoint: f32,
    speed_ms_per_degree: f32,
    phase: MotionPhase,
    state: MotionState,
}

impl MotionSequencer {
    /// Ruhender Sequencer an `position`
    pub fn new(position: f32, midpoint: f32, speed_ms_per_degree: f32) -> Self {
        Self {
            midpoint,
            speed_ms_per_degree,
            phase: MotionPhase::Idle,
            state: MotionState {
                current_position: position,
                target_position: position,
                elapsed_ms: 0,
                hold_ms: 0,
                segment: EasingSpec::new(CurveKind::BounceAway, position, position, 0),
            },
        }
    }

    /// Startet am Mittelpunkt, wartet `intro.hold_ms` und federt dann nach `target`
    pub fn with_intro(target: f32, midpoint: f32, speed_ms_per_degree: f32, intro: IntroMotion) -> Self {
        Self {
            midpoint,
            speed_ms_per_degree,
            phase: MotionPhase::Animating,
            state: MotionState {
                current_position: midpoint,
                target_position: target,
                elapsed_ms: 0,
                hold_ms: intro.hold_ms,
                segment: EasingSpec::new(CurveKind::BounceAway, midpoint, target, intro.duration_ms),
            },
        }
    }

    /// Neues Ziel setzen
    ///
    /// Gleiches Ziel wie bisher ist ein No-op (`false`). Sonst wird die laufende
    /// Animation verworfen und ab der aktuellen Position neu geplant.
    pub fn retarget(&mut self, new_target: f32) -> bool {
        if new_target == self.state.target_position {
            return false;
        }

        let start = self.state.current_position;
        self.state = MotionState {
            current_position: start,
            target_position: new_target,
            elapsed_ms: 0,
            hold_ms: 0,
            segment: plan_motion(start, new_target, self.midpoint, self.speed_ms_per_degree),
        };
        self.phase = MotionPhase::Animating;
        true
    }

    /// Zeit um `dt_ms` vorrücken und neue Position berechnen
    pub fn tick(&mut self, dt_ms: u32) -> f32 {
        if self.phase == MotionPhase::Idle {
            return self.state.current_position;
        }

        let state = &mut self.state;
        state.elapsed_ms = state.elapsed_ms.saturating_add(dt_ms);

        if state.elapsed_ms < state.hold_ms {
            state.current_position = state.segment.start;
            return state.current_position;
        }

        let in_segment = state.elapsed_ms - state.hold_ms;
        state.current_position = state.segment.value_at(in_segment);
        if state.segment.is_finished(in_segment) {
            state.current_position = state.segment.end;
            self.phase = MotionPhase::Idle;
        }
        state.current_position
    }

    pub fn position(&self) -> f32 {
        self.state.current_position
    }

    pub fn target(&self) -> f32 {
        self.state.target_position
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.phase == MotionPhase::Animating
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn midpoint(&self) -> f32 {
        self.midpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MID: f32 = 81.0;

    #[test]
    fn test_plan_bounce_when_moving_away_below_midpoint() {
        let spec = plan_motion(58.0, 11.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BounceAway);
        assert_eq!(spec.duration_ms, 705);
    }

    #[test]
    fn test_plan_bounce_when_moving_away_above_midpoint() {
        let spec = plan_motion(108.0, 173.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BounceAway);
        assert_eq!(spec.duration_ms, 975);
    }

    #[test]
    fn test_plan_back_when_moving_towards_midpoint() {
        let spec = plan_motion(173.0, 108.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BackInOut);
        assert_eq!(spec.duration_ms, 1950);

        let spec = plan_motion(11.0, 58.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BackInOut);
        assert_eq!(spec.duration_ms, 1410);
    }

    #[test]
    fn test_plan_back_when_crossing_midpoint() {
        let spec = plan_motion(173.0, 11.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BackInOut);
        assert_eq!(spec.duration_ms, 4860);

        let spec = plan_motion(58.0, 150.0, MID, 15.0);
        assert_eq!(spec.kind, CurveKind::BackInOut);
    }

    #[test]
    fn test_plan_from_midpoint_counts_as_upper_side() {
        assert_eq!(plan_motion(MID, 173.0, MID, 15.0).kind, CurveKind::BounceAway);
        assert_eq!(plan_motion(MID, 11.0, MID, 15.0).kind, CurveKind::BackInOut);
    }

    #[test]
    fn test_retarget_same_target_is_noop() {
        let mut seq = MotionSequencer::new(173.0, MID, 15.0);
        assert!(!seq.retarget(173.0));
        assert_eq!(seq.phase(), MotionPhase::Idle);

        assert!(seq.retarget(108.0));
        let before = *seq.state();
        assert!(!seq.retarget(108.0));
        assert_eq!(*seq.state(), before);
    }

    #[test]
    fn test_tick_settles_exactly_on_target() {
        let mut seq = MotionSequencer::new(173.0, MID, 15.0);
        seq.retarget(11.0);
        let duration = seq.state().segment.duration_ms;

        let mut elapsed = 0;
        while elapsed < duration {
            seq.tick(16);
            elapsed += 16;
        }
        assert_eq!(seq.position(), 11.0);
        assert_eq!(seq.phase(), MotionPhase::Idle);

        for _ in 0..10 {
            assert_eq!(seq.tick(16), 11.0);
        }
    }

    #[test]
    fn test_intro_holds_then_bounces() {
        let mut seq = MotionSequencer::with_intro(173.0, MID, 15.0, IntroMotion::default());
        assert_eq!(seq.tick(500), MID);
        assert_eq!(seq.tick(499), MID);
        assert!(seq.tick(500) > MID);
        seq.tick(1_501);
        assert_eq!(seq.position(), 173.0);
        assert!(!seq.is_animating());
    }

    #[test]
    fn test_retarget_mid_animation_starts_from_current_position() {
        let mut seq = MotionSequencer::new(173.0, MID, 15.0);
        seq.retarget(11.0);
        let here = seq.tick(1_000);
        seq.retarget(150.0);
        assert_eq!(seq.state().segment.start, here);
        assert_eq!(seq.state().elapsed_ms, 0);
        assert_eq!(seq.tick(0), here);
    }
}
