//! Tier Classifier
//!
//! Descriptor → Gefahrenstufe als Tabellen-Lookup. Eine neue Stufe oder ein
//! neuer Descriptor ist eine Datenänderung, kein neuer Code-Pfad.

use rgb::RGB8;

use crate::types::{Classification, DangerTier, TierProfile};

/// Neutraler Servo-Winkel (Grad), trennt die "sichere" von der "gefährlichen" Seite
pub const SERVO_MIDPOINT: f32 = 81.0;

/// Kalibrierte Ausgabe pro Stufe, indiziert mit [`DangerTier::index`]
///
/// Winkel fallen streng mit steigender Gefahr.
pub static TIER_TABLE: [TierProfile; 5] = [
    TierProfile {
        tier: DangerTier::NoDanger,
        angle: 173.0,
        color: RGB8 { r: 0, g: 255, b: 255 },
    },
    TierProfile {
        tier: DangerTier::Moderate,
        angle: 150.0,
        color: RGB8 { r: 0, g: 255, b: 0 },
    },
    TierProfile {
        tier: DangerTier::High,
        angle: 108.0,
        color: RGB8 { r: 255, g: 255, b: 0 },
    },
    TierProfile {
        tier: DangerTier::Extreme,
        angle: 58.0,
        color: RGB8 { r: 255, g: 165, b: 0 },
    },
    TierProfile {
        tier: DangerTier::Catastrophic,
        angle: 11.0,
        color: RGB8 { r: 255, g: 0, b: 0 },
    },
];

/// Bekannte Descriptors (case-sensitive). Alles andere ist "extrem niedriger Preis".
pub static DESCRIPTOR_TABLE: [(&str, DangerTier); 5] = [
    ("spike", DangerTier::Catastrophic),
    ("high", DangerTier::Catastrophic),
    ("neutral", DangerTier::Extreme),
    ("low", DangerTier::High),
    ("veryLow", DangerTier::Moderate),
];

/// Stufe für unbekannte oder leere Descriptors
pub const FALLBACK_TIER: DangerTier = DangerTier::NoDanger;

/// Profil (Winkel + Farbe) einer Stufe
pub fn profile(tier: DangerTier) -> TierProfile {
    TIER_TABLE[tier.index()]
}

/// Stufe zu einem Descriptor, nie fehlschlagend
pub fn tier_for(descriptor: &str) -> DangerTier {
    DESCRIPTOR_TABLE
        .iter()
        .find(|(name, _)| *name == descriptor)
        .map(|&(_, tier)| tier)
        .unwrap_or(FALLBACK_TIER)
}

/// Klassifiziert einen Descriptor in Stufe, Winkel und Farbe
///
/// # Beispiele
///
/// ```
/// # use fidget_core::{DangerTier, classify};
/// assert_eq!(classify("spike").tier, DangerTier::Catastrophic);
/// assert_eq!(classify("something else").tier, DangerTier::NoDanger);
/// ```
pub fn classify(descriptor: &str) -> Classification {
    profile(tier_for(descriptor)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_tier() {
        for tier in DangerTier::ALL {
            assert_eq!(profile(tier).tier, tier);
        }
    }

    #[test]
    fn test_angles_are_order_preserving() {
        for pair in TIER_TABLE.windows(2) {
            assert!(pair[0].angle > pair[1].angle);
        }
    }

    #[test]
    fn test_midpoint_separates_tiers() {
        assert!(profile(DangerTier::High).angle > SERVO_MIDPOINT);
        assert!(profile(DangerTier::Extreme).angle < SERVO_MIDPOINT);
    }

    #[test]
    fn test_named_descriptors() {
        assert_eq!(tier_for("spike"), DangerTier::Catastrophic);
        assert_eq!(tier_for("high"), DangerTier::Catastrophic);
        assert_eq!(tier_for("neutral"), DangerTier::Extreme);
        assert_eq!(tier_for("low"), DangerTier::High);
        assert_eq!(tier_for("veryLow"), DangerTier::Moderate);
    }

    #[test]
    fn test_unknown_is_safest() {
        assert_eq!(tier_for(""), DangerTier::NoDanger);
        assert_eq!(tier_for("extremelyLow"), DangerTier::NoDanger);
        assert_eq!(tier_for("HIGH"), DangerTier::NoDanger);
    }

    #[test]
    fn test_colors_are_distinct() {
        for (i, a) in TIER_TABLE.iter().enumerate() {
            for b in &TIER_TABLE[i + 1..] {
                assert_ne!(a.color, b.color);
            }
        }
    }
}
