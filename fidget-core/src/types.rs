//! Core Types für das Preis-Fidget
//!
//! Datenstrukturen ohne Hardware-Dependencies

use rgb::RGB8;
use serde::Deserialize;

/// Maximale Länge eines Descriptors in Bytes
///
/// Die API liefert kurze Labels (`"veryLow"` ist das längste bekannte).
pub const DESCRIPTOR_CAPACITY: usize = 32;

/// Descriptor-String, unabhängig vom Response-Buffer gespeichert
pub type Descriptor = heapless::String<DESCRIPTOR_CAPACITY>;

/// Gefahrenstufe, abgeleitet aus dem aktuellen Strompreis
///
/// Die Reihenfolge ist fest: `NoDanger` ist die sicherste Stufe,
/// `Catastrophic` die gefährlichste. Unbekannte Descriptors landen
/// immer auf `NoDanger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DangerTier {
    NoDanger,
    Moderate,
    High,
    Extreme,
    Catastrophic,
}

impl DangerTier {
    /// Alle Stufen in aufsteigender Gefahr
    pub const ALL: [DangerTier; 5] = [
        DangerTier::NoDanger,
        DangerTier::Moderate,
        DangerTier::High,
        DangerTier::Extreme,
        DangerTier::Catastrophic,
    ];

    /// Index in der Stufen-Tabelle (0 = sicher)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lesbarer Name für Logs
    pub const fn name(self) -> &'static str {
        match self {
            DangerTier::NoDanger => "NoDanger",
            DangerTier::Moderate => "Moderate",
            DangerTier::High => "High",
            DangerTier::Extreme => "Extreme",
            DangerTier::Catastrophic => "Catastrophic",
        }
    }
}

/// Kalibrierte Ausgabe einer Stufe: Servo-Winkel und LED-Farbe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    pub tier: DangerTier,
    /// Servo-Winkel in Grad
    pub angle: f32,
    pub color: RGB8,
}

/// Ergebnis der Klassifizierung eines Descriptors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub tier: DangerTier,
    pub angle: f32,
    pub color: RGB8,
}

impl From<TierProfile> for Classification {
    fn from(profile: TierProfile) -> Self {
        Self {
            tier: profile.tier,
            angle: profile.angle,
            color: profile.color,
        }
    }
}

/// Ein Element der Preis-Antwort
///
/// Existiert nur während eines Parse-Durchlaufs und leiht sich die Strings
/// direkt aus dem Response-Buffer. Alle anderen Felder der API werden ignoriert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PriceRecord<'a> {
    #[serde(rename = "channelType", default, borrow)]
    pub channel_type: Option<&'a str>,
    #[serde(default, borrow)]
    pub descriptor: Option<&'a str>,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for Classification {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Classification {{ tier: {}, angle: {}, rgb: ({}, {}, {}) }}",
            self.tier,
            self.angle,
            self.color.r,
            self.color.g,
            self.color.b
        )
    }
}
