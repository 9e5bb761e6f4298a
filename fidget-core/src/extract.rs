//! Descriptor Extractor
//!
//! Minimaler JSON-Scan über ein Array von Preis-Objekten. Nur die Grenzen
//! der Array-Elemente werden hier bestimmt; jedes Objekt-Element wird
//! einzeln mit serde-json-core als [`PriceRecord`] gelesen. Elemente, die
//! keine Objekte sind oder sich nicht lesen lassen, werden übersprungen.

use crate::error::ParseError;
use crate::types::PriceRecord;

/// Kanal, dessen Descriptor das Fidget anzeigt
pub const GENERAL_CHANNEL: &str = "general";

/// Maximale Verschachtelungstiefe innerhalb eines Elements
const MAX_DEPTH: usize = 16;

/// Descriptor des ersten `"general"`-Elements, sonst `None`
///
/// Totale Funktion: leere, abgeschnittene oder kaputte Eingaben liefern `None`.
pub fn extract_descriptor(body: &[u8]) -> Option<&str> {
    scan_descriptor(body).ok()
}

/// Wie [`extract_descriptor`], aber mit Grund für das Fehlen
///
/// Ein `0`-Byte beendet die Eingabe (Terminator des Readers).
pub fn scan_descriptor(body: &[u8]) -> Result<&str, ParseError> {
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    let mut scanner = Scanner::new(&body[..end]);

    scanner.skip_whitespace();
    match scanner.peek() {
        None => return Err(ParseError::Empty),
        Some(b'[') => scanner.bump(),
        Some(_) => return Err(ParseError::NotAnArray),
    }

    let mut found: Option<Result<&str, ParseError>> = None;

    scanner.skip_whitespace();
    if scanner.peek() == Some(b']') {
        scanner.bump();
    } else {
        loop {
            scanner.skip_whitespace();
            let element = scanner.take_value()?;
            if found.is_none() {
                found = general_descriptor(element);
            }

            scanner.skip_whitespace();
            match scanner.peek() {
                Some(b',') => scanner.bump(),
                Some(b']') => {
                    scanner.bump();
                    break;
                }
                _ => return Err(ParseError::Malformed),
            }
        }
    }

    // Nach dem Array darf nur noch Whitespace kommen
    scanner.skip_whitespace();
    if scanner.peek().is_some() {
        return Err(ParseError::Malformed);
    }

    found.unwrap_or(Err(ParseError::GeneralChannelMissing))
}

/// `Some(..)` wenn `element` ein Objekt des General-Kanals ist
fn general_descriptor(element: &[u8]) -> Option<Result<&str, ParseError>> {
    if element.first() != Some(&b'{') {
        return None;
    }
    let (record, _) = serde_json_core::from_slice::<PriceRecord<'_>>(element).ok()?;
    if record.channel_type != Some(GENERAL_CHANNEL) {
        return None;
    }
    Some(record.descriptor.ok_or(ParseError::DescriptorMissing))
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.bump();
        }
    }

    /// Überspringt genau einen JSON-Wert und gibt seine Bytes zurück
    fn take_value(&mut self) -> Result<&'a [u8], ParseError> {
        let start = self.pos;
        match self.peek() {
            None => return Err(ParseError::Malformed),
            Some(b'"') => self.skip_string()?,
            Some(b'{' | b'[') => self.skip_container()?,
            Some(_) => self.skip_scalar()?,
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn skip_string(&mut self) -> Result<(), ParseError> {
        // Öffnendes Anführungszeichen
        self.bump();
        while let Some(b) = self.peek() {
            self.bump();
            match b {
                b'\\' => {
                    if self.peek().is_none() {
                        return Err(ParseError::Malformed);
                    }
                    self.bump();
                }
                b'"' => return Ok(()),
                _ => {}
            }
        }
        Err(ParseError::Malformed)
    }

    /// Objekt oder Array inkl. Verschachtelung
    ///
    /// Bis `MAX_DEPTH` müssen die Klammertypen passen, tiefere Ebenen
    /// werden nur noch gezählt.
    fn skip_container(&mut self) -> Result<(), ParseError> {
        let mut closers: heapless::Vec<u8, MAX_DEPTH> = heapless::Vec::new();
        let mut overflow: usize = 0;
        loop {
            let Some(b) = self.peek() else {
                return Err(ParseError::Malformed);
            };
            match b {
                b'"' => {
                    self.skip_string()?;
                    continue;
                }
                b'{' | b'[' => {
                    let closer = if b == b'{' { b'}' } else { b']' };
                    if closers.push(closer).is_err() {
                        overflow += 1;
                    }
                }
                b'}' | b']' => {
                    if overflow > 0 {
                        overflow -= 1;
                    } else if closers.pop() != Some(b) {
                        return Err(ParseError::Malformed);
                    } else if closers.is_empty() {
                        self.bump();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Zahl oder Literal (`true`, `false`, `null`)
    fn skip_scalar(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'+' | b'-' | b'.')
        ) {
            self.bump();
        }
        if self.pos == start {
            return Err(ParseError::Malformed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_general_record() {
        let body = br#"[{"channelType":"general","descriptor":"high"}]"#;
        assert_eq!(extract_descriptor(body), Some("high"));
    }

    #[test]
    fn test_extract_skips_other_channels() {
        let body = br#"[
            {"channelType":"feedIn","descriptor":"low"},
            {"channelType":"general","descriptor":"neutral"}
        ]"#;
        assert_eq!(extract_descriptor(body), Some("neutral"));
    }

    #[test]
    fn test_first_general_record_wins() {
        let body = br#"[{"channelType":"general","descriptor":"spike"},{"channelType":"general","descriptor":"low"}]"#;
        assert_eq!(extract_descriptor(body), Some("spike"));
    }

    #[test]
    fn test_stops_at_terminator() {
        let mut buf = [0u8; 64];
        let body = br#"[{"channelType":"general","descriptor":"low"}]"#;
        buf[..body.len()].copy_from_slice(body);
        assert_eq!(extract_descriptor(&buf), Some("low"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scan_descriptor(b""), Err(ParseError::Empty));
        assert_eq!(scan_descriptor(b"  \n"), Err(ParseError::Empty));
        assert_eq!(scan_descriptor(&[0u8; 8]), Err(ParseError::Empty));
    }

    #[test]
    fn test_non_array_top_level() {
        let body = br#"{"channelType":"general","descriptor":"high"}"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::NotAnArray));
        assert_eq!(scan_descriptor(b"null"), Err(ParseError::NotAnArray));
    }

    #[test]
    fn test_truncated_array_is_absent() {
        let body = br#"[{"channelType":"general","descriptor":"high"},{"channelType":"feed"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::Malformed));
    }

    #[test]
    fn test_trailing_garbage_is_malformed() {
        let body = br#"[{"channelType":"general","descriptor":"high"}] x"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::Malformed));
    }

    #[test]
    fn test_missing_general_channel() {
        let body = br#"[{"channelType":"feedIn","descriptor":"low"}, 1, "x", null]"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::GeneralChannelMissing));
        assert_eq!(scan_descriptor(b"[]"), Err(ParseError::GeneralChannelMissing));
    }

    #[test]
    fn test_general_without_descriptor() {
        let body = br#"[{"channelType":"general"}]"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::DescriptorMissing));
    }

    #[test]
    fn test_brackets_inside_strings_are_ignored() {
        let body = br#"["]}{[", {"channelType":"general","descriptor":"veryLow"}]"#;
        assert_eq!(extract_descriptor(body), Some("veryLow"));
    }

    #[test]
    fn test_deep_nesting_after_general_record() {
        let body = br#"[{"channelType":"general","descriptor":"high"},[[[[[[[[[[[[[[[[[1]]]]]]]]]]]]]]]]]]"#;
        assert_eq!(scan_descriptor(body), Ok("high"));
    }

    #[test]
    fn test_deep_nesting_inside_skipped_record() {
        let mut body = heapless::String::<256>::new();
        body.push_str(r#"[{"channelType":"feedIn","x":"#).unwrap();
        for _ in 0..40 {
            body.push('[').unwrap();
        }
        for _ in 0..40 {
            body.push(']').unwrap();
        }
        body.push_str(r#"},{"channelType":"general","descriptor":"low"}]"#).unwrap();
        assert_eq!(scan_descriptor(body.as_bytes()), Ok("low"));
    }

    #[test]
    fn test_deep_nesting_must_still_close() {
        let body = br#"[{"channelType":"general","descriptor":"high"},[[[[[[[[[[[[[[[[[1]]]]]]]]]]]]]]]]]"#;
        assert_eq!(scan_descriptor(body), Err(ParseError::Malformed));
    }

    #[test]
    fn test_mismatched_brackets() {
        assert_eq!(scan_descriptor(b"[{]"), Err(ParseError::Malformed));
        assert_eq!(scan_descriptor(b"[[}]"), Err(ParseError::Malformed));
    }
}
