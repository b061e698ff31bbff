//! Patent number normalization.
//!
//! User-supplied patent numbers arrive in many shapes (`wo2013078254a1`,
//! `WO-2013078254-A1`, `WO 2013078254 A1`). This module reduces them all to
//! the single canonical token the source site's URL scheme expects, or
//! rejects them. Normalization fails closed: no [`PatentIdentifier`] ever
//! exists for input that does not match the grammar.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{PatentError, PatentResult};

/// Separator characters tolerated (and removed) inside raw input.
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-/_.,]+").unwrap());

/// Splits a serial+kind body. The serial is the shortest prefix containing a
/// digit that leaves a trailing letter-led group of one or two letters plus
/// optional digits for the kind code. Bodies with no such trailing group
/// match with an empty kind (the serial absorbs everything), so reissue
/// numbers like `RE36479` keep their letters in the serial.
static KIND_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<serial>[0-9A-Z]*?[0-9][0-9A-Z]*?)(?P<kind>[A-Z]{1,2}[0-9]*)?$").unwrap());

/// A validated, canonical patent number.
///
/// Construction is the only way to obtain one, so holding a
/// `PatentIdentifier` is proof the grammar checks passed. The canonical form
/// is `<office><serial>[<kind>]`: a two-letter office code, an alphanumeric
/// serial containing at least one digit, and an optional kind code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentIdentifier {
    raw: String,
    canonical: String,
    /// Byte offset in `canonical` where the kind code starts (== len if none).
    serial_end: usize,
}

impl PatentIdentifier {
    /// Normalize a raw patent number into its canonical form.
    ///
    /// Trims and strips separators, uppercases, then checks the grammar.
    /// Returns [`PatentError::InvalidIdentifier`] with a human-readable
    /// reason when the input cannot be a patent number.
    pub fn parse(raw: &str) -> PatentResult<Self> {
        let cleaned = SEPARATORS.replace_all(raw.trim(), "").to_ascii_uppercase();

        if cleaned.is_empty() {
            return Err(Self::invalid(raw, "empty after removing separators"));
        }
        if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(Self::invalid(raw, format!("unsupported character '{bad}'")));
        }
        if cleaned.len() < 3 || !cleaned[..2].chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Self::invalid(
                raw,
                "must begin with a two-letter office code followed by a serial",
            ));
        }

        let body = &cleaned[2..];
        if !body.chars().any(|c| c.is_ascii_digit()) {
            return Err(Self::invalid(raw, "serial must contain at least one digit"));
        }

        // A body with at least one digit always matches; the fallback arm
        // treats the whole body as serial.
        let serial_end = match KIND_SPLIT.captures(body) {
            Some(caps) => match caps.name("kind") {
                Some(kind) => 2 + kind.start(),
                None => cleaned.len(),
            },
            None => cleaned.len(),
        };

        Ok(Self {
            raw: raw.to_string(),
            canonical: cleaned,
            serial_end,
        })
    }

    fn invalid(raw: &str, reason: impl Into<String>) -> PatentError {
        PatentError::InvalidIdentifier {
            input: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// The input string exactly as supplied.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The canonical token used in URLs and file names.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Two-letter country/office code.
    pub fn office(&self) -> &str {
        &self.canonical[..2]
    }

    /// Serial portion, without office code or kind code.
    pub fn serial(&self) -> &str {
        &self.canonical[2..self.serial_end]
    }

    /// Kind code suffix, if the number carries one.
    pub fn kind(&self) -> Option<&str> {
        if self.serial_end < self.canonical.len() {
            Some(&self.canonical[self.serial_end..])
        } else {
            None
        }
    }
}

impl fmt::Display for PatentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for PatentIdentifier {
    type Err = PatentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_and_case_variants() {
        let variants = [
            "WO2013078254A1",
            "wo2013078254a1",
            "WO-2013078254-A1",
            "WO 2013078254 A1",
            "WO/2013078254/A1",
            "wo_2013078254_a1",
            "  WO2013078254A1  ",
        ];
        for v in variants {
            let id = PatentIdentifier::parse(v).unwrap();
            assert_eq!(id.canonical(), "WO2013078254A1", "variant {v:?}");
        }
    }

    #[test]
    fn test_office_serial_kind_split() {
        let id = PatentIdentifier::parse("US9876543B2").unwrap();
        assert_eq!(id.office(), "US");
        assert_eq!(id.serial(), "9876543");
        assert_eq!(id.kind(), Some("B2"));

        let id = PatentIdentifier::parse("EP1000000A1").unwrap();
        assert_eq!(id.office(), "EP");
        assert_eq!(id.serial(), "1000000");
        assert_eq!(id.kind(), Some("A1"));
    }

    #[test]
    fn test_reissue_serial() {
        let id = PatentIdentifier::parse("USRE36479").unwrap();
        assert_eq!(id.serial(), "RE36479");
        assert_eq!(id.kind(), None);
    }

    #[test]
    fn test_design_patent_kind() {
        let id = PatentIdentifier::parse("USD123456S").unwrap();
        assert_eq!(id.serial(), "D123456");
        assert_eq!(id.kind(), Some("S"));
    }

    #[test]
    fn test_rejects_invalid_input() {
        for bad in ["", "   ", "12345", "ABCDEFGH", "US", "U1", "US#123", "---"] {
            let err = PatentIdentifier::parse(bad).unwrap_err();
            assert!(
                matches!(err, PatentError::InvalidIdentifier { .. }),
                "expected InvalidIdentifier for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejection_reasons() {
        let err = PatentIdentifier::parse("ABCDEFGH").unwrap_err();
        assert!(err.to_string().contains("digit"), "got: {err}");

        let err = PatentIdentifier::parse("12345").unwrap_err();
        assert!(err.to_string().contains("office"), "got: {err}");
    }

    #[test]
    fn test_idempotent_normalization() {
        for input in ["wo 2013078254 a1", "US-9,876,543-B2", "usre36479"] {
            let once = PatentIdentifier::parse(input).unwrap();
            let twice = PatentIdentifier::parse(once.canonical()).unwrap();
            assert_eq!(once.canonical(), twice.canonical());
            assert_eq!(once.kind(), twice.kind());
        }
    }

    #[test]
    fn test_display_canonical() {
        let id: PatentIdentifier = "wo2013078254a1".parse().unwrap();
        assert_eq!(id.to_string(), "WO2013078254A1");
        assert_eq!(id.raw(), "wo2013078254a1");
    }
}
