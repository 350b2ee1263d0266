//! Drawing number to component code normalization.
//!
//! `OLG12-06-1001` -> `G12061001`, `OLZ-03-058-032` -> `Z03058032`.

use crate::constants::{DRAWING_PREFIX, PURCHASED_PART_PREFIX, defaults};
use tracing::{debug, warn};

/// Anomalies noticed while normalizing a code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeWarning {
    /// Input shorter than three characters, kept unchanged
    TooShort,
    /// Normalized code longer than the expected maximum
    TooLong,
}

/// A normalized component code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCode {
    pub code: String,
    pub warning: Option<CodeWarning>,
}

/// Normalize a raw drawing number into a component code.
///
/// Returns `None` when the field is blank or nothing remains after stripping.
pub fn normalize_code(raw: &str) -> Option<NormalizedCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() < 3 {
        warn!("Code too short for conversion: '{}'", trimmed);
        return Some(NormalizedCode {
            code: trimmed.to_string(),
            warning: Some(CodeWarning::TooShort),
        });
    }

    let stripped = match trimmed.strip_prefix(DRAWING_PREFIX) {
        Some(rest) if rest.chars().next().is_some_and(char::is_alphabetic) => rest,
        _ => trimmed,
    };

    let code: String = stripped.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if code.is_empty() {
        warn!("Normalized code is empty for drawing number '{}'", trimmed);
        return None;
    }

    let warning = if code.chars().count() > defaults::MAX_CODE_LENGTH {
        warn!("Normalized code too long: '{}' (from '{}')", code, trimmed);
        Some(CodeWarning::TooLong)
    } else {
        None
    };

    debug!("Drawing number '{}' -> code '{}'", trimmed, code);
    Some(NormalizedCode { code, warning })
}

/// Whether a normalized code denotes a purchased (OLZ) part
pub fn is_purchased_part(code: &str) -> bool {
    code.starts_with(PURCHASED_PART_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> Option<String> {
        normalize_code(raw).map(|n| n.code)
    }

    #[test]
    fn test_prefix_and_separators_removed() {
        assert_eq!(code("OLG12-06-1001").as_deref(), Some("G12061001"));
        assert_eq!(code("OLZ-03-058-032").as_deref(), Some("Z03058032"));
        assert_eq!(code("OLC15-02-2001").as_deref(), Some("C15022001"));
        assert_eq!(code("OLY08-11-3005").as_deref(), Some("Y08113005"));
    }

    #[test]
    fn test_non_prefixed_code_kept() {
        assert_eq!(code("AB 12-34").as_deref(), Some("AB1234"));
        // "OL" followed by a digit is not the drawing prefix
        assert_eq!(code("OL1-234").as_deref(), Some("OL1234"));
    }

    #[test]
    fn test_blank_input_yields_none() {
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("   "), None);
    }

    #[test]
    fn test_short_input_returned_unchanged_with_warning() {
        let normalized = normalize_code(" A- ").unwrap();
        assert_eq!(normalized.code, "A-");
        assert_eq!(normalized.warning, Some(CodeWarning::TooShort));
    }

    #[test]
    fn test_only_separators_yields_none() {
        assert_eq!(normalize_code("- - -"), None);
        assert_eq!(code("----"), None);
        // prefix only stripped before a letter
        assert_eq!(code("OL- -").as_deref(), Some("OL"));
    }

    #[test]
    fn test_long_code_flagged() {
        let raw = format!("OLG{}", "1".repeat(60));
        let normalized = normalize_code(&raw).unwrap();
        assert_eq!(normalized.warning, Some(CodeWarning::TooLong));
    }

    #[test]
    fn test_purchased_part_detection() {
        assert!(is_purchased_part("Z03058032"));
        assert!(!is_purchased_part("G12061001"));
    }
}
