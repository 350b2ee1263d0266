//! Hierarchy depth parsing from dotted positions.
//!
//! `1` and `1.0` are top-level (depth 0); every other position has a depth
//! equal to its number of dots: `1.1` -> 1, `1.1.2` -> 2.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::constants::defaults;

static POSITION_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9.\s]+$").expect("position pattern is a valid regex")
});

/// Parse the hierarchy depth of a position, `None` when it is not a dotted number
pub fn parse_level(raw: &str) -> Option<usize> {
    let position = raw.trim();
    if position.is_empty() {
        return None;
    }

    if !POSITION_CHARS.is_match(position) {
        warn!("Invalid position format: '{}' (non-numeric characters)", position);
        return None;
    }

    let segments: Vec<&str> = position.split('.').collect();
    for segment in &segments {
        let segment = segment.trim();
        if !segment.is_empty() && !segment.chars().all(|c| c.is_ascii_digit()) {
            warn!("Non-numeric segment '{}' in position '{}'", segment, position);
            return None;
        }
    }

    let level = match segments.as_slice() {
        [_] => 0,
        [_, second] if second.trim() == "0" => 0,
        _ => position.matches('.').count(),
    };

    if level > defaults::MAX_EXPECTED_DEPTH {
        warn!("Hierarchy level unusually deep: {} for position '{}'", level, position);
    }

    debug!("Position '{}' -> level {}", position, level);
    Some(level)
}

/// Whether a depth is beyond what the spreadsheets normally carry
pub fn is_anomalous_depth(level: usize) -> bool {
    level > defaults::MAX_EXPECTED_DEPTH
}
