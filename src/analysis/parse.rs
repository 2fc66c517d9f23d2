//! Lenient parsing of upstream result fields.
//!
//! The results API encodes every number as a string and is free to send
//! markers, blanks or garbage. Everything here is total: malformed input
//! maps to "absent" or zero, never to an error.

/// A parsed finishing position.
///
/// Ordering puts every classified position ahead of `Unclassified`, and
/// lower positions ahead of higher ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Classified(u32),
    Unclassified,
}

impl Position {
    /// Returns the position number when classified.
    pub fn classified(self) -> Option<u32> {
        match self {
            Position::Classified(n) => Some(n),
            Position::Unclassified => None,
        }
    }

    pub fn is_win(self) -> bool {
        self == Position::Classified(1)
    }

    pub fn is_podium(self) -> bool {
        matches!(self, Position::Classified(1..=3))
    }
}

/// Parse a finishing position. Non-numeric and non-positive values are
/// `Unclassified`.
pub fn parse_position(raw: &str) -> Position {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => u32::try_from(n)
            .map(Position::Classified)
            .unwrap_or(Position::Unclassified),
        _ => Position::Unclassified,
    }
}

/// Parse a starting grid slot. `0`, blanks and garbage mean no valid slot.
pub fn parse_grid(raw: Option<&str>) -> Option<u32> {
    parse_position(raw?).classified()
}

/// Parse awarded points; anything unparseable or non-finite counts as zero.
pub fn parse_points(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

/// Whether an optional rank or classification field reads as first.
/// Used for pole positions and fastest-lap ranks.
pub fn is_first(raw: Option<&str>) -> bool {
    raw.map(parse_position).is_some_and(Position::is_win)
}

/// Whether a status string denotes a classified finisher.
///
/// Matches `Finished` and lapped finishers (`+1 Lap`, `+3 Laps`). Anything
/// else (`Retired`, `Engine`, `Disqualified`, ...) counts as a DNF. This is a
/// substring heuristic over the provider's status vocabulary.
pub fn is_finish(status: &str) -> bool {
    status.contains("Finished") || status.contains("Lap")
}
