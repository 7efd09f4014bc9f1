//! Opponent personality table for the Trust Game
//!
//! Fixed set of 4 behavioral archetypes. Each entry bounds the simulated
//! counterpart's return rate. Read-only after process start.

use serde::Serialize;

/// A named behavioral profile for the simulated Trust Game counterpart
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OpponentPersonality {
    /// Display name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Inclusive [min, max] bounds of the return rate, within [0, 1]
    pub return_rate_range: (f64, f64),
}

/// The four opponent archetypes
pub const OPPONENT_PERSONALITIES: [OpponentPersonality; 4] = [
    OpponentPersonality {
        name: "Cautious Receiver",
        description: "Returns little of what was entrusted (10-30%)",
        return_rate_range: (0.1, 0.3),
    },
    OpponentPersonality {
        name: "Fair Receiver",
        description: "Returns a moderate share (40-60%)",
        return_rate_range: (0.4, 0.6),
    },
    OpponentPersonality {
        name: "Generous Receiver",
        description: "Returns most of what was entrusted (70-90%)",
        return_rate_range: (0.7, 0.9),
    },
    OpponentPersonality {
        name: "Unpredictable Receiver",
        description: "Return rate varies widely (10-90%)",
        return_rate_range: (0.1, 0.9),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_personalities() {
        assert_eq!(OPPONENT_PERSONALITIES.len(), 4);
    }

    #[test]
    fn test_ranges_within_unit_interval() {
        for p in &OPPONENT_PERSONALITIES {
            let (min, max) = p.return_rate_range;
            assert!(min >= 0.0 && max <= 1.0, "{} range out of [0,1]", p.name);
            assert!(min <= max, "{} has inverted range", p.name);
        }
    }
}
