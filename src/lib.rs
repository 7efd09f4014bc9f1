//! EcoPlay: behavioral-economics experiment backend
//!
//! Serves two game simulations (Public Goods Game, Trust Game), records
//! round decisions to a document store, and exposes aggregate reports.

pub mod core;
pub mod types;

// =============================================================================
// GAME PARAMETERS
// =============================================================================

/// Rounds per game session
pub const TOTAL_ROUNDS: u32 = 10;

/// Starting balance for every participant
pub const INITIAL_POINTS: u32 = 100;

/// Public Goods group size (1 human + 4 simulated players)
pub const NUM_PLAYERS: u32 = 5;

/// Common-pot multiplier for the Public Goods Game
pub const MULTIPLIER: f64 = 1.5;

/// Upper bound of each simulated counterpart donation
/// floor(INITIAL_POINTS * 0.25) = 25
pub const MAX_SIMULATED_DONATION: u32 = INITIAL_POINTS / 4;

/// Investment multiplier for the Trust Game
pub const TRUST_MULTIPLIER: u32 = 3;

// =============================================================================
// ADVISOR TIERS
// =============================================================================

/// Last round of the early tier (first template message)
pub const EARLY_ROUND_MAX: u32 = 3;

/// Last round of the mid tier (second template message)
pub const MID_ROUND_MAX: u32 = 7;

/// Balance above which the encouragement suffix is appended
pub const ENCOURAGE_BALANCE: f64 = 100.0;

/// Balance below which the caution suffix is appended
pub const CAUTION_BALANCE: f64 = 50.0;

// =============================================================================
// IDENTITY
// =============================================================================

/// Fixed email domain of participant identities; stripping it yields
/// the participant record number
pub const EMAIL_DOMAIN: &str = "@eco.play";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
