//! Opponent matching requests and results

use serde::{Deserialize, Serialize};

/// Request to match an opponent personality
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    /// Game type tag, only "trust-game" is matchable
    pub game_type: String,
}

/// A recorded opponent match
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub user_id: String,
    pub matched_personality: String,
    pub match_id: String,
    pub timestamp: String,
    pub description: String,
}
