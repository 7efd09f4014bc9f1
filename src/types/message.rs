//! Advisory message requests and responses

use serde::{Deserialize, Serialize};

/// Performance snapshot used to personalize the advisory message
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PerformanceData {
    /// Participant balance after the latest round
    pub balance: f64,
}

/// Request for an advisory message
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    /// Game type key, e.g. "public_goods", "trust_game_trustor"
    pub game_type: String,
    /// Round number, 1-based
    pub round: u32,
    pub performance_data: Option<PerformanceData>,
}

/// Generated advisory message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub content: String,
    pub role: String,
    pub timestamp: String,
}
