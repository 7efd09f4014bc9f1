//! Persisted document shapes
//!
//! One record per submission, created once and never mutated (consent
//! documents are the exception: they support owner-checked updates).
//! Field names are load-bearing - reporting deserializes on exactly
//! these names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConsentDetails, TrustSettlement};

/// Stored Public Goods round: outcome fields plus identity metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicGoodsRecord {
    pub user_id: String,
    pub user_email: String,
    pub round: u32,
    pub donation: u32,
    pub other_donations: Vec<u32>,
    pub total_donated: u32,
    pub common_pot: f64,
    pub share_per_player: f64,
    pub payoff: f64,
    pub new_balance: f64,
    pub timestamp: DateTime<Utc>,
}

/// Stored Trust round: role-tagged settlement fields plus identity metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustRecord {
    pub user_id: String,
    pub user_email: String,
    pub round: u32,
    #[serde(flatten)]
    pub settlement: TrustSettlement,
    pub payoff: f64,
    pub new_balance: f64,
    pub timestamp: DateTime<Utc>,
}

/// Stored opponent match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub user_id: String,
    pub user_email: String,
    pub game_type: String,
    pub matched_personality: String,
    pub personality_description: String,
    pub return_rate_range: (f64, f64),
    pub timestamp: DateTime<Utc>,
}

/// Stored advisory message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub user_id: String,
    pub user_email: String,
    pub game_type: String,
    pub round: u32,
    pub content: String,
    /// Always "assistant" for generated messages
    pub role: String,
    pub timestamp: DateTime<Utc>,
}

/// Stored message feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_id: String,
    pub message_id: String,
    pub helpful: bool,
    pub timestamp: DateTime<Utc>,
}

/// Stored consent document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// Participant record number (owner id for consent lookups)
    pub user_id: String,
    pub user_email: String,
    pub consent_given: bool,
    pub consent_details: ConsentDetails,
    /// uid of the identity that submitted the document
    pub auth_uid: String,
    pub consent_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
