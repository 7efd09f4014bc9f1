//! Core types for EcoPlay

mod consent;
mod error;
mod game;
mod matching;
mod message;
mod personality;
mod record;
mod report;

pub use consent::{ConsentDetails, ConsentRequest, ConsentStatus};
pub use error::{ApiError, Result};
pub use game::{
    GameType, PublicGoodsOutcome, PublicGoodsRequest, TrustDecision, TrustOutcome, TrustRequest,
    TrustRole, TrustSettlement,
};
pub use matching::{MatchRequest, MatchResult};
pub use message::{MessageRequest, MessageResponse, PerformanceData};
pub use personality::{OpponentPersonality, OPPONENT_PERSONALITIES};
pub use record::{
    ConsentRecord, FeedbackRecord, MatchRecord, MessageRecord, PublicGoodsRecord, TrustRecord,
};
pub use report::{
    GamesPlayed, OverallReport, OverallSummary, PublicGoodsReport, PublicGoodsSummary,
    TrusteeStats, TrustorStats, TrustReport, TrustSummary,
};
