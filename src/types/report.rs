//! Aggregate report shapes
//!
//! Summaries are recomputed on every report request, never persisted.

use serde::Serialize;

use crate::types::{PublicGoodsRecord, TrustRecord};

/// Public Goods aggregate over one participant's rounds
#[derive(Debug, Clone, Serialize)]
pub struct PublicGoodsSummary {
    pub total_rounds: usize,
    pub total_contribution: u64,
    pub total_payoff: f64,
    /// 0 when no rounds were played
    pub average_contribution: f64,
    /// 0 when no rounds were played
    pub average_payoff: f64,
}

/// Public Goods report: summary plus rounds sorted ascending by round
#[derive(Debug, Clone, Serialize)]
pub struct PublicGoodsReport {
    pub summary: PublicGoodsSummary,
    pub rounds: Vec<PublicGoodsRecord>,
}

/// Aggregate over rounds played as trustor
#[derive(Debug, Clone, Serialize)]
pub struct TrustorStats {
    pub rounds: usize,
    pub total_investment: u64,
    /// 0 when no trustor rounds were played
    pub average_investment: f64,
}

/// Aggregate over rounds played as trustee
#[derive(Debug, Clone, Serialize)]
pub struct TrusteeStats {
    pub rounds: usize,
    pub total_received: u64,
    pub total_returned: u64,
    /// Mean of return_amount / received_amount over rounds with
    /// received_amount > 0; 0 when no round is eligible
    pub average_return_rate: f64,
}

/// Trust Game aggregate, split by role
#[derive(Debug, Clone, Serialize)]
pub struct TrustSummary {
    pub total_rounds: usize,
    pub trustor_stats: TrustorStats,
    pub trustee_stats: TrusteeStats,
}

/// Trust Game report: summary plus rounds sorted ascending by round
#[derive(Debug, Clone, Serialize)]
pub struct TrustReport {
    pub summary: TrustSummary,
    pub rounds: Vec<TrustRecord>,
}

/// Totals across both games
#[derive(Debug, Clone, Serialize)]
pub struct OverallSummary {
    pub total_rounds: usize,
    pub public_goods_payoff: f64,
    pub games_played: GamesPlayed,
}

#[derive(Debug, Clone, Serialize)]
pub struct GamesPlayed {
    pub public_goods: usize,
    pub trust_game: usize,
}

/// Combined report over both games
#[derive(Debug, Clone, Serialize)]
pub struct OverallReport {
    pub overall_summary: OverallSummary,
    pub public_goods: PublicGoodsReport,
    pub trust_game: TrustReport,
}
