//! Report aggregation
//!
//! Folds a participant's stored rounds into summary statistics. Pure
//! functions of their input: idempotent, and summaries are invariant under
//! reordering of the input records.

use crate::types::{
    GamesPlayed, OverallReport, OverallSummary, PublicGoodsRecord, PublicGoodsReport,
    PublicGoodsSummary, TrusteeStats, TrustorStats, TrustRecord, TrustReport, TrustRole,
    TrustSettlement, TrustSummary,
};

/// Aggregate Public Goods rounds into a report.
/// Rounds are returned sorted ascending by round number.
pub fn aggregate_public_goods(mut rounds: Vec<PublicGoodsRecord>) -> PublicGoodsReport {
    rounds.sort_by_key(|r| r.round);

    let total_rounds = rounds.len();
    let total_contribution: u64 = rounds.iter().map(|r| r.donation as u64).sum();
    let total_payoff: f64 = rounds.iter().map(|r| r.payoff).sum();

    let (average_contribution, average_payoff) = if total_rounds > 0 {
        (
            total_contribution as f64 / total_rounds as f64,
            total_payoff / total_rounds as f64,
        )
    } else {
        (0.0, 0.0)
    };

    PublicGoodsReport {
        summary: PublicGoodsSummary {
            total_rounds,
            total_contribution,
            total_payoff,
            average_contribution,
            average_payoff,
        },
        rounds,
    }
}

/// Aggregate Trust rounds into a report, optionally filtered by role.
/// Rounds are returned sorted ascending by round number.
pub fn aggregate_trust(rounds: Vec<TrustRecord>, role: Option<TrustRole>) -> TrustReport {
    let mut rounds: Vec<TrustRecord> = match role {
        Some(role) => rounds
            .into_iter()
            .filter(|r| r.settlement.role() == role)
            .collect(),
        None => rounds,
    };
    rounds.sort_by_key(|r| r.round);

    let mut trustor_rounds = 0usize;
    let mut total_investment = 0u64;
    let mut trustee_rounds = 0usize;
    let mut total_received = 0u64;
    let mut total_returned = 0u64;
    let mut return_rate_sum = 0.0f64;
    let mut return_rate_samples = 0usize;

    for record in &rounds {
        match record.settlement {
            TrustSettlement::Trustor { investment, .. } => {
                trustor_rounds += 1;
                total_investment += investment as u64;
            }
            TrustSettlement::Trustee {
                received_amount,
                return_amount,
                ..
            } => {
                trustee_rounds += 1;
                total_received += received_amount as u64;
                total_returned += return_amount as u64;
                if received_amount > 0 {
                    return_rate_sum += return_amount as f64 / received_amount as f64;
                    return_rate_samples += 1;
                }
            }
        }
    }

    let average_investment = if trustor_rounds > 0 {
        total_investment as f64 / trustor_rounds as f64
    } else {
        0.0
    };
    let average_return_rate = if return_rate_samples > 0 {
        return_rate_sum / return_rate_samples as f64
    } else {
        0.0
    };

    TrustReport {
        summary: TrustSummary {
            total_rounds: rounds.len(),
            trustor_stats: TrustorStats {
                rounds: trustor_rounds,
                total_investment,
                average_investment,
            },
            trustee_stats: TrusteeStats {
                rounds: trustee_rounds,
                total_received,
                total_returned,
                average_return_rate,
            },
        },
        rounds,
    }
}

/// Combine both game reports into one
pub fn aggregate_overall(
    public_goods: PublicGoodsReport,
    trust_game: TrustReport,
) -> OverallReport {
    let total_rounds = public_goods.summary.total_rounds + trust_game.summary.total_rounds;

    OverallReport {
        overall_summary: OverallSummary {
            total_rounds,
            public_goods_payoff: public_goods.summary.total_payoff,
            games_played: GamesPlayed {
                public_goods: public_goods.summary.total_rounds,
                trust_game: trust_game.summary.total_rounds,
            },
        },
        public_goods,
        trust_game,
    }
}
