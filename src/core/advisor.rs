//! Advisory message selection
//!
//! Rule-based picker over a fixed ordered table per game type:
//! - round <= 3: first message (basic strategy)
//! - round <= 7: second message (situation analysis)
//! - round > 7: uniform random choice (late-game strategy)
//!
//! A performance suffix is appended when the balance is notably high or low.

use rand::Rng;

use crate::types::{ApiError, GameType, PerformanceData, Result};
use crate::{CAUTION_BALANCE, EARLY_ROUND_MAX, ENCOURAGE_BALANCE, MID_ROUND_MAX};

/// Suffix appended when the balance exceeds ENCOURAGE_BALANCE
const ENCOURAGE_SUFFIX: &str = " You are doing well so far!";

/// Suffix appended when the balance is below CAUTION_BALANCE
const CAUTION_SUFFIX: &str = " It may be worth rethinking your strategy.";

const PUBLIC_GOODS_MESSAGES: [&str; 4] = [
    "Cooperating with the other players can benefit everyone.",
    "Consider the balance between your own interest and the group's interest.",
    "Donations increase the payoff of the whole group.",
    "Watch how the other players' donation patterns develop.",
];

const TRUSTOR_MESSAGES: [&str; 4] = [
    "Read your counterpart's personality before deciding how much to invest.",
    "A measured investment can create gains for both sides.",
    "Investing everything at once can be risky.",
    "Use your counterpart's responses to gauge how much they can be trusted.",
];

const TRUSTEE_MESSAGES: [&str; 4] = [
    "Trust is reciprocal. Returning an appropriate amount matters.",
    "Consider a fair return for the amount your counterpart invested.",
    "Think about decisions that sustain a long-term relationship.",
    "Trust takes time to build and only a moment to break.",
];

/// Candidate messages for a game type, if it has any
fn messages_for(game_type: GameType) -> Option<&'static [&'static str]> {
    match game_type {
        GameType::PublicGoods => Some(&PUBLIC_GOODS_MESSAGES),
        GameType::TrustGameTrustor => Some(&TRUSTOR_MESSAGES),
        GameType::TrustGameTrustee => Some(&TRUSTEE_MESSAGES),
        GameType::TrustGame => None,
    }
}

/// Pick an advisory message for the given round and performance
pub fn select_message(
    game_type: GameType,
    round: u32,
    performance: Option<&PerformanceData>,
    rng: &mut impl Rng,
) -> Result<String> {
    let messages =
        messages_for(game_type).ok_or_else(|| ApiError::UnsupportedGameType(game_type.to_string()))?;

    let base = if round <= EARLY_ROUND_MAX {
        messages[0]
    } else if round <= MID_ROUND_MAX {
        if messages.len() > 1 {
            messages[1]
        } else {
            messages[0]
        }
    } else {
        messages[rng.gen_range(0..messages.len())]
    };

    let mut selected = base.to_string();

    if let Some(perf) = performance {
        if perf.balance > ENCOURAGE_BALANCE {
            selected.push_str(ENCOURAGE_SUFFIX);
        } else if perf.balance < CAUTION_BALANCE {
            selected.push_str(CAUTION_SUFFIX);
        }
    }

    Ok(selected)
}
