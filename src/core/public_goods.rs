//! Public Goods settlement
//!
//! One round: the participant donates into a common pot alongside 4 simulated
//! players, the pot is multiplied by 1.5 and split equally among all 5.
//!
//! Layered so the arithmetic is a pure function of its inputs: `settle` draws
//! the counterpart donations, `compute_round` does the rest.

use rand::Rng;

use crate::types::{ApiError, PublicGoodsOutcome, PublicGoodsRequest, Result};
use crate::{MAX_SIMULATED_DONATION, MULTIPLIER, NUM_PLAYERS};

/// Draw the 4 simulated counterpart donations, each uniform in [0, 25]
pub fn simulate_other_donations(rng: &mut impl Rng) -> Vec<u32> {
    (0..NUM_PLAYERS - 1)
        .map(|_| rng.gen_range(0..=MAX_SIMULATED_DONATION))
        .collect()
}

/// Settle one round from fixed donations. Pure arithmetic.
pub fn compute_round(
    donation: u32,
    other_donations: Vec<u32>,
    current_balance: f64,
) -> PublicGoodsOutcome {
    let total_donated = donation + other_donations.iter().sum::<u32>();
    let common_pot = total_donated as f64 * MULTIPLIER;
    let share_per_player = common_pot / NUM_PLAYERS as f64;
    let payoff = share_per_player - donation as f64;
    let new_balance = current_balance + payoff;

    let message = format!(
        "Donation: {}, total donated: {}, common pot: {:.1}, share received: {:.1}",
        donation, total_donated, common_pot, share_per_player
    );

    PublicGoodsOutcome {
        user_donation: donation,
        other_donations,
        total_donated,
        common_pot,
        share_per_player,
        payoff,
        new_balance,
        message,
    }
}

/// Validate and settle one Public Goods round
pub fn settle(request: &PublicGoodsRequest, rng: &mut impl Rng) -> Result<PublicGoodsOutcome> {
    if request.round < 1 {
        return Err(ApiError::MalformedInput(format!(
            "round must be >= 1, got {}",
            request.round
        )));
    }
    if request.donation as f64 > request.current_balance {
        return Err(ApiError::MalformedInput(format!(
            "donation {} exceeds current balance {}",
            request.donation, request.current_balance
        )));
    }

    let other_donations = simulate_other_donations(rng);
    Ok(compute_round(
        request.donation,
        other_donations,
        request.current_balance,
    ))
}
