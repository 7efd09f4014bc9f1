//! Trust settlement
//!
//! Trustor rounds: the investment is tripled, a simulated counterpart drawn
//! from the personality table returns a share of it. Trustee rounds: the
//! participant keeps what they do not return.
//!
//! New balance is `current_balance + payoff` for both roles - the simulated
//! return is realized income for the round.

use rand::Rng;

use crate::types::{
    ApiError, OpponentPersonality, Result, TrustDecision, TrustOutcome, TrustRequest,
    TrustSettlement, OPPONENT_PERSONALITIES,
};
use crate::TRUST_MULTIPLIER;

/// Settle a trustor round from a fixed personality and return rate.
/// Pure arithmetic.
pub fn compute_trustor_round(
    investment: u32,
    personality: &OpponentPersonality,
    return_rate: f64,
    current_balance: f64,
) -> TrustOutcome {
    let multiplied_amount = investment * TRUST_MULTIPLIER;
    let returned_amount = (multiplied_amount as f64 * return_rate).floor() as u32;
    let payoff = returned_amount as f64 - investment as f64;
    let new_balance = current_balance + payoff;

    let message = format!(
        "Invested: {}, tripled: {}, counterpart ({}) returned: {}",
        investment, multiplied_amount, personality.name, returned_amount
    );

    TrustOutcome {
        payoff,
        new_balance,
        message,
        settlement: TrustSettlement::Trustor {
            investment,
            multiplied_amount,
            opponent_personality: personality.name.to_string(),
            return_rate,
            returned_amount,
        },
    }
}

/// Settle a trustee round. Pure arithmetic.
pub fn compute_trustee_round(
    received_amount: u32,
    return_amount: u32,
    current_balance: f64,
) -> TrustOutcome {
    let points_kept = received_amount - return_amount;
    let payoff = points_kept as f64;
    let new_balance = current_balance + payoff;

    let message = format!(
        "Received: {}, returned: {}, kept: {}",
        received_amount, return_amount, points_kept
    );

    TrustOutcome {
        payoff,
        new_balance,
        message,
        settlement: TrustSettlement::Trustee {
            received_amount,
            return_amount,
            points_kept,
        },
    }
}

/// Validate and settle one Trust round, branching on role
pub fn settle(request: &TrustRequest, rng: &mut impl Rng) -> Result<TrustOutcome> {
    if request.round < 1 {
        return Err(ApiError::MalformedInput(format!(
            "round must be >= 1, got {}",
            request.round
        )));
    }

    match request.decision {
        TrustDecision::Trustor { investment } => {
            if investment as f64 > request.current_balance {
                return Err(ApiError::MalformedInput(format!(
                    "investment {} exceeds current balance {}",
                    investment, request.current_balance
                )));
            }

            let personality = &OPPONENT_PERSONALITIES[rng.gen_range(0..OPPONENT_PERSONALITIES.len())];
            let (rate_min, rate_max) = personality.return_rate_range;
            let return_rate = rng.gen_range(rate_min..=rate_max);

            Ok(compute_trustor_round(
                investment,
                personality,
                return_rate,
                request.current_balance,
            ))
        }
        TrustDecision::Trustee {
            received_amount,
            return_amount,
        } => {
            if return_amount > received_amount {
                return Err(ApiError::MalformedInput(format!(
                    "return amount {} exceeds received amount {}",
                    return_amount, received_amount
                )));
            }

            Ok(compute_trustee_round(
                received_amount,
                return_amount,
                request.current_balance,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrustRole;
    use pretty_assertions::assert_eq;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fair_receiver() -> &'static OpponentPersonality {
        OPPONENT_PERSONALITIES
            .iter()
            .find(|p| p.name == "Fair Receiver")
            .unwrap()
    }

    #[test]
    fn test_trustee_known_round() {
        // received 30, returned 10, balance 100
        let outcome = compute_trustee_round(30, 10, 100.0);
        assert_eq!(outcome.payoff, 20.0);
        assert_eq!(outcome.new_balance, 120.0);
        match outcome.settlement {
            TrustSettlement::Trustee { points_kept, .. } => assert_eq!(points_kept, 20),
            _ => panic!("expected trustee settlement"),
        }
    }

    #[test]
    fn test_trustor_known_round() {
        // invest 10 at a fixed 0.5 return rate
        let outcome = compute_trustor_round(10, fair_receiver(), 0.5, 100.0);
        assert_eq!(outcome.payoff, 5.0);
        assert_eq!(outcome.new_balance, 105.0);
        match outcome.settlement {
            TrustSettlement::Trustor {
                multiplied_amount,
                returned_amount,
                ..
            } => {
                assert_eq!(multiplied_amount, 30);
                assert_eq!(returned_amount, 15);
            }
            _ => panic!("expected trustor settlement"),
        }
    }

    #[test]
    fn test_trustor_return_floors() {
        // 7 * 3 = 21, 21 * 0.55 = 11.55 -> 11
        let outcome = compute_trustor_round(7, fair_receiver(), 0.55, 100.0);
        match outcome.settlement {
            TrustSettlement::Trustor { returned_amount, .. } => assert_eq!(returned_amount, 11),
            _ => panic!("expected trustor settlement"),
        }
    }

    #[test]
    fn test_trustor_drawn_rate_within_personality_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let request = TrustRequest {
                round: 1,
                current_balance: 100.0,
                decision: TrustDecision::Trustor { investment: 10 },
            };
            let outcome = settle(&request, &mut rng).unwrap();
            match outcome.settlement {
                TrustSettlement::Trustor {
                    ref opponent_personality,
                    return_rate,
                    returned_amount,
                    multiplied_amount,
                    ..
                } => {
                    let personality = OPPONENT_PERSONALITIES
                        .iter()
                        .find(|p| p.name == opponent_personality.as_str())
                        .expect("drawn personality must be in the table");
                    let (min, max) = personality.return_rate_range;
                    assert!(return_rate >= min && return_rate <= max);
                    assert_eq!(
                        returned_amount,
                        (multiplied_amount as f64 * return_rate).floor() as u32
                    );
                }
                _ => panic!("expected trustor settlement"),
            }
        }
    }

    #[test]
    fn test_trustee_over_return_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let request = TrustRequest {
            round: 1,
            current_balance: 100.0,
            decision: TrustDecision::Trustee {
                received_amount: 30,
                return_amount: 40,
            },
        };
        let err = settle(&request, &mut rng).unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)));
    }

    #[test]
    fn test_trustor_over_investment_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let request = TrustRequest {
            round: 1,
            current_balance: 50.0,
            decision: TrustDecision::Trustor { investment: 60 },
        };
        let err = settle(&request, &mut rng).unwrap_err();
        assert!(matches!(err, ApiError::MalformedInput(_)));
    }

    #[test]
    fn test_trustee_full_return_keeps_nothing() {
        let outcome = compute_trustee_round(30, 30, 100.0);
        assert_eq!(outcome.payoff, 0.0);
        assert_eq!(outcome.new_balance, 100.0);
    }

    #[test]
    fn test_settle_reports_role() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let request = TrustRequest {
            round: 1,
            current_balance: 100.0,
            decision: TrustDecision::Trustor { investment: 10 },
        };
        let outcome = settle(&request, &mut rng).unwrap();
        assert_eq!(outcome.settlement.role(), TrustRole::Trustor);
    }
}
