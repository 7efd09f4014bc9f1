//! Round inputs and outcomes for both games

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ApiError;

/// Supported game types, as they appear in requests and stored records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// Public Goods Game
    PublicGoods,
    /// Trust Game, either role (history/report lookups)
    TrustGame,
    /// Trust Game, investor side
    TrustGameTrustor,
    /// Trust Game, returning side
    TrustGameTrustee,
}

impl GameType {
    /// Document-store collection backing this game type
    pub fn collection(&self) -> &'static str {
        match self {
            GameType::PublicGoods => crate::core::store::COLLECTION_PUBLIC_GOODS,
            GameType::TrustGame | GameType::TrustGameTrustor | GameType::TrustGameTrustee => {
                crate::core::store::COLLECTION_TRUST_GAME
            }
        }
    }
}

impl FromStr for GameType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public_goods" => Ok(GameType::PublicGoods),
            "trust_game" => Ok(GameType::TrustGame),
            "trust_game_trustor" => Ok(GameType::TrustGameTrustor),
            "trust_game_trustee" => Ok(GameType::TrustGameTrustee),
            other => Err(ApiError::UnsupportedGameType(other.to_string())),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::PublicGoods => "public_goods",
            GameType::TrustGame => "trust_game",
            GameType::TrustGameTrustor => "trust_game_trustor",
            GameType::TrustGameTrustee => "trust_game_trustee",
        };
        write!(f, "{}", name)
    }
}

/// Trust Game participant role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustRole {
    /// Decides how much to invest
    Trustor,
    /// Receives the multiplied investment and decides how much to return
    Trustee,
}

impl FromStr for TrustRole {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trustor" => Ok(TrustRole::Trustor),
            "trustee" => Ok(TrustRole::Trustee),
            other => Err(ApiError::UnsupportedRole(other.to_string())),
        }
    }
}

impl fmt::Display for TrustRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustRole::Trustor => write!(f, "trustor"),
            TrustRole::Trustee => write!(f, "trustee"),
        }
    }
}

// =============================================================================
// PUBLIC GOODS
// =============================================================================

/// One Public Goods round submission
#[derive(Debug, Clone, Deserialize)]
pub struct PublicGoodsRequest {
    /// Round number, 1-based
    pub round: u32,
    /// Points donated to the common pot
    pub donation: u32,
    /// Balance before this round
    pub current_balance: f64,
}

/// Settled Public Goods round. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicGoodsOutcome {
    pub user_donation: u32,
    /// Raw simulated counterpart donations, kept for transparency
    pub other_donations: Vec<u32>,
    pub total_donated: u32,
    pub common_pot: f64,
    pub share_per_player: f64,
    pub payoff: f64,
    pub new_balance: f64,
    pub message: String,
}

// =============================================================================
// TRUST GAME
// =============================================================================

/// The role-specific decision of one Trust Game round.
///
/// Tagged on `role` so each branch is fully typed; the wire format stays
/// `{"role": "trustor", "investment": 10}` etc.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum TrustDecision {
    Trustor {
        /// Points invested with the counterpart
        investment: u32,
    },
    Trustee {
        /// Points received from the counterpart (already multiplied)
        received_amount: u32,
        /// Points returned to the counterpart
        return_amount: u32,
    },
}

impl TrustDecision {
    pub fn role(&self) -> TrustRole {
        match self {
            TrustDecision::Trustor { .. } => TrustRole::Trustor,
            TrustDecision::Trustee { .. } => TrustRole::Trustee,
        }
    }
}

/// One Trust Game round submission
#[derive(Debug, Clone, Deserialize)]
pub struct TrustRequest {
    /// Round number, 1-based
    pub round: u32,
    /// Balance before this round
    pub current_balance: f64,
    #[serde(flatten)]
    pub decision: TrustDecision,
}

/// Role-specific derived fields of a settled Trust round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum TrustSettlement {
    Trustor {
        investment: u32,
        /// investment * 3, handed to the simulated counterpart
        multiplied_amount: u32,
        /// Name of the drawn opponent archetype
        opponent_personality: String,
        /// Drawn return rate within the archetype's range
        return_rate: f64,
        /// floor(multiplied_amount * return_rate)
        returned_amount: u32,
    },
    Trustee {
        received_amount: u32,
        return_amount: u32,
        points_kept: u32,
    },
}

impl TrustSettlement {
    pub fn role(&self) -> TrustRole {
        match self {
            TrustSettlement::Trustor { .. } => TrustRole::Trustor,
            TrustSettlement::Trustee { .. } => TrustRole::Trustee,
        }
    }
}

/// Settled Trust round. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustOutcome {
    pub payoff: f64,
    pub new_balance: f64,
    pub message: String,
    #[serde(flatten)]
    pub settlement: TrustSettlement,
}
