//! Matchmaking error types.

use thiserror::Error;

use crate::roster::PromotionId;

/// Matchmaking errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchmakingError {
    /// Distribution percentages do not sum to 100
    #[error("Match size percentages must sum to 100, got {0}")]
    InvalidDistribution(u32),

    /// Zero eligible participants for the promotion
    #[error("No eligible participants for promotion {0}")]
    EmptyRoster(PromotionId),
}

pub type MatchmakingResult<T> = Result<T, MatchmakingError>;
