//! Booking and persistence error types.

use thiserror::Error;

use crate::card::CardError;
use crate::matchmaking::MatchmakingError;
use crate::roster::{ParticipantId, PromotionId, RosterError};
use crate::schedule::ScheduleError;

/// Booking errors
#[derive(Debug, Error)]
pub enum BookingError {
    /// Write or read against the persistence sink failed; the surrounding
    /// transaction has been rolled back
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Matchmaking error: {0}")]
    Matchmaking(#[from] MatchmakingError),

    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// `promote` called without a staged card
    #[error("Pipeline has no staged card to promote")]
    NotStaged,

    /// The staging area held no rows for the promotion at promote time
    #[error("Nothing staged for promotion {0}")]
    NothingStaged(PromotionId),

    /// A card entry declared a winner from outside its own match
    #[error("Declared winner {winner} is not booked in '{segment}'")]
    ForeignWinner {
        segment: String,
        winner: ParticipantId,
    },

    /// Tournament entrants had differing team sizes
    #[error("Tournament entrants must share one team size, found {0} and {1}")]
    MixedTeamSizes(usize, usize),

    /// No match size exists for the given per-side count
    #[error("Unsupported team size: {0}")]
    UnsupportedTeamSize(usize),

    /// Fewer show slots than tournament rounds
    #[error("Not enough shows for all tournament rounds: need {needed}, have {have}")]
    NotEnoughShows { needed: usize, have: usize },
}

pub type BookingResult<T> = Result<T, BookingError>;
