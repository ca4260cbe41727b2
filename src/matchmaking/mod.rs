//! Constrained matchmaking.
//!
//! Given a roster snapshot, a desired match-size mix, and a booking policy,
//! the engine produces unordered matches with resolved sides, booking each
//! participant at most once per run. Tiers relax in order: faction
//! cohesion, weight class (singles), alignment balance, then uniform
//! random selection.

pub mod engine;
pub mod errors;
pub mod models;

pub use engine::MatchmakingEngine;
pub use errors::{MatchmakingError, MatchmakingResult};
pub use models::{BookingPolicy, BuildOutcome, Match, MatchSize, SizeDistribution};
