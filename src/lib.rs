//! # Ring Booker
//!
//! A wrestling booking engine: round-robin tournament scheduling,
//! constrained matchmaking, card assembly, and a two-phase
//! staging-then-promotion persistence pipeline over an external relational
//! store.
//!
//! ## Architecture
//!
//! A booking run flows through four stages:
//!
//! - **Roster snapshot**: a [`roster::RosterRepository`] resolves a
//!   promotion into typed, read-only talent records
//! - **Pairing**: either the [`schedule::RoundRobinScheduler`] (tournament
//!   path) or the [`matchmaking::MatchmakingEngine`] (auto-book path)
//!   produces matches with resolved sides
//! - **Assembly**: the [`card::CardAssembler`] orders matches by
//!   prominence, assigns lengths and show slots, and stubs out winners
//! - **Persistence**: the [`booking::BookingPipeline`] stages the card into
//!   the draft area, then promotes it into the permanent ledger under
//!   fresh IDs with inverted presentation order
//!
//! The [`booking::Booker`] facade drives all three booking paths
//! (auto-booker, round-robin tournaments, and manual cards) through the
//! same pipeline.
//!
//! Every randomized component takes an injectable RNG, so tests pin a seed
//! and assert on the combinatorial invariants directly.
//!
//! ## Example
//!
//! ```
//! use ring_booker::schedule::RoundRobinScheduler;
//!
//! // Four entrants meet in three rounds of two matches each
//! let schedule = RoundRobinScheduler::new()
//!     .generate(&[1i64, 2, 3, 4])
//!     .unwrap();
//! assert_eq!(schedule.len(), 3);
//! assert_eq!(schedule.pairing_count(), 6);
//! ```

/// Roster snapshot loading and typed talent records.
pub mod roster;
pub use roster::{Participant, ParticipantId, PromotionId, RosterSnapshot};

/// Round-robin tournament scheduling.
pub mod schedule;
pub use schedule::{RoundRobinScheduler, Schedule};

/// Constrained matchmaking.
pub mod matchmaking;
pub use matchmaking::{BookingPolicy, Match, MatchSize, MatchmakingEngine, SizeDistribution};

/// Card assembly: ordering, timing, outcomes, show slots.
pub mod card;
pub use card::{Card, CardAssembler, TemplateSelection, TimingPlan};

/// Booking persistence and orchestration.
pub mod booking;
pub use booking::{Booker, BookingError, BookingPipeline, BookingStore, MemoryBookingStore};
