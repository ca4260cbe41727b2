//! Booking persistence and orchestration.
//!
//! This module implements:
//! - BookingStore: the persistence capability trait, with PostgreSQL and
//!   in-memory implementations
//! - BookingPipeline: the two-phase staging/promotion state machine
//! - Booker: the facade driving the auto-book, tournament, and manual
//!   card paths through the same pipeline

pub mod errors;
pub mod manager;
pub mod models;
pub mod pipeline;
pub mod store;

pub use errors::{BookingError, BookingResult};
pub use manager::{AutoBookConfig, Booker, BookingSummary, DEFAULT_MATCH_COUNT};
pub use models::{
    LedgerBatch, LedgerId, LedgerLink, LedgerNote, LedgerSegment, StagedLink, StagedNote,
    StagedSegment, StagingBatch, StagingId,
};
pub use pipeline::{BookingPipeline, PipelineState};
pub use store::{BookingStore, MemoryBookingStore, PgBookingStore};
