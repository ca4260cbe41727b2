//! Roster snapshot loading and typed talent records.
//!
//! This module is the read-side boundary of the engine: a
//! [`RosterRepository`] resolves a promotion into a [`RosterSnapshot`] of
//! typed records, and every downstream component consumes the snapshot
//! without ever reaching back into the store.

pub mod models;
pub mod repository;

pub use models::{
    Alignment, DEFAULT_PROMINENCE, Faction, FactionId, Gender, MAX_FACTION_MEMBERS, Officials,
    Participant, ParticipantId, PromotionId, RosterSnapshot, ShowId, TagTeam, TeamId, TemplateId,
    WeightClass,
};
pub use repository::{PgRosterRepository, RosterError, RosterRepository, RosterResult};
