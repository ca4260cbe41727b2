//! Write-side records: staged drafts and permanent ledger rows.
//!
//! A staged row is a freely overwritable draft keyed by a pre-ledger
//! surrogate ID; a ledger row is the permanent, ordered record. Ledger
//! links and notes only ever reference participants from their originating
//! match; the pipeline validates this before staging anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::{ParticipantId, PromotionId, ShowId, TemplateId};

/// Surrogate key for staged rows
pub type StagingId = i64;

/// Permanent ledger row ID
pub type LedgerId = i64;

/// A staged (draft) match row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedSegment {
    pub id: StagingId,
    pub promotion: PromotionId,
    /// Display name carried through to the ledger
    pub name: String,
    /// Show slot the draft is assigned to
    pub show: ShowId,
    /// Match template reference
    pub template: TemplateId,
    /// Length in minutes
    pub length_mins: u32,
}

/// A staged participant link, ordered by side position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedLink {
    pub segment: StagingId,
    pub promotion: PromotionId,
    /// 1-based position: side A first, then side B
    pub position: u32,
    pub participant: ParticipantId,
}

/// A staged outcome note encoding the declared winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedNote {
    pub segment: StagingId,
    pub promotion: PromotionId,
    pub winner: ParticipantId,
}

/// All staged rows for one staging write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingBatch {
    pub segments: Vec<StagedSegment>,
    pub links: Vec<StagedLink>,
    pub notes: Vec<StagedNote>,
}

impl StagingBatch {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A permanent ledger match row.
///
/// Segment order follows the presentation convention: the main event is
/// order 1, the opener is order N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSegment {
    pub id: LedgerId,
    pub promotion: PromotionId,
    pub name: String,
    /// 1-based presentation position; 1 = main event
    pub segment_order: u32,
    /// Booked onto the main show rather than the pre-show
    pub main_show: bool,
    pub template: TemplateId,
    pub length_mins: u32,
    /// Referee drawn from the promotion's eligible officials
    pub referee: Option<ParticipantId>,
    /// Road agent drawn from the promotion's eligible officials
    pub road_agent: Option<ParticipantId>,
    /// Announcer triple copied verbatim from promotion settings
    pub announcers: [Option<ParticipantId>; 3],
    pub booked_at: DateTime<Utc>,
}

/// A permanent participant link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLink {
    pub segment: LedgerId,
    pub promotion: PromotionId,
    pub position: u32,
    pub participant: ParticipantId,
}

/// A permanent outcome note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerNote {
    pub segment: LedgerId,
    pub promotion: PromotionId,
    pub winner: ParticipantId,
}

/// All ledger rows for one promotion write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBatch {
    pub segments: Vec<LedgerSegment>,
    pub links: Vec<LedgerLink>,
    pub notes: Vec<LedgerNote>,
}
