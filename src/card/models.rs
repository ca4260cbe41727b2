//! Card data models: timing plans, template selection, and the fully
//! resolved card entries produced by the assembler.

use serde::{Deserialize, Serialize};

use crate::matchmaking::{Match, MatchSize};
use crate::roster::{ParticipantId, PromotionId, ShowId, TemplateId};

/// Default main event length in minutes
pub const DEFAULT_MAIN_EVENT_MINS: u32 = 20;

/// Default co-main event length in minutes
pub const DEFAULT_CO_MAIN_MINS: u32 = 17;

/// Default undercard length range in minutes
pub const DEFAULT_OTHER_MINS: (u32, u32) = (8, 15);

/// Segment lengths for a card.
///
/// The main event and co-main get fixed lengths; everything else draws a
/// uniform length from the inclusive `other` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingPlan {
    pub main_mins: u32,
    pub co_main_mins: u32,
    pub other_min: u32,
    pub other_max: u32,
}

impl Default for TimingPlan {
    fn default() -> Self {
        Self {
            main_mins: DEFAULT_MAIN_EVENT_MINS,
            co_main_mins: DEFAULT_CO_MAIN_MINS,
            other_min: DEFAULT_OTHER_MINS.0,
            other_max: DEFAULT_OTHER_MINS.1,
        }
    }
}

/// Match template (move-set reference) to book for each match size.
///
/// Template IDs come from the external store; the engine only carries them
/// through onto the booked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub singles: TemplateId,
    pub tag: TemplateId,
    pub trios: TemplateId,
    pub quad: TemplateId,
    pub five: TemplateId,
}

impl TemplateSelection {
    /// Use the same template for every size
    pub fn uniform(template: TemplateId) -> Self {
        Self {
            singles: template,
            tag: template,
            trios: template,
            quad: template,
            five: template,
        }
    }

    /// Template for a given match size
    pub fn for_size(&self, size: MatchSize) -> TemplateId {
        match size {
            MatchSize::Singles => self.singles,
            MatchSize::Tag => self.tag,
            MatchSize::Trios => self.trios,
            MatchSize::Quad => self.quad,
            MatchSize::Five => self.five,
        }
    }
}

/// A fully resolved card entry, ready for staging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    /// The underlying match
    pub matchup: Match,
    /// Display name, e.g. "El Generico vs Kevin Steen"
    pub name: String,
    /// Declared winner; always one of the match's participants
    pub winner: ParticipantId,
    /// Segment length in minutes
    pub length_mins: u32,
    /// Match template to book against
    pub template: TemplateId,
    /// Show slot the entry is assigned to
    pub show: ShowId,
    /// 1-based position within the card; highest = main event
    pub segment_order: u32,
}

/// An ordered card for one booking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub promotion: PromotionId,
    /// Entries in segment order (ascending, main event last)
    pub entries: Vec<CardEntry>,
}

impl Card {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The main event: the entry at the highest segment order
    pub fn main_event(&self) -> Option<&CardEntry> {
        self.entries.last()
    }
}
