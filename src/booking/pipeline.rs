//! Two-phase staging/promotion pipeline.
//!
//! Cards are persisted in two steps: `stage` writes the card into the
//! freely-overwritable staging area, then `promote` copies the staged rows
//! into the permanent ledger under freshly allocated IDs and clears the
//! promoted drafts. Both phases map to a single store transaction, so a
//! failed write never leaves a half-written phase behind.

use chrono::Utc;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::errors::{BookingError, BookingResult};
use super::models::{
    LedgerBatch, LedgerLink, LedgerNote, LedgerSegment, StagedLink, StagedNote, StagedSegment,
    StagingBatch, StagingId,
};
use super::store::BookingStore;
use crate::card::Card;
use crate::roster::{Officials, PromotionId};

/// Pipeline state.
///
/// `Staged` remembers which promotion's card sits in the staging area;
/// promotion returns the pipeline to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Staged { promotion: PromotionId },
}

/// Booking persistence pipeline
pub struct BookingPipeline<S: BookingStore, R: Rng> {
    store: S,
    rng: R,
    state: PipelineState,
}

impl<S: BookingStore> BookingPipeline<S, StdRng> {
    /// Create a pipeline over the given store
    pub fn new(store: S) -> Self {
        Self {
            store,
            rng: StdRng::from_os_rng(),
            state: PipelineState::Idle,
        }
    }
}

impl<S: BookingStore, R: Rng> BookingPipeline<S, R> {
    /// Create a pipeline with an injected random source
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            store,
            rng,
            state: PipelineState::Idle,
        }
    }

    /// Current pipeline state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Stage a card, replacing whatever the staging area held.
    ///
    /// Staging is idempotent: every call starts from an empty staging area,
    /// so re-staging after a failed promotion simply overwrites the drafts.
    /// Returns the number of staged segments.
    pub async fn stage(&mut self, card: &Card) -> BookingResult<usize> {
        for entry in &card.entries {
            if !entry.matchup.contains(entry.winner) {
                return Err(BookingError::ForeignWinner {
                    segment: entry.name.clone(),
                    winner: entry.winner,
                });
            }
        }

        let mut batch = StagingBatch::default();
        for (i, entry) in card.entries.iter().enumerate() {
            let id = i as StagingId + 1;
            batch.segments.push(StagedSegment {
                id,
                promotion: card.promotion,
                name: entry.name.clone(),
                show: entry.show,
                template: entry.template,
                length_mins: entry.length_mins,
            });
            for (pos, participant) in entry.matchup.participants().enumerate() {
                batch.links.push(StagedLink {
                    segment: id,
                    promotion: card.promotion,
                    position: pos as u32 + 1,
                    participant,
                });
            }
            batch.notes.push(StagedNote {
                segment: id,
                promotion: card.promotion,
                winner: entry.winner,
            });
        }

        self.store.replace_staging(&batch).await?;
        self.state = PipelineState::Staged {
            promotion: card.promotion,
        };
        log::debug!(
            "Staged {} segments for promotion {}",
            batch.segments.len(),
            card.promotion
        );
        Ok(batch.segments.len())
    }

    /// Promote the staged card into the permanent ledger.
    ///
    /// Allocates a contiguous ID block one past the current ledger maximum
    /// and inverts segment order: the staged card lists the main event
    /// last, the ledger lists it first. Referee and road agent are drawn
    /// uniformly from the eligible officials; announcers are copied
    /// verbatim. The promoted staging rows are deleted in the same
    /// transaction, returning the pipeline to idle.
    pub async fn promote(&mut self, officials: &Officials) -> BookingResult<usize> {
        let PipelineState::Staged { promotion } = self.state else {
            return Err(BookingError::NotStaged);
        };

        let staged = self.store.load_staging(promotion).await?;
        if staged.is_empty() {
            return Err(BookingError::NothingStaged(promotion));
        }

        let base = self.store.max_ledger_id().await?;
        let total = staged.segments.len();
        let booked_at = Utc::now();

        let mut batch = LedgerBatch::default();
        let mut promoted: Vec<StagingId> = Vec::with_capacity(total);
        for (i, segment) in staged.segments.iter().enumerate() {
            let id = base + i as i64 + 1;
            promoted.push(segment.id);
            batch.segments.push(LedgerSegment {
                id,
                promotion,
                name: segment.name.clone(),
                // Staging order is ascending prominence; presentation
                // order counts down from the top of the card.
                segment_order: (total - i) as u32,
                main_show: true,
                template: segment.template,
                length_mins: segment.length_mins,
                referee: officials.referees.choose(&mut self.rng).copied(),
                road_agent: officials.road_agents.choose(&mut self.rng).copied(),
                announcers: officials.announcers,
                booked_at,
            });
            for link in staged.links.iter().filter(|l| l.segment == segment.id) {
                batch.links.push(LedgerLink {
                    segment: id,
                    promotion,
                    position: link.position,
                    participant: link.participant,
                });
            }
            for note in staged.notes.iter().filter(|n| n.segment == segment.id) {
                batch.notes.push(LedgerNote {
                    segment: id,
                    promotion,
                    winner: note.winner,
                });
            }
        }

        self.store.commit_promotion(&batch, &promoted).await?;
        self.state = PipelineState::Idle;
        log::debug!("Promoted {total} segments for promotion {promotion}");
        Ok(total)
    }

    /// Wipe the staging area and reset the pipeline to idle
    pub async fn clear(&mut self) -> BookingResult<()> {
        self.store.clear_staging().await?;
        self.state = PipelineState::Idle;
        Ok(())
    }
}
