//! Card assembly: ordering, timing, outcomes, and show slots.
//!
//! The assembler turns unordered matches into a presentable card. Matches
//! are ranked by mean participant prominence, lowest first, so the
//! strongest match closes the show. Winners are outcome stubs picked
//! uniformly from each match's participants; no in-match simulation
//! happens here.

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use super::models::{Card, CardEntry, TemplateSelection, TimingPlan};
use crate::matchmaking::Match;
use crate::roster::{ParticipantId, PromotionId, RosterSnapshot, ShowId};

/// Card assembly errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    /// No show slots to place matches on
    #[error("No show slots available for promotion {0}")]
    NoShowSlots(PromotionId),

    /// A match with no participants cannot be resolved
    #[error("Match has no participants")]
    EmptyMatch,

    /// The undercard length range is inverted
    #[error("Invalid length range: {min}..={max}")]
    InvalidTiming { min: u32, max: u32 },
}

pub type CardResult<T> = Result<T, CardError>;

/// Card assembler
pub struct CardAssembler<R: Rng> {
    rng: R,
}

impl CardAssembler<ThreadRng> {
    /// Create an assembler backed by the thread RNG
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for CardAssembler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CardAssembler<R> {
    /// Create an assembler with an injected random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Assemble matches into an ordered card.
    ///
    /// Matches are sorted ascending by mean prominence; the last entry is
    /// the main event and gets `timing.main_mins`, the second-to-last gets
    /// `timing.co_main_mins`, and the rest draw from the undercard range.
    /// Entries are distributed round-robin across `shows`.
    pub fn assemble(
        &mut self,
        matches: Vec<Match>,
        roster: &RosterSnapshot,
        shows: &[ShowId],
        timing: &TimingPlan,
        templates: &TemplateSelection,
    ) -> CardResult<Card> {
        if shows.is_empty() {
            return Err(CardError::NoShowSlots(roster.promotion));
        }
        if timing.other_min > timing.other_max {
            return Err(CardError::InvalidTiming {
                min: timing.other_min,
                max: timing.other_max,
            });
        }

        let mut ranked: Vec<(f64, Match)> = matches
            .into_iter()
            .map(|m| (mean_prominence(roster, &m), m))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total = ranked.len();
        let mut entries = Vec::with_capacity(total);
        for (i, (_, matchup)) in ranked.into_iter().enumerate() {
            let length_mins = if i + 1 == total {
                timing.main_mins
            } else if i + 2 == total {
                timing.co_main_mins
            } else {
                self.rng.random_range(timing.other_min..=timing.other_max)
            };

            let participants: Vec<ParticipantId> = matchup.participants().collect();
            let winner = *participants.choose(&mut self.rng).ok_or(CardError::EmptyMatch)?;

            entries.push(CardEntry {
                name: match_name(roster, &matchup),
                winner,
                length_mins,
                template: templates.for_size(matchup.size),
                show: shows[i % shows.len()],
                segment_order: (i + 1) as u32,
                matchup,
            });
        }

        Ok(Card {
            promotion: roster.promotion,
            entries,
        })
    }
}

/// Mean prominence of a match's participants, in card-ordering units
fn mean_prominence(roster: &RosterSnapshot, matchup: &Match) -> f64 {
    let scores: Vec<i32> = matchup
        .participants()
        .map(|id| roster.prominence(id))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    f64::from(scores.iter().sum::<i32>()) / scores.len() as f64
}

/// Display name for a match, sides joined with `/`
fn match_name(roster: &RosterSnapshot, matchup: &Match) -> String {
    let side = |ids: &[ParticipantId]| {
        ids.iter()
            .map(|id| roster.display_name(*id))
            .collect::<Vec<_>>()
            .join("/")
    };
    format!("{} vs {}", side(&matchup.side_a), side(&matchup.side_b))
}
