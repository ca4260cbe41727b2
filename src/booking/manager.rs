//! Booking facade wiring the engine components end to end.
//!
//! A [`Booker`] owns the roster repository and the persistence pipeline and
//! drives the three booking paths (auto-booked cards, round-robin
//! tournaments, and caller-assembled cards) through the same
//! stage-then-promote write sequence.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::errors::{BookingError, BookingResult};
use super::pipeline::BookingPipeline;
use super::store::BookingStore;
use crate::card::{Card, CardAssembler, TemplateSelection, TimingPlan};
use crate::matchmaking::{
    BookingPolicy, Match, MatchSize, MatchmakingEngine, SizeDistribution,
};
use crate::roster::{ParticipantId, PromotionId, RosterRepository, RosterSnapshot, ShowId, TemplateId};
use crate::schedule::{Round, RoundRobinScheduler, Schedule};

/// Matches an auto-booked card aims for when nothing is configured
pub const DEFAULT_MATCH_COUNT: usize = 7;

/// Configuration for one auto-booked card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoBookConfig {
    /// Desired match-size mix
    pub distribution: SizeDistribution,
    /// Constraint tiers to apply
    pub policy: BookingPolicy,
    /// Matches to aim for; the card may come up short
    pub match_count: usize,
    /// Segment lengths
    pub timing: TimingPlan,
    /// Match template per size
    pub templates: TemplateSelection,
}

impl AutoBookConfig {
    /// Default mix, policy, and timing over the given templates
    pub fn new(templates: TemplateSelection) -> Self {
        Self {
            distribution: SizeDistribution::default(),
            policy: BookingPolicy::default(),
            match_count: DEFAULT_MATCH_COUNT,
            timing: TimingPlan::default(),
            templates,
        }
    }
}

/// Outcome of a completed booking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Segments promoted into the permanent ledger
    pub booked: usize,
    /// Size requests no constraint tier could satisfy
    pub skipped: Vec<MatchSize>,
}

/// Booking facade
pub struct Booker<P: RosterRepository, S: BookingStore> {
    roster: P,
    pipeline: BookingPipeline<S, StdRng>,
    rng: StdRng,
}

impl<P: RosterRepository, S: BookingStore> Booker<P, S> {
    /// Create a booker over a roster source and a booking store
    pub fn new(roster: P, store: S) -> Self {
        Self {
            roster,
            pipeline: BookingPipeline::new(store),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Auto-book tonight's card for a promotion.
    ///
    /// Runs matchmaking over a fresh snapshot, assembles the card, stages
    /// it, and promotes it. A pool too thin for some size requests shortens
    /// the card; the shortfall is reported in the summary.
    pub async fn auto_book(
        &mut self,
        promotion: PromotionId,
        config: &AutoBookConfig,
    ) -> BookingResult<BookingSummary> {
        let roster = self.roster.load_snapshot(promotion).await?;

        let outcome = MatchmakingEngine::with_rng(&mut self.rng).build(
            &roster,
            &config.distribution,
            &config.policy,
            config.match_count,
        )?;
        let card = CardAssembler::with_rng(&mut self.rng).assemble(
            outcome.matches,
            &roster,
            &roster.shows,
            &config.timing,
            &config.templates,
        )?;

        let booked = self.persist(&card, &roster).await?;
        log::info!(
            "Auto booked {booked} matches for promotion {promotion} ({} skipped)",
            outcome.skipped.len()
        );
        Ok(BookingSummary {
            booked,
            skipped: outcome.skipped,
        })
    }

    /// Generate a round-robin schedule for tournament entrants.
    ///
    /// Entrants are fixed teams; singles tournaments use one-member teams.
    /// Every entrant must have the same, supported team size.
    pub fn schedule_tournament(
        &mut self,
        entrants: &[Vec<ParticipantId>],
    ) -> BookingResult<Schedule<Vec<ParticipantId>>> {
        tournament_match_size(entrants)?;
        Ok(RoundRobinScheduler::with_rng(&mut self.rng).generate(entrants)?)
    }

    /// Book one tournament round onto a specific show slot.
    ///
    /// Used when a tournament runs across separate booking sessions; the
    /// full-schedule path is [`Booker::book_tournament`].
    pub async fn book_round(
        &mut self,
        promotion: PromotionId,
        round: &Round<Vec<ParticipantId>>,
        show: ShowId,
        template: TemplateId,
        timing: &TimingPlan,
        prefix: Option<&str>,
    ) -> BookingResult<BookingSummary> {
        let entrants: Vec<Vec<ParticipantId>> = round
            .pairings
            .iter()
            .flat_map(|p| [p.first.clone(), p.second.clone()])
            .collect();
        let size = tournament_match_size(&entrants)?;
        let roster = self.roster.load_snapshot(promotion).await?;

        let booked = self
            .book_round_on(&roster, round, size, show, template, timing, prefix)
            .await?;
        Ok(BookingSummary {
            booked,
            skipped: Vec::new(),
        })
    }

    /// Book a full round-robin tournament, one round per show slot.
    ///
    /// Rounds are staged and promoted in sequence; the optional prefix is
    /// applied to every segment name, the way tournament bookings are
    /// labelled on the card.
    pub async fn book_tournament(
        &mut self,
        promotion: PromotionId,
        entrants: &[Vec<ParticipantId>],
        template: TemplateId,
        timing: &TimingPlan,
        prefix: Option<&str>,
    ) -> BookingResult<BookingSummary> {
        let size = tournament_match_size(entrants)?;
        let schedule = RoundRobinScheduler::with_rng(&mut self.rng).generate(entrants)?;
        let roster = self.roster.load_snapshot(promotion).await?;
        if roster.shows.len() < schedule.len() {
            return Err(BookingError::NotEnoughShows {
                needed: schedule.len(),
                have: roster.shows.len(),
            });
        }

        let mut booked = 0;
        for (round, show) in schedule.rounds.iter().zip(roster.shows.clone()) {
            booked += self
                .book_round_on(&roster, round, size, show, template, timing, prefix)
                .await?;
        }

        log::info!(
            "Booked {booked} tournament matches over {} rounds for promotion {promotion}",
            schedule.len()
        );
        Ok(BookingSummary {
            booked,
            skipped: Vec::new(),
        })
    }

    /// Book a caller-assembled list of matches as tonight's card.
    pub async fn book_card(
        &mut self,
        promotion: PromotionId,
        matches: Vec<Match>,
        timing: &TimingPlan,
        templates: &TemplateSelection,
    ) -> BookingResult<BookingSummary> {
        let roster = self.roster.load_snapshot(promotion).await?;
        let card = CardAssembler::with_rng(&mut self.rng).assemble(
            matches,
            &roster,
            &roster.shows,
            timing,
            templates,
        )?;

        let booked = self.persist(&card, &roster).await?;
        log::info!("Booked {booked} matches for promotion {promotion}");
        Ok(BookingSummary {
            booked,
            skipped: Vec::new(),
        })
    }

    /// Assemble, label, and persist one tournament round.
    #[allow(clippy::too_many_arguments)]
    async fn book_round_on(
        &mut self,
        roster: &RosterSnapshot,
        round: &Round<Vec<ParticipantId>>,
        size: MatchSize,
        show: ShowId,
        template: TemplateId,
        timing: &TimingPlan,
        prefix: Option<&str>,
    ) -> BookingResult<usize> {
        let matches: Vec<Match> = round
            .pairings
            .iter()
            .map(|p| Match::new(size, p.first.clone(), p.second.clone()))
            .collect();
        let mut card = CardAssembler::with_rng(&mut self.rng).assemble(
            matches,
            roster,
            &[show],
            timing,
            &TemplateSelection::uniform(template),
        )?;
        if let Some(prefix) = prefix {
            for entry in card.entries.iter_mut() {
                entry.name = format!("{prefix}: {}", entry.name);
            }
        }
        self.persist(&card, roster).await
    }

    /// Stage and promote a card.
    ///
    /// An empty card still stages (wiping stale drafts) but skips the
    /// promote phase rather than failing on an empty staging area.
    async fn persist(&mut self, card: &Card, roster: &RosterSnapshot) -> BookingResult<usize> {
        self.pipeline.stage(card).await?;
        if card.is_empty() {
            return Ok(0);
        }
        self.pipeline.promote(&roster.officials).await
    }
}

/// Validate tournament entrants and derive their match size
fn tournament_match_size(entrants: &[Vec<ParticipantId>]) -> BookingResult<MatchSize> {
    let per_side = entrants.first().map_or(1, Vec::len);
    for entrant in entrants {
        if entrant.len() != per_side {
            return Err(BookingError::MixedTeamSizes(per_side, entrant.len()));
        }
    }
    MatchSize::from_per_side(per_side).ok_or(BookingError::UnsupportedTeamSize(per_side))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_match_size_validation() {
        assert_eq!(
            tournament_match_size(&[vec![1], vec![2], vec![3]]).unwrap(),
            MatchSize::Singles
        );
        assert_eq!(
            tournament_match_size(&[vec![1, 2], vec![3, 4]]).unwrap(),
            MatchSize::Tag
        );
        assert!(matches!(
            tournament_match_size(&[vec![1], vec![2, 3]]),
            Err(BookingError::MixedTeamSizes(1, 2))
        ));
        assert!(matches!(
            tournament_match_size(&[vec![1, 2, 3, 4, 5, 6], vec![7, 8, 9, 10, 11, 12]]),
            Err(BookingError::UnsupportedTeamSize(6))
        ));
    }

    #[test]
    fn test_auto_book_config_defaults() {
        let config = AutoBookConfig::new(TemplateSelection::uniform(5));
        assert_eq!(config.match_count, DEFAULT_MATCH_COUNT);
        assert!(config.distribution.is_valid());
        assert_eq!(config.templates.for_size(MatchSize::Five), 5);
    }
}
