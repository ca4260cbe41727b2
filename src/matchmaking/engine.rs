//! Constrained match selection with tiered fallback.
//!
//! For every requested match size the engine tries the enabled constraint
//! tiers in order (faction, weight for singles, alignment, random) and
//! books the first tier that can fill both sides from the remaining pool.
//! Participants are booked at most once per build call; requests that no
//! tier can satisfy are skipped and reported, never fatal.

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

use super::errors::{MatchmakingError, MatchmakingResult};
use super::models::{BookingPolicy, BuildOutcome, Match, MatchSize, SizeDistribution};
use crate::roster::{Alignment, Gender, Participant, ParticipantId, RosterSnapshot, WeightClass};

/// Matchmaking engine
pub struct MatchmakingEngine<R: Rng> {
    rng: R,
}

impl MatchmakingEngine<ThreadRng> {
    /// Create an engine backed by the thread RNG
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for MatchmakingEngine<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MatchmakingEngine<R> {
    /// Create an engine with an injected random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Build up to `count` matches from the snapshot.
    ///
    /// The returned list may be shorter than `count`: when the remaining
    /// pool cannot satisfy a size request through any tier, the request is
    /// dropped and reported in [`BuildOutcome::skipped`].
    pub fn build(
        &mut self,
        roster: &RosterSnapshot,
        distribution: &SizeDistribution,
        policy: &BookingPolicy,
        count: usize,
    ) -> MatchmakingResult<BuildOutcome> {
        if !distribution.is_valid() {
            return Err(MatchmakingError::InvalidDistribution(distribution.total()));
        }
        if roster.participants.is_empty() {
            return Err(MatchmakingError::EmptyRoster(roster.promotion));
        }

        let requests = distribution.size_requests(count, &mut self.rng);
        let mut booked: HashSet<ParticipantId> = HashSet::new();
        let mut outcome = BuildOutcome::default();

        for size in requests {
            let pool: Vec<&Participant> = roster
                .participants
                .iter()
                .filter(|p| !booked.contains(&p.id))
                .collect();

            match self.pick_sides(roster, &pool, size, policy) {
                Some((side_a, side_b)) => {
                    booked.extend(side_a.iter().chain(side_b.iter()).copied());
                    outcome.matches.push(Match::new(size, side_a, side_b));
                }
                None => {
                    log::warn!(
                        "Skipping {size} match for promotion {}: pool exhausted",
                        roster.promotion
                    );
                    outcome.skipped.push(size);
                }
            }
        }

        Ok(outcome)
    }

    /// Try each enabled tier in order; first success wins.
    fn pick_sides(
        &mut self,
        roster: &RosterSnapshot,
        pool: &[&Participant],
        size: MatchSize,
        policy: &BookingPolicy,
    ) -> Option<(Vec<ParticipantId>, Vec<ParticipantId>)> {
        let per_side = size.per_side();
        let restricted = policy.gender_restricted();

        if policy.faction_cohesion {
            if let Some(sides) = self.faction_sides(roster, pool, per_side, restricted) {
                return Some(sides);
            }
        }

        // Singles prefer same-weight-class opposition when possible
        let narrowed;
        let pool = if size == MatchSize::Singles && policy.weight_split {
            narrowed = narrow_by_weight(pool);
            narrowed.as_slice()
        } else {
            pool
        };

        if policy.alignment_balance {
            if let Some(sides) = self.alignment_sides(roster, pool, per_side, restricted) {
                return Some(sides);
            }
        }

        self.random_sides(pool, per_side, restricted)
    }

    /// Faction tier: two disjoint factions, each filling a whole side from
    /// the front of its member list.
    fn faction_sides(
        &mut self,
        roster: &RosterSnapshot,
        pool: &[&Participant],
        per_side: usize,
        restricted: bool,
    ) -> Option<(Vec<ParticipantId>, Vec<ParticipantId>)> {
        let pool_ids: HashSet<ParticipantId> = pool.iter().map(|p| p.id).collect();
        let mut candidates: Vec<Vec<ParticipantId>> = roster
            .factions
            .iter()
            .map(|f| {
                f.members
                    .iter()
                    .copied()
                    .filter(|m| pool_ids.contains(m))
                    .collect::<Vec<_>>()
            })
            .filter(|members| members.len() >= per_side)
            .collect();
        candidates.shuffle(&mut self.rng);

        for (i, first) in candidates.iter().enumerate() {
            for (j, second) in candidates.iter().enumerate() {
                if i == j {
                    continue;
                }
                let side_a = &first[..per_side];
                let side_b = &second[..per_side];
                // Overlapping stables exist; sides must not share members
                if side_a.iter().any(|id| side_b.contains(id)) {
                    continue;
                }
                if restricted && !single_gender(roster, side_a.iter().chain(side_b.iter())) {
                    continue;
                }
                return Some((side_a.to_vec(), side_b.to_vec()));
            }
        }
        None
    }

    /// Alignment tier: one side of faces against one side of heels.
    fn alignment_sides(
        &mut self,
        roster: &RosterSnapshot,
        pool: &[&Participant],
        per_side: usize,
        restricted: bool,
    ) -> Option<(Vec<ParticipantId>, Vec<ParticipantId>)> {
        let faces: Vec<ParticipantId> = pool
            .iter()
            .filter(|p| p.alignment == Some(Alignment::Face))
            .map(|p| p.id)
            .collect();
        let heels: Vec<ParticipantId> = pool
            .iter()
            .filter(|p| p.alignment == Some(Alignment::Heel))
            .map(|p| p.id)
            .collect();
        if faces.len() < per_side || heels.len() < per_side {
            return None;
        }

        let side_a: Vec<ParticipantId> = faces
            .choose_multiple(&mut self.rng, per_side)
            .copied()
            .collect();
        let side_b: Vec<ParticipantId> = heels
            .choose_multiple(&mut self.rng, per_side)
            .copied()
            .collect();
        if restricted && !single_gender(roster, side_a.iter().chain(side_b.iter())) {
            return None;
        }
        Some((side_a, side_b))
    }

    /// Random tier: two disjoint uniform samples, narrowing to the
    /// best-represented gender first when the policy restricts gender.
    fn random_sides(
        &mut self,
        pool: &[&Participant],
        per_side: usize,
        restricted: bool,
    ) -> Option<(Vec<ParticipantId>, Vec<ParticipantId>)> {
        let narrowed;
        let pool = if restricted {
            let males = pool.iter().filter(|p| p.gender == Gender::Male).count();
            let females = pool.len() - males;
            let best = if males >= females {
                Gender::Male
            } else {
                Gender::Female
            };
            narrowed = pool
                .iter()
                .filter(|p| p.gender == best)
                .copied()
                .collect::<Vec<_>>();
            narrowed.as_slice()
        } else {
            pool
        };

        if pool.len() < per_side * 2 {
            return None;
        }
        let chosen: Vec<ParticipantId> = pool
            .choose_multiple(&mut self.rng, per_side * 2)
            .map(|p| p.id)
            .collect();
        Some((chosen[..per_side].to_vec(), chosen[per_side..].to_vec()))
    }
}

/// Whether all of the given participants share one gender
fn single_gender<'a>(
    roster: &RosterSnapshot,
    ids: impl Iterator<Item = &'a ParticipantId>,
) -> bool {
    let genders: HashSet<Gender> = ids
        .filter_map(|id| roster.participant(*id).map(|p| p.gender))
        .collect();
    genders.len() <= 1
}

/// Narrow a singles pool to one weight class when at least two members
/// share it, heavyweights first.
fn narrow_by_weight<'a>(pool: &[&'a Participant]) -> Vec<&'a Participant> {
    let heavyweights: Vec<&Participant> = pool
        .iter()
        .filter(|p| p.weight == WeightClass::Heavyweight)
        .copied()
        .collect();
    if heavyweights.len() >= 2 {
        return heavyweights;
    }
    let juniors: Vec<&Participant> = pool
        .iter()
        .filter(|p| p.weight == WeightClass::Junior)
        .copied()
        .collect();
    if juniors.len() >= 2 {
        return juniors;
    }
    pool.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Faction;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine() -> MatchmakingEngine<StdRng> {
        MatchmakingEngine::with_rng(StdRng::seed_from_u64(42))
    }

    fn plain_roster(count: i64) -> RosterSnapshot {
        let mut roster = RosterSnapshot::new(1);
        for id in 1..=count {
            roster
                .participants
                .push(Participant::new(id, format!("Worker {id}")));
        }
        roster
    }

    fn singles_only() -> SizeDistribution {
        SizeDistribution {
            singles: 100,
            tag: 0,
            trios: 0,
            quad: 0,
            five: 0,
        }
    }

    #[test]
    fn test_invalid_distribution_rejected_before_work() {
        let distribution = SizeDistribution {
            singles: 50,
            tag: 0,
            trios: 0,
            quad: 0,
            five: 0,
        };
        let result = engine().build(
            &plain_roster(8),
            &distribution,
            &BookingPolicy::default(),
            4,
        );
        assert_eq!(result, Err(MatchmakingError::InvalidDistribution(50)));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let result = engine().build(
            &RosterSnapshot::new(3),
            &singles_only(),
            &BookingPolicy::default(),
            1,
        );
        assert_eq!(result, Err(MatchmakingError::EmptyRoster(3)));
    }

    #[test]
    fn test_singles_card_uses_everyone_once() {
        // 8 plain participants, 4 singles matches: the whole pool is used
        // and nobody is double-booked.
        let outcome = engine()
            .build(
                &plain_roster(8),
                &singles_only(),
                &BookingPolicy::default(),
                4,
            )
            .unwrap();

        assert_eq!(outcome.matches.len(), 4);
        assert!(outcome.skipped.is_empty());

        let mut used: Vec<ParticipantId> = outcome
            .matches
            .iter()
            .flat_map(Match::participants)
            .collect();
        used.sort_unstable();
        assert_eq!(used, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_participant_in_two_matches() {
        let mut roster = plain_roster(20);
        for p in roster.participants.iter_mut() {
            p.alignment = Some(if p.id % 2 == 0 {
                Alignment::Face
            } else {
                Alignment::Heel
            });
        }
        let outcome = engine()
            .build(
                &roster,
                &SizeDistribution::default(),
                &BookingPolicy::default(),
                5,
            )
            .unwrap();

        let used: Vec<ParticipantId> = outcome
            .matches
            .iter()
            .flat_map(Match::participants)
            .collect();
        let distinct: HashSet<ParticipantId> = used.iter().copied().collect();
        assert_eq!(used.len(), distinct.len());
    }

    #[test]
    fn test_exhausted_pool_reports_skips() {
        // 5 participants can host at most 2 singles matches
        let outcome = engine()
            .build(
                &plain_roster(5),
                &singles_only(),
                &BookingPolicy::default(),
                4,
            )
            .unwrap();

        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.skipped, vec![MatchSize::Singles, MatchSize::Singles]);
    }

    #[test]
    fn test_faction_tier_books_rival_stables() {
        let mut roster = plain_roster(8);
        roster.factions.push(Faction::new(1, vec![1, 2, 3]));
        roster.factions.push(Faction::new(2, vec![4, 5, 6]));
        let distribution = SizeDistribution {
            singles: 0,
            tag: 100,
            trios: 0,
            quad: 0,
            five: 0,
        };

        let outcome = engine()
            .build(&roster, &distribution, &BookingPolicy::default(), 1)
            .unwrap();

        assert_eq!(outcome.matches.len(), 1);
        let matchup = &outcome.matches[0];
        let stable_of = |side: &[ParticipantId]| {
            if side.iter().all(|id| (1..=3).contains(id)) {
                Some(1)
            } else if side.iter().all(|id| (4..=6).contains(id)) {
                Some(2)
            } else {
                None
            }
        };
        let a = stable_of(&matchup.side_a).expect("side A drawn from one stable");
        let b = stable_of(&matchup.side_b).expect("side B drawn from one stable");
        assert_ne!(a, b);
    }

    #[test]
    fn test_alignment_tier_pits_face_against_heel() {
        let mut roster = plain_roster(4);
        for p in roster.participants.iter_mut() {
            p.alignment = Some(if p.id <= 2 {
                Alignment::Face
            } else {
                Alignment::Heel
            });
        }
        let policy = BookingPolicy {
            faction_cohesion: false,
            ..BookingPolicy::default()
        };

        let outcome = engine()
            .build(&roster, &singles_only(), &policy, 2)
            .unwrap();

        assert_eq!(outcome.matches.len(), 2);
        for matchup in &outcome.matches {
            let a = roster.participant(matchup.side_a[0]).unwrap();
            let b = roster.participant(matchup.side_b[0]).unwrap();
            assert_eq!(a.alignment, Some(Alignment::Face));
            assert_eq!(b.alignment, Some(Alignment::Heel));
        }
    }

    #[test]
    fn test_weight_tier_keeps_singles_in_class() {
        let mut roster = plain_roster(8);
        for p in roster.participants.iter_mut() {
            if p.id > 4 {
                p.weight = WeightClass::Junior;
            }
        }
        let outcome = engine()
            .build(
                &roster,
                &singles_only(),
                &BookingPolicy::default(),
                1,
            )
            .unwrap();

        let matchup = &outcome.matches[0];
        let a = roster.participant(matchup.side_a[0]).unwrap();
        let b = roster.participant(matchup.side_b[0]).unwrap();
        assert_eq!(a.weight, b.weight);
    }

    #[test]
    fn test_gender_restriction_narrows_to_majority() {
        let mut roster = plain_roster(10);
        for p in roster.participants.iter_mut() {
            if p.id > 7 {
                p.gender = Gender::Female;
            }
        }
        let policy = BookingPolicy {
            intergender: false,
            ..BookingPolicy::default()
        };
        let distribution = SizeDistribution {
            singles: 0,
            tag: 0,
            trios: 100,
            quad: 0,
            five: 0,
        };

        let outcome = engine()
            .build(&roster, &distribution, &policy, 1)
            .unwrap();

        assert_eq!(outcome.matches.len(), 1);
        let genders: HashSet<Gender> = outcome.matches[0]
            .participants()
            .map(|id| roster.participant(id).unwrap().gender)
            .collect();
        assert_eq!(genders.len(), 1);
    }

    #[test]
    fn test_gender_restriction_drops_unfillable_requests() {
        // 3 males and 3 females can never fill a 4v4
        let mut roster = plain_roster(6);
        for p in roster.participants.iter_mut() {
            if p.id > 3 {
                p.gender = Gender::Female;
            }
        }
        let policy = BookingPolicy {
            intergender: false,
            ..BookingPolicy::default()
        };
        let distribution = SizeDistribution {
            singles: 0,
            tag: 0,
            trios: 0,
            quad: 100,
            five: 0,
        };

        let outcome = engine()
            .build(&roster, &distribution, &policy, 1)
            .unwrap();

        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.skipped, vec![MatchSize::Quad]);
    }
}
