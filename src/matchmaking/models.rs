//! Matchmaking data models: match sizes, distributions, policy, and the
//! unresolved match produced by the engine.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roster::ParticipantId;

/// Match size: total participants required, split evenly into two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchSize {
    /// 1v1
    Singles,
    /// 2v2
    Tag,
    /// 3v3
    Trios,
    /// 4v4
    Quad,
    /// 5v5
    Five,
}

impl MatchSize {
    /// Participants required per side
    pub fn per_side(self) -> usize {
        match self {
            Self::Singles => 1,
            Self::Tag => 2,
            Self::Trios => 3,
            Self::Quad => 4,
            Self::Five => 5,
        }
    }

    /// Total participants required
    pub fn total(self) -> usize {
        self.per_side() * 2
    }

    /// Size for a given per-side count, if one exists
    pub fn from_per_side(per_side: usize) -> Option<Self> {
        match per_side {
            1 => Some(Self::Singles),
            2 => Some(Self::Tag),
            3 => Some(Self::Trios),
            4 => Some(Self::Quad),
            5 => Some(Self::Five),
            _ => None,
        }
    }
}

impl fmt::Display for MatchSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Singles => "singles",
            Self::Tag => "tag",
            Self::Trios => "3v3",
            Self::Quad => "4v4",
            Self::Five => "5v5",
        };
        write!(f, "{repr}")
    }
}

/// Desired match-size mix for a card, in percent.
///
/// Percentages must sum to 100; the engine rejects anything else before
/// doing any scheduling work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub singles: u8,
    pub tag: u8,
    pub trios: u8,
    pub quad: u8,
    pub five: u8,
}

impl Default for SizeDistribution {
    /// Mix used by the auto booker when nothing is configured
    fn default() -> Self {
        Self {
            singles: 10,
            tag: 20,
            trios: 30,
            quad: 30,
            five: 10,
        }
    }
}

impl SizeDistribution {
    /// Sum of all percentages
    pub fn total(&self) -> u32 {
        u32::from(self.singles)
            + u32::from(self.tag)
            + u32::from(self.trios)
            + u32::from(self.quad)
            + u32::from(self.five)
    }

    /// Whether the distribution is usable
    pub fn is_valid(&self) -> bool {
        self.total() == 100
    }

    /// Convert the distribution into a concrete, shuffled list of `count`
    /// size requests.
    ///
    /// Each size gets `floor(percent * count / 100)` slots; rounding
    /// shortfall is padded with singles, so no fixed slot-to-type mapping
    /// survives into the request list.
    pub fn size_requests(&self, count: usize, rng: &mut impl Rng) -> Vec<MatchSize> {
        let mut requests = Vec::with_capacity(count);
        let quota = |percent: u8| percent as usize * count / 100;
        for (size, percent) in [
            (MatchSize::Singles, self.singles),
            (MatchSize::Tag, self.tag),
            (MatchSize::Trios, self.trios),
            (MatchSize::Quad, self.quad),
            (MatchSize::Five, self.five),
        ] {
            requests.extend(std::iter::repeat_n(size, quota(percent)));
        }
        while requests.len() < count {
            requests.push(MatchSize::Singles);
        }
        requests.shuffle(rng);
        requests
    }
}

/// Selection policy for the matchmaking engine.
///
/// Each flag enables one constraint tier; disabled tiers are skipped
/// entirely and selection falls through to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Prefer sides drawn from rival factions
    pub faction_cohesion: bool,
    /// Prefer heavyweight-vs-heavyweight / junior-vs-junior singles
    pub weight_split: bool,
    /// Prefer face-vs-heel sides
    pub alignment_balance: bool,
    /// Allow matches whose participants span more than one gender
    pub intergender: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            faction_cohesion: true,
            weight_split: true,
            alignment_balance: true,
            intergender: true,
        }
    }
}

impl BookingPolicy {
    /// Whether every selection must stay within a single gender
    pub fn gender_restricted(&self) -> bool {
        !self.intergender
    }
}

/// A match with resolved sides but no outcome, length, or placement yet.
///
/// The card assembler turns these into fully resolved card entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub size: MatchSize,
    /// Side A participants, length = `size.per_side()`
    pub side_a: Vec<ParticipantId>,
    /// Side B participants, same length
    pub side_b: Vec<ParticipantId>,
}

impl Match {
    pub fn new(size: MatchSize, side_a: Vec<ParticipantId>, side_b: Vec<ParticipantId>) -> Self {
        Self {
            size,
            side_a,
            side_b,
        }
    }

    /// All participants, side A first
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.side_a.iter().chain(self.side_b.iter()).copied()
    }

    /// Whether the given participant is booked in this match
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.side_a.contains(&id) || self.side_b.contains(&id)
    }
}

/// Result of one matchmaking build call.
///
/// `skipped` reports size requests that no tier could satisfy; the request
/// list shrinking is a reported condition, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub matches: Vec<Match>,
    pub skipped: Vec<MatchSize>,
}
