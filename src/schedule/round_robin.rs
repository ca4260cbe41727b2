//! Circle-method round-robin schedule generation.
//!
//! The generator is pure apart from presentation shuffling: who meets whom
//! in which round is fully determined by the input order, while match order
//! within a round and side order within a pairing are randomized. Tests
//! inject a seeded RNG through [`RoundRobinScheduler::with_rng`].

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::models::{Pairing, Round, Schedule};

/// Schedule generation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Round robin needs at least 2 entrants, got {0}")]
    NotEnoughEntrants(usize),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Position in the rotation: a real entrant or the bye filler appended
/// when the field is odd.
#[derive(Clone)]
enum Slot<T> {
    Entrant(T),
    Bye,
}

/// Round-robin schedule generator
pub struct RoundRobinScheduler<R: Rng> {
    rng: R,
}

impl RoundRobinScheduler<ThreadRng> {
    /// Create a scheduler backed by the thread RNG
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RoundRobinScheduler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RoundRobinScheduler<R> {
    /// Create a scheduler with an injected random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a full round-robin schedule for the given entrants.
    ///
    /// Entrants are opaque: single participants and fixed teams schedule
    /// identically. With an odd field a bye slot is appended internally;
    /// pairings against it are reported via [`Round::bye`] rather than
    /// booked.
    pub fn generate<T: Clone>(&mut self, entrants: &[T]) -> ScheduleResult<Schedule<T>> {
        if entrants.len() < 2 {
            return Err(ScheduleError::NotEnoughEntrants(entrants.len()));
        }

        let mut slots: Vec<Slot<T>> = entrants.iter().cloned().map(Slot::Entrant).collect();
        if slots.len() % 2 == 1 {
            slots.push(Slot::Bye);
        }
        let n = slots.len();

        let mut rounds = Vec::with_capacity(n - 1);
        for _ in 0..n - 1 {
            let mut pairings = Vec::with_capacity(n / 2);
            let mut bye = None;
            for i in 0..n / 2 {
                match (&slots[i], &slots[n - 1 - i]) {
                    (Slot::Entrant(a), Slot::Entrant(b)) => {
                        let (first, second) = if self.rng.random_bool(0.5) {
                            (a.clone(), b.clone())
                        } else {
                            (b.clone(), a.clone())
                        };
                        pairings.push(Pairing { first, second });
                    }
                    (Slot::Entrant(a), Slot::Bye) | (Slot::Bye, Slot::Entrant(a)) => {
                        bye = Some(a.clone());
                    }
                    // At most one bye slot exists
                    (Slot::Bye, Slot::Bye) => {}
                }
            }
            pairings.shuffle(&mut self.rng);
            rounds.push(Round { pairings, bye });

            // Rotate clockwise: slot 0 stays fixed, the last slot moves to
            // position 1 and everything else shifts down.
            if let Some(last) = slots.pop() {
                slots.insert(1, last);
            }
        }

        Ok(Schedule { rounds })
    }
}
