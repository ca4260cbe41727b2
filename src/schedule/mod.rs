//! Round-robin tournament scheduling.
//!
//! The scheduler is the combinatorial half of the engine: it turns an
//! ordered entrant list into rounds of pairings via the circle method, with
//! only presentation order randomized.

pub mod models;
pub mod round_robin;

pub use models::{Pairing, Round, Schedule};
pub use round_robin::{RoundRobinScheduler, ScheduleError, ScheduleResult};
