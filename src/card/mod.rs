//! Card assembly.
//!
//! Orders matches by prominence, assigns segment lengths by card role,
//! stubs out declared winners, and places each match on a show slot.

pub mod assembler;
pub mod models;

pub use assembler::{CardAssembler, CardError, CardResult};
pub use models::{
    Card, CardEntry, DEFAULT_CO_MAIN_MINS, DEFAULT_MAIN_EVENT_MINS, DEFAULT_OTHER_MINS,
    TemplateSelection, TimingPlan,
};
