//! Tournament reconstruction engine for the Dave PRT dispute explorer
//!
//! Given append-only snapshots of commitments, matches, and bisection
//! advances indexed from chain events, this crate reconstructs:
//! - the round-by-round bracket of each tournament ([`roundify`])
//! - the shrinking cycle range disputed by each match ([`trace_bisection`])
//! - the terminal outcome of each match ([`classify`])
//! - the parent/child hierarchy of tournaments ([`TournamentArena`])
//!
//! Every operation is a pure function of its input snapshot: no I/O, no
//! shared state, no caching. Fetching and caching snapshots is the calling
//! explorer's concern.

pub mod bisection;
pub mod error;
pub mod hierarchy;
pub mod match_id;
pub mod outcome;
pub mod rounds;
pub mod types;

pub use bisection::{
    BisectionStep, BisectionTrace, CycleRange, Direction, advances_for, trace_bisection,
};
pub use error::CoreError;
pub use hierarchy::{Segment, TournamentArena};
pub use match_id::match_id;
pub use outcome::{OutcomeState, classify};
pub use rounds::{Round, roundify};
pub use types::*;
