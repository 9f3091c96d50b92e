//! Match outcome classification
//!
//! Maps the raw termination fields of a match onto a fixed set of states.
//! The dispatch is a single exhaustive match over the
//! `(DeletionReason, WinnerSlot)` pair; tuples outside the table are
//! reported as errors, never defaulted to an ongoing contest.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DeletionReason, Match, WinnerSlot};

/// Terminal or non-terminal state of a contest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeState {
    /// The contest is still being bisected
    Ongoing,
    /// Neither claimant acted before the deadline; both are out
    BothEliminated,
    /// The opponent failed to act before the deadline
    WonByTimeout,
    /// The dispute narrowed to one machine instruction which was replayed
    WonBySingleStep,
    /// Both claimants are still contesting, one level deeper
    AdvancedToSubTournament,
}

impl OutcomeState {
    /// Whether the contest can still change state
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// Returns the string label of the state
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::BothEliminated => "both_eliminated",
            Self::WonByTimeout => "won_by_timeout",
            Self::WonBySingleStep => "won_by_single_step",
            Self::AdvancedToSubTournament => "advanced_to_sub_tournament",
        }
    }
}

/// Classify a match's termination fields into an [`OutcomeState`]
pub fn classify(m: &Match) -> Result<OutcomeState, CoreError> {
    match (m.deletion_reason, m.winner) {
        (DeletionReason::NotDeleted, WinnerSlot::None) => Ok(OutcomeState::Ongoing),
        (DeletionReason::Timeout, WinnerSlot::None) => Ok(OutcomeState::BothEliminated),
        (DeletionReason::Timeout, WinnerSlot::One | WinnerSlot::Two) => {
            Ok(OutcomeState::WonByTimeout)
        }
        (DeletionReason::Step, WinnerSlot::One | WinnerSlot::Two) => {
            Ok(OutcomeState::WonBySingleStep)
        }
        (DeletionReason::ChildTournament, WinnerSlot::One | WinnerSlot::Two) => {
            Ok(OutcomeState::AdvancedToSubTournament)
        }
        (reason, winner) => Err(CoreError::InvalidOutcome {
            id_hash: m.id_hash,
            reason,
            winner,
        }),
    }
}
