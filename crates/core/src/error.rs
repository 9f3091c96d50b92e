//! Error types for the reconstruction engine
//!
//! Anomalies are surfaced structurally with the offending identifier; the
//! engine never substitutes a default that could misrepresent dispute state.

use thiserror::Error;

use crate::types::{Address, Claim, DeletionReason, Hash, WinnerSlot, short_hex};

/// Errors produced while reconstructing tournament state from a snapshot
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A `(deletion_reason, winner)` tuple outside the outcome table
    #[error("invalid outcome for match {}: {reason:?} with winner {winner:?}", short_hex(.id_hash))]
    InvalidOutcome {
        /// Identifier of the offending match
        id_hash: Hash,
        /// The raw deletion reason
        reason: DeletionReason,
        /// The raw winner slot
        winner: WinnerSlot,
    },

    /// A tournament height outside the representable range
    #[error("tournament height {height} is outside the supported range 1..=128")]
    InvalidHeight {
        /// The raw height
        height: u32,
    },

    /// A match carries more advances than its tournament height permits
    #[error("match {} has more than {max} advances", short_hex(.id_hash))]
    TooManyAdvances {
        /// Identifier of the offending match
        id_hash: Hash,
        /// Maximum number of bisections for the tournament height
        max: u32,
    },

    /// More than one claim was left unpaired after round assignment
    #[error("{} claims are dangling, expected at most one", .claims.len())]
    MultipleDanglingClaims {
        /// The unpaired claims
        claims: Vec<Claim>,
    },

    /// A raw tournament level outside the top/middle/bottom vocabulary
    #[error("tournament level {level} is out of range, expected 0..=2")]
    LevelOutOfRange {
        /// The raw level
        level: u8,
    },

    /// A parent reference points at a tournament missing from the snapshot
    #[error("unknown tournament {}", short_hex(.address))]
    UnknownTournament {
        /// The unresolved address
        address: Address,
    },

    /// An identifier does not correspond to any match in the snapshot
    #[error("unknown match {}", short_hex(.id_hash))]
    UnknownMatch {
        /// The unresolved identifier
        id_hash: Hash,
    },

    /// A match references a claim with no corresponding commitment
    #[error("match {} references unknown claim {}", short_hex(.id_hash), short_hex(.claim))]
    UnknownClaim {
        /// Identifier of the referencing match
        id_hash: Hash,
        /// The unresolved claim
        claim: Claim,
    },

    /// A match pairs a claim against itself
    #[error("match {} pairs identical claims", short_hex(.id_hash))]
    IdenticalClaims {
        /// Identifier of the offending match
        id_hash: Hash,
    },

    /// Tournament parent references loop back on themselves
    #[error("parent references of tournament {} form a cycle", short_hex(.address))]
    ParentCycle {
        /// The tournament at which the walk revisited a node
        address: Address,
    },
}
