//! Common types for the tournament reconstruction engine

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::match_id::match_id;

/// 32-byte hash type
pub type Hash = [u8; 32];

/// A claim is the digest of a claimed computation state submitted into a tournament
pub type Claim = Hash;

/// On-chain address type (20 bytes)
pub type Address = [u8; 20];

/// Block number type
pub type BlockNumber = u64;

/// Render a digest or address as `0x` plus the first and last four bytes
///
/// Used for breadcrumb labels and error messages where the full 64-char
/// hex string would drown the reader.
pub fn short_hex(bytes: &[u8]) -> String {
    let full = hex::encode(bytes);
    if full.len() <= 16 {
        format!("0x{full}")
    } else {
        format!("0x{}..{}", &full[..8], &full[full.len() - 8..])
    }
}

/// Which of a match's two commitments won the contest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerSlot {
    /// No winner has been decided yet
    #[default]
    None,
    /// `commitment_one` won
    One,
    /// `commitment_two` won
    Two,
}

/// Why a match was deleted from the tournament, if it was
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionReason {
    /// The match is still live
    #[default]
    NotDeleted,
    /// One or both claimants failed to act before their clock ran out
    Timeout,
    /// The dispute narrowed to a single machine step that was replayed
    Step,
    /// The dispute was pushed into a child tournament one level down
    ChildTournament,
}

/// Depth of a tournament in the top/middle/bottom dispute hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TournamentLevel {
    /// The root tournament
    Top,
    /// A mid-level sub-tournament
    Middle,
    /// A leaf sub-tournament, disputes here resolve to single steps
    Bottom,
}

impl TournamentLevel {
    /// Returns the string label of the level
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl TryFrom<u8> for TournamentLevel {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self, CoreError> {
        match level {
            0 => Ok(Self::Top),
            1 => Ok(Self::Middle),
            2 => Ok(Self::Bottom),
            _ => Err(CoreError::LevelOutOfRange { level }),
        }
    }
}

impl From<TournamentLevel> for u8 {
    fn from(level: TournamentLevel) -> u8 {
        level as u8
    }
}

/// A claim submitted into a specific tournament at a specific block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// The claimed computation state digest
    pub claim: Claim,
    /// The tournament the claim was submitted into
    pub tournament_address: Address,
    /// Who submitted the claim
    pub submitter: Address,
    /// Digest of the final machine state, null until the claim is fully developed
    pub final_state_hash: Option<Hash>,
    /// Block at which the claim was submitted
    pub block_number: BlockNumber,
}

/// A pairwise contest between two claims, resolved by iterative bisection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Canonical identifier, a pure function of the ordered claim pair
    pub id_hash: Hash,
    /// The first claim of the pair, in storage order
    pub commitment_one: Claim,
    /// The second claim of the pair, in storage order
    pub commitment_two: Claim,
    /// Initial lower half-boundary of the disputed cycle range
    pub left_of_two: u64,
    /// Which claim won, if the contest has resolved
    pub winner: WinnerSlot,
    /// Why the match was deleted, if it was
    pub deletion_reason: DeletionReason,
    /// Block at which the match was deleted
    pub deleted_at_block: Option<BlockNumber>,
    /// Block at which the match was created
    pub created_at_block: BlockNumber,
}

impl Match {
    /// Recompute the canonical identifier from the stored claim pair
    pub fn id(&self) -> Hash {
        match_id(&self.commitment_one, &self.commitment_two)
    }

    /// The winning claim, if the contest has resolved to one
    pub fn winner_claim(&self) -> Option<Claim> {
        match self.winner {
            WinnerSlot::None => None,
            WinnerSlot::One => Some(self.commitment_one),
            WinnerSlot::Two => Some(self.commitment_two),
        }
    }

    /// The losing claim, if the contest has resolved to a winner
    pub fn loser_claim(&self) -> Option<Claim> {
        match self.winner {
            WinnerSlot::None => None,
            WinnerSlot::One => Some(self.commitment_two),
            WinnerSlot::Two => Some(self.commitment_one),
        }
    }
}

/// One bisection step of a match
///
/// Ordered per match by block number; order is significant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchAdvance {
    /// The match this advance belongs to
    pub id_hash: Hash,
    /// The boundary value supplied by the opposing claimant
    pub other_parent: u64,
    /// The new midpoint boundary produced by this step
    pub left_node: u64,
    /// Block at which the advance was submitted
    pub block_number: BlockNumber,
}

/// Back-reference from a sub-tournament to the match that spawned it
///
/// Root tournaments carry no parent reference at all, so the two halves
/// of the link are either both present or both absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    /// Address of the parent tournament
    pub tournament: Address,
    /// Identifier of the parent match that escalated into this tournament
    pub match_id: Hash,
}

/// A node in the dispute tournament hierarchy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    /// The tournament contract address
    pub address: Address,
    /// Depth in the top/middle/bottom hierarchy
    pub level: TournamentLevel,
    /// Maximum depth of the hierarchy
    pub max_level: u8,
    /// Tournament size as a power of two; bisection depth is `height - 1`
    pub height: u32,
    /// Log2 of the machine cycles covered by one leaf of this tournament
    pub log2_step: u32,
    /// Link to the parent tournament and match, absent for the root
    pub parent: Option<ParentRef>,
    /// Which claim won the tournament, if it has resolved
    pub winner: WinnerSlot,
    /// Final machine state digest of the winner, if resolved
    pub final_state_hash: Option<Hash>,
}

impl Tournament {
    /// Maximum number of bisection steps a match in this tournament can take
    pub const fn max_advances(&self) -> u32 {
        self.height.saturating_sub(1)
    }
}
