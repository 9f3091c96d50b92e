//! Canonical match identifiers
//!
//! A match is labeled by the keccak256 digest of its two claims encoded in
//! the exact order they are stored. The ordering is part of the upstream
//! protocol: `match_id(a, b)` and `match_id(b, a)` are different identifiers
//! and both sides of the contract rely on that, so the encoding is kept
//! order-sensitive here.

use tiny_keccak::{Hasher, Keccak};

use crate::types::{Claim, Hash};

/// Compute the canonical identifier of a match from its ordered claim pair
pub fn match_id(claim_one: &Claim, claim_two: &Claim) -> Hash {
    let mut hasher = Keccak::v256();
    hasher.update(claim_one);
    hasher.update(claim_two);

    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}
