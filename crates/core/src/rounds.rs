//! Round assignment ("roundify")
//!
//! Partitions the unordered set of matches of one tournament into
//! conflict-free rounds and tracks the claim currently waiting for an
//! opponent. A match lands in the first round that contains neither of its
//! claims, so two matches sharing a claim can never sit at the same depth.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::types::{Claim, Commitment, Match};

/// One depth of the tournament bracket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// The matches contested at this depth
    pub matches: Vec<Match>,
    /// The claim waiting for an opponent, attached to the final round
    pub dangling: Option<Claim>,
}

/// In-progress round during assignment
#[derive(Default)]
struct RoundSlot {
    matches: Vec<Match>,
    claims: HashSet<Claim>,
}

impl RoundSlot {
    fn accepts(&self, m: &Match) -> bool {
        !self.claims.contains(&m.commitment_one) && !self.claims.contains(&m.commitment_two)
    }

    fn place(&mut self, m: &Match) {
        self.claims.insert(m.commitment_one);
        self.claims.insert(m.commitment_two);
        self.matches.push(m.clone());
    }
}

/// Grow `slots` on demand so that `index` is addressable
fn get_or_insert<T: Default>(slots: &mut Vec<T>, index: usize) -> &mut T {
    while slots.len() <= index {
        slots.push(T::default());
    }
    &mut slots[index]
}

/// Partition `matches` into rounds and attach the dangling claim, if any
///
/// `matches` must be in creation order and belong to a single tournament;
/// `commitments` is the full set of claims submitted into that tournament.
/// Because assignment is greedy over the input order, recomputing over a
/// superset of a previous snapshot reproduces the previous round layout
/// unchanged.
pub fn roundify(matches: &[Match], commitments: &[Commitment]) -> Result<Vec<Round>, CoreError> {
    let known_claims: HashSet<Claim> = commitments.iter().map(|c| c.claim).collect();

    let mut slots: Vec<RoundSlot> = Vec::new();
    for m in matches {
        if m.commitment_one == m.commitment_two {
            return Err(CoreError::IdenticalClaims { id_hash: m.id_hash });
        }
        for claim in [m.commitment_one, m.commitment_two] {
            if !known_claims.contains(&claim) {
                return Err(CoreError::UnknownClaim {
                    id_hash: m.id_hash,
                    claim,
                });
            }
        }

        let index = slots
            .iter()
            .position(|slot| slot.accepts(m))
            .unwrap_or_else(|| slots.len());
        get_or_insert(&mut slots, index).place(m);
    }

    // A claim is dangling while it waits for an opponent: either it was
    // never paired at all, or it won its latest match and no new match has
    // picked it up yet.
    let mut dangling: BTreeSet<Claim> = commitments
        .iter()
        .filter(|c| {
            !matches
                .iter()
                .any(|m| m.commitment_one == c.claim || m.commitment_two == c.claim)
        })
        .map(|c| c.claim)
        .collect();

    for m in matches {
        dangling.remove(&m.commitment_one);
        dangling.remove(&m.commitment_two);
        if let Some(winner) = m.winner_claim() {
            dangling.insert(winner);
        }
    }

    if dangling.len() > 1 {
        return Err(CoreError::MultipleDanglingClaims {
            claims: dangling.into_iter().collect(),
        });
    }
    let dangling = dangling.into_iter().next();

    let mut rounds: Vec<Round> = slots
        .into_iter()
        .map(|slot| Round {
            matches: slot.matches,
            dangling: None,
        })
        .collect();

    match rounds.last_mut() {
        Some(last) => last.dangling = dangling,
        None => {
            if let Some(claim) = dangling {
                // No matches yet: a lone submitted claim still renders as a
                // bracket of its own.
                rounds.push(Round {
                    matches: Vec::new(),
                    dangling: Some(claim),
                });
            }
        }
    }

    debug!(
        rounds = rounds.len(),
        matches = matches.len(),
        "assigned matches to rounds"
    );
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_id::match_id;
    use crate::types::{DeletionReason, WinnerSlot};

    fn claim(tag: u8) -> Claim {
        [tag; 32]
    }

    fn commitment(tag: u8) -> Commitment {
        Commitment {
            claim: claim(tag),
            tournament_address: [0u8; 20],
            submitter: [0xeeu8; 20],
            final_state_hash: None,
            block_number: u64::from(tag),
        }
    }

    fn open_match(one: u8, two: u8, block: u64) -> Match {
        Match {
            id_hash: match_id(&claim(one), &claim(two)),
            commitment_one: claim(one),
            commitment_two: claim(two),
            left_of_two: 0,
            winner: WinnerSlot::None,
            deletion_reason: DeletionReason::NotDeleted,
            deleted_at_block: None,
            created_at_block: block,
        }
    }

    fn resolved_match(one: u8, two: u8, winner: WinnerSlot, block: u64) -> Match {
        Match {
            winner,
            deletion_reason: DeletionReason::Timeout,
            deleted_at_block: Some(block + 1),
            ..open_match(one, two, block)
        }
    }

    #[test]
    fn test_disjoint_matches_share_round_zero() {
        let matches = vec![open_match(1, 2, 10), open_match(3, 4, 11)];
        let commitments = vec![commitment(1), commitment(2), commitment(3), commitment(4)];

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].matches.len(), 2);
        assert_eq!(rounds[0].dangling, None);
        // Stored identifiers agree with recomputation from the claim pair.
        assert_eq!(matches[0].id(), matches[0].id_hash);
    }

    #[test]
    fn test_shared_claim_pushes_to_next_round() {
        let matches = vec![resolved_match(1, 2, WinnerSlot::One, 10), open_match(1, 3, 11)];
        let commitments = vec![commitment(1), commitment(2), commitment(3)];

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].matches, vec![matches[0].clone()]);
        assert_eq!(rounds[1].matches, vec![matches[1].clone()]);
    }

    #[test]
    fn test_rounds_are_claim_disjoint() {
        let matches = vec![
            resolved_match(1, 2, WinnerSlot::One, 10),
            resolved_match(3, 4, WinnerSlot::Two, 11),
            open_match(1, 4, 12),
        ];
        let commitments: Vec<_> = (1..=4).map(commitment).collect();

        let rounds = roundify(&matches, &commitments).unwrap();
        for round in &rounds {
            let mut seen = HashSet::new();
            for m in &round.matches {
                assert!(seen.insert(m.commitment_one));
                assert!(seen.insert(m.commitment_two));
            }
        }
    }

    #[test]
    fn test_unreferenced_commitment_dangles_on_last_round() {
        let matches = vec![open_match(1, 2, 10)];
        let commitments = vec![commitment(1), commitment(2), commitment(3)];

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].matches.len(), 1);
        assert_eq!(rounds[0].dangling, Some(claim(3)));
    }

    #[test]
    fn test_winner_of_latest_match_dangles() {
        let matches = vec![resolved_match(1, 2, WinnerSlot::One, 10)];
        let commitments = vec![commitment(1), commitment(2)];

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds[0].dangling, Some(claim(1)));
    }

    #[test]
    fn test_winner_picked_up_by_next_match_stops_dangling() {
        let matches = vec![
            resolved_match(1, 2, WinnerSlot::One, 10),
            resolved_match(3, 4, WinnerSlot::One, 11),
            open_match(1, 3, 12),
        ];
        let commitments: Vec<_> = (1..=4).map(commitment).collect();

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds.last().unwrap().dangling, None);
    }

    #[test]
    fn test_lone_commitment_yields_synthetic_round() {
        let rounds = roundify(&[], &[commitment(1)]).unwrap();
        assert_eq!(rounds.len(), 1);
        assert!(rounds[0].matches.is_empty());
        assert_eq!(rounds[0].dangling, Some(claim(1)));
    }

    #[test]
    fn test_empty_snapshot_yields_no_rounds() {
        let rounds = roundify(&[], &[]).unwrap();
        assert!(rounds.is_empty());
    }

    #[test]
    fn test_multiple_dangling_claims_rejected() {
        let err = roundify(&[], &[commitment(1), commitment(2)]).unwrap_err();
        assert_eq!(
            err,
            CoreError::MultipleDanglingClaims {
                claims: vec![claim(1), claim(2)],
            }
        );
    }

    #[test]
    fn test_unknown_claim_rejected() {
        let matches = vec![open_match(1, 2, 10)];
        let err = roundify(&matches, &[commitment(1)]).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownClaim {
                id_hash: matches[0].id_hash,
                claim: claim(2),
            }
        );
    }

    #[test]
    fn test_identical_claims_rejected() {
        let matches = vec![open_match(1, 1, 10)];
        let err = roundify(&matches, &[commitment(1)]).unwrap_err();
        assert!(matches!(err, CoreError::IdenticalClaims { .. }));
    }

    #[test]
    fn test_champion_dangles_after_final() {
        let matches = vec![
            resolved_match(1, 2, WinnerSlot::One, 10),
            resolved_match(3, 4, WinnerSlot::One, 11),
            resolved_match(1, 3, WinnerSlot::One, 12),
        ];
        let commitments: Vec<_> = (1..=4).map(commitment).collect();

        let rounds = roundify(&matches, &commitments).unwrap();
        assert_eq!(rounds.len(), 2);
        // The losing finalist is matched, not dangling; only the champion
        // still waits for an opponent.
        assert_eq!(rounds.last().unwrap().dangling, Some(claim(1)));
    }

    #[test]
    fn test_roundify_json_snapshot() -> anyhow::Result<()> {
        // Snapshots reach the engine JSON-decoded from the explorer's fetch
        // layer; a decoded snapshot must reconstruct like a native one.
        let matches = vec![resolved_match(1, 2, WinnerSlot::One, 10), open_match(1, 3, 11)];
        let commitments: Vec<_> = (1..=3).map(commitment).collect();

        let decoded: Vec<Match> = serde_json::from_str(&serde_json::to_string(&matches)?)?;
        let rounds = roundify(&decoded, &commitments)?;

        assert_eq!(rounds, roundify(&matches, &commitments)?);
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[1].matches, vec![matches[1].clone()]);
        Ok(())
    }

    #[test]
    fn test_superset_reproduces_previous_rounds() {
        let before_matches = vec![resolved_match(1, 2, WinnerSlot::One, 10), open_match(1, 3, 11)];
        let before_commitments: Vec<_> = (1..=3).map(commitment).collect();

        let mut after_matches = before_matches.clone();
        after_matches.push(open_match(4, 5, 12));
        let mut after_commitments = before_commitments.clone();
        after_commitments.push(commitment(4));
        after_commitments.push(commitment(5));

        let before = roundify(&before_matches, &before_commitments).unwrap();
        let after = roundify(&after_matches, &after_commitments).unwrap();

        // The new match joins round 0; every previously assigned match keeps
        // its round index.
        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].matches[0], before[0].matches[0]);
        assert_eq!(after[1].matches, before[1].matches);
        assert_eq!(after[0].matches.len(), 2);
    }
}
