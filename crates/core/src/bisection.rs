//! Bisection range reconstruction
//!
//! Replays the recorded advances of a match to recover the shrinking cycle
//! range under dispute. Each advance halves the parent range: the claimant
//! either agreed with the opposing boundary (left half) or contested it
//! (right half). All arithmetic is exact integer arithmetic over `u128`
//! cycle counts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Hash, Match, MatchAdvance};

/// Which half of the parent range a bisection step narrowed into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// The claimant agreed with the reference boundary
    Left,
    /// The claimant contested the reference boundary
    Right,
}

/// A half-open interval `[start, end)` of machine cycles under dispute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    /// Inclusive lower bound
    pub start: u128,
    /// Exclusive upper bound
    pub end: u128,
}

impl CycleRange {
    /// The full range `[0, 2^(height-1))` disputed by a fresh match
    pub fn full(height: u32) -> Result<Self, CoreError> {
        if height == 0 || height > 128 {
            return Err(CoreError::InvalidHeight { height });
        }
        Ok(Self {
            start: 0,
            end: 1u128 << (height - 1),
        })
    }

    /// Width of the range in cycles
    pub const fn width(&self) -> u128 {
        self.end - self.start
    }

    /// Exact integer midpoint, `start + floor(width / 2)`
    pub const fn midpoint(&self) -> u128 {
        self.start + (self.end - self.start) / 2
    }

    /// The half of this range selected by `direction`
    pub const fn half(&self, direction: Direction) -> Self {
        let mid = self.midpoint();
        match direction {
            Direction::Left => Self {
                start: self.start,
                end: mid,
            },
            Direction::Right => Self {
                start: mid,
                end: self.end,
            },
        }
    }

    /// Whether `other` lies entirely within this range
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One reconstructed bisection step of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BisectionStep {
    /// Which half the dispute narrowed into
    pub direction: Direction,
    /// The cycle range under dispute after this step
    pub range: CycleRange,
    /// Block at which the advance was submitted
    pub block_number: u64,
}

/// The reconstructed bisection history of a match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BisectionTrace {
    /// One step per recorded advance, in order
    pub steps: Vec<BisectionStep>,
    /// Fraction of the maximum possible bisections already taken, in `[0, 1]`
    pub progress: f64,
}

/// Collect the advances belonging to one match, preserving input order
pub fn advances_for(advances: &[MatchAdvance], id_hash: &Hash) -> Vec<MatchAdvance> {
    advances
        .iter()
        .filter(|adv| adv.id_hash == *id_hash)
        .cloned()
        .collect()
}

/// Replay the ordered advances of a match against a tournament of the given
/// height, producing the range narrowed into at each step plus an overall
/// progress ratio.
///
/// The reference boundary for the first advance is the match's `left_of_two`;
/// for every later advance it is the `left_node` produced by the previous
/// one. An advance whose `other_parent` equals the reference narrows left,
/// any other value narrows right.
pub fn trace_bisection(
    height: u32,
    m: &Match,
    advances: &[MatchAdvance],
) -> Result<BisectionTrace, CoreError> {
    let mut range = CycleRange::full(height)?;
    let max_steps = height - 1;

    if advances.len() as u64 > u64::from(max_steps) {
        return Err(CoreError::TooManyAdvances {
            id_hash: m.id_hash,
            max: max_steps,
        });
    }

    let mut steps = Vec::with_capacity(advances.len());
    let mut reference = m.left_of_two;

    for adv in advances {
        if adv.id_hash != m.id_hash {
            return Err(CoreError::UnknownMatch {
                id_hash: adv.id_hash,
            });
        }

        let direction = if adv.other_parent == reference {
            Direction::Left
        } else {
            Direction::Right
        };

        range = range.half(direction);
        steps.push(BisectionStep {
            direction,
            range,
            block_number: adv.block_number,
        });
        reference = adv.left_node;
    }

    // A height-1 tournament resolves in a single step with no room to
    // bisect; its contests are always fully progressed.
    let progress = if max_steps == 0 {
        1.0
    } else {
        steps.len() as f64 / f64::from(max_steps)
    };

    Ok(BisectionTrace { steps, progress })
}
