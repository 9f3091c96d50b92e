//! Tournament hierarchy navigation
//!
//! Tournaments form a shallow tree: a top-level tournament spawns middle
//! sub-tournaments, which spawn bottom ones. Each sub-tournament carries a
//! back-reference to its parent tournament and the match that escalated.
//! The arena owns the records and resolves the back-references by address
//! lookup; walking a breadcrumb never follows pointers.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Address, Hash, Match, Tournament, TournamentLevel, short_hex};

/// One segment of a breadcrumb trail, root first
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Hierarchy level of the node
    pub level: TournamentLevel,
    /// Short hex label for rendering
    pub label: String,
    /// The parent match this node descended from, absent at the root
    pub match_id: Option<Hash>,
}

/// Arena of tournaments addressed by contract address
#[derive(Clone, Debug, Default)]
pub struct TournamentArena {
    tournaments: HashMap<Address, Tournament>,
}

impl TournamentArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tournament, returning any previous record at its address
    pub fn insert(&mut self, tournament: Tournament) -> Option<Tournament> {
        self.tournaments.insert(tournament.address, tournament)
    }

    /// Look up a tournament by address
    pub fn get(&self, address: &Address) -> Option<&Tournament> {
        self.tournaments.get(address)
    }

    /// Number of tournaments in the arena
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    /// Whether the arena holds no tournaments
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    /// The root tournament above `address`
    pub fn root(&self, address: &Address) -> Result<&Tournament, CoreError> {
        let mut visited = HashSet::new();
        let mut current = *address;
        loop {
            let tournament = self
                .get(&current)
                .ok_or(CoreError::UnknownTournament { address: current })?;
            if !visited.insert(current) {
                return Err(CoreError::ParentCycle { address: current });
            }
            match tournament.parent {
                Some(parent) => current = parent.tournament,
                None => return Ok(tournament),
            }
        }
    }

    /// Direct sub-tournaments of `address`, ordered by address
    pub fn children_of(&self, address: &Address) -> Vec<&Tournament> {
        let mut children: Vec<&Tournament> = self
            .tournaments
            .values()
            .filter(|t| t.parent.is_some_and(|p| p.tournament == *address))
            .collect();
        children.sort_by_key(|t| t.address);
        children
    }

    /// The sub-tournament a match escalated into, if any
    pub fn child_of_match(&self, match_id: &Hash) -> Option<&Tournament> {
        self.tournaments
            .values()
            .find(|t| t.parent.is_some_and(|p| p.match_id == *match_id))
    }

    /// Breadcrumb trail from the root tournament down to `address`
    pub fn breadcrumb(&self, address: &Address) -> Result<Vec<Segment>, CoreError> {
        let mut trail = Vec::new();
        let mut visited = HashSet::new();
        let mut current = *address;
        loop {
            let tournament = self
                .get(&current)
                .ok_or(CoreError::UnknownTournament { address: current })?;
            if !visited.insert(current) {
                return Err(CoreError::ParentCycle { address: current });
            }
            trail.push(Segment {
                level: tournament.level,
                label: short_hex(&tournament.address),
                match_id: tournament.parent.map(|p| p.match_id),
            });
            match tournament.parent {
                Some(parent) => current = parent.tournament,
                None => break,
            }
        }
        trail.reverse();
        Ok(trail)
    }

    /// Breadcrumb trail down to one match of the tournament at `address`
    ///
    /// The final segment names the match; `matches` is the tournament's
    /// match snapshot, used to reject identifiers that refer to no known
    /// contest.
    pub fn match_breadcrumb(
        &self,
        address: &Address,
        matches: &[Match],
        id_hash: &Hash,
    ) -> Result<Vec<Segment>, CoreError> {
        if !matches.iter().any(|m| m.id_hash == *id_hash) {
            return Err(CoreError::UnknownMatch { id_hash: *id_hash });
        }
        let tournament = self
            .get(address)
            .ok_or(CoreError::UnknownTournament { address: *address })?;

        let mut trail = self.breadcrumb(address)?;
        trail.push(Segment {
            level: tournament.level,
            label: short_hex(id_hash),
            match_id: Some(*id_hash),
        });
        Ok(trail)
    }
}

impl FromIterator<Tournament> for TournamentArena {
    fn from_iter<I: IntoIterator<Item = Tournament>>(iter: I) -> Self {
        let mut arena = Self::new();
        for tournament in iter {
            arena.insert(tournament);
        }
        arena
    }
}
