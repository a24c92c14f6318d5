use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name of a player; also the identity key inside round maps
pub type PlayerName = String;

/// Points recorded for one player in one round
pub type Score = u32;

/// Cumulative points across all rounds
pub type Total = u64;

/// One round: a score for every player on the roster.
///
/// Kept as a `BTreeMap` so the persisted JSON object has a stable key order.
pub type RoundScores = BTreeMap<PlayerName, Score>;

/// Minimum number of players needed to start a game
pub const MIN_PLAYERS: usize = 2;

/// Maximum roster size
pub const MAX_PLAYERS: usize = 15;

/// The whole game: roster plus round history.
///
/// Serialized as `{ "players": [...], "scores": [{...}, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Roster in display/input order
    #[serde(default)]
    pub players: Vec<PlayerName>,
    /// Rounds in play order; positions are 1-based when addressed
    #[serde(default, rename = "scores")]
    pub rounds: Vec<RoundScores>,
}

impl GameState {
    /// A game counts as set up once it has a roster
    pub fn is_setup(&self) -> bool {
        !self.players.is_empty()
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    /// Bring every round's key set in line with the roster.
    ///
    /// Missing players get a zero, keys for players no longer on the roster
    /// are dropped. Returns true if anything changed.
    pub fn repair_rounds(&mut self) -> bool {
        let mut changed = false;
        for round in self.rounds.iter_mut() {
            let before = round.len();
            round.retain(|name, _| self.players.contains(name));
            changed |= round.len() != before;

            for player in &self.players {
                if !round.contains_key(player) {
                    round.insert(player.clone(), 0);
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Capability of the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer { name: String },
    Anonymous,
}
