//! Totals, ranking and leaderboard labels.
//!
//! Lowest total wins ("TUG"). Ranking works on distinct total values, so a
//! tie at the bottom or top never produces a duplicate boundary.

use crate::types::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

const TUG_MARKER: &str = "🏆TUG";
const RUNNER_UP_MARKER: &str = "🟠";
const LAST_MARKER: &str = "🔴";

/// A player's cumulative total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerTotal {
    pub player: PlayerName,
    pub total: Total,
}

/// Rank boundaries over the distinct totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub min: Option<Total>,
    /// Second-highest distinct total; only set when it differs from both
    /// `min` and `max`
    pub second_max: Option<Total>,
    pub max: Option<Total>,
}

/// Highlight category of a player on the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    /// Lowest total (current leader)
    Tug,
    /// Second-highest total
    RunnerUp,
    /// Highest total
    Last,
    Unranked,
}

impl Standing {
    fn marker(self) -> Option<&'static str> {
        match self {
            Standing::Tug => Some(TUG_MARKER),
            Standing::RunnerUp => Some(RUNNER_UP_MARKER),
            Standing::Last => Some(LAST_MARKER),
            Standing::Unranked => None,
        }
    }
}

/// One row of the leaderboard.
///
/// `label` is for display only; `player` is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub player: PlayerName,
    pub total: Total,
    pub label: String,
    pub standing: Standing,
}

/// Per-player totals in roster order. Players without rounds total 0.
pub fn totals(state: &GameState) -> Vec<PlayerTotal> {
    state
        .players
        .iter()
        .map(|player| PlayerTotal {
            player: player.clone(),
            total: state
                .rounds
                .iter()
                .map(|round| Total::from(round.get(player).copied().unwrap_or(0)))
                .sum(),
        })
        .collect()
}

/// Compute rank boundaries over the distinct values in `totals`
pub fn ranking(totals: impl IntoIterator<Item = Total>) -> Ranking {
    let distinct: BTreeSet<Total> = totals.into_iter().collect();
    let mut descending = distinct.iter().rev().copied();

    let max = descending.next();
    let second_max = descending.next().filter(|_| distinct.len() >= 3);

    Ranking {
        min: distinct.first().copied(),
        second_max,
        max,
    }
}

/// Standing of a total; the winner marker takes priority when boundaries coincide
pub fn standing(total: Total, ranking: &Ranking) -> Standing {
    if ranking.min == Some(total) {
        Standing::Tug
    } else if ranking.max == Some(total) {
        Standing::Last
    } else if ranking.second_max == Some(total) {
        Standing::RunnerUp
    } else {
        Standing::Unranked
    }
}

/// Display label for a player, e.g. `"Bob 🏆TUG"`
pub fn label(player: &str, total: Total, ranking: &Ranking) -> String {
    match standing(total, ranking).marker() {
        Some(marker) => format!("{} {}", player, marker),
        None => player.to_string(),
    }
}

/// Build the leaderboard in roster order, with display labels made unique
pub fn leaderboard(state: &GameState) -> (Vec<LeaderboardEntry>, Ranking) {
    let totals = totals(state);
    let ranking = ranking(totals.iter().map(|t| t.total));

    let mut seen: HashMap<String, usize> = HashMap::new();
    let entries = totals
        .into_iter()
        .map(|PlayerTotal { player, total }| {
            let base = label(&player, total, &ranking);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let label = if *count > 1 {
                format!("{} ({})", base, count)
            } else {
                base
            };

            LeaderboardEntry {
                standing: standing(total, &ranking),
                player,
                total,
                label,
            }
        })
        .collect();

    (entries, ranking)
}
