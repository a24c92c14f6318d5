//! Roster setup and mutation.
//!
//! Every change keeps the round history in step with the roster: a new player
//! is backfilled with zero in all past rounds, a removed player disappears
//! from all of them.

use crate::error::{ScoreError, ScoreResult};
use crate::types::*;

/// Build a fresh game from the setup form's name slots.
///
/// Names are trimmed and blank slots dropped. Duplicate names are rejected.
pub fn setup<S: AsRef<str>>(names: &[S]) -> ScoreResult<GameState> {
    let cleaned: Vec<PlayerName> = names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.len() < MIN_PLAYERS {
        return Err(ScoreError::validation(format!(
            "At least {} players required",
            MIN_PLAYERS
        )));
    }
    if cleaned.len() > MAX_PLAYERS {
        return Err(ScoreError::validation(format!(
            "At most {} players allowed",
            MAX_PLAYERS
        )));
    }
    for (i, name) in cleaned.iter().enumerate() {
        if cleaned[..i].contains(name) {
            return Err(ScoreError::validation(format!(
                "Player '{}' entered twice",
                name
            )));
        }
    }

    Ok(GameState {
        players: cleaned,
        rounds: Vec::new(),
    })
}

/// Append a player and backfill a zero score into every recorded round.
///
/// Returns the trimmed name that was added.
pub fn add_player(state: &mut GameState, name: &str) -> ScoreResult<PlayerName> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ScoreError::validation("Player name must not be empty"));
    }
    if state.has_player(name) {
        return Err(ScoreError::validation(format!(
            "Player '{}' already exists",
            name
        )));
    }
    if state.players.len() >= MAX_PLAYERS {
        return Err(ScoreError::validation(format!(
            "Maximum {} players reached",
            MAX_PLAYERS
        )));
    }

    state.players.push(name.to_string());
    for round in state.rounds.iter_mut() {
        round.insert(name.to_string(), 0);
    }

    tracing::info!("Added player {}", name);
    Ok(name.to_string())
}

/// Remove a player from the roster and from every recorded round.
///
/// Removing the last player ends the game: the leftover rounds are dropped
/// so setup can run again.
pub fn remove_player(state: &mut GameState, name: &str) -> ScoreResult<()> {
    let Some(index) = state.players.iter().position(|p| p == name) else {
        return Err(ScoreError::not_found(format!("Player '{}' not found", name)));
    };

    state.players.remove(index);
    for round in state.rounds.iter_mut() {
        round.remove(name);
    }
    if state.players.is_empty() {
        state.rounds.clear();
    }

    tracing::info!("Removed player {}", name);
    Ok(())
}
