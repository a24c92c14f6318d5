//! Recording and editing rounds.
//!
//! Scores arrive from forms as numbers or strings. Each one is coerced to a
//! non-negative integer; anything that is not clearly a whole number is
//! rejected and the whole update is dropped.

use crate::error::{ScoreError, ScoreResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A raw score as submitted by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Int(i64),
    Float(f64),
    Text(String),
    /// Anything else (`null` from a cleared cell, bools, ...); never a score
    Other(serde_json::Value),
}

/// Raw scores for one round, keyed by player
pub type ScoreSheet = BTreeMap<PlayerName, ScoreInput>;

impl ScoreInput {
    /// Coerce to a score. `"12"`, `12.0` and `"12.0"` are accepted;
    /// negatives, fractions and non-numbers are not.
    pub fn coerce(&self) -> Option<Score> {
        match self {
            ScoreInput::Int(n) => Score::try_from(*n).ok(),
            ScoreInput::Float(f) => float_to_score(*f),
            ScoreInput::Text(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    Score::try_from(n).ok()
                } else {
                    s.parse::<f64>().ok().and_then(float_to_score)
                }
            }
            ScoreInput::Other(_) => None,
        }
    }
}

fn float_to_score(f: f64) -> Option<Score> {
    if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f <= f64::from(Score::MAX) {
        Some(f as Score)
    } else {
        None
    }
}

impl From<Score> for ScoreInput {
    fn from(score: Score) -> Self {
        ScoreInput::Int(i64::from(score))
    }
}

impl fmt::Display for ScoreInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreInput::Int(n) => write!(f, "{}", n),
            ScoreInput::Float(x) => write!(f, "{}", x),
            ScoreInput::Text(s) => write!(f, "'{}'", s),
            ScoreInput::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Check a sheet against the roster and coerce it into a round.
///
/// `round_no` is the 1-based position used in error messages.
fn validate_sheet(state: &GameState, sheet: &ScoreSheet, round_no: usize) -> ScoreResult<RoundScores> {
    if let Some(unknown) = sheet.keys().find(|p| !state.has_player(p)) {
        return Err(ScoreError::validation(format!(
            "Round {}: '{}' is not on the roster",
            round_no, unknown
        )));
    }

    state
        .players
        .iter()
        .map(|player| {
            let raw = sheet.get(player).ok_or_else(|| {
                ScoreError::validation(format!(
                    "Round {}: missing score for {}",
                    round_no, player
                ))
            })?;
            let score = raw.coerce().ok_or_else(|| {
                ScoreError::validation(format!(
                    "Round {}: invalid score for {}: {}",
                    round_no, player, raw
                ))
            })?;
            Ok((player.clone(), score))
        })
        .collect()
}

fn check_index(state: &GameState, index: usize) -> ScoreResult<usize> {
    if index == 0 || index > state.rounds.len() {
        return Err(ScoreError::not_found(format!(
            "Round {} not found ({} rounds recorded)",
            index,
            state.rounds.len()
        )));
    }
    Ok(index - 1)
}

/// Record a new round. Returns its 1-based position.
pub fn append_round(state: &mut GameState, sheet: &ScoreSheet) -> ScoreResult<usize> {
    if !state.is_setup() {
        return Err(ScoreError::validation("Game has not been set up yet"));
    }

    let round_no = state.rounds.len() + 1;
    let round = validate_sheet(state, sheet, round_no)?;
    state.rounds.push(round);

    tracing::info!("Recorded round {}", round_no);
    Ok(round_no)
}

/// Replace the round at 1-based `index`
pub fn edit_round(state: &mut GameState, index: usize, sheet: &ScoreSheet) -> ScoreResult<()> {
    let slot = check_index(state, index)?;
    let round = validate_sheet(state, sheet, index)?;
    state.rounds[slot] = round;

    tracing::info!("Edited round {}", index);
    Ok(())
}

/// Delete the round at 1-based `index`; later rounds move up one position
pub fn delete_round(state: &mut GameState, index: usize) -> ScoreResult<()> {
    let slot = check_index(state, index)?;
    state.rounds.remove(slot);

    tracing::info!("Deleted round {}", index);
    Ok(())
}

/// Replace the whole round table at once.
///
/// The number of rows must match the recorded rounds. If any cell is
/// invalid nothing is changed.
pub fn replace_rounds(state: &mut GameState, sheets: &[ScoreSheet]) -> ScoreResult<()> {
    if sheets.len() != state.rounds.len() {
        return Err(ScoreError::validation(format!(
            "Expected {} rounds, got {}",
            state.rounds.len(),
            sheets.len()
        )));
    }

    let rounds = sheets
        .iter()
        .enumerate()
        .map(|(i, sheet)| validate_sheet(state, sheet, i + 1))
        .collect::<ScoreResult<Vec<_>>>()?;
    state.rounds = rounds;

    tracing::info!("Updated all {} rounds", state.rounds.len());
    Ok(())
}

/// Blank input for the next round: zero for every player
pub fn empty_sheet(state: &GameState) -> RoundScores {
    state.players.iter().map(|p| (p.clone(), 0)).collect()
}
