//! Request and response bodies for the HTTP API

use crate::rounds::ScoreSheet;
use crate::scoring::{self, LeaderboardEntry, Ranking};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupRequest {
    /// Name slots from the setup form; blanks are ignored
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendRoundRequest {
    pub scores: ScoreSheet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRoundRequest {
    pub scores: ScoreSheet,
}

/// The full round table, in round order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRoundsRequest {
    pub rounds: Vec<ScoreSheet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPlayerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub is_admin: bool,
    pub viewer: Option<String>,
}

/// A recorded round with its 1-based position
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundView {
    pub number: usize,
    pub scores: RoundScores,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
    pub ranking: Ranking,
}

impl LeaderboardResponse {
    pub fn new(game: &GameState) -> Self {
        let (entries, ranking) = scoring::leaderboard(game);
        Self { entries, ranking }
    }
}

/// Everything the presentation needs to draw the game
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub setup_done: bool,
    /// False for viewers; mutating controls should be hidden
    pub can_edit: bool,
    pub players: Vec<PlayerName>,
    pub rounds: Vec<RoundView>,
    pub leaderboard: LeaderboardResponse,
}

impl GameView {
    pub fn new(game: &GameState, can_edit: bool) -> Self {
        Self {
            setup_done: game.is_setup(),
            can_edit,
            players: game.players.clone(),
            rounds: game
                .rounds
                .iter()
                .enumerate()
                .map(|(i, scores)| RoundView {
                    number: i + 1,
                    scores: scores.clone(),
                })
                .collect(),
            leaderboard: LeaderboardResponse::new(game),
        }
    }
}

/// Reply to a recorded round
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecorded {
    pub number: usize,
    pub game: GameView,
    /// Pending input should be reset to these values
    pub next_input: RoundScores,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}
