use super::AppState;
use crate::auth::Session;
use crate::error::ScoreResult;
use crate::roster;
use crate::types::GameState;

impl AppState {
    /// Add a player; past rounds get a zero for them
    pub async fn add_player(&self, session: &Session, name: &str) -> ScoreResult<GameState> {
        let (game, _) = self
            .mutate(session, "add players", |game| roster::add_player(game, name))
            .await?;
        Ok(game)
    }

    /// Remove a player and their scores from every round
    pub async fn remove_player(&self, session: &Session, name: &str) -> ScoreResult<GameState> {
        let (game, ()) = self
            .mutate(session, "remove players", |game| {
                roster::remove_player(game, name)
            })
            .await?;
        Ok(game)
    }
}
