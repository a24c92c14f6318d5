use super::AppState;
use crate::auth::Session;
use crate::error::ScoreResult;
use crate::rounds::{self, ScoreSheet};
use crate::types::GameState;

impl AppState {
    /// Record a new round. Returns the game and the new round's position.
    pub async fn append_round(
        &self,
        session: &Session,
        sheet: &ScoreSheet,
    ) -> ScoreResult<(GameState, usize)> {
        self.mutate(session, "enter scores", |game| {
            rounds::append_round(game, sheet)
        })
        .await
    }

    pub async fn edit_round(
        &self,
        session: &Session,
        index: usize,
        sheet: &ScoreSheet,
    ) -> ScoreResult<GameState> {
        let (game, ()) = self
            .mutate(session, "edit rounds", |game| {
                rounds::edit_round(game, index, sheet)
            })
            .await?;
        Ok(game)
    }

    pub async fn delete_round(&self, session: &Session, index: usize) -> ScoreResult<GameState> {
        let (game, ()) = self
            .mutate(session, "delete rounds", |game| {
                rounds::delete_round(game, index)
            })
            .await?;
        Ok(game)
    }

    /// Replace every recorded round in one go
    pub async fn replace_rounds(
        &self,
        session: &Session,
        sheets: &[ScoreSheet],
    ) -> ScoreResult<GameState> {
        let (game, ()) = self
            .mutate(session, "edit rounds", |game| {
                rounds::replace_rounds(game, sheets)
            })
            .await?;
        Ok(game)
    }
}
