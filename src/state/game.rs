use super::AppState;
use crate::auth::Session;
use crate::error::{ScoreError, ScoreResult};
use crate::roster;
use crate::types::GameState;

impl AppState {
    /// Start a new game with the given names.
    ///
    /// Refused while a game is in progress; end it first.
    pub async fn setup_game(&self, session: &Session, names: &[String]) -> ScoreResult<GameState> {
        let (game, ()) = self
            .mutate(session, "set up the game", |game| {
                if game.is_setup() {
                    return Err(ScoreError::validation(
                        "A game is already in progress; end it before starting a new one",
                    ));
                }
                *game = roster::setup(names)?;
                Ok(())
            })
            .await?;

        tracing::info!("Game started with {} players", game.players.len());
        Ok(game)
    }

    /// Delete the saved game and the admin session marker
    pub async fn end_game(&self, session: &Session) -> ScoreResult<()> {
        session.require_admin("end the game")?;

        let _guard = self.action_lock.lock().await;
        self.store.reset().await
    }

    /// Check the admin credential and, if standing sessions are enabled,
    /// persist the marker
    pub async fn login(&self, username: &str, password: &str) -> ScoreResult<Session> {
        if !self.auth.validate(username, password) {
            tracing::warn!("Failed admin login for user '{}'", username);
            return Err(ScoreError::Unauthorized(
                "Invalid admin credentials".to_string(),
            ));
        }

        if self.auth.persist_session {
            self.store.save_auth().await?;
        }
        tracing::info!("Admin '{}' logged in", username);
        Ok(Session::admin(username))
    }

    /// Drop the standing admin session marker
    pub async fn logout(&self, session: &Session) -> ScoreResult<()> {
        session.require_admin("log out")?;
        self.store.clear_auth().await?;
        tracing::info!("Admin logged out");
        Ok(())
    }
}
