mod game;
mod player;
mod round;

use crate::auth::{AuthConfig, Session};
use crate::error::ScoreResult;
use crate::store::GameStore;
use crate::types::GameState;
use tokio::sync::Mutex;

/// Shared application state.
///
/// Every action runs alone: the game is re-read from disk, changed on a
/// copy, saved, and only then handed back. A failed validation or a failed
/// write leaves the saved game untouched.
pub struct AppState {
    pub store: GameStore,
    pub auth: AuthConfig,
    action_lock: Mutex<()>,
}

impl AppState {
    pub fn new(store: GameStore, auth: AuthConfig) -> Self {
        Self {
            store,
            auth,
            action_lock: Mutex::new(()),
        }
    }

    /// Run an admin-only change against the latest saved game
    async fn mutate<T>(
        &self,
        session: &Session,
        action: &str,
        apply: impl FnOnce(&mut GameState) -> ScoreResult<T>,
    ) -> ScoreResult<(GameState, T)> {
        session.require_admin(action)?;

        let _guard = self.action_lock.lock().await;
        let mut game = self.store.load().await;
        let out = apply(&mut game)?;
        self.store.save(&game).await?;

        Ok((game, out))
    }

    /// Current game as seen by any identified caller
    pub async fn load_game(&self, session: &Session) -> ScoreResult<GameState> {
        session.require_identity()?;
        Ok(self.store.load().await)
    }
}
