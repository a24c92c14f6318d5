//! File-backed persistence for the game document and the admin session marker.
//!
//! Reads never fail: a missing or unreadable document is treated as "no saved
//! game". Writes go to a sibling temp file which is then renamed over the
//! target, so readers only ever see a whole document.

use crate::error::{ScoreError, ScoreResult};
use crate::types::GameState;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persisted marker for a standing admin session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMarker {
    pub authenticated: bool,
}

#[derive(Debug, Clone)]
pub struct GameStore {
    state_path: PathBuf,
    auth_path: PathBuf,
}

impl GameStore {
    pub fn new(state_path: impl Into<PathBuf>, auth_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
            auth_path: auth_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Load the saved game, or an empty one if there is none
    pub async fn load(&self) -> GameState {
        let Some(mut state) = read_json::<GameState>(&self.state_path).await else {
            return GameState::default();
        };

        if state.repair_rounds() {
            tracing::warn!(
                "Saved game at {} had rounds out of sync with the roster; repaired",
                self.state_path.display()
            );
        }
        state
    }

    /// Persist the whole game document
    pub async fn save(&self, state: &GameState) -> ScoreResult<()> {
        write_json(&self.state_path, state).await
    }

    /// Delete the saved game and the admin session marker
    pub async fn reset(&self) -> ScoreResult<()> {
        remove_if_exists(&self.state_path).await?;
        remove_if_exists(&self.auth_path).await?;
        tracing::info!("Game state reset");
        Ok(())
    }

    /// True if a persisted marker says an admin is logged in
    pub async fn load_auth(&self) -> bool {
        read_json::<AuthMarker>(&self.auth_path)
            .await
            .is_some_and(|m| m.authenticated)
    }

    pub async fn save_auth(&self) -> ScoreResult<()> {
        write_json(&self.auth_path, &AuthMarker { authenticated: true }).await
    }

    pub async fn clear_auth(&self) -> ScoreResult<()> {
        remove_if_exists(&self.auth_path).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}. Starting fresh", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring corrupt file {}: {}", path.display(), e);
            None
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> ScoreResult<()> {
    let persistence = |source: std::io::Error| ScoreError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_vec(value).map_err(|e| persistence(e.into()))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = tokio::fs::write(&tmp, &json).await {
        tracing::error!("Failed to write {}: {}", tmp.display(), e);
        return Err(persistence(e));
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        tracing::error!("Failed to move {} into place: {}", tmp.display(), e);
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(persistence(e));
    }
    Ok(())
}

async fn remove_if_exists(path: &Path) -> ScoreResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ScoreError::Persistence {
            path: path.to_path_buf(),
            source,
        }),
    }
}
