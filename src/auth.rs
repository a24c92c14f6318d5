//! Admin/viewer role gate
//!
//! The admin is whoever presents the shared credential over HTTP Basic Auth
//! (or, when enabled, whoever logged in last via the persisted marker).
//! Anyone else who gives a display name may view.

use crate::error::{ScoreError, ScoreResult};
use crate::store::GameStore;
use crate::types::Role;
use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Header carrying a viewer's display name
pub const VIEWER_HEADER: &str = "x-viewer-name";

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "password";

/// Shared admin credential
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    /// Let the persisted marker grant admin without credentials
    pub persist_session: bool,
}

impl AuthConfig {
    /// Load from TUG_ADMIN_USERNAME, TUG_ADMIN_PASSWORD and
    /// TUG_PERSIST_ADMIN_SESSION
    pub fn from_env() -> Self {
        let username = env_non_empty("TUG_ADMIN_USERNAME");
        let password = env_non_empty("TUG_ADMIN_PASSWORD");

        if username.is_none() || password.is_none() {
            tracing::warn!(
                "TUG_ADMIN_USERNAME/TUG_ADMIN_PASSWORD not set, using the default admin credential"
            );
        }

        let persist_session = env_non_empty("TUG_PERSIST_ADMIN_SESSION")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: password.unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            persist_session,
        }
    }

    /// Validate credentials
    pub fn validate(&self, username: &str, password: &str) -> bool {
        // Evaluate both so timing does not reveal which half was wrong
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            persist_session: false,
        }
    }
}

pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Extract `(username, password)` from an `Authorization: Basic ...` header
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Who is making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    admin_name: Option<String>,
}

impl Session {
    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            role: Role::Admin,
            admin_name: Some(name.into()),
        }
    }

    /// A view-only session; `None` if the name is blank
    pub fn viewer(name: &str) -> Option<Self> {
        let name = name.trim();
        (!name.is_empty()).then(|| Self {
            role: Role::Viewer {
                name: name.to_string(),
            },
            admin_name: None,
        })
    }

    pub fn anonymous() -> Self {
        Self {
            role: Role::Anonymous,
            admin_name: None,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn current_viewer_identity(&self) -> Option<&str> {
        match &self.role {
            Role::Admin => self.admin_name.as_deref(),
            Role::Viewer { name } => Some(name),
            Role::Anonymous => None,
        }
    }

    /// Fail unless this session may mutate the game
    pub fn require_admin(&self, action: &str) -> ScoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ScoreError::Unauthorized(format!("Only admin can {}", action)))
        }
    }

    /// Fail unless the caller has identified in some way
    pub fn require_identity(&self) -> ScoreResult<()> {
        if self.current_viewer_identity().is_some() {
            Ok(())
        } else {
            Err(ScoreError::Unauthorized(
                "Log in as admin or enter your name to view the game".to_string(),
            ))
        }
    }

    /// Resolve the session for a request.
    ///
    /// Order: Basic credential, viewer name header, persisted admin marker
    /// (if enabled). A Basic header with a wrong credential is rejected; a
    /// named viewer stays a viewer even while the marker is set.
    pub async fn resolve(
        headers: &HeaderMap,
        auth: &AuthConfig,
        store: &GameStore,
    ) -> ScoreResult<Self> {
        if let Some((username, password)) = basic_credentials(headers) {
            if auth.validate(&username, &password) {
                return Ok(Self::admin(username));
            }
            tracing::warn!("Rejected admin credential for user '{}'", username);
            return Err(ScoreError::Unauthorized(
                "Invalid admin credentials".to_string(),
            ));
        }

        let viewer = headers
            .get(VIEWER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::viewer);
        if let Some(viewer) = viewer {
            return Ok(viewer);
        }

        if auth.persist_session && store.load_auth().await {
            return Ok(Self::admin(auth.username.clone()));
        }

        Ok(Self::anonymous())
    }
}
