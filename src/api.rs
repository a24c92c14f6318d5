//! HTTP API endpoints.
//!
//! Thin layer over [`AppState`]: resolve the caller's session, run one
//! action, map the result to JSON.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::Session;
use crate::error::ScoreError;
use crate::protocol::*;
use crate::rounds::empty_sheet;
use crate::state::AppState;

type ApiResult<T> = Result<T, ScoreError>;

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScoreError::Validation(_) => StatusCode::BAD_REQUEST,
            ScoreError::NotFound(_) => StatusCode::NOT_FOUND,
            ScoreError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ScoreError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        let body = ErrorResponse {
            code: self.code().to_string(),
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ScoreError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Session::resolve(&parts.headers, &state.auth, &state.store).await
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/game", get(get_game))
        .route("/api/game/setup", post(setup_game))
        .route("/api/game/end", post(end_game))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/rounds", post(append_round).put(replace_rounds))
        .route("/api/rounds/{index}", put(edit_round).delete(delete_round))
        .route("/api/players", post(add_player))
        .route("/api/players/{name}", delete(remove_player))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/session
pub async fn get_session(session: Session) -> Json<SessionInfo> {
    Json(SessionInfo {
        is_admin: session.is_admin(),
        viewer: session.current_viewer_identity().map(str::to_string),
    })
}

/// POST /api/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionInfo>> {
    let session = state.login(&req.username, &req.password).await?;
    Ok(Json(SessionInfo {
        is_admin: true,
        viewer: session.current_viewer_identity().map(str::to_string),
    }))
}

/// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<StatusCode> {
    state.logout(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/game
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<Json<GameView>> {
    let game = state.load_game(&session).await?;
    Ok(Json(GameView::new(&game, session.is_admin())))
}

/// GET /api/leaderboard
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<Json<LeaderboardResponse>> {
    let game = state.load_game(&session).await?;
    Ok(Json(LeaderboardResponse::new(&game)))
}

/// POST /api/game/setup
pub async fn setup_game(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<SetupRequest>,
) -> ApiResult<(StatusCode, Json<GameView>)> {
    let game = state.setup_game(&session, &req.names).await?;
    Ok((StatusCode::CREATED, Json(GameView::new(&game, true))))
}

/// POST /api/game/end
///
/// Deletes the saved game and any standing admin session.
pub async fn end_game(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> ApiResult<StatusCode> {
    state.end_game(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/rounds
pub async fn append_round(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<AppendRoundRequest>,
) -> ApiResult<(StatusCode, Json<RoundRecorded>)> {
    let (game, number) = state.append_round(&session, &req.scores).await?;
    let reply = RoundRecorded {
        number,
        next_input: empty_sheet(&game),
        game: GameView::new(&game, true),
    };
    Ok((StatusCode::CREATED, Json(reply)))
}

/// PUT /api/rounds
pub async fn replace_rounds(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<ReplaceRoundsRequest>,
) -> ApiResult<Json<GameView>> {
    let game = state.replace_rounds(&session, &req.rounds).await?;
    Ok(Json(GameView::new(&game, true)))
}

/// PUT /api/rounds/{index}
pub async fn edit_round(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(index): Path<usize>,
    Json(req): Json<EditRoundRequest>,
) -> ApiResult<Json<GameView>> {
    let game = state.edit_round(&session, index, &req.scores).await?;
    Ok(Json(GameView::new(&game, true)))
}

/// DELETE /api/rounds/{index}
pub async fn delete_round(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(index): Path<usize>,
) -> ApiResult<Json<GameView>> {
    let game = state.delete_round(&session, index).await?;
    Ok(Json(GameView::new(&game, true)))
}

/// POST /api/players
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<AddPlayerRequest>,
) -> ApiResult<(StatusCode, Json<GameView>)> {
    let game = state.add_player(&session, &req.name).await?;
    Ok((StatusCode::CREATED, Json(GameView::new(&game, true))))
}

/// DELETE /api/players/{name}
pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(name): Path<String>,
) -> ApiResult<Json<GameView>> {
    let game = state.remove_player(&session, &name).await?;
    Ok(Json(GameView::new(&game, true)))
}
