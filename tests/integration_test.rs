use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tugscore::auth::{AuthConfig, Session, VIEWER_HEADER};
use tugscore::rounds::{ScoreInput, ScoreSheet};
use tugscore::scoring::{self, Standing};
use tugscore::state::AppState;
use tugscore::store::GameStore;

fn app_in(dir: &tempfile::TempDir) -> Arc<AppState> {
    Arc::new(AppState::new(
        GameStore::new(dir.path().join("game.json"), dir.path().join("auth.json")),
        AuthConfig::default(),
    ))
}

fn admin_auth() -> String {
    format!("Basic {}", STANDARD.encode("admin:password"))
}

enum Caller {
    Admin,
    Viewer(&'static str),
    Nobody,
}

async fn call(
    router: &Router,
    caller: Caller,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    builder = match caller {
        Caller::Admin => builder.header(header::AUTHORIZATION, admin_auth()),
        Caller::Viewer(name) => builder.header(VIEWER_HEADER, name),
        Caller::Nobody => builder,
    };
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// End-to-end flow: setup, rounds, roster changes, leaderboard, end game
#[tokio::test]
async fn test_full_game_flow() {
    let dir = tempfile::tempdir().unwrap();
    let router = tugscore::api::router(app_in(&dir));

    // 1. Nothing saved yet
    let (status, game) = call(&router, Caller::Viewer("Dana"), "GET", "/api/game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["setup_done"], false);
    assert_eq!(game["can_edit"], false);

    // 2. Setup
    let (status, game) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["Alice", " Bob ", "", ""]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["players"], json!(["Alice", "Bob"]));

    // 3. Two rounds, mixing numbers and strings
    let (status, reply) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/rounds",
        Some(json!({"scores": {"Alice": 20, "Bob": "0"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["number"], 1);
    assert_eq!(reply["next_input"], json!({"Alice": 0, "Bob": 0}));

    let (status, _) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/rounds",
        Some(json!({"scores": {"Alice": 5.0, "Bob": 15}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // 4. Leaderboard as a viewer
    let (status, board) = call(
        &router,
        Caller::Viewer("Dana"),
        "GET",
        "/api/leaderboard",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["entries"][0]["total"], 25);
    assert_eq!(board["entries"][0]["standing"], "last");
    assert_eq!(board["entries"][1]["total"], 15);
    assert_eq!(board["entries"][1]["label"], "Bob 🏆TUG");
    assert_eq!(board["ranking"]["min"], 15);
    assert_eq!(board["ranking"]["max"], 25);
    assert_eq!(board["ranking"]["second_max"], Value::Null);

    // 5. Add Cara: both rounds get a zero
    let (status, game) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/players",
        Some(json!({"name": "Cara"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(game["rounds"][0]["scores"]["Cara"], 0);
    assert_eq!(game["rounds"][1]["scores"]["Cara"], 0);

    // 6. Edit round 2
    let (status, game) = call(
        &router,
        Caller::Admin,
        "PUT",
        "/api/rounds/2",
        Some(json!({"scores": {"Alice": 1, "Bob": 2, "Cara": 3}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        game["rounds"][1],
        json!({"number": 2, "scores": {"Alice": 1, "Bob": 2, "Cara": 3}})
    );
    assert_eq!(
        game["rounds"][0]["scores"],
        json!({"Alice": 20, "Bob": 0, "Cara": 0})
    );

    // 7. Remove Bob
    let (status, game) = call(&router, Caller::Admin, "DELETE", "/api/players/Bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["players"], json!(["Alice", "Cara"]));
    assert_eq!(game["rounds"][0]["scores"], json!({"Alice": 20, "Cara": 0}));

    // 8. Delete round 1, round 2 moves up
    let (status, game) = call(&router, Caller::Admin, "DELETE", "/api/rounds/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        game["rounds"],
        json!([{"number": 1, "scores": {"Alice": 1, "Cara": 3}}])
    );

    // 9. End game
    let (status, _) = call(&router, Caller::Admin, "POST", "/api/game/end", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, game) = call(&router, Caller::Viewer("Dana"), "GET", "/api/game", None).await;
    assert_eq!(game["setup_done"], false);
    assert!(!dir.path().join("game.json").exists());
}

#[tokio::test]
async fn test_viewer_cannot_mutate() {
    let dir = tempfile::tempdir().unwrap();
    let router = tugscore::api::router(app_in(&dir));
    call(
        &router,
        Caller::Admin,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["Alice", "Bob"]})),
    )
    .await;

    let attempts = [
        ("POST", "/api/players", Some(json!({"name": "Eve"}))),
        ("DELETE", "/api/players/Alice", None),
        (
            "POST",
            "/api/rounds",
            Some(json!({"scores": {"Alice": 1, "Bob": 1}})),
        ),
        ("POST", "/api/game/end", None),
    ];
    for (method, uri, body) in attempts {
        let (status, err) = call(&router, Caller::Viewer("Eve"), method, uri, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(err["code"], "UNAUTHORIZED");
    }

    let (status, game) = call(&router, Caller::Viewer("Eve"), "GET", "/api/game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["players"], json!(["Alice", "Bob"]));
}

#[tokio::test]
async fn test_anonymous_and_bad_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let router = tugscore::api::router(app_in(&dir));

    let (status, _) = call(&router, Caller::Nobody, "GET", "/api/game", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/api/game")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("admin:guess")),
        )
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (status, info) = call(&router, Caller::Admin, "GET", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info, json!({"is_admin": true, "viewer": "admin"}));
}

#[tokio::test]
async fn test_validation_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let router = tugscore::api::router(app_in(&dir));

    let (status, err) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["Alice", "   "]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert_eq!(err["msg"], "At least 2 players required");

    call(
        &router,
        Caller::Admin,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["Alice", "Bob"]})),
    )
    .await;

    let (status, err) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/rounds",
        Some(json!({"scores": {"Alice": 2.5, "Bob": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["msg"], "Round 1: invalid score for Alice: 2.5");

    // A cleared cell arrives as null
    let (status, err) = call(
        &router,
        Caller::Admin,
        "POST",
        "/api/rounds",
        Some(json!({"scores": {"Alice": null, "Bob": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "VALIDATION_ERROR");
    assert_eq!(err["msg"], "Round 1: invalid score for Alice: null");

    let (status, err) = call(
        &router,
        Caller::Admin,
        "PUT",
        "/api/rounds/3",
        Some(json!({"scores": {"Alice": 1, "Bob": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "NOT_FOUND");

    let (status, _) = call(&router, Caller::Admin, "DELETE", "/api/players/Zed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, game) = call(&router, Caller::Admin, "GET", "/api/game", None).await;
    assert_eq!(game["rounds"], json!([]));
}

#[tokio::test]
async fn test_replace_round_table() {
    let dir = tempfile::tempdir().unwrap();
    let router = tugscore::api::router(app_in(&dir));
    call(
        &router,
        Caller::Admin,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["Alice", "Bob"]})),
    )
    .await;
    for scores in [json!({"Alice": 1, "Bob": 2}), json!({"Alice": 3, "Bob": 4})] {
        call(
            &router,
            Caller::Admin,
            "POST",
            "/api/rounds",
            Some(json!({ "scores": scores })),
        )
        .await;
    }

    let (status, _) = call(
        &router,
        Caller::Admin,
        "PUT",
        "/api/rounds",
        Some(json!({"rounds": [{"Alice": "10", "Bob": 20}, {"Alice": "x", "Bob": 0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, game) = call(
        &router,
        Caller::Admin,
        "PUT",
        "/api/rounds",
        Some(json!({"rounds": [{"Alice": "10", "Bob": 20}, {"Alice": 0, "Bob": 0.0}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["leaderboard"]["entries"][0]["total"], 10);
    assert_eq!(game["leaderboard"]["entries"][1]["total"], 20);
}

#[tokio::test]
async fn test_standing_admin_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = Arc::new(AppState::new(
        GameStore::new(dir.path().join("game.json"), dir.path().join("auth.json")),
        AuthConfig {
            persist_session: true,
            ..AuthConfig::default()
        },
    ));
    let router = tugscore::api::router(app);

    let (status, _) = call(
        &router,
        Caller::Nobody,
        "POST",
        "/api/login",
        Some(json!({"username": "admin", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &router,
        Caller::Nobody,
        "POST",
        "/api/login",
        Some(json!({"username": "admin", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The marker alone now grants admin
    let (_, info) = call(&router, Caller::Nobody, "GET", "/api/session", None).await;
    assert_eq!(info["is_admin"], true);

    call(
        &router,
        Caller::Nobody,
        "POST",
        "/api/game/setup",
        Some(json!({"names": ["A", "B"]})),
    )
    .await;

    // A named viewer stays view-only while the marker is set
    let (_, info) = call(&router, Caller::Viewer("Dana"), "GET", "/api/session", None).await;
    assert_eq!(info, json!({"is_admin": false, "viewer": "Dana"}));
    let (status, _) = call(
        &router,
        Caller::Viewer("Dana"),
        "POST",
        "/api/players",
        Some(json!({"name": "Mallory"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, Caller::Viewer("Dana"), "POST", "/api/logout", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, game) = call(&router, Caller::Viewer("Dana"), "GET", "/api/game", None).await;
    assert_eq!(game["players"], json!(["A", "B"]));

    let (status, _) = call(&router, Caller::Nobody, "POST", "/api/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, info) = call(&router, Caller::Nobody, "GET", "/api/session", None).await;
    assert_eq!(info["is_admin"], false);
}

/// Same flow through the library API, checking the documented scenario
#[tokio::test]
async fn test_scenario_through_app_state() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(&dir);
    let admin = Session::admin("admin");

    app.setup_game(&admin, &["Alice".to_string(), "Bob".to_string()])
        .await
        .unwrap();
    for (alice, bob) in [(20, 0), (5, 15)] {
        let sheet = ScoreSheet::from([
            ("Alice".to_string(), ScoreInput::Int(alice)),
            ("Bob".to_string(), ScoreInput::Int(bob)),
        ]);
        app.append_round(&admin, &sheet).await.unwrap();
    }

    let game = app.store.load().await;
    let (entries, ranking) = scoring::leaderboard(&game);
    assert_eq!((entries[0].total, entries[1].total), (25, 15));
    assert_eq!(entries[1].standing, Standing::Tug);
    assert_eq!(ranking.second_max, None);

    let game = app.remove_player(&admin, "Bob").await.unwrap();
    assert_eq!(game.rounds[0]["Alice"], 20);
    assert_eq!(game.rounds[1]["Alice"], 5);
    assert_eq!(scoring::totals(&game)[0].total, 25);
}
