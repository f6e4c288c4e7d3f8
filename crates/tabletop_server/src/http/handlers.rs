use super::AppState;
use crate::board_id::BoardId;
use crate::error::GameError;
use crate::identity::{PlayerToken, PLAYER_TOKEN_HEADER};
use crate::view::GameView;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    board_id: Option<String>,
}

impl BoardQuery {
    fn board_id(&self) -> Result<BoardId, GameError> {
        BoardId::parse(self.board_id.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct HeartbeatQuery {
    board_id: Option<String>,
    action: Option<String>,
}

/// Reply to a color selection or room join.
#[derive(Debug, Serialize)]
struct SeatResponse {
    message: &'static str,
    color: Value,
    player_token: PlayerToken,
}

fn json_body(body: &Bytes) -> Result<Value, GameError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| GameError::InvalidRequest(e.to_string()))
}

fn seat_response(message: &'static str, color: Value, token: PlayerToken) -> Response {
    let header = [(PLAYER_TOKEN_HEADER, token.to_string())];
    let body = SeatResponse {
        message,
        color,
        player_token: token,
    };
    (header, Json(body)).into_response()
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn new_board(State(state): State<AppState>) -> Json<Value> {
    let id = state.registry.fresh_id().await;
    Json(json!({ "board_id": id }))
}

pub async fn game_state(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let guard = session.lock().await;
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn select_color(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?.unwrap_or_else(PlayerToken::issue);
    let body = json_body(&body)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    let color = guard.board.select_color(&token, body)?;
    guard.mark_updated();
    info!("🎨 Board {}: player {} holds color {}", id, token, color);
    Ok(seat_response("Color selected", color, token))
}

pub async fn join(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Response, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?.unwrap_or_else(PlayerToken::issue);
    if !state.registry.variant().has_lobby() {
        return Err(GameError::UnsupportedOperation("joining"));
    }
    let session = state.registry.resolve_id(&id, true).await?;

    let mut guard = session.lock().await;
    let rejoin = guard.board.seat_of(Some(&token)).is_some();
    let color = guard.board.join(&token)?;
    if rejoin {
        return Ok(seat_response("Already joined", color, token));
    }
    guard.mark_updated();
    info!("👋 Board {}: player {} joined as {}", id, token, color);
    Ok(seat_response("Joined", color, token))
}

pub async fn start_game(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    guard.board.start()?;
    guard.mark_updated();
    info!("🎲 Board {}: game started", id);
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn make_move(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let body = json_body(&body)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    guard.board.play(token.as_ref(), body)?;
    guard.mark_updated();
    debug!("Board {}: move accepted (version {})", id, guard.version());
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn build(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let body = json_body(&body)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    guard.board.build(token.as_ref(), body)?;
    guard.mark_updated();
    debug!("Board {}: wall placed (version {})", id, guard.version());
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn undo(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    guard.board.undo(token.as_ref())?;
    guard.mark_updated();
    debug!("Board {}: move undone", id);
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn reset(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> Result<Json<GameView>, GameError> {
    let id = query.board_id()?;
    let token = PlayerToken::from_headers(&headers)?;
    let registry = &state.registry;
    let session = registry.resolve_id(&id, registry.auto_create()).await?;

    let mut guard = session.lock().await;
    guard.board.reset();
    guard.mark_updated();
    info!("♻️ Board {} reset", id);
    Ok(Json(GameView::build(&session, &guard, token.as_ref())))
}

pub async fn heartbeat(
    State(state): State<AppState>,
    Query(query): Query<HeartbeatQuery>,
) -> Result<Json<Value>, GameError> {
    let id = BoardId::parse(query.board_id.as_deref().unwrap_or_default())?;
    // A missing action counts as a page opening; anything else only refreshes activity.
    let delta = match query.action.as_deref().unwrap_or("inc") {
        "inc" => 1,
        "dec" => -1,
        other => {
            debug!("Board {}: ignoring heartbeat action {:?}", id, other);
            0
        }
    };
    let registry = &state.registry;
    let online = registry.heartbeat(id.as_str(), delta).await?;
    Ok(Json(json!({ "online": online })))
}
