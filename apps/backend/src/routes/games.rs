//! Gameplay routes: the poll source and the mutation entry points.

use actix_web::http::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::domain::snapshot::snapshot;
use crate::domain::state::RoomId;
use crate::error::AppError;
use crate::http::etag::{parse_room_version_from_etag, room_etag};
use crate::protocol::{LeaveRequest, MoveKind, MoveRequest};
use crate::services::GameFlowOutcome;
use crate::state::app_state::AppState;

/// GET /api/games/{room_id}/state
///
/// Returns the authoritative snapshot as JSON with an ETag carrying the
/// room's lock version. Supports `If-None-Match`: when the client's ETag
/// still matches, returns `304 Not Modified` with no body, keeping the
/// poll loop cheap.
async fn get_state(
    http_req: HttpRequest,
    path: web::Path<RoomId>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let versioned = app_state.store.read(room_id).await?;
    let etag_value = room_etag(room_id, versioned.lock_version);

    if let Some(if_none_match) = http_req.headers().get(IF_NONE_MATCH) {
        if let Ok(client_etag) = if_none_match.to_str() {
            // Wildcard "*" (RFC 9110) or any listed ETag matching counts.
            let matches = client_etag.trim() == "*"
                || client_etag
                    .split(',')
                    .map(str::trim)
                    .any(|etag| etag == etag_value);

            if matches {
                return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
                    .insert_header((ETAG, etag_value))
                    .finish());
            }
        }
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag_value))
        .json(snapshot(&versioned.state, versioned.lock_version)))
}

/// POST /api/games/{room_id}/move
///
/// The only gameplay mutation entry point. `expected_round` travels in the
/// body; an optional `If-Match` ETag additionally pins the lock version the
/// client last observed.
async fn post_move(
    http_req: HttpRequest,
    path: web::Path<RoomId>,
    body: web::Json<MoveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let body = body.into_inner();
    let expected_version = match http_req.headers().get(IF_MATCH) {
        Some(value) => {
            let raw = value.to_str().map_err(|_| {
                AppError::bad_request(
                    crate::errors::ErrorCode::InvalidHeader,
                    "If-Match header is not valid UTF-8",
                )
            })?;
            Some(parse_room_version_from_etag(raw)?)
        }
        None => None,
    };

    let flow = &app_state.flow;
    let outcome: GameFlowOutcome = match body.kind {
        MoveKind::FirstColor { color } => {
            flow.submit_first_color(
                room_id,
                body.player_id,
                color,
                body.expected_round,
                expected_version,
            )
            .await?
        }
        MoveKind::BeginReplay => {
            flow.begin_replay(room_id, body.player_id, body.expected_round, expected_version)
                .await?
        }
        MoveKind::Replay { position, color } => {
            flow.submit_replay_token(
                room_id,
                body.player_id,
                position,
                color,
                body.expected_round,
                expected_version,
            )
            .await?
        }
        MoveKind::Extend { color } => {
            flow.extend_sequence(
                room_id,
                body.player_id,
                color,
                body.expected_round,
                expected_version,
            )
            .await?
        }
    };

    let etag = room_etag(room_id, outcome.lock_version);
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(snapshot(&outcome.state, outcome.lock_version)))
}

/// POST /api/games/{room_id}/leave
///
/// Disconnect path: fired by the sentinel or an explicit leave button.
/// Idempotent; always answers with the (terminal) snapshot.
async fn post_leave(
    path: web::Path<RoomId>,
    body: web::Json<LeaveRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let outcome = app_state.flow.leave(room_id, body.player_id).await?;

    let etag = room_etag(room_id, outcome.lock_version);
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(snapshot(&outcome.state, outcome.lock_version)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{room_id}/state").route(web::get().to(get_state)));
    cfg.service(web::resource("/{room_id}/move").route(web::post().to(post_move)));
    cfg.service(web::resource("/{room_id}/leave").route(web::post().to(post_leave)));
}
