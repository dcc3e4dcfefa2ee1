//! Room lifecycle routes: creation, joining, cancellation.
//!
//! These are the seams through which the lobby collaborator seeds the
//! engine's `GameState`; the engine does not list or browse rooms.

use actix_web::http::header::ETAG;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result};

use crate::domain::snapshot::snapshot;
use crate::domain::state::RoomId;
use crate::error::AppError;
use crate::http::etag::room_etag;
use crate::protocol::{CreateRoomRequest, JoinRoomRequest, RoomParticipant};
use crate::state::app_state::AppState;

/// POST /api/rooms
///
/// Create a Waiting room. The palette supplied here is immutable for the
/// room's lifetime.
async fn create_room(
    body: web::Json<CreateRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let created = app_state
        .flow
        .create_room(body.name, body.colors, body.player_id)
        .await?;

    let etag = room_etag(created.state.room_id, created.lock_version);
    Ok(HttpResponse::build(StatusCode::CREATED)
        .insert_header((ETAG, etag))
        .json(snapshot(&created.state, created.lock_version)))
}

/// POST /api/rooms/{room_id}/join
///
/// Seat the second participant; the room moves to AwaitingFirstColor.
async fn join_room(
    path: web::Path<RoomId>,
    body: web::Json<JoinRoomRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let outcome = app_state.flow.join_room(room_id, body.player_id).await?;

    let etag = room_etag(room_id, outcome.lock_version);
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(snapshot(&outcome.state, outcome.lock_version)))
}

/// DELETE /api/rooms/{room_id}
///
/// Creator cancels a still-Waiting room: Finished, no winner.
async fn cancel_room(
    path: web::Path<RoomId>,
    body: web::Json<RoomParticipant>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    let outcome = app_state.flow.cancel_room(room_id, body.player_id).await?;

    let etag = room_etag(room_id, outcome.lock_version);
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(snapshot(&outcome.state, outcome.lock_version)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_room)));
    cfg.service(web::resource("/{room_id}/join").route(web::post().to(join_room)));
    cfg.service(web::resource("/{room_id}").route(web::delete().to(cancel_room)));
}
