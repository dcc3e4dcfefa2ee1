//! Shared helpers for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use backend::domain::sequence::SeededSequenceSource;
use backend::domain::state::{PlayerId, RoomId};
use backend::domain::ColorToken;
use backend::store::VersionedState;
use backend::AppState;

pub const P1: PlayerId = 101;
pub const P2: PlayerId = 202;

// Auto-initialize logging for integration tests
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}

/// App state with a deterministic sequence source.
pub fn test_app_state(seed: u64) -> AppState {
    AppState::with_sequence_source(Arc::new(SeededSequenceSource::new(seed)))
}

pub fn red() -> ColorToken {
    ColorToken::new("red")
}

pub fn blue() -> ColorToken {
    ColorToken::new("blue")
}

/// Create a Waiting room over the default red/blue palette.
pub async fn waiting_room(app: &AppState) -> VersionedState {
    app.flow
        .create_room(
            Some("integration room".into()),
            vec!["red".into(), "blue".into()],
            P1,
        )
        .await
        .expect("room creation succeeds")
}

/// Create a room, seat the second player, and have the creator open with
/// `red`. Leaves the room in ShowingLastMove with PlayerTwo to act.
pub async fn opened_room(app: &AppState) -> RoomId {
    let created = waiting_room(app).await;
    let room_id = created.state.room_id;
    app.flow
        .join_room(room_id, P2)
        .await
        .expect("join succeeds");
    app.flow
        .submit_first_color(room_id, P1, red(), 0, None)
        .await
        .expect("first color accepted");
    room_id
}

/// Honest full replay by `player`, leaving the room in AwaitingNewColor.
pub async fn replay_all(app: &AppState, room_id: RoomId, player: PlayerId) {
    let versioned = app.store.read(room_id).await.expect("room exists");
    let round = versioned.state.current_round();
    let sequence = versioned.state.sequence.clone();

    app.flow
        .begin_replay(room_id, player, round, None)
        .await
        .expect("begin replay accepted");
    for (position, token) in sequence.iter().enumerate() {
        app.flow
            .submit_replay_token(room_id, player, position, token.clone(), round, None)
            .await
            .expect("replay step accepted");
    }
}
