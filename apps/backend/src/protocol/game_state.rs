//! Request bodies for the game API.
//!
//! Responses reuse [`crate::domain::snapshot::GameSnapshot`] directly; the
//! snapshot is the wire format of authoritative state.

use serde::{Deserialize, Serialize};

use crate::domain::color::ColorToken;
use crate::domain::state::PlayerId;

/// Room creation, seeded by the lobby collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Ordered distinct color tokens; at least two.
    pub colors: Vec<String>,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub player_id: PlayerId,
}

/// Body of `DELETE /api/rooms/{room_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomParticipant {
    pub player_id: PlayerId,
}

/// The move variants a client may propose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveKind {
    FirstColor { color: ColorToken },
    BeginReplay,
    Replay { position: usize, color: ColorToken },
    /// `color: None` asks the server to draw from the palette.
    Extend { color: Option<ColorToken> },
}

/// The only gameplay mutation entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub player_id: PlayerId,
    /// Round the client believed it was acting on (`sequence.len()` at its
    /// last fetch).
    pub expected_round: usize,
    #[serde(rename = "move")]
    pub kind: MoveKind,
}
