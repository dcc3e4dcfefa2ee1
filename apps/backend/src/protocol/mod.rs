//! Wire types shared by the HTTP routes and the polling client.

pub mod game_state;

pub use game_state::{
    CreateRoomRequest, JoinRoomRequest, LeaveRequest, MoveKind, MoveRequest, RoomParticipant,
};
