//! Authoritative game-state store.
//!
//! All reads and writes of game progress flow through [`GameStore`]. The
//! store is the single writer of truth: `apply_move` validates through the
//! arbiter and commits atomically per room, so two racing clients can never
//! both append a color for the same round.

use async_trait::async_trait;

use crate::domain::arbiter::{Move, TerminateReason};
use crate::domain::color::Palette;
use crate::domain::state::{GameState, PlayerId, RoomId};
use crate::errors::domain::DomainError;

pub mod memory;

pub use memory::MemoryGameStore;

/// Inputs the room lifecycle collaborator seeds a new record with.
#[derive(Debug, Clone)]
pub struct RoomSeed {
    pub name: Option<String>,
    pub palette: Palette,
    pub player1: PlayerId,
}

/// A state together with the lock version it was read/committed at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedState {
    pub state: GameState,
    pub lock_version: i64,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Create a Waiting room seeded by the lobby.
    async fn create_room(&self, seed: RoomSeed) -> Result<VersionedState, DomainError>;

    /// Seat the second participant. Idempotent for the same participant.
    async fn join_room(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<VersionedState, DomainError>;

    /// Snapshot read of the authoritative record.
    async fn read(&self, room_id: RoomId) -> Result<VersionedState, DomainError>;

    /// Validate and commit one proposal, atomically per room.
    ///
    /// `expected_round` is the round the client believed it was acting on;
    /// `expected_version`, when supplied, additionally enforces the
    /// optimistic lock the client read the state at. Either mismatch
    /// rejects without side effects.
    async fn apply_move(
        &self,
        room_id: RoomId,
        actor: PlayerId,
        expected_round: usize,
        expected_version: Option<i64>,
        mv: Move,
    ) -> Result<VersionedState, DomainError>;

    /// Convert departure or cancellation into a terminal state. Idempotent:
    /// repeated calls return the terminal record unchanged.
    async fn terminate(
        &self,
        room_id: RoomId,
        reason: TerminateReason,
        leaving: Option<PlayerId>,
    ) -> Result<VersionedState, DomainError>;
}
