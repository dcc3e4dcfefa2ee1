//! In-memory store implementation.
//!
//! One `Mutex<RoomRecord>` per room gives the compare-and-commit atomicity
//! the contract requires; the surrounding `DashMap` only shards room lookup.
//! Durable backends can replace this behind the same trait as long as they
//! keep the version check and the commit in one atomic step.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::arbiter::{self, Applied, Move, TerminateReason};
use crate::domain::state::{GameState, PlayerId, RoomId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::store::{GameStore, RoomSeed, VersionedState};

struct RoomRecord {
    state: GameState,
    lock_version: i64,
}

impl RoomRecord {
    fn versioned(&self) -> VersionedState {
        VersionedState {
            state: self.state.clone(),
            lock_version: self.lock_version,
        }
    }
}

#[derive(Default)]
pub struct MemoryGameStore {
    rooms: DashMap<RoomId, Arc<Mutex<RoomRecord>>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn room(&self, room_id: RoomId) -> Result<Arc<Mutex<RoomRecord>>, DomainError> {
        self.rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Room, format!("room {room_id} not found"))
            })
    }

    fn check_version(record: &RoomRecord, expected: Option<i64>) -> Result<(), DomainError> {
        if let Some(expected) = expected {
            if record.lock_version != expected {
                return Err(DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "room was modified concurrently (expected version {expected}, actual {})",
                        record.lock_version
                    ),
                ));
            }
        }
        Ok(())
    }

    fn commit(record: &mut RoomRecord, applied: Applied) -> VersionedState {
        match applied {
            Applied::Advanced(next) => {
                record.state = next;
                record.lock_version += 1;
                record.versioned()
            }
            // Idempotent duplicates do not bump the version: nothing changed.
            Applied::Unchanged => record.versioned(),
        }
    }
}

#[async_trait]
impl GameStore for MemoryGameStore {
    async fn create_room(&self, seed: RoomSeed) -> Result<VersionedState, DomainError> {
        let room_id = Uuid::new_v4();
        let state = GameState::new_waiting(room_id, seed.name, seed.palette, seed.player1);
        let record = RoomRecord {
            state,
            lock_version: 1,
        };
        let versioned = record.versioned();
        self.rooms.insert(room_id, Arc::new(Mutex::new(record)));
        Ok(versioned)
    }

    async fn join_room(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<VersionedState, DomainError> {
        let room = self.room(room_id)?;
        let mut record = room.lock();
        let applied = arbiter::second_player_joined(&record.state, player)?;
        Ok(Self::commit(&mut record, applied))
    }

    async fn read(&self, room_id: RoomId) -> Result<VersionedState, DomainError> {
        let room = self.room(room_id)?;
        let record = room.lock();
        Ok(record.versioned())
    }

    async fn apply_move(
        &self,
        room_id: RoomId,
        actor: PlayerId,
        expected_round: usize,
        expected_version: Option<i64>,
        mv: Move,
    ) -> Result<VersionedState, DomainError> {
        let room = self.room(room_id)?;
        let mut record = room.lock();

        let role = record.state.role_of(actor).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::NotAParticipant,
                format!("player {actor} is not a participant of room {room_id}"),
            )
        })?;
        Self::check_version(&record, expected_version)?;

        let applied = arbiter::apply_move(&record.state, role, expected_round, &mv)?;
        Ok(Self::commit(&mut record, applied))
    }

    async fn terminate(
        &self,
        room_id: RoomId,
        reason: TerminateReason,
        leaving: Option<PlayerId>,
    ) -> Result<VersionedState, DomainError> {
        let room = self.room(room_id)?;
        let mut record = room.lock();

        let leaving_role = match leaving {
            Some(player) => Some(record.state.role_of(player).ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::NotAParticipant,
                    format!("player {player} is not a participant of room {room_id}"),
                )
            })?),
            None => None,
        };

        let applied = arbiter::terminate(&record.state, reason, leaving_role)?;
        Ok(Self::commit(&mut record, applied))
    }
}
