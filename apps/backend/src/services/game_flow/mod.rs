//! Game flow orchestration service — bridges the pure arbiter with the
//! authoritative store.
//!
//! The store enforces atomicity; this layer resolves generated colors,
//! derives lifecycle transitions for logging/notification, and owns the
//! public gameplay entry points the routes call.

mod lifecycle;
mod player_actions;
mod rooms;

use std::sync::Arc;

use crate::domain::game_transition::GameTransition;
use crate::domain::sequence::SequenceSource;
use crate::domain::state::GameState;
use crate::store::GameStore;

/// Game flow service.
pub struct GameFlowService {
    store: Arc<dyn GameStore>,
    sequence: Arc<dyn SequenceSource>,
}

impl GameFlowService {
    pub fn new(store: Arc<dyn GameStore>, sequence: Arc<dyn SequenceSource>) -> Self {
        Self { store, sequence }
    }

    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }
}

/// Result of one service mutation.
#[derive(Debug, Clone)]
pub struct GameFlowOutcome {
    pub state: GameState,
    pub lock_version: i64,
    pub transitions: Vec<GameTransition>,
}
