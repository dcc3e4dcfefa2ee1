use std::sync::Arc;

use crate::domain::sequence::{CsprngSequenceSource, SequenceSource};
use crate::services::GameFlowService;
use crate::store::{GameStore, MemoryGameStore};

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<GameFlowService>,
    pub store: Arc<dyn GameStore>,
}

impl AppState {
    /// Production state: in-memory store, CSPRNG sequence source.
    pub fn new() -> Self {
        Self::with_sequence_source(Arc::new(CsprngSequenceSource))
    }

    /// State with an injected sequence source (deterministic tests).
    pub fn with_sequence_source(sequence: Arc<dyn SequenceSource>) -> Self {
        let store: Arc<dyn GameStore> = Arc::new(MemoryGameStore::new());
        let flow = Arc::new(GameFlowService::new(Arc::clone(&store), sequence));
        Self { flow, store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
