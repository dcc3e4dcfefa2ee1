//! Service layer: orchestration between routes, store, and domain.

pub mod game_flow;

pub use game_flow::{GameFlowOutcome, GameFlowService};
