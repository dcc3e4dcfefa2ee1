//! Domain layer: pure game rules, state, and derived views.

pub mod arbiter;
pub mod color;
pub mod game_transition;
pub mod sequence;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod tests_arbiter;
#[cfg(test)]
mod tests_props;

// Re-exports for ergonomics
pub use arbiter::{apply_move, second_player_joined, terminate, Applied, Move, TerminateReason};
pub use color::{ColorToken, Palette};
pub use game_transition::{derive_game_transitions, GameTransition};
pub use sequence::{CsprngSequenceSource, SeededSequenceSource, SequenceSource};
pub use snapshot::{snapshot, GameSnapshot, PhaseSnapshot};
pub use state::{FinishReason, GameState, GameStatus, Phase, PlayerId, PlayerRole, RoomId};
