//! Edge-triggered lifecycle transitions derived from before/after state.
//!
//! Services use these for structured logging and for telling clients what
//! just happened without re-deriving it from two snapshots.

use crate::domain::state::{FinishReason, GameState, GameStatus, PlayerId, PlayerRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameTransition {
    /// Edge-triggered: the room moved from Waiting to Playing.
    GameStarted,

    /// Edge-triggered: the turn became a specific seat.
    TurnBecame { role: PlayerRole },

    /// Edge-triggered: the sequence grew; `round` is the new round counter.
    RoundCompleted { round: usize },

    /// Edge-triggered: the room reached Finished.
    GameFinished {
        winner: Option<PlayerId>,
        reason: Option<FinishReason>,
    },

    /// Explicit: a participant joined the room.
    PlayerJoined { player: PlayerId },

    /// Explicit: a participant left the room.
    PlayerLeft { player: PlayerId },
}

/// Derive edge-triggered transitions from a before/after pair.
pub fn derive_game_transitions(before: &GameState, after: &GameState) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    if before.status() == GameStatus::Waiting
        && after.status() == GameStatus::Playing
    {
        transitions.push(GameTransition::GameStarted);
    }

    if after.current_round() > before.current_round() {
        transitions.push(GameTransition::RoundCompleted {
            round: after.current_round(),
        });
    }

    if before.turn != after.turn && !after.is_finished() {
        transitions.push(GameTransition::TurnBecame { role: after.turn });
    }

    if before.status() != GameStatus::Finished && after.status() == GameStatus::Finished {
        transitions.push(GameTransition::GameFinished {
            winner: after.winner,
            reason: after.finish,
        });
    }

    transitions
}
