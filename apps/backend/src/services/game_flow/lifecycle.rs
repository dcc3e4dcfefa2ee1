//! Abnormal termination: voluntary leave and cancellation-before-start.

use tracing::info;

use super::{GameFlowOutcome, GameFlowService};
use crate::domain::arbiter::TerminateReason;
use crate::domain::game_transition::{derive_game_transitions, GameTransition};
use crate::domain::state::{PlayerId, RoomId};
use crate::errors::domain::{DomainError, ValidationKind};

impl GameFlowService {
    /// A participant leaves the session. While Waiting this cancels the
    /// room; mid-game it declares the remaining participant winner.
    /// Idempotent: the sentinel may fire alongside an explicit leave.
    pub async fn leave(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<GameFlowOutcome, DomainError> {
        let before = self.store().read(room_id).await?;
        let terminated = self
            .store()
            .terminate(room_id, TerminateReason::PlayerLeft, Some(player))
            .await?;

        let mut transitions = derive_game_transitions(&before.state, &terminated.state);
        if !before.state.is_finished() {
            transitions.push(GameTransition::PlayerLeft { player });
            info!(
                room_id = %room_id,
                player,
                winner = ?terminated.state.winner,
                "Player left, game terminated"
            );
        }

        Ok(GameFlowOutcome {
            state: terminated.state,
            lock_version: terminated.lock_version,
            transitions,
        })
    }

    /// Creator cancels a still-Waiting room. No winner, no score changes.
    pub async fn cancel_room(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<GameFlowOutcome, DomainError> {
        let before = self.store().read(room_id).await?;
        if before.state.player1 != player {
            return Err(DomainError::validation(
                ValidationKind::NotAParticipant,
                "only the room creator can cancel",
            ));
        }

        let terminated = self
            .store()
            .terminate(room_id, TerminateReason::Cancelled, None)
            .await?;

        let transitions = derive_game_transitions(&before.state, &terminated.state);
        if !before.state.is_finished() {
            info!(room_id = %room_id, player, "Waiting room cancelled");
        }

        Ok(GameFlowOutcome {
            state: terminated.state,
            lock_version: terminated.lock_version,
            transitions,
        })
    }
}
