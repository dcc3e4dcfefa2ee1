//! Gameplay proposals: first color, replay steps, and extensions.

use tracing::{debug, info, warn};

use super::{GameFlowOutcome, GameFlowService};
use crate::domain::arbiter::Move;
use crate::domain::color::ColorToken;
use crate::domain::game_transition::derive_game_transitions;
use crate::domain::state::{PlayerId, RoomId};
use crate::errors::domain::DomainError;

impl GameFlowService {
    /// Creator supplies `sequence[0]` and opens round 1. The client's
    /// believed round must be 0; anything else is arbitrated as stale.
    pub async fn submit_first_color(
        &self,
        room_id: RoomId,
        player: PlayerId,
        token: ColorToken,
        expected_round: usize,
        expected_version: Option<i64>,
    ) -> Result<GameFlowOutcome, DomainError> {
        debug!(room_id = %room_id, player, color = %token, "Submitting first color");
        self.run_move(
            room_id,
            player,
            expected_round,
            expected_version,
            Move::FirstColor(token),
        )
        .await
    }

    /// Current player acknowledges the reveal and starts replaying.
    pub async fn begin_replay(
        &self,
        room_id: RoomId,
        player: PlayerId,
        expected_round: usize,
        expected_version: Option<i64>,
    ) -> Result<GameFlowOutcome, DomainError> {
        debug!(room_id = %room_id, player, expected_round, "Beginning replay");
        self.run_move(room_id, player, expected_round, expected_version, Move::BeginReplay)
            .await
    }

    /// One replay step. A mismatch is an accepted move that finishes the
    /// game for the opponent, not an error.
    pub async fn submit_replay_token(
        &self,
        room_id: RoomId,
        player: PlayerId,
        position: usize,
        token: ColorToken,
        expected_round: usize,
        expected_version: Option<i64>,
    ) -> Result<GameFlowOutcome, DomainError> {
        debug!(
            room_id = %room_id,
            player,
            position,
            expected_round,
            "Submitting replay token"
        );
        self.run_move(
            room_id,
            player,
            expected_round,
            expected_version,
            Move::ReplayToken { position, token },
        )
        .await
    }

    /// Append one new color after a complete replay. When the player does
    /// not choose explicitly, the sequence source draws from the palette.
    pub async fn extend_sequence(
        &self,
        room_id: RoomId,
        player: PlayerId,
        chosen: Option<ColorToken>,
        expected_round: usize,
        expected_version: Option<i64>,
    ) -> Result<GameFlowOutcome, DomainError> {
        let token = match chosen {
            Some(token) => token,
            None => {
                let current = self.store().read(room_id).await?;
                let drawn = self.sequence.next_token(&current.state.palette);
                debug!(room_id = %room_id, color = %drawn, "Drew generated color");
                drawn
            }
        };

        let outcome = self
            .run_move(
                room_id,
                player,
                expected_round,
                expected_version,
                Move::AppendColor(token),
            )
            .await?;
        info!(
            room_id = %room_id,
            player,
            round = outcome.state.current_round(),
            "Sequence extended"
        );
        Ok(outcome)
    }

    /// Common path: read for transition derivation, apply, log rejections.
    async fn run_move(
        &self,
        room_id: RoomId,
        player: PlayerId,
        expected_round: usize,
        expected_version: Option<i64>,
        mv: Move,
    ) -> Result<GameFlowOutcome, DomainError> {
        let before = self.store().read(room_id).await?;

        let committed = self
            .store()
            .apply_move(room_id, player, expected_round, expected_version, mv)
            .await
            .inspect_err(|e| {
                if e.is_stale() {
                    // Expected under concurrent polling; the client re-fetches.
                    debug!(room_id = %room_id, player, error = %e, "Stale proposal rejected");
                } else {
                    warn!(room_id = %room_id, player, error = %e, "Proposal rejected");
                }
            })?;

        let transitions = derive_game_transitions(&before.state, &committed.state);
        Ok(GameFlowOutcome {
            state: committed.state,
            lock_version: committed.lock_version,
            transitions,
        })
    }
}
