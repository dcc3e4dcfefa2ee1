//! Room seeding and joining: the inputs the lobby collaborator supplies.

use tracing::info;

use super::{GameFlowOutcome, GameFlowService};
use crate::domain::color::{ColorToken, Palette};
use crate::domain::game_transition::{derive_game_transitions, GameTransition};
use crate::domain::state::{PlayerId, RoomId};
use crate::errors::domain::DomainError;
use crate::store::{RoomSeed, VersionedState};

impl GameFlowService {
    /// Create a Waiting room. The palette is fixed here for the room's
    /// lifetime; every later draw and proposal is validated against it.
    pub async fn create_room(
        &self,
        name: Option<String>,
        colors: Vec<String>,
        creator: PlayerId,
    ) -> Result<VersionedState, DomainError> {
        let palette = Palette::new(colors.into_iter().map(ColorToken::new).collect())?;
        let created = self
            .store()
            .create_room(RoomSeed {
                name,
                palette,
                player1: creator,
            })
            .await?;

        info!(
            room_id = %created.state.room_id,
            creator,
            palette_size = created.state.palette.len(),
            "Room created"
        );
        Ok(created)
    }

    /// Seat the second participant and start the match.
    pub async fn join_room(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<GameFlowOutcome, DomainError> {
        let before = self.store().read(room_id).await?;
        let joined = self.store().join_room(room_id, player).await?;

        let mut transitions = derive_game_transitions(&before.state, &joined.state);
        if before.state.player2.is_none() && joined.state.player2 == Some(player) {
            transitions.push(GameTransition::PlayerJoined { player });
        }

        info!(room_id = %room_id, player, "Player joined room");
        Ok(GameFlowOutcome {
            state: joined.state,
            lock_version: joined.lock_version,
            transitions,
        })
    }
}
