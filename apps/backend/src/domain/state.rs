//! Authoritative per-room game state.
//!
//! The single `Phase` enum is the source of truth for what may happen next.
//! Coarse lifecycle status and "whose turn" flags are derived from it, never
//! stored alongside it.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::color::{ColorToken, Palette};

/// Stable participant identifier, assigned by the account system upstream.
pub type PlayerId = i64;

/// Opaque room identifier.
pub type RoomId = Uuid;

/// Seat in a two-player room. PlayerOne is always the room creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRole {
    PlayerOne,
    PlayerTwo,
}

impl PlayerRole {
    pub fn other(self) -> Self {
        match self {
            PlayerRole::PlayerOne => PlayerRole::PlayerTwo,
            PlayerRole::PlayerTwo => PlayerRole::PlayerOne,
        }
    }

    /// Index into score arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerRole::PlayerOne => 0,
            PlayerRole::PlayerTwo => 1,
        }
    }
}

/// Coarse room lifecycle, derived from `Phase`. Monotone:
/// Waiting → Playing → Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Why a room reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// A replay token did not match the authoritative sequence.
    SequenceMismatch,
    /// A participant left mid-game; the remaining participant wins.
    PlayerLeft,
    /// The creator cancelled (or the lobby expired) a still-Waiting room.
    Cancelled,
}

/// Turn/arbitration phases.
///
/// `AwaitingReplay` carries the replay cursor: how many leading tokens of the
/// sequence the current player has already reproduced this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Room created, second participant not yet joined.
    WaitingForSecondPlayer,
    /// Both participants present; the creator must pick `sequence[0]`.
    AwaitingFirstColor,
    /// The previous mover's new color must be revealed to the current mover
    /// before they can act. Not a move-accepting state (except the
    /// acknowledgment that leaves it).
    ShowingLastMove,
    /// The current player is reproducing the sequence one token at a time.
    AwaitingReplay { matched: usize },
    /// Replay complete; the same player appends exactly one new token.
    AwaitingNewColor,
    /// Terminal. No further mutation accepted.
    Finished,
}

/// The authoritative record, one per room. All mutation flows through the
/// arbiter; fields are public for read access within the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub room_id: RoomId,
    pub room_name: Option<String>,
    pub phase: Phase,
    /// Append-only log of committed colors.
    pub sequence: Vec<ColorToken>,
    pub turn: PlayerRole,
    pub player1: PlayerId,
    pub player2: Option<PlayerId>,
    /// Rounds successfully extended by [PlayerOne, PlayerTwo].
    pub scores: [u32; 2],
    pub winner: Option<PlayerId>,
    pub player_left: Option<PlayerRole>,
    pub finish: Option<FinishReason>,
    pub palette: Palette,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl GameState {
    /// Fresh Waiting-state record, seeded by the room lifecycle collaborator.
    pub fn new_waiting(
        room_id: RoomId,
        room_name: Option<String>,
        palette: Palette,
        player1: PlayerId,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            room_id,
            room_name,
            phase: Phase::WaitingForSecondPlayer,
            sequence: Vec::new(),
            turn: PlayerRole::PlayerOne,
            player1,
            player2: None,
            scores: [0, 0],
            winner: None,
            player_left: None,
            finish: None,
            palette,
            created_at: now,
            updated_at: now,
        }
    }

    /// Round counter: equals `sequence.len()` once the game has started,
    /// 0 before the creator picks the first color.
    pub fn current_round(&self) -> usize {
        self.sequence.len()
    }

    pub fn status(&self) -> GameStatus {
        match self.phase {
            Phase::WaitingForSecondPlayer => GameStatus::Waiting,
            Phase::Finished => GameStatus::Finished,
            _ => GameStatus::Playing,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Map a participant id to their seat, if they are in this room.
    pub fn role_of(&self, player: PlayerId) -> Option<PlayerRole> {
        if player == self.player1 {
            Some(PlayerRole::PlayerOne)
        } else if self.player2 == Some(player) {
            Some(PlayerRole::PlayerTwo)
        } else {
            None
        }
    }

    pub fn player_id(&self, role: PlayerRole) -> Option<PlayerId> {
        match role {
            PlayerRole::PlayerOne => Some(self.player1),
            PlayerRole::PlayerTwo => self.player2,
        }
    }

    /// The most recently appended color, revealed during `ShowingLastMove`.
    pub fn last_color(&self) -> Option<&ColorToken> {
        self.sequence.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::new(vec![ColorToken::new("red"), ColorToken::new("blue")]).unwrap()
    }

    #[test]
    fn new_room_is_waiting_with_creator_to_move_first() {
        let state = GameState::new_waiting(Uuid::new_v4(), None, palette(), 7);
        assert_eq!(state.status(), GameStatus::Waiting);
        assert_eq!(state.turn, PlayerRole::PlayerOne);
        assert_eq!(state.current_round(), 0);
        assert_eq!(state.role_of(7), Some(PlayerRole::PlayerOne));
        assert_eq!(state.role_of(8), None);
        assert_eq!(state.player_id(PlayerRole::PlayerTwo), None);
    }

    #[test]
    fn role_other_flips_seats() {
        assert_eq!(PlayerRole::PlayerOne.other(), PlayerRole::PlayerTwo);
        assert_eq!(PlayerRole::PlayerTwo.other(), PlayerRole::PlayerOne);
    }
}
