//! Public snapshot API for observing game state without exposing internals.
//!
//! Snapshots are what the polling endpoint serves and what the client sync
//! loop consumes. They carry the lock version so clients can propose moves
//! with optimistic concurrency, and an adjacently tagged phase union so
//! clients never reconstruct phase from loose flags.

use serde::{Deserialize, Serialize};

use crate::domain::color::ColorToken;
use crate::domain::state::{
    FinishReason, GameState, GameStatus, Phase, PlayerId, PlayerRole, RoomId,
};

/// Adjacently tagged union of phase-specific data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "snake_case")]
pub enum PhaseSnapshot {
    WaitingForSecondPlayer,
    AwaitingFirstColor {
        to_act: PlayerRole,
    },
    /// The color appended last round, to reveal to the current mover.
    ShowingLastMove {
        to_act: PlayerRole,
        revealed: ColorToken,
    },
    AwaitingReplay {
        to_act: PlayerRole,
        matched: usize,
        total: usize,
    },
    AwaitingNewColor {
        to_act: PlayerRole,
    },
    Finished {
        winner: Option<PlayerId>,
        reason: Option<FinishReason>,
    },
}

/// Top-level authoritative snapshot for one room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub room_id: RoomId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    pub status: GameStatus,
    pub sequence: Vec<ColorToken>,
    pub current_round: usize,
    pub turn: PlayerRole,
    pub player1: PlayerId,
    pub player2: Option<PlayerId>,
    pub scores: [u32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_left: Option<PlayerRole>,
    pub palette: Vec<ColorToken>,
    pub phase: PhaseSnapshot,
    /// Optimistic concurrency token; echoes into `If-Match` on proposals.
    pub lock_version: i64,
}

/// Produce the public snapshot for a state at a given lock version.
pub fn snapshot(state: &GameState, lock_version: i64) -> GameSnapshot {
    let phase = match state.phase {
        Phase::WaitingForSecondPlayer => PhaseSnapshot::WaitingForSecondPlayer,
        Phase::AwaitingFirstColor => PhaseSnapshot::AwaitingFirstColor {
            to_act: state.turn,
        },
        Phase::ShowingLastMove => PhaseSnapshot::ShowingLastMove {
            to_act: state.turn,
            revealed: state
                .last_color()
                .cloned()
                // ShowingLastMove is only ever entered by an append.
                .unwrap_or_else(|| ColorToken::new("")),
        },
        Phase::AwaitingReplay { matched } => PhaseSnapshot::AwaitingReplay {
            to_act: state.turn,
            matched,
            total: state.sequence.len(),
        },
        Phase::AwaitingNewColor => PhaseSnapshot::AwaitingNewColor {
            to_act: state.turn,
        },
        Phase::Finished => PhaseSnapshot::Finished {
            winner: state.winner,
            reason: state.finish,
        },
    };

    GameSnapshot {
        room_id: state.room_id,
        room_name: state.room_name.clone(),
        status: state.status(),
        sequence: state.sequence.clone(),
        current_round: state.current_round(),
        turn: state.turn,
        player1: state.player1,
        player2: state.player2,
        scores: state.scores,
        winner: state.winner,
        player_left: state.player_left,
        palette: state.palette.colors().to_vec(),
        phase,
        lock_version,
    }
}

impl GameSnapshot {
    /// Seat of `player` in this room, if any.
    pub fn role_of(&self, player: PlayerId) -> Option<PlayerRole> {
        if self.player1 == player {
            Some(PlayerRole::PlayerOne)
        } else if self.player2 == Some(player) {
            Some(PlayerRole::PlayerTwo)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::Palette;
    use uuid::Uuid;

    fn playing_state() -> GameState {
        let palette =
            Palette::new(vec![ColorToken::new("red"), ColorToken::new("blue")]).unwrap();
        let mut state = GameState::new_waiting(Uuid::new_v4(), Some("duel".into()), palette, 1);
        state.player2 = Some(2);
        state.sequence.push(ColorToken::new("red"));
        state.turn = PlayerRole::PlayerTwo;
        state.phase = Phase::ShowingLastMove;
        state
    }

    #[test]
    fn showing_last_move_reveals_latest_color() {
        let snap = snapshot(&playing_state(), 3);
        assert_eq!(snap.status, GameStatus::Playing);
        assert_eq!(snap.lock_version, 3);
        match snap.phase {
            PhaseSnapshot::ShowingLastMove { to_act, revealed } => {
                assert_eq!(to_act, PlayerRole::PlayerTwo);
                assert_eq!(revealed, ColorToken::new("red"));
            }
            other => panic!("unexpected phase snapshot: {other:?}"),
        }
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snap = snapshot(&playing_state(), 1);
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, back);
    }

    #[test]
    fn role_lookup_matches_seats() {
        let snap = snapshot(&playing_state(), 1);
        assert_eq!(snap.role_of(1), Some(PlayerRole::PlayerOne));
        assert_eq!(snap.role_of(2), Some(PlayerRole::PlayerTwo));
        assert_eq!(snap.role_of(3), None);
    }
}
