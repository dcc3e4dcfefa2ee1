use uuid::Uuid;

use crate::domain::arbiter::{
    apply_move, second_player_joined, terminate, Applied, Move, TerminateReason,
};
use crate::domain::color::{ColorToken, Palette};
use crate::domain::state::{FinishReason, GameState, GameStatus, Phase, PlayerRole};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

const P1: i64 = 10;
const P2: i64 = 20;

fn red() -> ColorToken {
    ColorToken::new("red")
}

fn blue() -> ColorToken {
    ColorToken::new("blue")
}

fn waiting_room() -> GameState {
    let palette = Palette::new(vec![red(), blue()]).unwrap();
    GameState::new_waiting(Uuid::new_v4(), Some("test room".into()), palette, P1)
}

fn advanced(applied: Applied) -> GameState {
    match applied {
        Applied::Advanced(state) => state,
        Applied::Unchanged => panic!("expected the move to advance the state"),
    }
}

/// Drive a fresh room to the point where `actor` has fully replayed and must
/// append. Returns the state in AwaitingNewColor for PlayerTwo's first turn.
fn room_awaiting_first_extension() -> GameState {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let state = advanced(apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap());
    let state = advanced(apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::BeginReplay).unwrap());
    advanced(
        apply_move(
            &state,
            PlayerRole::PlayerTwo,
            1,
            &Move::ReplayToken {
                position: 0,
                token: red(),
            },
        )
        .unwrap(),
    )
}

#[test]
fn join_moves_room_to_awaiting_first_color() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    assert_eq!(state.phase, Phase::AwaitingFirstColor);
    assert_eq!(state.status(), GameStatus::Playing);
    assert_eq!(state.player2, Some(P2));
}

#[test]
fn repeat_join_by_same_player_is_noop() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    assert_eq!(second_player_joined(&state, P2).unwrap(), Applied::Unchanged);
}

#[test]
fn third_player_is_rejected() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let err = second_player_joined(&state, 30).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::RoomFull, _)
    ));
}

#[test]
fn creator_cannot_take_second_seat() {
    let state = waiting_room();
    assert!(second_player_joined(&state, P1).is_err());
}

/// Scenario A: P1 picks red; P2 replays [red] and appends blue.
#[test]
fn first_round_replay_and_extension() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());

    let state = advanced(
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap(),
    );
    assert_eq!(state.sequence, vec![red()]);
    assert_eq!(state.current_round(), 1);
    assert_eq!(state.turn, PlayerRole::PlayerTwo);
    assert_eq!(state.phase, Phase::ShowingLastMove);

    let state = advanced(apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::BeginReplay).unwrap());
    assert_eq!(state.phase, Phase::AwaitingReplay { matched: 0 });

    let state = advanced(
        apply_move(
            &state,
            PlayerRole::PlayerTwo,
            1,
            &Move::ReplayToken {
                position: 0,
                token: red(),
            },
        )
        .unwrap(),
    );
    assert_eq!(state.phase, Phase::AwaitingNewColor);

    let state = advanced(
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap(),
    );
    assert_eq!(state.sequence, vec![red(), blue()]);
    assert_eq!(state.turn, PlayerRole::PlayerOne);
    assert_eq!(state.scores, [0, 1]);
    assert_eq!(state.phase, Phase::ShowingLastMove);
}

/// Scenario B: a wrong replay token finishes the game for the opponent.
#[test]
fn replay_mismatch_finishes_game_for_opponent() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap(),
    );
    // sequence = [red, blue], turn = PlayerOne
    let state = advanced(apply_move(&state, PlayerRole::PlayerOne, 2, &Move::BeginReplay).unwrap());
    let state = advanced(
        apply_move(
            &state,
            PlayerRole::PlayerOne,
            2,
            &Move::ReplayToken {
                position: 0,
                token: red(),
            },
        )
        .unwrap(),
    );
    let state = advanced(
        apply_move(
            &state,
            PlayerRole::PlayerOne,
            2,
            &Move::ReplayToken {
                position: 1,
                token: red(), // sequence[1] is blue
            },
        )
        .unwrap(),
    );
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.winner, Some(P2));
    assert_eq!(state.finish, Some(FinishReason::SequenceMismatch));
    // Mismatch is not a scoring event.
    assert_eq!(state.scores, [0, 1]);
}

/// Scenario C: cancelling a Waiting room finishes it with no winner.
#[test]
fn cancel_waiting_room_has_no_winner() {
    let state = waiting_room();
    let state = advanced(terminate(&state, TerminateReason::Cancelled, None).unwrap());
    assert_eq!(state.phase, Phase::Finished);
    assert_eq!(state.winner, None);
    assert_eq!(state.finish, Some(FinishReason::Cancelled));
    assert_eq!(state.scores, [0, 0]);
}

#[test]
fn cancel_after_start_is_rejected() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let err = terminate(&state, TerminateReason::Cancelled, None).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyStarted, _)
    ));
}

#[test]
fn leave_mid_game_declares_remaining_player_winner() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        terminate(
            &state,
            TerminateReason::PlayerLeft,
            Some(PlayerRole::PlayerOne),
        )
        .unwrap(),
    );
    assert_eq!(state.winner, Some(P2));
    assert_eq!(state.player_left, Some(PlayerRole::PlayerOne));
    assert_eq!(state.finish, Some(FinishReason::PlayerLeft));
}

#[test]
fn terminate_is_idempotent() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        terminate(
            &state,
            TerminateReason::PlayerLeft,
            Some(PlayerRole::PlayerTwo),
        )
        .unwrap(),
    );
    let again = terminate(
        &state,
        TerminateReason::PlayerLeft,
        Some(PlayerRole::PlayerOne),
    )
    .unwrap();
    assert_eq!(again, Applied::Unchanged);
    assert_eq!(state.winner, Some(P1));
}

#[test]
fn wrong_player_is_out_of_turn() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let err =
        apply_move(&state, PlayerRole::PlayerTwo, 0, &Move::FirstColor(red())).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::OutOfTurn, _)
    ));
}

#[test]
fn out_of_palette_color_is_rejected() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let err = apply_move(
        &state,
        PlayerRole::PlayerOne,
        0,
        &Move::FirstColor(ColorToken::new("magenta")),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::UnknownColor, _)
    ));
}

#[test]
fn stale_round_is_rejected_without_side_effects() {
    let state = room_awaiting_first_extension();
    // Client believes round 0 while the room is at round 1.
    let err =
        apply_move(&state, PlayerRole::PlayerTwo, 0, &Move::AppendColor(red())).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::StaleProposal, _)
    ));
}

#[test]
fn duplicate_first_color_is_noop() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap(),
    );
    let dup = apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap();
    assert_eq!(dup, Applied::Unchanged);
}

#[test]
fn duplicate_append_same_round_same_token_is_noop() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap(),
    );
    // Same expected round, same token: idempotent, no double append.
    let dup =
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap();
    assert_eq!(dup, Applied::Unchanged);
    assert_eq!(state.sequence.len(), 2);
    assert_eq!(state.scores, [0, 1]);
}

#[test]
fn racing_append_with_different_token_is_stale() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap(),
    );
    let err =
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(red())).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::StaleProposal, _)
    ));
}

#[test]
fn duplicate_replay_step_is_noop() {
    let state = room_awaiting_first_extension();
    // Position 0 was already matched; re-sending it is discarded silently.
    let dup = apply_move(
        &state,
        PlayerRole::PlayerTwo,
        1,
        &Move::ReplayToken {
            position: 0,
            token: red(),
        },
    )
    .unwrap();
    assert_eq!(dup, Applied::Unchanged);
}

#[test]
fn duplicate_begin_replay_is_noop() {
    let state = room_awaiting_first_extension();
    let dup = apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::BeginReplay).unwrap();
    assert_eq!(dup, Applied::Unchanged);
}

#[test]
fn replay_ahead_of_cursor_is_stale() {
    let state = waiting_room();
    let state = advanced(second_player_joined(&state, P2).unwrap());
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap(),
    );
    let state = advanced(apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::BeginReplay).unwrap());
    let err = apply_move(
        &state,
        PlayerRole::PlayerTwo,
        1,
        &Move::ReplayToken {
            position: 1,
            token: red(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::StaleProposal, _)
    ));
}

#[test]
fn redelivered_losing_token_after_finish_is_noop() {
    let state = room_awaiting_first_extension();
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerTwo, 1, &Move::AppendColor(blue())).unwrap(),
    );
    let state = advanced(apply_move(&state, PlayerRole::PlayerOne, 2, &Move::BeginReplay).unwrap());
    let losing = Move::ReplayToken {
        position: 0,
        token: blue(), // sequence[0] is red
    };
    let state = advanced(apply_move(&state, PlayerRole::PlayerOne, 2, &losing).unwrap());
    assert_eq!(state.phase, Phase::Finished);

    let dup = apply_move(&state, PlayerRole::PlayerOne, 2, &losing).unwrap();
    assert_eq!(dup, Applied::Unchanged);
}

#[test]
fn no_move_is_accepted_after_finish() {
    let state = waiting_room();
    let state = advanced(terminate(&state, TerminateReason::Cancelled, None).unwrap());
    let err =
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn moves_are_rejected_while_waiting() {
    let state = waiting_room();
    let err =
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn status_is_monotone_across_a_full_game() {
    let mut observed = Vec::new();
    let state = waiting_room();
    observed.push(state.status());
    let state = advanced(second_player_joined(&state, P2).unwrap());
    observed.push(state.status());
    let state = advanced(
        apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(red())).unwrap(),
    );
    observed.push(state.status());
    let state = advanced(
        terminate(
            &state,
            TerminateReason::PlayerLeft,
            Some(PlayerRole::PlayerTwo),
        )
        .unwrap(),
    );
    observed.push(state.status());

    let ranks: Vec<u8> = observed
        .iter()
        .map(|s| match s {
            GameStatus::Waiting => 0,
            GameStatus::Playing => 1,
            GameStatus::Finished => 2,
        })
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}
