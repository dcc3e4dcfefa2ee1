//! Turn arbitration: the pure rules deciding what a submitted move does to
//! the authoritative state.
//!
//! Everything here is side-effect free. The store calls [`apply_move`] under
//! the room lock; callers other than the store must never commit its output.
//!
//! Idempotency contract: a duplicate of an already-committed move (same
//! expected round, same position/token) returns [`Applied::Unchanged`] and is
//! discarded silently. A proposal against a round the room has moved past is
//! rejected as [`ConflictKind::StaleProposal`] with no side effects. An
//! incorrect replay is neither: it is an accepted move whose outcome is the
//! `Finished` transition.

use crate::domain::color::ColorToken;
use crate::domain::state::{FinishReason, GameState, Phase, PlayerRole};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use time::OffsetDateTime;

/// A gameplay proposal from one participant.
#[derive(Debug, Clone, PartialEq)]
pub enum Move {
    /// Creator picks `sequence[0]` and opens round 1.
    FirstColor(ColorToken),
    /// Current player acknowledges the reveal and starts replaying.
    BeginReplay,
    /// One replay step, checked against `sequence[position]`.
    ReplayToken { position: usize, token: ColorToken },
    /// Append exactly one new token after a complete replay.
    AppendColor(ColorToken),
}

/// Result of arbitration.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The move changed the authoritative state; commit this.
    Advanced(GameState),
    /// Duplicate of already-committed work; nothing to commit.
    Unchanged,
}

/// How a room may be terminated outside normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateReason {
    /// Creator cancelled (or the lobby expired) a still-Waiting room.
    Cancelled,
    /// A participant left the session.
    PlayerLeft,
}

/// Seat a second participant. Exits `WaitingForSecondPlayer` exactly once;
/// a repeat join by the same participant is a no-op.
pub fn second_player_joined(
    state: &GameState,
    player2: crate::domain::state::PlayerId,
) -> Result<Applied, DomainError> {
    if state.player2 == Some(player2) {
        return Ok(Applied::Unchanged);
    }
    if player2 == state.player1 {
        return Err(DomainError::validation(
            ValidationKind::Other("SELF_JOIN".into()),
            "creator cannot join their own room as the second player",
        ));
    }
    match state.phase {
        Phase::WaitingForSecondPlayer => {
            let mut next = state.clone();
            next.player2 = Some(player2);
            next.phase = Phase::AwaitingFirstColor;
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }
        Phase::Finished => Err(DomainError::conflict(
            ConflictKind::AlreadyStarted,
            "room is already finished",
        )),
        _ => Err(DomainError::conflict(
            ConflictKind::RoomFull,
            "both seats are already taken",
        )),
    }
}

/// Arbitrate one proposal against the current authoritative state.
///
/// `expected_round` is the round counter the client believed it was acting
/// on (`sequence.len()` at its last fetch).
pub fn apply_move(
    state: &GameState,
    actor: PlayerRole,
    expected_round: usize,
    mv: &Move,
) -> Result<Applied, DomainError> {
    // Duplicates of committed work are discarded silently, before any turn
    // or phase check: the authoritative state already reflects them.
    if is_committed_duplicate(state, actor, expected_round, mv) {
        return Ok(Applied::Unchanged);
    }

    if state.phase == Phase::Finished {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "game is already finished",
        ));
    }

    if expected_round != state.current_round() {
        return Err(DomainError::conflict(
            ConflictKind::StaleProposal,
            format!(
                "proposal for round {expected_round}, but the room is at round {}",
                state.current_round()
            ),
        ));
    }

    match (state.phase, mv) {
        (Phase::AwaitingFirstColor, Move::FirstColor(token)) => {
            require_turn(state, actor)?;
            // Only the creator ever holds the turn here, but keep the seat
            // check explicit: sequence[0] belongs to PlayerOne.
            if actor != PlayerRole::PlayerOne {
                return Err(out_of_turn(state, actor));
            }
            require_in_palette(state, token)?;
            let mut next = state.clone();
            next.sequence.push(token.clone());
            next.turn = PlayerRole::PlayerTwo;
            next.phase = Phase::ShowingLastMove;
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }

        (Phase::ShowingLastMove, Move::BeginReplay) => {
            require_turn(state, actor)?;
            let mut next = state.clone();
            next.phase = Phase::AwaitingReplay { matched: 0 };
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }

        (Phase::AwaitingReplay { matched }, Move::ReplayToken { position, token }) => {
            require_turn(state, actor)?;
            require_in_palette(state, token)?;
            if *position != matched {
                // The cursor has moved on (or the client ran ahead); either
                // way this step no longer applies.
                return Err(DomainError::conflict(
                    ConflictKind::StaleProposal,
                    format!("replay position {position} does not match cursor {matched}"),
                ));
            }
            if state.sequence[matched] != *token {
                // The defined path to Finished, not an error.
                return Ok(Applied::Advanced(finish_with_winner(
                    state,
                    actor.other(),
                    FinishReason::SequenceMismatch,
                )));
            }
            let mut next = state.clone();
            next.phase = if matched + 1 == state.sequence.len() {
                Phase::AwaitingNewColor
            } else {
                Phase::AwaitingReplay {
                    matched: matched + 1,
                }
            };
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }

        (Phase::AwaitingNewColor, Move::AppendColor(token)) => {
            require_turn(state, actor)?;
            require_in_palette(state, token)?;
            let mut next = state.clone();
            next.sequence.push(token.clone());
            next.scores[actor.index()] += 1;
            next.turn = actor.other();
            next.phase = Phase::ShowingLastMove;
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }

        (Phase::WaitingForSecondPlayer, _) => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            "waiting for a second player to join",
        )),

        (phase, mv) => Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("move {mv:?} is not valid in phase {phase:?}"),
        )),
    }
}

/// Terminate a room outside normal play. Idempotent: a second call for an
/// already-Finished room returns `Unchanged` with no double-scoring or
/// winner reassignment.
pub fn terminate(
    state: &GameState,
    reason: TerminateReason,
    leaving: Option<PlayerRole>,
) -> Result<Applied, DomainError> {
    if state.phase == Phase::Finished {
        return Ok(Applied::Unchanged);
    }

    match reason {
        TerminateReason::Cancelled => {
            if state.phase != Phase::WaitingForSecondPlayer {
                return Err(DomainError::conflict(
                    ConflictKind::AlreadyStarted,
                    "only a still-Waiting room can be cancelled",
                ));
            }
            let mut next = state.clone();
            next.phase = Phase::Finished;
            next.finish = Some(FinishReason::Cancelled);
            next.updated_at = OffsetDateTime::now_utc();
            Ok(Applied::Advanced(next))
        }
        TerminateReason::PlayerLeft => {
            let leaving = leaving.ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::Other("NO_LEAVER".into()),
                    "PlayerLeft termination requires the leaving seat",
                )
            })?;
            // Leaving a room nobody else has joined is a cancellation, not
            // a win for an absent opponent.
            if state.phase == Phase::WaitingForSecondPlayer {
                let mut next = state.clone();
                next.phase = Phase::Finished;
                next.finish = Some(FinishReason::Cancelled);
                next.player_left = Some(leaving);
                next.updated_at = OffsetDateTime::now_utc();
                return Ok(Applied::Advanced(next));
            }
            let mut next = finish_with_winner(state, leaving.other(), FinishReason::PlayerLeft);
            next.player_left = Some(leaving);
            Ok(Applied::Advanced(next))
        }
    }
}

fn finish_with_winner(state: &GameState, winner: PlayerRole, reason: FinishReason) -> GameState {
    let mut next = state.clone();
    next.phase = Phase::Finished;
    next.winner = state.player_id(winner);
    next.finish = Some(reason);
    next.updated_at = OffsetDateTime::now_utc();
    next
}

fn require_turn(state: &GameState, actor: PlayerRole) -> Result<(), DomainError> {
    if state.turn != actor {
        return Err(out_of_turn(state, actor));
    }
    Ok(())
}

fn out_of_turn(state: &GameState, actor: PlayerRole) -> DomainError {
    DomainError::validation(
        ValidationKind::OutOfTurn,
        format!("it is {:?}'s turn, not {actor:?}'s", state.turn),
    )
}

fn require_in_palette(state: &GameState, token: &ColorToken) -> Result<(), DomainError> {
    if !state.palette.contains(token) {
        return Err(DomainError::validation(
            ValidationKind::UnknownColor,
            format!("'{token}' is not in this room's palette"),
        ));
    }
    Ok(())
}

/// Does this proposal duplicate a move the room has already committed?
///
/// Covers the replay-after-advance and append-after-advance races that two
/// independently polling clients (or one client double-posting) produce.
fn is_committed_duplicate(
    state: &GameState,
    actor: PlayerRole,
    expected_round: usize,
    mv: &Move,
) -> bool {
    match mv {
        // The first color is committed once sequence[0] exists.
        Move::FirstColor(token) => {
            actor == PlayerRole::PlayerOne
                && expected_round == 0
                && state.sequence.first() == Some(token)
        }

        // BeginReplay already took effect if this round's replay is underway
        // (or done) and the acknowledging player still holds the turn.
        Move::BeginReplay => {
            expected_round == state.current_round()
                && state.turn == actor
                && matches!(
                    state.phase,
                    Phase::AwaitingReplay { .. } | Phase::AwaitingNewColor
                )
        }

        // A replay step is committed once the cursor has moved past it
        // within the same round, with the same token.
        Move::ReplayToken { position, token } => {
            if expected_round != state.current_round() || state.turn != actor {
                return false;
            }
            let cursor = match state.phase {
                Phase::AwaitingReplay { matched } => matched,
                // Replay finished this round; every position is behind us.
                Phase::AwaitingNewColor => state.sequence.len(),
                // The game ended on this player's mismatch; re-delivering the
                // losing token must not turn into an error.
                Phase::Finished => {
                    return state.finish == Some(FinishReason::SequenceMismatch)
                        && state.sequence.get(*position).is_some_and(|t| t != token);
                }
                _ => return false,
            };
            *position < cursor && state.sequence.get(*position) == Some(token)
        }

        // An append is committed once the sequence grew past expected_round
        // with exactly this token at that slot.
        Move::AppendColor(token) => {
            expected_round + 1 == state.current_round()
                && state.sequence.get(expected_round) == Some(token)
        }
    }
}
