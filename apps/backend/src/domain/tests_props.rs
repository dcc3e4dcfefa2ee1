//! Property tests for arbitration invariants under honest play.

use proptest::prelude::*;
use uuid::Uuid;

use crate::domain::arbiter::{apply_move, second_player_joined, Applied, Move};
use crate::domain::color::{ColorToken, Palette};
use crate::domain::state::{GameState, Phase, PlayerRole};

const P1: i64 = 1;
const P2: i64 = 2;

fn palette_of(size: usize) -> Palette {
    Palette::new((0..size).map(|i| ColorToken::new(format!("color{i}"))).collect())
        .expect("generated palettes are valid")
}

fn advanced(applied: Applied) -> GameState {
    match applied {
        Applied::Advanced(state) => state,
        Applied::Unchanged => panic!("honest play must advance the state"),
    }
}

/// Replay the full sequence correctly, then append the palette color at
/// `pick`, as the current turn-holder.
fn play_round_honestly(state: GameState, pick: usize) -> GameState {
    let actor = state.turn;
    let round = state.current_round();
    let mut state = advanced(apply_move(&state, actor, round, &Move::BeginReplay).unwrap());
    for position in 0..state.sequence.len() {
        let token = state.sequence[position].clone();
        state = advanced(
            apply_move(&state, actor, round, &Move::ReplayToken { position, token }).unwrap(),
        );
    }
    let token = state.palette.get(pick % state.palette.len()).unwrap().clone();
    advanced(apply_move(&state, actor, round, &Move::AppendColor(token)).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    /// Honest play: one append per round, strict turn alternation, all
    /// tokens drawn from the palette, scores matching extensions.
    #[test]
    fn honest_play_preserves_invariants(
        palette_size in 2usize..8,
        first_pick in 0usize..8,
        picks in proptest::collection::vec(0usize..8, 0..12),
    ) {
        let palette = palette_of(palette_size);
        let state = GameState::new_waiting(Uuid::new_v4(), None, palette.clone(), P1);
        let state = advanced(second_player_joined(&state, P2).unwrap());

        let first = palette.get(first_pick % palette.len()).unwrap().clone();
        let mut state = advanced(
            apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(first)).unwrap(),
        );
        prop_assert_eq!(state.turn, PlayerRole::PlayerTwo);

        let mut turns = vec![state.turn];
        for (i, pick) in picks.iter().enumerate() {
            let before_round = state.current_round();
            state = play_round_honestly(state, *pick);

            // Exactly one append per completed round.
            prop_assert_eq!(state.current_round(), before_round + 1);
            // The turn flipped.
            prop_assert_ne!(state.turn, *turns.last().unwrap());
            turns.push(state.turn);
            // Round counter tracks the log length: first color + i+1 extensions.
            prop_assert_eq!(state.sequence.len(), i + 2);
        }

        // Every committed token is in the palette.
        prop_assert!(state.sequence.iter().all(|t| palette.contains(t)));
        // Scores account for every extension and nothing else.
        let extensions = (state.scores[0] + state.scores[1]) as usize;
        prop_assert_eq!(extensions, picks.len());
        prop_assert_eq!(state.phase, Phase::ShowingLastMove);
        prop_assert!(!state.is_finished());
    }

    /// Re-sending each accepted replay step is always a silent no-op.
    #[test]
    fn duplicate_replay_steps_never_reapply(
        palette_size in 2usize..6,
        picks in proptest::collection::vec(0usize..6, 1..6),
    ) {
        let palette = palette_of(palette_size);
        let state = GameState::new_waiting(Uuid::new_v4(), None, palette.clone(), P1);
        let state = advanced(second_player_joined(&state, P2).unwrap());
        let first = palette.get(0).unwrap().clone();
        let mut state = advanced(
            apply_move(&state, PlayerRole::PlayerOne, 0, &Move::FirstColor(first)).unwrap(),
        );
        for pick in &picks {
            state = play_round_honestly(state, *pick);
        }

        // Walk the next replay, re-sending every step once.
        let actor = state.turn;
        let round = state.current_round();
        state = advanced(apply_move(&state, actor, round, &Move::BeginReplay).unwrap());
        for position in 0..state.sequence.len() {
            let token = state.sequence[position].clone();
            let mv = Move::ReplayToken { position, token };
            state = advanced(apply_move(&state, actor, round, &mv).unwrap());
            prop_assert_eq!(
                apply_move(&state, actor, round, &mv).unwrap(),
                Applied::Unchanged
            );
        }
        prop_assert_eq!(state.phase, Phase::AwaitingNewColor);
    }
}
