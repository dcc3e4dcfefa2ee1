//! Sequence generation: drawing the next color for a round.
//!
//! Draws are uniform over the palette and independent of the sequence so
//! far (repeats allowed). The source is injected so services stay pure with
//! respect to randomness and tests can run deterministically.

use parking_lot::Mutex;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::color::{ColorToken, Palette};

/// A source of new sequence tokens.
pub trait SequenceSource: Send + Sync {
    /// Draw one token uniformly from `palette`.
    ///
    /// A validated palette is never empty, so this is total.
    fn next_token(&self, palette: &Palette) -> ColorToken;
}

/// Production source backed by the thread-local CSPRNG.
///
/// Predictable generators (e.g. a bare LCG) would let a player anticipate
/// the sequence, so the OS-seeded CSPRNG is the floor here.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsprngSequenceSource;

impl SequenceSource for CsprngSequenceSource {
    fn next_token(&self, palette: &Palette) -> ColorToken {
        let idx = rand::rng().random_range(0..palette.len());
        palette
            .get(idx)
            .expect("index drawn from 0..len")
            .clone()
    }
}

/// Deterministic source for tests and replayable rooms.
pub struct SeededSequenceSource {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededSequenceSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl SequenceSource for SeededSequenceSource {
    fn next_token(&self, palette: &Palette) -> ColorToken {
        let idx = self.rng.lock().random_range(0..palette.len());
        palette
            .get(idx)
            .expect("index drawn from 0..len")
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::new(vec![
            ColorToken::new("red"),
            ColorToken::new("blue"),
            ColorToken::new("green"),
        ])
        .unwrap()
    }

    #[test]
    fn csprng_draws_stay_in_palette() {
        let source = CsprngSequenceSource;
        let palette = palette();
        for _ in 0..200 {
            assert!(palette.contains(&source.next_token(&palette)));
        }
    }

    #[test]
    fn seeded_source_is_deterministic() {
        let palette = palette();
        let a: Vec<_> = {
            let source = SeededSequenceSource::new(42);
            (0..32).map(|_| source.next_token(&palette)).collect()
        };
        let b: Vec<_> = {
            let source = SeededSequenceSource::new(42);
            (0..32).map(|_| source.next_token(&palette)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let palette = palette();
        let a: Vec<_> = {
            let source = SeededSequenceSource::new(1);
            (0..64).map(|_| source.next_token(&palette)).collect()
        };
        let b: Vec<_> = {
            let source = SeededSequenceSource::new(2);
            (0..64).map(|_| source.next_token(&palette)).collect()
        };
        // 3^64 sequences; identical draws would mean the seed is ignored.
        assert_ne!(a, b);
    }
}
