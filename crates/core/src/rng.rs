//! RNG module - piece type generation
//!
//! New pieces (the initial board and every refill) get a type drawn uniformly
//! from `0..type_count`. The draw goes through the [`TypeSource`] trait so the
//! controller can be driven by a seeded generator in play and by a fixed
//! script in tests.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceType;

/// Supplier of piece types for newly placed pieces
pub trait TypeSource {
    /// Draw the type for the next placed piece
    fn next_type(&mut self) -> PieceType;
}

/// Uniform random types from a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct RandomTypes {
    rng: StdRng,
    type_count: u8,
    seed: u64,
}

impl RandomTypes {
    /// Create a source drawing from `0..type_count` with the given seed
    ///
    /// A `type_count` of zero is treated as one.
    pub fn new(type_count: u8, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            type_count: type_count.max(1),
            seed,
        }
    }

    pub fn type_count(&self) -> u8 {
        self.type_count
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl TypeSource for RandomTypes {
    fn next_type(&mut self) -> PieceType {
        PieceType(self.rng.random_range(0..self.type_count))
    }
}

/// Replays a fixed sequence of types, cycling when it runs out
///
/// Useful for building boards whose refills are known in advance.
#[derive(Debug, Clone)]
pub struct ScriptedTypes {
    script: VecDeque<PieceType>,
}

impl ScriptedTypes {
    /// Create from a non-empty script; an empty script yields type 0 forever
    pub fn new(script: impl IntoIterator<Item = PieceType>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Parse a script from letters, e.g. `"ABCA"`; other characters are skipped
    pub fn from_letters(letters: &str) -> Self {
        Self::new(letters.chars().filter_map(PieceType::from_char))
    }
}

impl TypeSource for ScriptedTypes {
    fn next_type(&mut self) -> PieceType {
        match self.script.pop_front() {
            Some(kind) => {
                self.script.push_back(kind);
                kind
            }
            None => PieceType(0),
        }
    }
}

impl<T: TypeSource + ?Sized> TypeSource for &mut T {
    fn next_type(&mut self) -> PieceType {
        (**self).next_type()
    }
}
