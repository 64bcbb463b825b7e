//! Identifier generation for note filenames.
//!
//! # Responsibility
//! - Produce a fresh candidate identifier on each call.
//!
//! # Invariants
//! - Generated ids have exactly `IdOptions::length` characters.
//! - Uniqueness is not guaranteed here; the filename resolver enforces it.

use crate::model::dir::{IdCase, IdOptions};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

/// Source of candidate identifiers.
pub trait IdGenerator {
    fn generate(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn generate(&mut self) -> String {
        self()
    }
}

/// Random identifier generator configured from `IdOptions`.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    alphabet: Vec<char>,
    length: usize,
    case: IdCase,
    rng: ThreadRng,
}

impl RandomIdGenerator {
    pub fn new(options: &IdOptions) -> Self {
        Self {
            alphabet: options.charset.alphabet().chars().collect(),
            length: options.length,
            case: options.case,
            rng: rand::thread_rng(),
        }
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&mut self) -> String {
        let raw = (0..self.length)
            .filter_map(|_| self.alphabet.choose(&mut self.rng).copied())
            .collect::<String>();

        match self.case {
            IdCase::Lower => raw.to_lowercase(),
            IdCase::Upper => raw.to_uppercase(),
            IdCase::Mixed => raw,
        }
    }
}

/// Builds the default generator for one directory.
pub fn new_id_generator(options: &IdOptions) -> RandomIdGenerator {
    RandomIdGenerator::new(options)
}
