use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, Letter};
use crate::error::{Error, Result};
use crate::semiring::Semiring;

/// The pairing of a label alphabet with a weight algebra.  The weight
/// algebra is carried at the type level; the alphabet is a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context<A: Letter, W: Semiring> {
    pub alphabet: Alphabet<A>,
    #[serde(skip)]
    _weights: PhantomData<W>,
}

impl<A: Letter, W: Semiring> Context<A, W> {
    pub fn new(alphabet: Alphabet<A>) -> Self {
        Context {
            alphabet,
            _weights: PhantomData,
        }
    }

    /// Binary operations require both operands to live over the same
    /// alphabet.
    pub fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.alphabet == other.alphabet {
            Ok(())
        } else {
            Err(Error::Structural(
                "mismatched contexts: the alphabets differ".to_string(),
            ))
        }
    }
}

impl<W: Semiring> Context<char, W> {
    pub fn from_chars(letters: &str) -> Self {
        Context::new(Alphabet::chars(letters))
    }
}
