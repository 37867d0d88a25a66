use std::fmt::{Debug, Display};
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod boolean;
mod numeric;
mod tropical;
mod viterbi;

pub use self::boolean::{Boolean, F2};
pub use self::tropical::Tropical;
pub use self::viterbi::Viterbi;

/// Classification of the star operator of a semiring, deciding whether the
/// epsilon closure of an automaton over it can be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarStatus {
    /// The star is defined for every element (e.g. booleans).
    Starrable,
    /// The star is defined only at zero (e.g. integers).
    NonStarrable,
    /// Topologically ordered positive semiring: the star domain is downward
    /// closed, so the closure computation itself decides validity (e.g.
    /// tropical semirings).
    Tops,
    /// Summability must be probed on the absolute values (e.g. signed reals).
    Absval,
}

/// Runtime capability query for a weight algebra.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemiringProperties {
    pub commutative: bool,
    pub locally_finite: bool,
    pub has_division: bool,
    pub positive: bool,
}

/// A semiring implemented directly on its carrier type.
///
/// `zero`/`add` and `one`/`mul` come from the `num_traits` identities and
/// the arithmetic operators; addition must be commutative with identity
/// `zero`, multiplication must have identity `one` and distribute over
/// addition.
pub trait Semiring:
    Clone
    + Debug
    + Display
    + FromStr
    + PartialEq
    + PartialOrd
    + Zero
    + One
    + Add<Output = Self>
    + Mul<Output = Self>
{
    /// How `star` behaves on this semiring.
    fn star_status() -> StarStatus;

    /// The star `v* = 1 + v + v·v + …` where defined.
    fn star(&self) -> Result<Self>;

    /// Whether every finitely generated sub-semiring is finite.  This
    /// guarantees that weighted determinization terminates.
    fn is_locally_finite() -> bool {
        false
    }

    fn properties() -> SemiringProperties;

    /// `self < other` under the semiring order, when one exists.
    fn less_than(&self, other: &Self) -> bool {
        matches!(
            self.partial_cmp(other),
            Some(::std::cmp::Ordering::Less)
        )
    }

    /// Absolute value, used by the `Absval` summability probe.
    fn abs_val(&self) -> Self {
        self.clone()
    }

    /// Mirror of the value under transposition of the automaton.
    fn transpose_val(&self) -> Self {
        self.clone()
    }

    /// Exact right division `self / other` where available.
    fn rdiv(&self, other: &Self) -> Result<Self> {
        let _ = other;
        Err(Error::algebra("rdiv", self.clone()))
    }

    /// Exact left division `other \ self` where available.
    fn ldiv(&self, other: &Self) -> Result<Self> {
        other.rdiv(self)
    }
}

/// Parses a weight, mapping the carrier's own error type onto [`Error::Parse`].
pub fn parse_weight<W: Semiring>(s: &str) -> Result<W> {
    s.trim()
        .parse::<W>()
        .map_err(|_| Error::Parse(format!("not a weight: `{}`", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_status_of_provided_semirings() {
        assert_eq!(Boolean::star_status(), StarStatus::Starrable);
        assert_eq!(<i64 as Semiring>::star_status(), StarStatus::NonStarrable);
        assert_eq!(<u64 as Semiring>::star_status(), StarStatus::NonStarrable);
        assert_eq!(<f64 as Semiring>::star_status(), StarStatus::Absval);
        assert_eq!(F2::star_status(), StarStatus::NonStarrable);
        assert_eq!(Tropical::star_status(), StarStatus::Tops);
        assert_eq!(Viterbi::star_status(), StarStatus::Starrable);
    }

    #[test]
    fn locally_finite() {
        assert!(Boolean::is_locally_finite());
        assert!(F2::is_locally_finite());
        assert!(!<i64 as Semiring>::is_locally_finite());
        assert!(!Tropical::is_locally_finite());
    }

    #[test]
    fn parse_weight_reports_garbage() {
        assert!(parse_weight::<i64>(" 42 ").is_ok());
        assert!(parse_weight::<i64>("forty-two").is_err());
    }

    #[test]
    fn capability_queries() {
        assert!(<i64 as Semiring>::properties().has_division);
        assert!(!<u64 as Semiring>::properties().has_division);
        assert!(Tropical::properties().positive);
        assert!(Boolean::properties().locally_finite);
    }
}
