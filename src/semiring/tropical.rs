use std::cmp;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::semiring::{Semiring, SemiringProperties, StarStatus};

/// The tropical min-plus semiring ⟨ℤ ∪ {∞}, min, +, ∞, 0⟩.
///
/// The additive identity is ∞, which is also the supremum of the order:
/// algorithms comparing weights against a bound must not assume that
/// `zero` is the smallest element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tropical {
    Fin(i64),
    Inf,
}

impl Add for Tropical {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        cmp::min(self, other)
    }
}

impl Mul for Tropical {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Tropical::Fin(x), Tropical::Fin(y)) => Tropical::Fin(x + y),
            _ => Tropical::Inf,
        }
    }
}

impl Zero for Tropical {
    fn zero() -> Self {
        Tropical::Inf
    }

    fn is_zero(&self) -> bool {
        *self == Tropical::Inf
    }
}

impl One for Tropical {
    fn one() -> Self {
        Tropical::Fin(0)
    }
}

impl Semiring for Tropical {
    fn star_status() -> StarStatus {
        StarStatus::Tops
    }

    /// `v* = min(0, v, 2v, …)`, which is `0` whenever `v ≥ 0` and
    /// unbounded below otherwise.
    fn star(&self) -> Result<Self> {
        match *self {
            Tropical::Inf => Ok(Tropical::Fin(0)),
            Tropical::Fin(x) if x >= 0 => Ok(Tropical::Fin(0)),
            _ => Err(Error::algebra("star", self)),
        }
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: false,
            has_division: false,
            positive: true,
        }
    }
}

impl fmt::Display for Tropical {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tropical::Fin(x) => write!(f, "{}", x),
            Tropical::Inf => write!(f, "oo"),
        }
    }
}

impl FromStr for Tropical {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "oo" {
            return Ok(Tropical::Inf);
        }
        s.parse::<i64>()
            .map(Tropical::Fin)
            .map_err(|_| Error::Parse(format!("not a tropical weight: `{}`", s)))
    }
}
