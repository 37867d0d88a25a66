use num_traits::Zero;

use crate::error::{Error, Result};
use crate::semiring::{Semiring, SemiringProperties, StarStatus};

/// The ring of integers ⟨ℤ, +, ·, 0, 1⟩.
///
/// The star diverges everywhere except at zero.
impl Semiring for i64 {
    fn star_status() -> StarStatus {
        StarStatus::NonStarrable
    }

    fn star(&self) -> Result<Self> {
        if self.is_zero() {
            Ok(1)
        } else {
            Err(Error::algebra("star", self))
        }
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: false,
            has_division: true,
            positive: false,
        }
    }

    fn abs_val(&self) -> Self {
        self.abs()
    }

    fn rdiv(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(Error::algebra("rdiv", self));
        }
        if self % other != 0 {
            return Err(Error::algebra("rdiv", self));
        }
        Ok(self / other)
    }
}

/// The semiring of natural numbers ⟨ℕ, +, ·, 0, 1⟩.
impl Semiring for u64 {
    fn star_status() -> StarStatus {
        StarStatus::NonStarrable
    }

    fn star(&self) -> Result<Self> {
        if self.is_zero() {
            Ok(1)
        } else {
            Err(Error::algebra("star", self))
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

/// The field of reals ⟨ℝ, +, ·, 0, 1⟩.
///
/// `x*` is the geometric sum `1/(1-x)`, defined for `|x| < 1`.  Validity of
/// automata over ℝ is decided by probing the absolute values.
impl Semiring for f64 {
    fn star_status() -> StarStatus {
        StarStatus::Absval
    }

    fn star(&self) -> Result<Self> {
        if self.abs() < 1.0 {
            Ok(1.0 / (1.0 - self))
        } else {
            Err(Error::algebra("star", self))
        }
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: false,
            has_division: true,
            positive: false,
        }
    }

    fn abs_val(&self) -> Self {
        self.abs()
    }

    fn rdiv(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            Err(Error::algebra("rdiv", self))
        } else {
            Ok(self / other)
        }
    }
}
