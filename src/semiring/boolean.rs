use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::semiring::{Semiring, SemiringProperties, StarStatus};

/// The boolean semiring ⟨𝔹, ∨, ∧, false, true⟩.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Boolean(pub bool);

impl Add for Boolean {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Boolean(self.0 | other.0)
    }
}

impl Mul for Boolean {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Boolean(self.0 & other.0)
    }
}

impl Zero for Boolean {
    fn zero() -> Self {
        Boolean(false)
    }

    fn is_zero(&self) -> bool {
        !self.0
    }
}

impl One for Boolean {
    fn one() -> Self {
        Boolean(true)
    }
}

impl Semiring for Boolean {
    fn star_status() -> StarStatus {
        StarStatus::Starrable
    }

    fn star(&self) -> Result<Self> {
        Ok(Boolean(true))
    }

    fn is_locally_finite() -> bool {
        true
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: true,
            has_division: false,
            positive: true,
        }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if self.0 { "1" } else { "0" })
    }
}

impl FromStr for Boolean {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" | "false" => Ok(Boolean(false)),
            "1" | "true" => Ok(Boolean(true)),
            _ => Err(Error::Parse(format!("not a boolean weight: `{}`", s))),
        }
    }
}

/// The field with two elements ⟨𝔽₂, ⊕, ∧, 0, 1⟩.
///
/// Addition is exclusive or, so `1* = 1 + 1 + …` does not stabilise: the
/// star is defined only at zero.  The carrier is finite, which makes the
/// semiring locally finite.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct F2(pub bool);

impl Add for F2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        F2(self.0 ^ other.0)
    }
}

impl Mul for F2 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        F2(self.0 & other.0)
    }
}

impl Zero for F2 {
    fn zero() -> Self {
        F2(false)
    }

    fn is_zero(&self) -> bool {
        !self.0
    }
}

impl One for F2 {
    fn one() -> Self {
        F2(true)
    }
}

impl Semiring for F2 {
    fn star_status() -> StarStatus {
        StarStatus::NonStarrable
    }

    fn star(&self) -> Result<Self> {
        if self.is_zero() {
            Ok(F2(true))
        } else {
            Err(Error::algebra("star", self))
        }
    }

    fn is_locally_finite() -> bool {
        true
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: true,
            has_division: true,
            positive: false,
        }
    }

    fn rdiv(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            Err(Error::algebra("rdiv", self))
        } else {
            Ok(*self)
        }
    }
}

impl fmt::Display for F2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if self.0 { "1" } else { "0" })
    }
}

impl FromStr for F2 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" => Ok(F2(false)),
            "1" => Ok(F2(true)),
            _ => Err(Error::Parse(format!("not an F2 weight: `{}`", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_laws() {
        let (o, l) = (Boolean::zero(), Boolean::one());
        assert_eq!(o + l, l);
        assert_eq!(l + l, l);
        assert_eq!(o * l, o);
        assert_eq!(l * l, l);
        assert_eq!(o.star().unwrap(), l);
    }

    #[test]
    fn f2_star_only_at_zero() {
        assert_eq!(F2::zero().star().unwrap(), F2::one());
        assert!(F2::one().star().is_err());
        assert_eq!(F2(true) + F2(true), F2(false));
    }
}
