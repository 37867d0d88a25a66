use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use log_domain::LogDomain;
use num_traits::{One, Zero};

use crate::error::{Error, Result};
use crate::semiring::{Semiring, SemiringProperties, StarStatus};

/// The Viterbi semiring ⟨[0,1], max, ·, 0, 1⟩ with probabilities stored in
/// negative log space.
///
/// Addition keeps the most probable alternative, so `p* = max(1, p, p², …)`
/// is always `1` and the star is total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viterbi(pub LogDomain<f64>);

impl Viterbi {
    pub fn new(probability: f64) -> Result<Self> {
        LogDomain::new(probability)
            .map(Viterbi)
            .map_err(|_| Error::algebra("probability", probability))
    }

    pub fn probability(&self) -> f64 {
        self.0.probability()
    }
}

impl Add for Viterbi {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.probability() >= other.probability() {
            self
        } else {
            other
        }
    }
}

impl Mul for Viterbi {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Viterbi(self.0 * other.0)
    }
}

impl Zero for Viterbi {
    fn zero() -> Self {
        Viterbi(LogDomain::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Viterbi {
    fn one() -> Self {
        Viterbi(LogDomain::one())
    }
}

impl PartialOrd for Viterbi {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.probability().partial_cmp(&other.probability())
    }
}

impl Semiring for Viterbi {
    fn star_status() -> StarStatus {
        StarStatus::Starrable
    }

    fn star(&self) -> Result<Self> {
        Ok(Viterbi::one())
    }

    fn properties() -> SemiringProperties {
        SemiringProperties {
            commutative: true,
            locally_finite: false,
            has_division: true,
            positive: true,
        }
    }

    fn rdiv(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            Err(Error::algebra("rdiv", self))
        } else {
            Ok(Viterbi(self.0 * other.0.pow(-1.0)))
        }
    }
}

impl fmt::Display for Viterbi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.probability())
    }
}

impl FromStr for Viterbi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let p: f64 = s
            .parse()
            .map_err(|_| Error::Parse(format!("not a probability: `{}`", s)))?;
        Viterbi::new(p).map_err(|_| Error::Parse(format!("not a probability: `{}`", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_keeps_the_best_path() {
        let half = Viterbi::new(0.5).unwrap();
        let quarter = Viterbi::new(0.25).unwrap();
        assert_eq!(half + quarter, half);
        assert_eq!(quarter + half, half);
    }

    #[test]
    fn multiplication_chains_probabilities() {
        let half = Viterbi::new(0.5).unwrap();
        let quarter = Viterbi::new(0.25).unwrap();
        assert_eq!(half * half, quarter);
    }

    #[test]
    fn star_is_total() {
        assert_eq!(Viterbi::new(0.9).unwrap().star().unwrap(), Viterbi::one());
    }
}
