use std::fmt::{self, Display};
use std::rc::Rc;

use num_traits::{One, Zero};

use crate::alphabet::Letter;
use crate::semiring::Semiring;

pub mod compile;
pub mod derivation;
pub mod parser;
pub mod printer;
pub mod standard;
pub mod thompson;

pub use self::compile::{exp_to_aut, ExpAlgo};
pub use self::derivation::{constant_term, derivation, derived_term, split, Polynomial};
pub use self::parser::parse_exp;
pub use self::printer::print_exp;
pub use self::standard::{is_standard, standard, standard_here};
pub use self::thompson::{compact_thompson, thompson};

/// A rational expression over letters of type `A` and weights of type `W`.
///
/// Subtrees are reference counted, so derived expressions share structure
/// with the expressions they were built from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RatExp<A, W> {
    Zero,
    One,
    Atom(A),
    Sum(Rc<RatExp<A, W>>, Rc<RatExp<A, W>>),
    Prod(Rc<RatExp<A, W>>, Rc<RatExp<A, W>>),
    Star(Rc<RatExp<A, W>>),
    /// `E?`, accepting the empty word in addition to `E`.
    Maybe(Rc<RatExp<A, W>>),
    /// `E⁺`, one or more iterations of `E`.
    Plus(Rc<RatExp<A, W>>),
    LeftWeight(W, Rc<RatExp<A, W>>),
    RightWeight(Rc<RatExp<A, W>>, W),
}

impl<A: Letter, W: Semiring> RatExp<A, W> {
    pub fn zero() -> Self {
        RatExp::Zero
    }

    pub fn one() -> Self {
        RatExp::One
    }

    pub fn atom(a: A) -> Self {
        RatExp::Atom(a)
    }

    /// `l + r`, understood modulo `0 + E = E + 0 = E`.
    pub fn add(l: Self, r: Self) -> Self {
        match (l, r) {
            (RatExp::Zero, r) => r,
            (l, RatExp::Zero) => l,
            (l, r) => RatExp::Sum(Rc::new(l), Rc::new(r)),
        }
    }

    /// `l · r`, understood modulo `0·E = E·0 = 0` and `1·E = E·1 = E`.
    pub fn mul(l: Self, r: Self) -> Self {
        match (l, r) {
            (RatExp::Zero, _) | (_, RatExp::Zero) => RatExp::Zero,
            (RatExp::One, r) => r,
            (l, RatExp::One) => l,
            (l, r) => RatExp::Prod(Rc::new(l), Rc::new(r)),
        }
    }

    pub fn star(e: Self) -> Self {
        RatExp::Star(Rc::new(e))
    }

    pub fn maybe(e: Self) -> Self {
        RatExp::Maybe(Rc::new(e))
    }

    pub fn plus(e: Self) -> Self {
        RatExp::Plus(Rc::new(e))
    }

    /// `<w>E`, understood modulo the weighted trivial identities
    /// `<0>E = 0`, `<1>E = E` and `<h>(<k>E) = <hk>E`.
    pub fn lmul(w: W, e: Self) -> Self {
        if w.is_zero() {
            return RatExp::Zero;
        }
        if w.is_one() {
            return e;
        }
        match e {
            RatExp::Zero => RatExp::Zero,
            RatExp::LeftWeight(k, sub) => RatExp::LeftWeight(w * k, sub),
            e => RatExp::LeftWeight(w, Rc::new(e)),
        }
    }

    /// `E<w>`, understood modulo `E<0> = 0`, `E<1> = E` and
    /// `(E<k>)<m> = E<km>`; the weight slips under a left weight so that
    /// `<h>(<k>E<l>)<m>` normalizes to `<hk>E<lm>`.
    pub fn rmul(e: Self, w: W) -> Self {
        if w.is_zero() {
            return RatExp::Zero;
        }
        if w.is_one() {
            return e;
        }
        match e {
            RatExp::Zero => RatExp::Zero,
            RatExp::RightWeight(sub, k) => RatExp::RightWeight(sub, k * w),
            RatExp::LeftWeight(h, sub) => {
                RatExp::LeftWeight(h, Rc::new(RatExp::rmul(sub.as_ref().clone(), w)))
            }
            e => RatExp::RightWeight(Rc::new(e), w),
        }
    }

    /// Letters plus operators, the size measure of the Thompson
    /// construction.  Concatenation carries no symbol of its own and is
    /// not counted.
    pub fn size(&self) -> usize {
        match *self {
            RatExp::Zero | RatExp::One | RatExp::Atom(_) => 1,
            RatExp::Prod(ref l, ref r) => l.size() + r.size(),
            RatExp::Sum(ref l, ref r) => 1 + l.size() + r.size(),
            RatExp::Star(ref e)
            | RatExp::Maybe(ref e)
            | RatExp::Plus(ref e)
            | RatExp::LeftWeight(_, ref e)
            | RatExp::RightWeight(ref e, _) => 1 + e.size(),
        }
    }

    /// The literal length: the number of letter occurrences.
    pub fn length(&self) -> usize {
        match *self {
            RatExp::Zero | RatExp::One => 0,
            RatExp::Atom(_) => 1,
            RatExp::Sum(ref l, ref r) | RatExp::Prod(ref l, ref r) => l.length() + r.length(),
            RatExp::Star(ref e)
            | RatExp::Maybe(ref e)
            | RatExp::Plus(ref e)
            | RatExp::LeftWeight(_, ref e)
            | RatExp::RightWeight(ref e, _) => e.length(),
        }
    }
}

impl<A: Letter, W: Semiring> Display for RatExp<A, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", print_exp(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::Boolean;

    type E = RatExp<char, i64>;

    #[test]
    fn trivial_identities() {
        let a = E::atom('a');
        assert_eq!(E::add(E::zero(), a.clone()), a);
        assert_eq!(E::add(a.clone(), E::zero()), a);
        assert_eq!(E::mul(E::one(), a.clone()), a);
        assert_eq!(E::mul(a.clone(), E::one()), a);
        assert_eq!(E::mul(E::zero(), a.clone()), E::Zero);
        assert_eq!(E::mul(a.clone(), E::zero()), E::Zero);
    }

    #[test]
    fn weighted_trivial_identities() {
        let a = E::atom('a');
        assert_eq!(E::lmul(0, a.clone()), E::Zero);
        assert_eq!(E::lmul(1, a.clone()), a);
        assert_eq!(E::rmul(a.clone(), 0), E::Zero);
        assert_eq!(E::rmul(a.clone(), 1), a);
        // <2>(<3>a) = <6>a
        assert_eq!(
            E::lmul(2, E::lmul(3, a.clone())),
            E::LeftWeight(6, Rc::new(a.clone()))
        );
        // <2>(<3>a<5>)<7> = <6>a<35>
        let inner = E::rmul(E::lmul(3, a.clone()), 5);
        let outer = E::rmul(E::lmul(2, inner), 7);
        assert_eq!(
            outer,
            E::LeftWeight(
                6,
                Rc::new(E::RightWeight(Rc::new(a.clone()), 35))
            )
        );
    }

    #[test]
    fn sizes() {
        // a(a+b)*: three letters, a product, a sum, a star.
        let e: RatExp<char, Boolean> = RatExp::mul(
            RatExp::atom('a'),
            RatExp::star(RatExp::add(RatExp::atom('a'), RatExp::atom('b'))),
        );
        assert_eq!(e.length(), 3);
        assert_eq!(e.size(), 5);
    }
}
