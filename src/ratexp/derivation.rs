use std::hash::Hash;

use indexmap::IndexMap;
use integeriser::{HashIntegeriser, Integeriser};
use num_traits::{One, Zero};

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, History, State};
use crate::context::Context;
use crate::error::Result;
use crate::ratexp::{print_exp, RatExp};
use crate::semiring::Semiring;

/// A formal linear combination of expressions, the result of a `split` or
/// a derivation.  Insertion order is preserved so that constructions over
/// polynomials are deterministic.
pub type Polynomial<A, W> = IndexMap<RatExp<A, W>, W>;

fn add_term<A, W>(poly: &mut Polynomial<A, W>, e: RatExp<A, W>, w: W)
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    if w.is_zero() || e == RatExp::Zero {
        return;
    }
    let combined = match poly.shift_remove(&e) {
        Some(old) => old + w,
        None => w,
    };
    if !combined.is_zero() {
        poly.insert(e, combined);
    }
}

fn add_poly<A, W>(dst: &mut Polynomial<A, W>, src: Polynomial<A, W>)
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    for (e, w) in src {
        add_term(dst, e, w);
    }
}

fn lmul_poly<A, W>(w: &W, poly: Polynomial<A, W>) -> Polynomial<A, W>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    for (e, c) in poly {
        add_term(&mut res, e, w.clone() * c);
    }
    res
}

/// Multiplies every term of `poly` by `factor` on the right, keeping the
/// coefficients.
fn rmul_exp_poly<A, W>(poly: Polynomial<A, W>, factor: &RatExp<A, W>) -> Polynomial<A, W>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    for (e, c) in poly {
        add_term(&mut res, RatExp::mul(e, factor.clone()), c);
    }
    res
}

fn rmul_weight_poly<A, W>(poly: Polynomial<A, W>, w: &W) -> Polynomial<A, W>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    for (e, c) in poly {
        add_term(&mut res, RatExp::rmul(e, w.clone()), c);
    }
    res
}

/// The constant term of an expression: the weight of the empty word in
/// the series it denotes.  Fails when a star is applied outside its
/// domain.
pub fn constant_term<A, W>(e: &RatExp<A, W>) -> Result<W>
where
    A: Letter,
    W: Semiring,
{
    match *e {
        RatExp::Zero | RatExp::Atom(_) => Ok(W::zero()),
        RatExp::One => Ok(W::one()),
        RatExp::Sum(ref l, ref r) => Ok(constant_term(l)? + constant_term(r)?),
        RatExp::Prod(ref l, ref r) => Ok(constant_term(l)? * constant_term(r)?),
        RatExp::Star(ref s) => constant_term(s)?.star(),
        RatExp::Maybe(ref s) => Ok(constant_term(s)? + W::one()),
        RatExp::Plus(ref s) => {
            let c = constant_term(s)?;
            Ok(c.clone() * c.star()?)
        }
        RatExp::LeftWeight(ref w, ref s) => Ok(w.clone() * constant_term(s)?),
        RatExp::RightWeight(ref s, ref w) => Ok(constant_term(s)? * w.clone()),
    }
}

/// Breaks the expression into a polynomial: sums are flattened into
/// separate terms, with left factors split recursively through products.
pub fn split<A, W>(e: &RatExp<A, W>) -> Result<Polynomial<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    match *e {
        RatExp::Zero => {}
        RatExp::Sum(ref l, ref r) => {
            add_poly(&mut res, split(l)?);
            add_poly(&mut res, split(r)?);
        }
        RatExp::Prod(ref l, ref r) => {
            let mut left = split(l)?;
            let constant = left.shift_remove(&RatExp::One).unwrap_or_else(W::zero);
            add_poly(&mut res, rmul_exp_poly(left, r));
            add_poly(&mut res, lmul_poly(&constant, split(r)?));
        }
        RatExp::LeftWeight(ref w, ref s) => {
            add_poly(&mut res, lmul_poly(w, split(s)?));
        }
        RatExp::RightWeight(ref s, ref w) => {
            let inner = split(s)?;
            add_poly(&mut res, rmul_weight_poly(inner, w));
        }
        ref other => add_term(&mut res, other.clone(), W::one()),
    }
    Ok(res)
}

fn split_poly<A, W>(poly: Polynomial<A, W>) -> Result<Polynomial<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    for (e, c) in poly {
        add_poly(&mut res, lmul_poly(&c, split(&e)?));
    }
    Ok(res)
}

/// The derivative of `e` with respect to the letter `a`: a polynomial of
/// continuation expressions such that `e` denotes
/// `⟨c(e)⟩ε + Σ_a a·(∂_a e)`.
pub fn derivation<A, W>(e: &RatExp<A, W>, a: &A) -> Result<Polynomial<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut res = Polynomial::new();
    match *e {
        RatExp::Zero | RatExp::One => {}
        RatExp::Atom(ref b) => {
            if b == a {
                add_term(&mut res, RatExp::One, W::one());
            }
        }
        RatExp::Sum(ref l, ref r) => {
            add_poly(&mut res, derivation(l, a)?);
            add_poly(&mut res, derivation(r, a)?);
        }
        RatExp::Prod(ref l, ref r) => {
            add_poly(&mut res, rmul_exp_poly(derivation(l, a)?, r));
            let c = constant_term(l)?;
            add_poly(&mut res, lmul_poly(&c, derivation(r, a)?));
        }
        RatExp::Star(ref s) => {
            let c = constant_term(s)?.star()?;
            let tail = rmul_exp_poly(derivation(s, a)?, e);
            add_poly(&mut res, lmul_poly(&c, tail));
        }
        RatExp::Maybe(ref s) => {
            add_poly(&mut res, derivation(s, a)?);
        }
        RatExp::Plus(ref s) => {
            let c = constant_term(s)?.star()?;
            let star = RatExp::Star(s.clone());
            let tail = rmul_exp_poly(derivation(s, a)?, &star);
            add_poly(&mut res, lmul_poly(&c, tail));
        }
        RatExp::LeftWeight(ref w, ref s) => {
            add_poly(&mut res, lmul_poly(w, derivation(s, a)?));
        }
        RatExp::RightWeight(ref s, ref w) => {
            add_poly(&mut res, rmul_weight_poly(derivation(s, a)?, w));
        }
    }
    Ok(res)
}

/// The derived-term automaton: states are the distinct derived terms of
/// the expression, discovered by deriving letter by letter until the set
/// stabilizes.  With `breaking`, left factors that are sums are broken
/// apart first, which quotients further.
pub fn derived_term<A, W>(
    ctx: &Context<A, W>,
    exp: &RatExp<A, W>,
    breaking: bool,
    keep_history: bool,
) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let letters: Vec<A> = ctx.alphabet.letters().cloned().collect();
    let mut aut = Automaton::new(ctx.clone());
    let mut terms: HashIntegeriser<RatExp<A, W>> = HashIntegeriser::new();
    let mut states: Vec<State> = Vec::new();

    let initial = if breaking {
        split(exp)?
    } else {
        let mut p = Polynomial::new();
        add_term(&mut p, exp.clone(), W::one());
        p
    };
    for (e, w) in initial {
        let s = state_of(&mut aut, &mut terms, &mut states, e);
        aut.add_initial(s, w)?;
    }

    let mut next = 0;
    while next < terms.size() {
        let term = terms.find_value(next).unwrap().clone();
        let src = states[next];
        aut.set_final(src, constant_term(&term)?)?;
        for a in &letters {
            let mut der = derivation(&term, a)?;
            if breaking {
                der = split_poly(der)?;
            }
            for (e, w) in der {
                let dst = state_of(&mut aut, &mut terms, &mut states, e);
                aut.add_transition(src, dst, Label::Letter(a.clone()), w)?;
            }
        }
        next += 1;
    }

    if keep_history {
        for k in 0..terms.size() {
            let term = terms.find_value(k).unwrap();
            aut.set_history(states[k], History::Expression(print_exp(term)));
        }
    }
    Ok(aut)
}

fn state_of<A, W>(
    aut: &mut Automaton<A, W>,
    terms: &mut HashIntegeriser<RatExp<A, W>>,
    states: &mut Vec<State>,
    e: RatExp<A, W>,
) -> State
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let k = terms.integerise(e);
    while states.len() <= k {
        states.push(aut.add_state());
    }
    states[k]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::evaluate;
    use crate::ratexp::parse_exp;
    use crate::semiring::Boolean;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn constant_terms() {
        let ctx: Context<char, i64> = Context::from_chars("ab");
        for (text, expect) in &[("\\e", 1), ("a", 0), ("a?", 1), ("<3>\\e+a", 3)] {
            let e = parse_exp(&ctx, text, true).unwrap();
            assert_eq!(constant_term(&e).unwrap(), *expect, "constant term of {}", text);
        }
        let bad = parse_exp(&ctx, "(\\e)*", true).unwrap();
        assert!(constant_term(&bad).is_err());
    }

    #[test]
    fn derivatives_of_a_simple_expression() {
        let ctx: Context<char, Boolean> = Context::from_chars("ab");
        let e = parse_exp(&ctx, "a(a+b)*", true).unwrap();
        let d = derivation(&e, &'a').unwrap();
        assert_eq!(d.len(), 1);
        let rest = parse_exp(&ctx, "(a+b)*", true).unwrap();
        assert_eq!(d.get_index(0).unwrap().0, &rest);
        assert!(derivation(&e, &'b').unwrap().is_empty());
    }

    #[test]
    fn derived_terms_stabilize() {
        let ctx: Context<char, Boolean> = Context::from_chars("ab");
        let e = parse_exp(&ctx, "a(a+b)*", true).unwrap();
        let aut = derived_term(&ctx, &e, false, true).unwrap();
        // Two derived terms: the expression and (a+b)*.
        assert_eq!(aut.state_count(), 2);
        for (w, expect) in &[
            ("a", true),
            ("ab", true),
            ("aba", true),
            ("", false),
            ("b", false),
        ] {
            assert_eq!(
                evaluate(&aut, &word(w)).unwrap(),
                Boolean(*expect),
                "word {:?}",
                w
            );
        }
    }

    #[test]
    fn weighted_derived_terms() {
        let ctx: Context<char, i64> = Context::from_chars("a");
        let e = parse_exp(&ctx, "<2>a*", true).unwrap();
        let aut = derived_term(&ctx, &e, false, false).unwrap();
        assert_eq!(aut.state_count(), 1);
        assert_eq!(evaluate(&aut, &word("")).unwrap(), 1);
        assert_eq!(evaluate(&aut, &word("aa")).unwrap(), 4);
    }

    #[test]
    fn breaking_splits_sum_factors() {
        let ctx: Context<char, Boolean> = Context::from_chars("ab");
        let e = parse_exp(&ctx, "a+b", true).unwrap();
        let plain = derived_term(&ctx, &e, false, false).unwrap();
        let broken = derived_term(&ctx, &e, true, false).unwrap();
        // Breaking turns the initial state into one per summand.
        assert_eq!(plain.initial_states().len(), 1);
        assert_eq!(broken.initial_states().len(), 2);
        for w in &["", "a", "b", "ab"] {
            assert_eq!(
                evaluate(&plain, &word(w)).unwrap(),
                evaluate(&broken, &word(w)).unwrap(),
                "word {:?}",
                w
            );
        }
    }

    #[test]
    fn split_extracts_the_constant_part() {
        let ctx: Context<char, i64> = Context::from_chars("ab");
        // (<2>\e + a)b  splits into  <2>b + ab
        let e = parse_exp(&ctx, "(<2>\\e+a)b", true).unwrap();
        let p = split(&e).unwrap();
        assert_eq!(p.len(), 2);
        let ab = parse_exp(&ctx, "ab", true).unwrap();
        let b = parse_exp(&ctx, "b", true).unwrap();
        assert_eq!(p.get(&ab), Some(&1));
        assert_eq!(p.get(&b), Some(&2));
    }
}
