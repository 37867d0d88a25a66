use num_traits::One;
use rand::Rng;

use crate::alphabet::{Alphabet, Label, Letter};
use crate::automaton::Automaton;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::semiring::{Boolean, Semiring};

/// The automaton over digit letters `0..base` accepting the numbers
/// divisible by `k` written in base `base`; state `i` stands for the
/// residue `i` modulo `k`.
pub fn divkbaseb<W: Semiring>(k: usize, base: usize) -> Result<Automaton<char, W>> {
    if k == 0 || base < 2 || base > 10 {
        return Err(Error::Precondition(
            "divkbaseb requires k > 0 and 2 <= base <= 10".to_string(),
        ));
    }
    let digits: String = (0..base)
        .map(|d| ::std::char::from_digit(d as u32, 10).unwrap())
        .collect();
    let ctx = Context::new(Alphabet::chars(&digits));
    let mut aut = Automaton::new(ctx);
    let states: Vec<_> = (0..k).map(|_| aut.add_state()).collect();
    aut.set_initial(states[0], W::one())?;
    aut.set_final(states[0], W::one())?;
    for i in 0..k {
        for d in 0..base {
            let j = (i * base + d) % k;
            let label = Label::Letter(::std::char::from_digit(d as u32, 10).unwrap());
            aut.add_transition(states[i], states[j], label, W::one())?;
        }
    }
    Ok(aut)
}

/// The double ring over `{a, b}`: `a` moves clockwise through the `n`
/// states, `b` moves back.  States listed in `finals` are final.
pub fn double_ring<W: Semiring>(n: usize, finals: &[usize]) -> Result<Automaton<char, W>> {
    if n == 0 {
        return Err(Error::Precondition("double_ring requires n > 0".to_string()));
    }
    let ctx = Context::from_chars("ab");
    let mut aut = Automaton::new(ctx);
    let states: Vec<_> = (0..n).map(|_| aut.add_state()).collect();
    aut.set_initial(states[0], W::one())?;
    for &f in finals {
        if f >= n {
            return Err(Error::Precondition(format!(
                "final state {} is outside the ring",
                f
            )));
        }
        aut.set_final(states[f], W::one())?;
    }
    for i in 0..n {
        aut.add_transition(states[i], states[(i + 1) % n], Label::Letter('a'), W::one())?;
        aut.add_transition(states[(i + 1) % n], states[i], Label::Letter('b'), W::one())?;
    }
    Ok(aut)
}

/// Ladybird(n), the classical worst case of determinization: every
/// nonempty subset of its `n` states is reachable in the subset
/// automaton.
pub fn ladybird(n: usize) -> Result<Automaton<char, Boolean>> {
    if n == 0 {
        return Err(Error::Precondition("ladybird requires n > 0".to_string()));
    }
    let ctx = Context::from_chars("abc");
    let mut aut = Automaton::new(ctx);
    let states: Vec<_> = (0..n).map(|_| aut.add_state()).collect();
    let one = Boolean::one();
    aut.set_initial(states[0], one)?;
    aut.set_final(states[0], one)?;
    for i in 0..n {
        aut.add_transition(states[i], states[(i + 1) % n], Label::Letter('a'), one)?;
    }
    for i in 1..n {
        aut.add_transition(states[i], states[i], Label::Letter('b'), one)?;
        aut.add_transition(states[i], states[i], Label::Letter('c'), one)?;
        aut.add_transition(states[i], states[0], Label::Letter('c'), one)?;
    }
    Ok(aut)
}

/// A random boolean automaton over `alphabet`: `n` states, each pair
/// connected per letter with probability `density`, one random initial
/// and one random final state.
pub fn random_automaton<R: Rng>(
    rng: &mut R,
    alphabet: Alphabet<char>,
    n: usize,
    density: f64,
) -> Result<Automaton<char, Boolean>> {
    if n == 0 || !(0.0..=1.0).contains(&density) {
        return Err(Error::Precondition(
            "random_automaton requires n > 0 and density in [0,1]".to_string(),
        ));
    }
    let letters: Vec<char> = alphabet.letters().cloned().collect();
    let ctx = Context::new(alphabet);
    let mut aut = Automaton::new(ctx);
    let states: Vec<_> = (0..n).map(|_| aut.add_state()).collect();
    aut.set_initial(states[rng.gen_range(0..n)], Boolean::one())?;
    aut.set_final(states[rng.gen_range(0..n)], Boolean::one())?;
    for &src in &states {
        for &dst in &states {
            for &a in &letters {
                if rng.gen_bool(density) {
                    aut.add_transition(src, dst, Label::Letter(a), Boolean::one())?;
                }
            }
        }
    }
    Ok(aut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::evaluate;
    use crate::determinize::determinize;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn divisibility_by_three_in_base_two() {
        let aut = divkbaseb::<Boolean>(3, 2).unwrap();
        for (text, n) in &[("0", 0), ("11", 3), ("110", 6), ("111", 7), ("1", 1)] {
            assert_eq!(
                evaluate(&aut, &word(text)).unwrap(),
                Boolean(n % 3 == 0),
                "number {}",
                n
            );
        }
    }

    #[test]
    fn ladybird_blows_up_under_determinization() {
        // Every nonempty subset of the 4 states is reachable.
        let aut = ladybird(4).unwrap();
        let det = determinize(&aut, false).unwrap();
        assert_eq!(det.state_count(), 15);
    }

    #[test]
    fn double_ring_walks_both_ways() {
        let aut = double_ring::<Boolean>(4, &[1]).unwrap();
        assert_eq!(evaluate(&aut, &word("a")).unwrap(), Boolean(true));
        assert_eq!(evaluate(&aut, &word("bbb")).unwrap(), Boolean(true));
        assert_eq!(evaluate(&aut, &word("b")).unwrap(), Boolean(false));
    }
}
