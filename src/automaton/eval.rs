use num_traits::Zero;

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, PRE};
use crate::error::{Error, Result};
use crate::semiring::Semiring;

/// The weight of `word` in the series realized by `aut`: the sum over all
/// accepting paths labeled by `word` of the product of initial weight,
/// transition weights and final weight.
///
/// Letters outside the automaton's alphabet are rejected.  An automaton
/// with epsilon transitions is evaluated through a propered copy and
/// fails if it is not valid.
pub fn evaluate<A, W>(aut: &Automaton<A, W>, word: &[A]) -> Result<W>
where
    A: Letter,
    W: Semiring,
{
    if !crate::proper::is_proper(aut) {
        let cleaned = crate::proper::proper(aut, true)?;
        return evaluate(&cleaned, word);
    }
    for a in word {
        if !aut.context().alphabet.contains(a) {
            return Err(Error::Structural(format!(
                "the word contains the unexpected letter `{}`",
                a
            )));
        }
    }

    // One weight slot per allocated state id; most algorithms keep ids
    // dense enough for this to be cheap.
    let size = aut.max_state() + 1;
    let mut current: Vec<W> = vec![W::zero(); size];
    for t in aut.initial_transitions() {
        current[aut.dst_of(t)] = aut.weight_of(t);
    }

    let mut next: Vec<W> = vec![W::zero(); size];
    for a in word {
        for w in next.iter_mut() {
            *w = W::zero();
        }
        for s in 0..size {
            if s == PRE || current[s].is_zero() {
                continue;
            }
            for t in aut.outgoing_with_label(s, &Label::Letter(a.clone())) {
                let dst = aut.dst_of(t);
                next[dst] = next[dst].clone() + current[s].clone() * aut.weight_of(t);
            }
        }
        ::std::mem::swap(&mut current, &mut next);
    }

    let mut result = W::zero();
    for t in aut.final_transitions() {
        let s = aut.src_of(t);
        if !current[s].is_zero() {
            result = result + current[s].clone() * aut.weight_of(t);
        }
    }
    Ok(result)
}
