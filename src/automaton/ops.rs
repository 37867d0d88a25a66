use std::collections::HashMap;

use num_traits::Zero;

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, State};
use crate::error::Result;
use crate::semiring::Semiring;

/// The disjoint union of two automata over the same context: the sum of
/// the realized series.
pub fn sum<A, W>(lhs: &Automaton<A, W>, rhs: &Automaton<A, W>) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    lhs.context().check_compatible(rhs.context())?;
    let (mut out, _) = super::copy(lhs);
    let mut map: HashMap<State, State> = HashMap::new();
    for s in rhs.states() {
        map.insert(s, out.add_state());
    }
    for t in rhs.transitions() {
        let tr = rhs.transition(t);
        out.add_transition(map[&tr.src], map[&tr.dst], tr.label.clone(), tr.weight.clone())?;
    }
    for s in rhs.states() {
        let iw = rhs.initial_weight(s);
        if !iw.is_zero() {
            out.add_initial(map[&s], iw)?;
        }
        let fw = rhs.final_weight(s);
        if !fw.is_zero() {
            out.add_final(map[&s], fw)?;
        }
    }
    Ok(out)
}

/// The synchronized product: paths advance through both operands on the
/// same letters, with weights multiplied.  Realizes the Hadamard product
/// of the series when the weights commute.
pub fn product<A, W>(lhs: &Automaton<A, W>, rhs: &Automaton<A, W>) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    lhs.context().check_compatible(rhs.context())?;
    let mut out = Automaton::new(lhs.context().clone());
    let mut map: HashMap<(State, State), State> = HashMap::new();
    let mut todo: Vec<(State, State)> = Vec::new();

    for l in lhs.states() {
        let lw = lhs.initial_weight(l);
        if lw.is_zero() {
            continue;
        }
        for r in rhs.states() {
            let rw = rhs.initial_weight(r);
            if rw.is_zero() {
                continue;
            }
            let s = *map.entry((l, r)).or_insert_with(|| out.add_state());
            out.add_initial(s, lw.clone() * rw)?;
            todo.push((l, r));
        }
    }

    let mut done: Vec<(State, State)> = Vec::new();
    while let Some((l, r)) = todo.pop() {
        if done.contains(&(l, r)) {
            continue;
        }
        done.push((l, r));
        let src = map[&(l, r)];

        let fw = lhs.final_weight(l) * rhs.final_weight(r);
        if !fw.is_zero() {
            out.set_final(src, fw)?;
        }

        for tl in lhs.outgoing(l) {
            let ltr = lhs.transition(tl);
            for tr in rhs.outgoing_with_label(r, &ltr.label) {
                let rtr = rhs.transition(tr);
                let pair = (ltr.dst, rtr.dst);
                let dst = match map.get(&pair) {
                    Some(&s) => s,
                    None => {
                        let s = out.add_state();
                        map.insert(pair, s);
                        todo.push(pair);
                        s
                    }
                };
                out.add_transition(
                    src,
                    dst,
                    ltr.label.clone(),
                    ltr.weight.clone() * rtr.weight.clone(),
                )?;
            }
        }
    }
    Ok(out)
}

/// The mirror automaton: transitions reversed, initial and final weights
/// exchanged, labels and weights transposed.
pub fn transpose<A, W>(aut: &Automaton<A, W>) -> Automaton<A, W>
where
    A: Letter,
    W: Semiring,
{
    let mut out = Automaton::new(aut.context().clone());
    let mut map: HashMap<State, State> = HashMap::new();
    for s in aut.states() {
        map.insert(s, out.add_state());
    }
    for t in aut.transitions() {
        let tr = aut.transition(t);
        out.add_transition(
            map[&tr.dst],
            map[&tr.src],
            tr.label.transpose(),
            tr.weight.transpose_val(),
        )
        .unwrap();
    }
    for s in aut.states() {
        let iw = aut.initial_weight(s);
        if !iw.is_zero() {
            out.set_final(map[&s], iw.transpose_val()).unwrap();
        }
        let fw = aut.final_weight(s);
        if !fw.is_zero() {
            out.set_initial(map[&s], fw.transpose_val()).unwrap();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::evaluate;
    use crate::context::Context;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn single_letter(letter: char, weight: i64) -> Automaton<char, i64> {
        let mut aut = Automaton::new(Context::from_chars("ab"));
        let i = aut.add_state();
        let f = aut.add_state();
        aut.set_initial(i, 1).unwrap();
        aut.set_final(f, 1).unwrap();
        aut.add_transition(i, f, Label::Letter(letter), weight).unwrap();
        aut
    }

    #[test]
    fn sum_adds_series() {
        let aut = sum(&single_letter('a', 2), &single_letter('a', 3)).unwrap();
        assert_eq!(evaluate(&aut, &word("a")).unwrap(), 5);
        assert_eq!(evaluate(&aut, &word("b")).unwrap(), 0);
    }

    #[test]
    fn product_multiplies_series() {
        let aut = product(&single_letter('a', 2), &single_letter('a', 3)).unwrap();
        assert_eq!(evaluate(&aut, &word("a")).unwrap(), 6);
        assert_eq!(evaluate(&aut, &word("b")).unwrap(), 0);
    }

    #[test]
    fn transpose_reverses_words() {
        let mut aut: Automaton<char, i64> = Automaton::new(Context::from_chars("ab"));
        let i = aut.add_state();
        let m = aut.add_state();
        let f = aut.add_state();
        aut.set_initial(i, 1).unwrap();
        aut.set_final(f, 1).unwrap();
        aut.add_transition(i, m, Label::Letter('a'), 1).unwrap();
        aut.add_transition(m, f, Label::Letter('b'), 1).unwrap();

        let rev = transpose(&aut);
        assert_eq!(evaluate(&rev, &word("ba")).unwrap(), 1);
        assert_eq!(evaluate(&rev, &word("ab")).unwrap(), 0);
    }
}
