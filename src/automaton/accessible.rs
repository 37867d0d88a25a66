use std::collections::BTreeSet;

use crate::alphabet::Letter;
use crate::automaton::{Automaton, State};
use crate::semiring::Semiring;

/// The real states reachable from the initial states.
pub fn accessible_states<A, W>(aut: &Automaton<A, W>) -> BTreeSet<State>
where
    A: Letter,
    W: Semiring,
{
    let mut seen: BTreeSet<State> = BTreeSet::new();
    let mut todo: Vec<State> = aut.initial_states();
    while let Some(s) = todo.pop() {
        if !seen.insert(s) {
            continue;
        }
        for t in aut.outgoing(s) {
            let d = aut.dst_of(t);
            if !seen.contains(&d) {
                todo.push(d);
            }
        }
    }
    seen
}

/// The real states from which a final state is reachable.
pub fn coaccessible_states<A, W>(aut: &Automaton<A, W>) -> BTreeSet<State>
where
    A: Letter,
    W: Semiring,
{
    let mut seen: BTreeSet<State> = BTreeSet::new();
    let mut todo: Vec<State> = aut.final_states();
    while let Some(s) = todo.pop() {
        if !seen.insert(s) {
            continue;
        }
        for t in aut.incoming(s) {
            let p = aut.src_of(t);
            if !seen.contains(&p) {
                todo.push(p);
            }
        }
    }
    seen
}

pub fn is_trim<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    let acc = accessible_states(aut);
    let coacc = coaccessible_states(aut);
    aut.states().into_iter().all(|s| acc.contains(&s) && coacc.contains(&s))
}

/// Removes every state that is not both accessible and coaccessible,
/// in place.
pub fn trim<A, W>(aut: &mut Automaton<A, W>)
where
    A: Letter,
    W: Semiring,
{
    let acc = accessible_states(aut);
    let coacc = coaccessible_states(aut);
    for s in aut.states() {
        if !(acc.contains(&s) && coacc.contains(&s)) {
            aut.del_state(s).unwrap();
        }
    }
}
