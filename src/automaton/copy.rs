use std::collections::HashMap;

use crate::alphabet::Letter;
use crate::automaton::{Automaton, State, POST, PRE};
use crate::semiring::Semiring;

/// Rebuilds `aut` into a fresh automaton with dense state numbering and
/// returns it together with the input→output state map.
///
/// `Clone` preserves state indices verbatim; `copy` is the variant the
/// transformation algorithms use when they need an explicit map.
pub fn copy<A, W>(aut: &Automaton<A, W>) -> (Automaton<A, W>, HashMap<State, State>)
where
    A: Letter,
    W: Semiring,
{
    let mut out = Automaton::new(aut.context().clone());
    let mut map: HashMap<State, State> = HashMap::new();
    map.insert(PRE, PRE);
    map.insert(POST, POST);
    for s in aut.states() {
        map.insert(s, out.add_state());
    }
    for t in aut.all_transitions() {
        let tr = aut.transition(t);
        out.add_transition(map[&tr.src], map[&tr.dst], tr.label.clone(), tr.weight.clone())
            .unwrap();
    }
    for s in aut.states() {
        if let Some(h) = aut.history(s) {
            out.set_history(map[&s], h.clone());
        }
    }
    (out, map)
}
