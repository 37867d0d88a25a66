use std::collections::HashSet;

use num_traits::One;

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, State};
use crate::error::{Error, Result};
use crate::semiring::{Semiring, StarStatus};

/// Whether the automaton carries no epsilon transition.
pub fn is_proper<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    aut.transitions().into_iter().all(|t| !aut.label_of(t).is_one())
}

/// Whether the subgraph of epsilon transitions is acyclic.
pub fn is_eps_acyclic<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    let mut done: HashSet<State> = HashSet::new();
    let mut path: HashSet<State> = HashSet::new();
    for start in aut.states() {
        if done.contains(&start) {
            continue;
        }
        if has_eps_cycle(aut, start, &mut done, &mut path) {
            return false;
        }
    }
    true
}

fn has_eps_cycle<A, W>(
    aut: &Automaton<A, W>,
    s: State,
    done: &mut HashSet<State>,
    path: &mut HashSet<State>,
) -> bool
where
    A: Letter,
    W: Semiring,
{
    if path.contains(&s) {
        return true;
    }
    if done.contains(&s) {
        return false;
    }
    path.insert(s);
    for t in aut.outgoing_with_label(s, &Label::One) {
        if has_eps_cycle(aut, aut.dst_of(t), done, path) {
            return true;
        }
    }
    path.remove(&s);
    done.insert(s);
    false
}

/// The in-place backward epsilon removal.
///
/// States are eliminated one by one.  For a state `s` with incoming
/// epsilon transitions: the epsilon loop on `s` (a single transition,
/// parallel epsilon edges having been summed at insertion) is replaced by
/// the star of its weight, blown into every outgoing transition of `s`;
/// then every incoming epsilon transition `p --e|h--> s` is rerouted as
/// `p --a|h·w*·k--> q` for each outgoing `s --a|k--> q`, final edges
/// included.  A star outside its domain fails with an algebra error and
/// leaves the automaton corrupted, which is why the public entry points
/// operate on copies or validate first.
///
/// With `prune`, states left unreachable are deleted.
pub fn in_situ_remover<A, W>(aut: &mut Automaton<A, W>, prune: bool) -> Result<()>
where
    A: Letter,
    W: Semiring,
{
    loop {
        let todo = eliminable_state(aut);
        let s = match todo {
            None => break,
            Some(s) => s,
        };

        // The star of the loop weight, 1 when there is no loop.
        let mut star = W::one();
        let mut closure: Vec<(State, W)> = Vec::new();
        for t in aut.incoming_with_label(s, &Label::One) {
            let src = aut.src_of(t);
            let weight = aut.weight_of(t);
            if src == s {
                star = weight.star()?;
            } else {
                closure.push((src, weight));
            }
            aut.del_transition(t)?;
        }

        for t in aut.all_outgoing(s) {
            let label = aut.label_of(t).clone();
            let dst = aut.dst_of(t);
            let blow = star.clone() * aut.weight_of(t);
            aut.set_weight(t, blow.clone())?;
            for &(src, ref h) in &closure {
                aut.add_transition(src, dst, label.clone(), h.clone() * blow.clone())?;
            }
        }

        if prune && aut.all_incoming(s).is_empty() {
            aut.del_state(s)?;
        }
    }
    Ok(())
}

/// The next state with incoming epsilon transitions, preferring states
/// that are cheap to eliminate: few outgoing epsilon transitions, then few
/// outgoing transitions, then few incoming epsilon transitions.
fn eliminable_state<A, W>(aut: &Automaton<A, W>) -> Option<State>
where
    A: Letter,
    W: Semiring,
{
    let mut best: Option<(usize, usize, usize, State)> = None;
    for s in aut.states() {
        let in_eps = aut.incoming_with_label(s, &Label::One).len();
        if in_eps == 0 {
            continue;
        }
        let out_eps = aut.outgoing_with_label(s, &Label::One).len();
        let out = aut.all_outgoing(s).len();
        let profile = (out_eps, out, in_eps, s);
        if best.map_or(true, |b| profile < b) {
            best = Some(profile);
        }
    }
    best.map(|(_, _, _, s)| s)
}

/// Whether the epsilon closure of `aut` is summable, decided by the star
/// status of the weight semiring.  Works on a disposable copy; the input
/// is never mutated.
pub fn is_valid<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    match W::star_status() {
        StarStatus::Starrable => true,
        StarStatus::NonStarrable => is_proper(aut) || is_eps_acyclic(aut),
        StarStatus::Tops => {
            is_proper(aut) || is_eps_acyclic(aut) || {
                let mut probe = aut.clone();
                in_situ_remover(&mut probe, false).is_ok()
            }
        }
        StarStatus::Absval => {
            is_proper(aut) || is_eps_acyclic(aut) || {
                let mut probe = absval_copy(aut);
                in_situ_remover(&mut probe, false).is_ok()
            }
        }
    }
}

/// A copy with every weight replaced by its absolute value, the
/// finiteness probe for `Absval` semirings.
fn absval_copy<A, W>(aut: &Automaton<A, W>) -> Automaton<A, W>
where
    A: Letter,
    W: Semiring,
{
    let mut res = aut.clone();
    for t in res.all_transitions() {
        let w = res.weight_of(t).abs_val();
        res.set_weight(t, w).unwrap();
    }
    res
}

/// Eliminates the epsilon transitions in place.  Fails with a validity
/// error when the automaton is invalid for its star status.
pub fn proper_here<A, W>(aut: &mut Automaton<A, W>, prune: bool) -> Result<()>
where
    A: Letter,
    W: Semiring,
{
    if is_proper(aut) {
        return Ok(());
    }
    match W::star_status() {
        StarStatus::Starrable => in_situ_remover(aut, prune),
        StarStatus::Tops => in_situ_remover(aut, prune)
            .map_err(|_| Error::Validity("the epsilon closure is not summable".to_string())),
        StarStatus::NonStarrable | StarStatus::Absval => {
            if !is_valid(aut) {
                return Err(Error::Validity(
                    "the epsilon closure is not summable".to_string(),
                ));
            }
            in_situ_remover(aut, prune)
        }
    }
}

/// Copy-based epsilon elimination; the input automaton is left untouched.
pub fn proper<A, W>(aut: &Automaton<A, W>, prune: bool) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let mut res = aut.clone();
    proper_here(&mut res, prune)?;
    Ok(res)
}
