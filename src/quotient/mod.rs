use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use indexmap::IndexMap;
use num_traits::Zero;

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, History, State, POST, PRE};
use crate::error::{Error, Result};
use crate::semiring::Semiring;

/// Moore partition refinement on a weighted automaton.
///
/// The partition starts as `{pre} | {post} | {everything else}` and is
/// refined round by round: the signature of a state is the multiset of
/// `(label, destination part, summed weight)` triples over its outgoing
/// transitions (the pre/post edges included, so equal final weight is part
/// of the congruence).  Signatures are grouped with two successive linear
/// passes over insertion-ordered maps rather than a comparison sort; the
/// grouping is amortized linear.
///
/// Returns the final parts, each a list of equivalent states.  Part 0 is
/// `{pre}` and part 1 is `{post}`.
pub fn moore_quotient<A, W>(aut: &Automaton<A, W>) -> Vec<Vec<State>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut parts: Vec<Vec<State>> = vec![vec![PRE], vec![POST], aut.states()];
    let mut part_of: Vec<usize> = vec![2; aut.max_state() + 1];
    part_of[PRE] = 0;
    part_of[POST] = 1;

    // Only parts with at least two states can split.  Part id 0 doubles
    // as the end-of-round marker; the real part 0 is the {pre} singleton
    // and never enters the queue.
    let mut queue: VecDeque<usize> = VecDeque::new();
    if parts[2].len() > 1 {
        queue.push_back(2);
    }
    queue.push_back(0);
    let mut stop = true;

    while let Some(i) = queue.pop_front() {
        if i == 0 {
            // End of a round: if nothing split since the previous marker,
            // the partition is stable.
            if stop {
                break;
            }
            stop = true;
            queue.push_back(0);
            continue;
        }

        let mut without_successors: Vec<State> = Vec::new();

        // First pass: bucket outgoing transitions by label.
        let mut meet: IndexMap<Label<A>, Vec<(State, W, usize)>> = IndexMap::new();
        for &s in &parts[i] {
            let outgoing = aut.all_outgoing(s);
            if outgoing.is_empty() {
                without_successors.push(s);
                continue;
            }
            for t in outgoing {
                meet.entry(aut.label_of(t).clone()).or_insert_with(Vec::new).push((
                    s,
                    aut.weight_of(t),
                    part_of[aut.dst_of(t)],
                ));
            }
        }
        if meet.is_empty() {
            continue;
        }

        // Second pass: re-bucket by destination part, then assemble the
        // signatures, summing weights of equal (label, part) tails.
        let mut meet2: IndexMap<usize, Vec<(State, W, Label<A>)>> = IndexMap::new();
        for (label, triples) in meet {
            for (s, w, part) in triples {
                meet2.entry(part).or_insert_with(Vec::new).push((s, w, label.clone()));
            }
        }

        let mut signature: IndexMap<State, Vec<(Label<A>, usize, W)>> = IndexMap::new();
        for (part, triples) in meet2 {
            for (s, w, label) in triples {
                let sig = signature.entry(s).or_insert_with(Vec::new);
                match sig.last_mut() {
                    Some(last) if last.0 == label && last.1 == part => {
                        last.2 = last.2.clone() + w;
                    }
                    _ => sig.push((label, part, w)),
                }
            }
        }

        // Radix grouping over the signature entries, taken from the back.
        let mut new_parts: Vec<Vec<State>> = Vec::new();
        let mut groups: VecDeque<Vec<State>> = VecDeque::new();
        groups.push_back(signature.keys().cloned().collect());
        while let Some(group) = groups.pop_front() {
            let mut exhausted: Vec<State> = Vec::new();
            let mut by_entry: IndexMap<(Label<A>, usize, W), Vec<State>> = IndexMap::new();
            for s in group {
                let sig = signature.get_mut(&s).unwrap();
                match sig.pop() {
                    None => exhausted.push(s),
                    Some(entry) => by_entry.entry(entry).or_insert_with(Vec::new).push(s),
                }
            }
            for (_, same) in by_entry {
                groups.push_back(same);
            }
            if !exhausted.is_empty() {
                new_parts.push(exhausted);
            }
        }

        if new_parts.len() <= 1 {
            // The signatures did not split; states without any outgoing
            // transition still differ from the rest of the part.
            if new_parts.len() == 1 && !without_successors.is_empty() {
                split_part(
                    &mut parts,
                    &mut part_of,
                    &mut queue,
                    i,
                    vec![new_parts.remove(0), without_successors],
                );
                stop = false;
            } else {
                queue.push_back(i);
            }
            continue;
        }

        stop = false;
        if !without_successors.is_empty() {
            new_parts.push(without_successors);
        }
        split_part(&mut parts, &mut part_of, &mut queue, i, new_parts);
    }

    parts
}

fn split_part(
    parts: &mut Vec<Vec<State>>,
    part_of: &mut Vec<usize>,
    queue: &mut VecDeque<usize>,
    i: usize,
    mut new_parts: Vec<Vec<State>>,
) {
    for (k, group) in new_parts.drain(..).enumerate() {
        let p = if k == 0 {
            parts[i] = group;
            i
        } else {
            let p = parts.len();
            for &s in &group {
                part_of[s] = p;
            }
            parts.push(group);
            p
        };
        if parts[p].len() > 1 {
            queue.push_back(p);
        }
    }
}

/// Merges each part into its first state, keeping only that state's
/// outgoing transitions.  The parts must cover every live state; the two
/// virtual parts map back onto `pre` and `post`.
pub fn merge<A, W>(
    aut: &Automaton<A, W>,
    parts: &[Vec<State>],
    keep_history: bool,
) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let mut state_of_part: Vec<State> = Vec::with_capacity(parts.len());
    let mut part_of: HashMap<State, usize> = HashMap::new();
    let mut out = Automaton::new(aut.context().clone());

    for (c, part) in parts.iter().enumerate() {
        let first = *part
            .first()
            .ok_or_else(|| Error::Structural("empty part in a partition".to_string()))?;
        for &s in part {
            part_of.insert(s, c);
        }
        let rep = if first == PRE {
            PRE
        } else if first == POST {
            POST
        } else {
            out.add_state()
        };
        state_of_part.push(rep);
    }

    for s in aut.all_states() {
        if !part_of.contains_key(&s) {
            return Err(Error::Structural(format!(
                "state {} is missing from the partition",
                s
            )));
        }
    }

    for (c, part) in parts.iter().enumerate() {
        let first = part[0];
        let src = state_of_part[c];
        for t in aut.all_outgoing(first) {
            let dst = state_of_part[part_of[&aut.dst_of(t)]];
            out.add_transition(src, dst, aut.label_of(t).clone(), aut.weight_of(t))?;
        }
    }

    if keep_history {
        for (c, part) in parts.iter().enumerate() {
            let rep = state_of_part[c];
            if rep != PRE && rep != POST {
                out.set_history(rep, History::Subset(part.clone()));
            }
        }
    }
    Ok(out)
}

/// The minimal quotient: Moore refinement followed by the merge.
pub fn min_quotient<A, W>(aut: &Automaton<A, W>, keep_history: bool) -> Automaton<A, W>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let parts = moore_quotient(aut);
    // A partition computed by moore_quotient always merges cleanly.
    merge(aut, &parts, keep_history).unwrap()
}

/// Whether `parts` is a congruence of `aut`: inside every part, all states
/// must agree with the part's first state on the summed weight towards
/// every `(label, destination part)`, the final weights included through
/// the edge to the `{post}` part.
pub fn is_congruence<A, W>(aut: &Automaton<A, W>, parts: &[Vec<State>]) -> bool
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    let mut part_of: HashMap<State, usize> = HashMap::new();
    for (c, part) in parts.iter().enumerate() {
        for &s in part {
            part_of.insert(s, c);
        }
    }
    for s in aut.all_states() {
        if !part_of.contains_key(&s) {
            return false;
        }
    }

    let signature = |s: State| -> HashMap<(Label<A>, usize), W> {
        let mut sig: HashMap<(Label<A>, usize), W> = HashMap::new();
        for t in aut.all_outgoing(s) {
            let key = (aut.label_of(t).clone(), part_of[&aut.dst_of(t)]);
            let w = match sig.remove(&key) {
                Some(v) => v + aut.weight_of(t),
                None => aut.weight_of(t),
            };
            if !w.is_zero() {
                sig.insert(key, w);
            }
        }
        sig
    };

    for part in parts {
        if part.is_empty() {
            return false;
        }
        let reference = signature(part[0]);
        for &s in &part[1..] {
            if signature(s) != reference {
                return false;
            }
        }
    }
    true
}

/// `is_congruence` as a check that fails with a validity error.
pub fn check_congruence<A, W>(aut: &Automaton<A, W>, parts: &[Vec<State>]) -> Result<()>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    if is_congruence(aut, parts) {
        Ok(())
    } else {
        Err(Error::Validity(
            "the given partition is not a congruence".to_string(),
        ))
    }
}
