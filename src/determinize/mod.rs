use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use bit_set::BitSet;
use num_traits::{One, Zero};

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, History, State};
use crate::error::{Error, Result};
use crate::semiring::{Boolean, Semiring};

/// Largest state index for which subsets are accumulated in fixed-width
/// bit vectors; beyond it the ordered-set engine takes over.  The choice
/// only affects performance, never the result.
const BITSET_LIMIT: usize = 128;

fn check_proper_input<A: Letter, W: Semiring>(aut: &Automaton<A, W>) -> Result<()> {
    for t in aut.transitions() {
        if aut.label_of(t).is_one() {
            return Err(Error::Structural(
                "determinization requires a proper automaton; eliminate epsilon transitions first"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

/// Whether at most one initial state exists and no state carries two
/// transitions with the same letter.  Weights are not considered.
pub fn is_deterministic<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    if aut.initial_states().len() > 1 {
        return false;
    }
    for s in aut.states() {
        let mut seen: BTreeSet<&Label<A>> = BTreeSet::new();
        for t in aut.outgoing(s) {
            if !seen.insert(aut.label_of(t)) {
                return false;
            }
        }
    }
    true
}

/// Subset construction for boolean automata.
///
/// Output states are created lazily, the first time a subset of input
/// states is discovered; a map from subsets to output states prevents
/// duplicates.  Subsets are accumulated in a bit vector while the largest
/// state id fits [`BITSET_LIMIT`], in an ordered set otherwise.
pub fn determinize<A>(
    aut: &Automaton<A, Boolean>,
    keep_history: bool,
) -> Result<Automaton<A, Boolean>>
where
    A: Letter,
{
    check_proper_input(aut)?;
    if aut.max_state() <= BITSET_LIMIT {
        determinize_bitset(aut, keep_history)
    } else {
        determinize_set(aut, keep_history)
    }
}

fn output_state<A: Letter>(
    out: &mut Automaton<A, Boolean>,
    map: &mut HashMap<Vec<State>, State>,
    todo: &mut Vec<Vec<State>>,
    finals: &BTreeSet<State>,
    subset: Vec<State>,
) -> State {
    match map.get(&subset) {
        Some(&s) => s,
        None => {
            let s = out.add_state();
            if subset.iter().any(|q| finals.contains(q)) {
                out.set_final(s, Boolean::one()).unwrap();
            }
            map.insert(subset.clone(), s);
            todo.push(subset);
            s
        }
    }
}

fn determinize_bitset<A>(
    aut: &Automaton<A, Boolean>,
    keep_history: bool,
) -> Result<Automaton<A, Boolean>>
where
    A: Letter,
{
    let mut out = Automaton::new(aut.context().clone());
    let finals: BTreeSet<State> = aut.final_states().into_iter().collect();
    let mut map: HashMap<Vec<State>, State> = HashMap::new();
    let mut todo: Vec<Vec<State>> = Vec::new();

    let mut start = BitSet::with_capacity(aut.max_state() + 1);
    for s in aut.initial_states() {
        start.insert(s);
    }
    let start: Vec<State> = start.iter().collect();
    let first = output_state(&mut out, &mut map, &mut todo, &finals, start);
    out.set_initial(first, Boolean::one())?;

    while let Some(subset) = todo.pop() {
        let src = map[&subset];
        let mut dests: BTreeMap<A, BitSet> = BTreeMap::new();
        for &s in &subset {
            for t in aut.outgoing(s) {
                if let Label::Letter(ref a) = *aut.label_of(t) {
                    dests
                        .entry(a.clone())
                        .or_insert_with(BitSet::new)
                        .insert(aut.dst_of(t));
                }
            }
        }
        for (a, set) in dests {
            let target: Vec<State> = set.iter().collect();
            let dst = output_state(&mut out, &mut map, &mut todo, &finals, target);
            out.add_transition(src, dst, Label::Letter(a), Boolean::one())?;
        }
    }

    if keep_history {
        for (subset, s) in map {
            out.set_history(s, History::Subset(subset));
        }
    }
    Ok(out)
}

fn determinize_set<A>(
    aut: &Automaton<A, Boolean>,
    keep_history: bool,
) -> Result<Automaton<A, Boolean>>
where
    A: Letter,
{
    let mut out = Automaton::new(aut.context().clone());
    let finals: BTreeSet<State> = aut.final_states().into_iter().collect();
    let mut map: HashMap<Vec<State>, State> = HashMap::new();
    let mut todo: Vec<Vec<State>> = Vec::new();

    let start: BTreeSet<State> = aut.initial_states().into_iter().collect();
    let start: Vec<State> = start.into_iter().collect();
    let first = output_state(&mut out, &mut map, &mut todo, &finals, start);
    out.set_initial(first, Boolean::one())?;

    while let Some(subset) = todo.pop() {
        let src = map[&subset];
        let mut dests: BTreeMap<A, BTreeSet<State>> = BTreeMap::new();
        for &s in &subset {
            for t in aut.outgoing(s) {
                if let Label::Letter(ref a) = *aut.label_of(t) {
                    dests
                        .entry(a.clone())
                        .or_insert_with(BTreeSet::new)
                        .insert(aut.dst_of(t));
                }
            }
        }
        for (a, set) in dests {
            let target: Vec<State> = set.into_iter().collect();
            let dst = output_state(&mut out, &mut map, &mut todo, &finals, target);
            out.add_transition(src, dst, Label::Letter(a), Boolean::one())?;
        }
    }

    if keep_history {
        for (subset, s) in map {
            out.set_history(s, History::Subset(subset));
        }
    }
    Ok(out)
}

/// A weighted combination of input states, kept sorted by state so that
/// algebraically equal combinations compare equal.
type Combination<W> = Vec<(State, W)>;

fn canonical<W: Semiring>(map: BTreeMap<State, W>) -> Combination<W> {
    map.into_iter().filter(|(_, w)| !w.is_zero()).collect()
}

struct WeightedEngine<'a, A: Letter, W: Semiring> {
    aut: &'a Automaton<A, W>,
    out: Automaton<A, W>,
    map: HashMap<Combination<W>, State>,
    todo: Vec<(Combination<W>, usize)>,
}

impl<'a, A, W> WeightedEngine<'a, A, W>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    fn new(aut: &'a Automaton<A, W>) -> Self {
        WeightedEngine {
            aut,
            out: Automaton::new(aut.context().clone()),
            map: HashMap::new(),
            todo: Vec::new(),
        }
    }

    /// The output state for `name`; newly discovered combinations are
    /// scheduled for exploration and receive their final weight
    /// `Σ v_s · final(s)` immediately.
    fn state(&mut self, name: Combination<W>, depth: usize) -> State {
        match self.map.get(&name) {
            Some(&s) => s,
            None => {
                let s = self.out.add_state();
                let mut fw = W::zero();
                for &(q, ref v) in &name {
                    fw = fw + v.clone() * self.aut.final_weight(q);
                }
                if !fw.is_zero() {
                    self.out.set_final(s, fw).unwrap();
                }
                self.map.insert(name.clone(), s);
                self.todo.push((name, depth));
                s
            }
        }
    }

    fn run<P>(mut self, limit: Option<usize>, accept: P, keep_history: bool) -> Result<Automaton<A, W>>
    where
        P: Fn(&Combination<W>) -> bool,
    {
        let mut start: BTreeMap<State, W> = BTreeMap::new();
        for t in self.aut.initial_transitions() {
            let dst = self.aut.dst_of(t);
            let w = match start.remove(&dst) {
                Some(v) => v + self.aut.weight_of(t),
                None => self.aut.weight_of(t),
            };
            start.insert(dst, w);
        }
        let start = canonical(start);
        if accept(&start) {
            let first = self.state(start, 0);
            self.out.set_initial(first, W::one())?;
        }

        while let Some((name, depth)) = self.todo.pop() {
            let src = self.map[&name];
            if let Some(lim) = limit {
                if depth >= lim {
                    continue;
                }
            }
            let mut dests: BTreeMap<A, BTreeMap<State, W>> = BTreeMap::new();
            for &(s, ref v) in &name {
                for t in self.aut.outgoing(s) {
                    if let Label::Letter(ref a) = *self.aut.label_of(t) {
                        let entry = dests
                            .entry(a.clone())
                            .or_insert_with(BTreeMap::new)
                            .entry(self.aut.dst_of(t))
                            .or_insert_with(W::zero);
                        *entry = entry.clone() + v.clone() * self.aut.weight_of(t);
                    }
                }
            }
            for (a, combo) in dests {
                let combo = canonical(combo);
                if combo.is_empty() || !accept(&combo) {
                    continue;
                }
                let dst = self.state(combo, depth + 1);
                self.out
                    .add_transition(src, dst, Label::Letter(a), W::one())?;
            }
        }

        if keep_history {
            for (name, s) in self.map {
                self.out
                    .set_history(s, History::Subset(name.into_iter().map(|(q, _)| q).collect()));
            }
        }
        Ok(self.out)
    }
}

/// Weighted determinization by subset construction over weighted
/// combinations: the result is deterministic and the weight of a word is
/// carried entirely by the final function.
///
/// Termination is guaranteed only over locally finite weight semirings;
/// anything else is rejected with a precondition error unless `unchecked`
/// is set.
pub fn weighted_determinize<A, W>(
    aut: &Automaton<A, W>,
    unchecked: bool,
    keep_history: bool,
) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    check_proper_input(aut)?;
    if !W::is_locally_finite() && !unchecked {
        return Err(Error::Precondition(
            "weighted determinization may diverge: the weight semiring is not locally finite"
                .to_string(),
        ));
    }
    WeightedEngine::new(aut).run(None, |_| true, keep_history)
}

/// Deterministic exploration limited to combinations reachable within
/// `depth` letters.  The result agrees with the input on every word of
/// length at most `depth` and never accepts a longer word the input
/// rejects.
pub fn explore_by_length<A, W>(aut: &Automaton<A, W>, depth: usize) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    check_proper_input(aut)?;
    WeightedEngine::new(aut).run(Some(depth), |_| true, false)
}

/// Deterministic exploration limited to combinations whose per-state
/// weight stays within `bound`.  Magnitudes are compared squared, so the
/// test also works in semirings whose order is reversed around zero, such
/// as min-plus.
pub fn explore_with_bound<A, W>(aut: &Automaton<A, W>, bound: &W) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    check_proper_input(aut)?;
    let bb = bound.clone() * bound.clone();
    WeightedEngine::new(aut).run(
        None,
        move |combo| {
            combo
                .iter()
                .all(|&(_, ref w)| !bb.less_than(&(w.clone() * w.clone())))
        },
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::evaluate;
    use crate::context::Context;
    use crate::semiring::F2;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    /// Nondeterministic automaton for words over {a,b} whose second to
    /// last letter is `a`.
    fn second_to_last_a() -> Automaton<char, Boolean> {
        let mut aut = Automaton::new(Context::from_chars("ab"));
        let q0 = aut.add_state();
        let q1 = aut.add_state();
        let q2 = aut.add_state();
        aut.set_initial(q0, Boolean::one()).unwrap();
        aut.set_final(q2, Boolean::one()).unwrap();
        for &l in &['a', 'b'] {
            aut.add_transition(q0, q0, Label::Letter(l), Boolean::one())
                .unwrap();
            aut.add_transition(q1, q2, Label::Letter(l), Boolean::one())
                .unwrap();
        }
        aut.add_transition(q0, q1, Label::Letter('a'), Boolean::one())
            .unwrap();
        aut
    }

    #[test]
    fn subset_construction_preserves_the_language() {
        let aut = second_to_last_a();
        let det = determinize(&aut, true).unwrap();
        assert!(is_deterministic(&det));
        assert!(!is_deterministic(&aut));
        for w in &["", "a", "ab", "aa", "ba", "abab", "aab", "bab", "abb"] {
            assert_eq!(
                evaluate(&aut, &word(w)).unwrap(),
                evaluate(&det, &word(w)).unwrap(),
                "disagreement on {:?}",
                w
            );
        }
        // The classical result: 4 subset states for this language.
        assert_eq!(det.state_count(), 4);
    }

    #[test]
    fn determinizing_a_deterministic_automaton_is_stable() {
        let det = determinize(&second_to_last_a(), false).unwrap();
        let det2 = determinize(&det, false).unwrap();
        assert_eq!(det2.state_count(), det.state_count());
    }

    #[test]
    fn the_two_subset_engines_agree() {
        let aut = second_to_last_a();
        let a = determinize_bitset(&aut, false).unwrap();
        let b = determinize_set(&aut, false).unwrap();
        assert_eq!(a.state_count(), b.state_count());
        for w in &["", "aa", "ab", "ba"] {
            assert_eq!(
                evaluate(&a, &word(w)).unwrap(),
                evaluate(&b, &word(w)).unwrap()
            );
        }
    }

    #[test]
    fn history_links_back_to_input_subsets() {
        let aut = second_to_last_a();
        let det = determinize(&aut, true).unwrap();
        let first = det.initial_states()[0];
        match det.history(first) {
            Some(&History::Subset(ref subset)) => assert_eq!(subset, &aut.initial_states()),
            h => panic!("unexpected history {:?}", h),
        }
    }

    #[test]
    fn weighted_determinization_needs_local_finiteness() {
        let mut aut: Automaton<char, i64> = Automaton::new(Context::from_chars("a"));
        let s = aut.add_state();
        aut.set_initial(s, 1).unwrap();
        aut.set_final(s, 1).unwrap();
        aut.add_transition(s, s, Label::Letter('a'), 2).unwrap();
        assert!(matches!(
            weighted_determinize(&aut, false, false),
            Err(Error::Precondition(_))
        ));
        // Bounded exploration stays available.
        let bounded = explore_by_length(&aut, 3).unwrap();
        assert_eq!(evaluate(&bounded, &word("aa")).unwrap(), 4);
        assert_eq!(evaluate(&bounded, &word("aaa")).unwrap(), 8);
        assert_eq!(evaluate(&bounded, &word("aaaa")).unwrap(), 0);
    }

    #[test]
    fn weighted_determinization_over_f2() {
        // Two nondeterministic `a`-paths of weight 1 cancel in F2.
        let mut aut: Automaton<char, F2> = Automaton::new(Context::from_chars("a"));
        let i = aut.add_state();
        let p = aut.add_state();
        let q = aut.add_state();
        aut.set_initial(i, F2(true)).unwrap();
        aut.add_transition(i, p, Label::Letter('a'), F2(true)).unwrap();
        aut.add_transition(i, q, Label::Letter('a'), F2(true)).unwrap();
        aut.set_final(p, F2(true)).unwrap();
        aut.set_final(q, F2(true)).unwrap();

        let det = weighted_determinize(&aut, false, false).unwrap();
        assert!(is_deterministic(&det));
        assert_eq!(evaluate(&det, &word("a")).unwrap(), F2(false));
        assert_eq!(
            evaluate(&aut, &word("a")).unwrap(),
            evaluate(&det, &word("a")).unwrap()
        );
    }

    #[test]
    fn bounded_exploration_by_weight() {
        let mut aut: Automaton<char, i64> = Automaton::new(Context::from_chars("a"));
        let s = aut.add_state();
        aut.set_initial(s, 1).unwrap();
        aut.set_final(s, 1).unwrap();
        aut.add_transition(s, s, Label::Letter('a'), 2).unwrap();
        let bounded = explore_with_bound(&aut, &4).unwrap();
        assert_eq!(evaluate(&bounded, &word("a")).unwrap(), 2);
        assert_eq!(evaluate(&bounded, &word("aa")).unwrap(), 4);
        assert_eq!(evaluate(&bounded, &word("aaa")).unwrap(), 0);
    }
}
