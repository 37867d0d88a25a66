use std::collections::HashMap;
use std::fmt::{self, Display};

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Label, Letter};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::semiring::Semiring;

pub mod accessible;
pub mod copy;
pub mod eval;
pub mod ops;

pub use self::accessible::{accessible_states, coaccessible_states, is_trim, trim};
pub use self::copy::copy;
pub use self::eval::evaluate;
pub use self::ops::{product, sum, transpose};

/// States are dense indices; `PRE` and `POST` are permanent.
pub type State = usize;
/// Index of a transition inside its automaton.
pub type TrIndex = usize;

/// The virtual source of all initial weights.
pub const PRE: State = 0;
/// The virtual target of all final weights.
pub const POST: State = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition<A: Letter, W: Semiring> {
    pub src: State,
    pub dst: State,
    pub label: Label<A>,
    pub weight: W,
}

#[derive(Clone, Debug, Default)]
struct StateData {
    succ: Vec<TrIndex>,
    pred: Vec<TrIndex>,
}

/// Provenance of a produced state, kept when an algorithm is asked to
/// retain history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum History {
    /// The input states a produced state stands for.
    Subset(Vec<State>),
    /// A printed expression (derived term, construction tag).
    Expression(String),
}

/// A weighted labeled multigraph over a fixed context.
///
/// Initial and final weights are encoded as ordinary transitions
/// `PRE → s` and `s → POST` carrying the reserved `Special` label; the two
/// virtual states are created with the automaton and can never be removed.
#[derive(Clone, Debug)]
pub struct Automaton<A: Letter, W: Semiring> {
    context: Context<A, W>,
    states: Vec<Option<StateData>>,
    transitions: Vec<Option<Transition<A, W>>>,
    histories: HashMap<State, History>,
}

impl<A: Letter, W: Semiring> Automaton<A, W> {
    pub fn new(context: Context<A, W>) -> Self {
        Automaton {
            context,
            states: vec![Some(StateData::default()), Some(StateData::default())],
            transitions: Vec::new(),
            histories: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Context<A, W> {
        &self.context
    }

    pub fn alphabet_letters(&self) -> Vec<A> {
        self.context.alphabet.letters().cloned().collect()
    }

    pub fn set_alphabet_open(&mut self, open: bool) {
        self.context.alphabet.set_open(open);
    }

    pub fn pre(&self) -> State {
        PRE
    }

    pub fn post(&self) -> State {
        POST
    }

    /* states */

    pub fn add_state(&mut self) -> State {
        self.states.push(Some(StateData::default()));
        self.states.len() - 1
    }

    pub fn has_state(&self, s: State) -> bool {
        s < self.states.len() && self.states[s].is_some()
    }

    fn check_state(&self, s: State) -> Result<()> {
        if self.has_state(s) {
            Ok(())
        } else {
            Err(Error::Structural(format!("no such state: {}", s)))
        }
    }

    /// The largest state index ever allocated.
    pub fn max_state(&self) -> State {
        self.states.len() - 1
    }

    /// The real states, excluding `PRE` and `POST`.
    pub fn states(&self) -> Vec<State> {
        (POST + 1..self.states.len())
            .filter(|&s| self.states[s].is_some())
            .collect()
    }

    pub fn all_states(&self) -> Vec<State> {
        (0..self.states.len())
            .filter(|&s| self.states[s].is_some())
            .collect()
    }

    pub fn state_count(&self) -> usize {
        self.states().len()
    }

    pub fn del_state(&mut self, s: State) -> Result<()> {
        self.check_state(s)?;
        if s == PRE || s == POST {
            return Err(Error::Structural(
                "the virtual states cannot be removed".to_string(),
            ));
        }
        let data = self.states[s].take().unwrap();
        for t in data.succ.into_iter().chain(data.pred) {
            if self.transitions[t].is_some() {
                self.unlink(t);
            }
        }
        self.histories.remove(&s);
        Ok(())
    }

    /* transitions */

    fn tr(&self, t: TrIndex) -> &Transition<A, W> {
        self.transitions[t].as_ref().unwrap()
    }

    pub fn src_of(&self, t: TrIndex) -> State {
        self.tr(t).src
    }

    pub fn dst_of(&self, t: TrIndex) -> State {
        self.tr(t).dst
    }

    pub fn label_of(&self, t: TrIndex) -> &Label<A> {
        &self.tr(t).label
    }

    pub fn weight_of(&self, t: TrIndex) -> W {
        self.tr(t).weight.clone()
    }

    pub fn transition(&self, t: TrIndex) -> &Transition<A, W> {
        self.tr(t)
    }

    /// Live transitions between real states.
    pub fn transitions(&self) -> Vec<TrIndex> {
        (0..self.transitions.len())
            .filter(|&t| {
                self.transitions[t]
                    .as_ref()
                    .map_or(false, |tr| tr.src != PRE && tr.dst != POST)
            })
            .collect()
    }

    /// Live transitions including the pre/post edges.
    pub fn all_transitions(&self) -> Vec<TrIndex> {
        (0..self.transitions.len())
            .filter(|&t| self.transitions[t].is_some())
            .collect()
    }

    pub fn outgoing(&self, s: State) -> Vec<TrIndex> {
        self.all_outgoing(s)
            .into_iter()
            .filter(|&t| self.tr(t).dst != POST)
            .collect()
    }

    pub fn all_outgoing(&self, s: State) -> Vec<TrIndex> {
        match self.states.get(s) {
            Some(&Some(ref data)) => data.succ.clone(),
            _ => Vec::new(),
        }
    }

    pub fn incoming(&self, s: State) -> Vec<TrIndex> {
        self.all_incoming(s)
            .into_iter()
            .filter(|&t| self.tr(t).src != PRE)
            .collect()
    }

    pub fn all_incoming(&self, s: State) -> Vec<TrIndex> {
        match self.states.get(s) {
            Some(&Some(ref data)) => data.pred.clone(),
            _ => Vec::new(),
        }
    }

    pub fn outgoing_with_label(&self, s: State, label: &Label<A>) -> Vec<TrIndex> {
        self.all_outgoing(s)
            .into_iter()
            .filter(|&t| self.tr(t).label == *label)
            .collect()
    }

    pub fn incoming_with_label(&self, s: State, label: &Label<A>) -> Vec<TrIndex> {
        self.all_incoming(s)
            .into_iter()
            .filter(|&t| self.tr(t).label == *label)
            .collect()
    }

    pub fn get_transition(&self, src: State, dst: State, label: &Label<A>) -> Option<TrIndex> {
        self.states.get(src).and_then(|o| o.as_ref()).and_then(|data| {
            data.succ
                .iter()
                .cloned()
                .find(|&t| self.tr(t).dst == dst && self.tr(t).label == *label)
        })
    }

    pub fn has_transition(&self, src: State, dst: State, label: &Label<A>) -> bool {
        self.get_transition(src, dst, label).is_some()
    }

    fn check_endpoints(&self, src: State, dst: State, label: &Label<A>) -> Result<()> {
        self.check_state(src)?;
        self.check_state(dst)?;
        if src == POST || dst == PRE {
            return Err(Error::Structural(
                "no transition may leave POST or enter PRE".to_string(),
            ));
        }
        if src == PRE && dst == POST {
            return Err(Error::Structural(
                "initial and final weights attach to real states".to_string(),
            ));
        }
        let touches_virtual = src == PRE || dst == POST;
        if touches_virtual != label.is_special() {
            return Err(Error::Structural(
                "the special label appears exactly on pre/post edges".to_string(),
            ));
        }
        Ok(())
    }

    fn insert(&mut self, src: State, dst: State, label: Label<A>, weight: W) {
        let t = self.transitions.len();
        self.transitions.push(Some(Transition {
            src,
            dst,
            label,
            weight,
        }));
        self.states[src].as_mut().unwrap().succ.push(t);
        self.states[dst].as_mut().unwrap().pred.push(t);
    }

    fn unlink(&mut self, t: TrIndex) {
        let tr = self.transitions[t].take().unwrap();
        if let Some(ref mut data) = self.states[tr.src] {
            data.succ.retain(|&u| u != t);
        }
        if let Some(ref mut data) = self.states[tr.dst] {
            data.pred.retain(|&u| u != t);
        }
    }

    /// Adds a transition, summing the weight into an existing transition
    /// with the same endpoints and label.  A weight summing to zero removes
    /// the transition; there are never duplicate `(src, dst, label)` edges.
    pub fn add_transition(
        &mut self,
        src: State,
        dst: State,
        label: Label<A>,
        weight: W,
    ) -> Result<()> {
        self.check_endpoints(src, dst, &label)?;
        self.context.alphabet.admit(&label)?;
        match self.get_transition(src, dst, &label) {
            Some(t) => {
                let sum = self.tr(t).weight.clone() + weight;
                if sum.is_zero() {
                    self.unlink(t);
                } else {
                    self.transitions[t].as_mut().unwrap().weight = sum;
                }
            }
            None => {
                if !weight.is_zero() {
                    self.insert(src, dst, label, weight);
                }
            }
        }
        Ok(())
    }

    /// Sets a transition, overwriting any existing weight.  A zero weight
    /// removes the transition.
    pub fn set_transition(
        &mut self,
        src: State,
        dst: State,
        label: Label<A>,
        weight: W,
    ) -> Result<()> {
        self.check_endpoints(src, dst, &label)?;
        self.context.alphabet.admit(&label)?;
        match self.get_transition(src, dst, &label) {
            Some(t) => {
                if weight.is_zero() {
                    self.unlink(t);
                } else {
                    self.transitions[t].as_mut().unwrap().weight = weight;
                }
            }
            None => {
                if !weight.is_zero() {
                    self.insert(src, dst, label, weight);
                }
            }
        }
        Ok(())
    }

    pub fn del_transition(&mut self, t: TrIndex) -> Result<()> {
        if t < self.transitions.len() && self.transitions[t].is_some() {
            self.unlink(t);
            Ok(())
        } else {
            Err(Error::Structural(format!("no such transition: {}", t)))
        }
    }

    /// Removes every transition between `src` and `dst`, whatever the label.
    pub fn del_transitions(&mut self, src: State, dst: State) -> Result<()> {
        self.check_state(src)?;
        self.check_state(dst)?;
        for t in self.all_outgoing(src) {
            if self.tr(t).dst == dst {
                self.unlink(t);
            }
        }
        Ok(())
    }

    pub fn set_weight(&mut self, t: TrIndex, weight: W) -> Result<()> {
        if t >= self.transitions.len() || self.transitions[t].is_none() {
            return Err(Error::Structural(format!("no such transition: {}", t)));
        }
        if weight.is_zero() {
            self.unlink(t);
        } else {
            self.transitions[t].as_mut().unwrap().weight = weight;
        }
        Ok(())
    }

    /* initial and final weights */

    pub fn set_initial(&mut self, s: State, weight: W) -> Result<()> {
        self.set_transition(PRE, s, Label::Special, weight)
    }

    pub fn add_initial(&mut self, s: State, weight: W) -> Result<()> {
        self.add_transition(PRE, s, Label::Special, weight)
    }

    pub fn unset_initial(&mut self, s: State) -> Result<()> {
        self.set_initial(s, W::zero())
    }

    pub fn set_final(&mut self, s: State, weight: W) -> Result<()> {
        self.set_transition(s, POST, Label::Special, weight)
    }

    pub fn add_final(&mut self, s: State, weight: W) -> Result<()> {
        self.add_transition(s, POST, Label::Special, weight)
    }

    pub fn unset_final(&mut self, s: State) -> Result<()> {
        self.set_final(s, W::zero())
    }

    pub fn is_initial(&self, s: State) -> bool {
        self.has_transition(PRE, s, &Label::Special)
    }

    pub fn is_final(&self, s: State) -> bool {
        self.has_transition(s, POST, &Label::Special)
    }

    pub fn initial_weight(&self, s: State) -> W {
        match self.get_transition(PRE, s, &Label::Special) {
            Some(t) => self.weight_of(t),
            None => W::zero(),
        }
    }

    pub fn final_weight(&self, s: State) -> W {
        match self.get_transition(s, POST, &Label::Special) {
            Some(t) => self.weight_of(t),
            None => W::zero(),
        }
    }

    pub fn initial_transitions(&self) -> Vec<TrIndex> {
        self.all_outgoing(PRE)
    }

    pub fn final_transitions(&self) -> Vec<TrIndex> {
        self.all_incoming(POST)
    }

    pub fn initial_states(&self) -> Vec<State> {
        self.initial_transitions()
            .into_iter()
            .map(|t| self.dst_of(t))
            .collect()
    }

    pub fn final_states(&self) -> Vec<State> {
        self.final_transitions()
            .into_iter()
            .map(|t| self.src_of(t))
            .collect()
    }

    /// Scales every initial weight by `w` on the left, in place.
    pub fn left_mult_here(&mut self, w: &W) {
        for t in self.initial_transitions() {
            let scaled = w.clone() * self.weight_of(t);
            // set_weight with zero drops the edge.
            self.set_weight(t, scaled).unwrap();
        }
    }

    /// Scales every final weight by `w` on the right, in place.
    pub fn right_mult_here(&mut self, w: &W) {
        for t in self.final_transitions() {
            let scaled = self.weight_of(t) * w.clone();
            self.set_weight(t, scaled).unwrap();
        }
    }

    /* history */

    pub fn set_history(&mut self, s: State, h: History) {
        self.histories.insert(s, h);
    }

    pub fn history(&self, s: State) -> Option<&History> {
        self.histories.get(&s)
    }

    pub fn clear_history(&mut self) {
        self.histories.clear();
    }
}

impl<A: Letter, W: Semiring> Display for Automaton<A, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for s in self.states() {
            if self.is_initial(s) {
                writeln!(f, "-> {} # {}", s, self.initial_weight(s))?;
            }
        }
        for t in self.transitions() {
            let tr = self.tr(t);
            writeln!(f, "{} -- {} | {} --> {}", tr.src, tr.label, tr.weight, tr.dst)?;
        }
        for s in self.states() {
            if self.is_final(s) {
                writeln!(f, "{} -> # {}", s, self.final_weight(s))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::Boolean;
    use num_traits::One;

    fn ctx() -> Context<char, i64> {
        Context::from_chars("ab")
    }

    #[test]
    fn parallel_additions_sum_their_weights() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        let q = aut.add_state();
        aut.add_transition(s, q, Label::Letter('a'), 2).unwrap();
        aut.add_transition(s, q, Label::Letter('a'), 3).unwrap();
        let t = aut.get_transition(s, q, &Label::Letter('a')).unwrap();
        assert_eq!(aut.weight_of(t), 5);
        assert_eq!(aut.transitions().len(), 1);
    }

    #[test]
    fn summing_to_zero_removes_the_edge() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        let q = aut.add_state();
        aut.add_transition(s, q, Label::Letter('a'), 2).unwrap();
        aut.add_transition(s, q, Label::Letter('a'), -2).unwrap();
        assert!(!aut.has_transition(s, q, &Label::Letter('a')));
    }

    #[test]
    fn dangling_states_are_rejected() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        assert!(aut.add_transition(s, 17, Label::Letter('a'), 1).is_err());
        assert!(aut.del_state(PRE).is_err());
    }

    #[test]
    fn foreign_letters_are_rejected_unless_open() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        assert!(aut.add_transition(s, s, Label::Letter('z'), 1).is_err());
        aut.set_alphabet_open(true);
        assert!(aut.add_transition(s, s, Label::Letter('z'), 1).is_ok());
    }

    #[test]
    fn initial_and_final_weights_live_on_virtual_edges() {
        let mut aut: Automaton<char, Boolean> = Automaton::new(Context::from_chars("ab"));
        let s = aut.add_state();
        aut.set_initial(s, Boolean::one()).unwrap();
        aut.set_final(s, Boolean::one()).unwrap();
        assert!(aut.is_initial(s));
        assert_eq!(aut.initial_states(), vec![s]);
        assert_eq!(aut.final_states(), vec![s]);
        // The virtual edges are invisible to the plain iterators.
        assert!(aut.transitions().is_empty());
        assert_eq!(aut.all_transitions().len(), 2);
        aut.unset_final(s).unwrap();
        assert!(!aut.is_final(s));
    }

    #[test]
    fn scaling_initial_and_final_weights_in_place() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        let q = aut.add_state();
        aut.set_initial(s, 2).unwrap();
        aut.set_final(q, 3).unwrap();
        aut.left_mult_here(&5);
        aut.right_mult_here(&7);
        assert_eq!(aut.initial_weight(s), 10);
        assert_eq!(aut.final_weight(q), 21);
    }

    #[test]
    fn del_transitions_clears_a_state_pair() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        let q = aut.add_state();
        aut.add_transition(s, q, Label::Letter('a'), 1).unwrap();
        aut.add_transition(s, q, Label::Letter('b'), 1).unwrap();
        aut.add_transition(q, s, Label::Letter('a'), 1).unwrap();
        aut.del_transitions(s, q).unwrap();
        assert_eq!(aut.transitions().len(), 1);
    }

    #[test]
    fn del_state_drops_its_transitions() {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        let q = aut.add_state();
        aut.add_transition(s, q, Label::Letter('a'), 1).unwrap();
        aut.add_transition(q, s, Label::Letter('b'), 1).unwrap();
        aut.del_state(q).unwrap();
        assert!(aut.transitions().is_empty());
        assert!(!aut.has_state(q));
        assert!(aut.has_state(s));
    }
}
