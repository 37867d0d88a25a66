use std::collections::BTreeSet;

use num_traits::{One, Zero};

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, State};
use crate::context::Context;
use crate::error::Result;
use crate::ratexp::RatExp;
use crate::semiring::Semiring;

/// Whether `aut` is standard: a unique initial state of weight one with no
/// incoming transition.
pub fn is_standard<A, W>(aut: &Automaton<A, W>) -> bool
where
    A: Letter,
    W: Semiring,
{
    let initials = aut.initial_states();
    initials.len() == 1
        && aut.initial_weight(initials[0]).is_one()
        && aut.incoming(initials[0]).is_empty()
}

/// Standardizes `aut` in place: a fresh initial state takes over the
/// outgoing transitions of all former initial states, scaled by their
/// initial weights.
pub fn standard_here<A, W>(aut: &mut Automaton<A, W>) -> Result<()>
where
    A: Letter,
    W: Semiring,
{
    if is_standard(aut) {
        return Ok(());
    }
    let initials = aut.initial_transitions();
    let ini = aut.add_state();
    for ti in initials {
        let i = aut.dst_of(ti);
        let wi = aut.weight_of(ti);
        for t in aut.all_outgoing(i) {
            let label = aut.label_of(t).clone();
            let dst = aut.dst_of(t);
            let w = wi.clone() * aut.weight_of(t);
            aut.add_transition(ini, dst, label, w)?;
        }
        aut.del_transition(ti)?;
        if aut.all_incoming(i).is_empty() {
            aut.del_state(i)?;
        }
    }
    aut.set_initial(ini, W::one())
}

/// The standard (Glushkov) automaton of an expression: epsilon-free, one
/// state per letter occurrence plus a standard initial state.
pub fn standard<A, W>(ctx: &Context<A, W>, exp: &RatExp<A, W>) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let mut builder = StandardBuilder {
        aut: Automaton::new(ctx.clone()),
        initial: 0,
    };
    builder.visit(exp)?;
    let initial = builder.initial;
    let mut aut = builder.aut;
    aut.set_initial(initial, W::one())?;
    Ok(aut)
}

struct StandardBuilder<A: Letter, W: Semiring> {
    aut: Automaton<A, W>,
    initial: State,
}

impl<A: Letter, W: Semiring> StandardBuilder<A, W> {
    /// The states that are currently final; used to protect the finals of
    /// sibling branches while a sub-expression is being built.
    fn finals(&self) -> BTreeSet<State> {
        self.aut.final_states().into_iter().collect()
    }

    fn visit(&mut self, e: &RatExp<A, W>) -> Result<()> {
        match *e {
            RatExp::Zero => {
                self.initial = self.aut.add_state();
                Ok(())
            }
            RatExp::One => {
                let i = self.aut.add_state();
                self.initial = i;
                self.aut.set_final(i, W::one())
            }
            RatExp::Atom(ref a) => {
                let i = self.aut.add_state();
                let f = self.aut.add_state();
                self.initial = i;
                self.aut
                    .add_transition(i, f, Label::Letter(a.clone()), W::one())?;
                self.aut.set_final(f, W::one())
            }
            RatExp::Sum(ref l, ref r) => {
                self.visit(l)?;
                let initial = self.initial;
                self.visit(r)?;
                // Pour the second branch's initial into the first's.
                for t in self.aut.all_outgoing(self.initial) {
                    let dst = self.aut.dst_of(t);
                    let label = self.aut.label_of(t).clone();
                    let w = self.aut.weight_of(t);
                    // add, not set: `a*+a*` sends the initial twice to
                    // the same successor.
                    self.aut.add_transition(initial, dst, label, w)?;
                }
                self.aut.del_state(self.initial)?;
                self.initial = initial;
                Ok(())
            }
            RatExp::Prod(ref l, ref r) => {
                let other_finals = self.finals();
                self.visit(l)?;
                let initial = self.initial;
                let lhs_finals: BTreeSet<State> = self
                    .finals()
                    .difference(&other_finals)
                    .cloned()
                    .collect();
                self.visit(r)?;
                for f in lhs_finals {
                    if !self.aut.has_state(f) || !self.aut.is_final(f) {
                        continue;
                    }
                    let wf = self.aut.final_weight(f);
                    // Unset first: the branch may re-finalize this state
                    // with the weight coming through the rhs.
                    self.aut.unset_final(f)?;
                    for t in self.aut.all_outgoing(self.initial) {
                        let dst = self.aut.dst_of(t);
                        let label = self.aut.label_of(t).clone();
                        let w = wf.clone() * self.aut.weight_of(t);
                        self.aut.set_transition(f, dst, label, w)?;
                    }
                }
                self.aut.del_state(self.initial)?;
                self.initial = initial;
                Ok(())
            }
            RatExp::Star(ref s) => self.iterate(s, true),
            RatExp::Plus(ref s) => self.iterate(s, false),
            RatExp::Maybe(ref s) => {
                self.visit(s)?;
                let w = self.aut.final_weight(self.initial) + W::one();
                self.aut.set_final(self.initial, w)
            }
            RatExp::LeftWeight(ref w, ref s) => {
                self.visit(s)?;
                for t in self.aut.all_outgoing(self.initial) {
                    let scaled = w.clone() * self.aut.weight_of(t);
                    self.aut.set_weight(t, scaled)?;
                }
                Ok(())
            }
            RatExp::RightWeight(ref s, ref w) => {
                let other_finals = self.finals();
                self.visit(s)?;
                for t in self.aut.final_transitions() {
                    let f = self.aut.src_of(t);
                    if other_finals.contains(&f) {
                        continue;
                    }
                    let scaled = self.aut.weight_of(t) * w.clone();
                    self.aut.set_weight(t, scaled)?;
                }
                Ok(())
            }
        }
    }

    /// The common core of `E*` and `E⁺`.  The constant term of `E` is the
    /// final weight its branch left on the initial state; its star scales
    /// the restart transitions and the final weights.
    fn iterate(&mut self, sub: &RatExp<A, W>, with_empty: bool) -> Result<()> {
        let other_finals = self.finals();
        self.visit(sub)?;
        let constant = self.aut.final_weight(self.initial);
        let w = constant.star()?;
        for ti in self.aut.outgoing(self.initial) {
            let scaled = w.clone() * self.aut.weight_of(ti);
            if scaled.is_zero() {
                self.aut.set_weight(ti, scaled)?;
                continue;
            }
            let dst = self.aut.dst_of(ti);
            let label = self.aut.label_of(ti).clone();
            self.aut.set_weight(ti, scaled)?;
            for tf in self.aut.final_transitions() {
                let f = self.aut.src_of(tf);
                if f == self.initial || other_finals.contains(&f) {
                    continue;
                }
                // The weight of `ti` already carries the star.
                let restart = self.aut.weight_of(tf) * self.aut.weight_of(ti);
                self.aut.add_transition(f, dst, label.clone(), restart)?;
            }
        }
        for tf in self.aut.final_transitions() {
            let f = self.aut.src_of(tf);
            if f == self.initial || other_finals.contains(&f) {
                continue;
            }
            let scaled = self.aut.weight_of(tf) * w.clone();
            self.aut.set_weight(tf, scaled)?;
        }
        let final_weight = if with_empty {
            w
        } else {
            constant * w
        };
        self.aut.set_final(self.initial, final_weight)
    }
}
