use num_traits::One;

use crate::alphabet::{Label, Letter};
use crate::automaton::{Automaton, History, State};
use crate::context::Context;
use crate::error::Result;
use crate::ratexp::RatExp;
use crate::semiring::Semiring;

/// The Thompson automaton of an expression: one fresh initial/final pair
/// per node, glued with epsilon transitions.  Exactly `2·size` states,
/// in- and out-degree at most two, a single initial state with no incoming
/// edge and a single final state with no outgoing edge.  Weights ride on
/// epsilon transitions, so no star is ever computed.
pub fn thompson<A, W>(
    ctx: &Context<A, W>,
    exp: &RatExp<A, W>,
    keep_history: bool,
) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let mut builder = ThompsonBuilder {
        aut: Automaton::new(ctx.clone()),
        initial: 0,
        final_: 0,
        keep_history,
    };
    builder.visit(exp)?;
    let (initial, final_) = (builder.initial, builder.final_);
    let mut aut = builder.aut;
    aut.set_initial(initial, W::one())?;
    aut.set_final(final_, W::one())?;
    Ok(aut)
}

struct ThompsonBuilder<A: Letter, W: Semiring> {
    aut: Automaton<A, W>,
    initial: State,
    final_: State,
    keep_history: bool,
}

impl<A: Letter, W: Semiring> ThompsonBuilder<A, W> {
    fn fresh_pair(&mut self, tag: &str) -> (State, State) {
        let i = self.aut.add_state();
        let f = self.aut.add_state();
        if self.keep_history {
            self.aut.set_history(i, History::Expression(tag.to_string()));
        }
        (i, f)
    }

    fn eps(&mut self, src: State, dst: State) -> Result<()> {
        self.aut.add_transition(src, dst, Label::One, W::one())
    }

    fn visit(&mut self, e: &RatExp<A, W>) -> Result<()> {
        match *e {
            RatExp::Zero => {
                let (i, f) = self.fresh_pair("zero");
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::One => {
                let (i, f) = self.fresh_pair("one");
                self.initial = i;
                self.final_ = f;
                self.eps(i, f)
            }
            RatExp::Atom(ref a) => {
                let (i, f) = self.fresh_pair("letter");
                self.initial = i;
                self.final_ = f;
                self.aut
                    .add_transition(i, f, Label::Letter(a.clone()), W::one())
            }
            RatExp::Sum(ref l, ref r) => {
                let (i, f) = self.fresh_pair("sum");
                self.visit(l)?;
                self.eps(i, self.initial)?;
                self.eps(self.final_, f)?;
                self.visit(r)?;
                self.eps(i, self.initial)?;
                self.eps(self.final_, f)?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::Prod(ref l, ref r) => {
                self.visit(l)?;
                let initial = self.initial;
                let junction = self.final_;
                self.visit(r)?;
                self.eps(junction, self.initial)?;
                self.initial = initial;
                Ok(())
            }
            RatExp::Star(ref s) => {
                self.visit(s)?;
                let (i, f) = self.fresh_pair("star");
                self.eps(i, self.initial)?;
                self.eps(self.final_, f)?;
                self.eps(self.final_, self.initial)?;
                self.eps(i, f)?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::Maybe(ref s) => {
                self.visit(s)?;
                let (i, f) = self.fresh_pair("maybe");
                self.eps(i, self.initial)?;
                self.eps(self.final_, f)?;
                self.eps(i, f)?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::Plus(ref s) => {
                self.visit(s)?;
                let (i, f) = self.fresh_pair("plus");
                self.eps(i, self.initial)?;
                self.eps(self.final_, f)?;
                self.eps(self.final_, self.initial)?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::LeftWeight(ref w, ref s) => {
                self.visit(s)?;
                let (i, f) = self.fresh_pair("left wgt");
                self.aut
                    .add_transition(i, self.initial, Label::One, w.clone())?;
                self.eps(self.final_, f)?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
            RatExp::RightWeight(ref s, ref w) => {
                self.visit(s)?;
                let (i, f) = self.fresh_pair("right wgt");
                self.eps(i, self.initial)?;
                self.aut
                    .add_transition(self.final_, f, Label::One, w.clone())?;
                self.initial = i;
                self.final_ = f;
                Ok(())
            }
        }
    }
}

/// The compact Thompson automaton: the sub-automata of sums and stars are
/// fused at their borders instead of being wrapped in fresh epsilon
/// transitions, so the result has fewer states than the classical
/// construction and, for star-free and simply nested expressions, no
/// epsilon cycle.
pub fn compact_thompson<A, W>(ctx: &Context<A, W>, exp: &RatExp<A, W>) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let mut builder = CompactBuilder {
        aut: Automaton::new(ctx.clone()),
        initial: 0,
        final_: 0,
    };
    builder.visit(exp)?;
    let (initial, final_) = (builder.initial, builder.final_);
    let mut aut = builder.aut;
    aut.set_initial(initial, W::one())?;
    aut.set_final(final_, W::one())?;
    Ok(aut)
}

struct CompactBuilder<A: Letter, W: Semiring> {
    aut: Automaton<A, W>,
    initial: State,
    final_: State,
}

impl<A: Letter, W: Semiring> CompactBuilder<A, W> {
    /// Copies every outgoing transition of `from` onto `onto`.
    fn pour_out(&mut self, from: State, onto: State) -> Result<()> {
        for t in self.aut.all_outgoing(from) {
            let dst = self.aut.dst_of(t);
            let label = self.aut.label_of(t).clone();
            let w = self.aut.weight_of(t);
            self.aut.add_transition(onto, dst, label, w)?;
        }
        Ok(())
    }

    /// Copies every incoming transition of `from` onto `onto`.
    fn pour_in(&mut self, from: State, onto: State) -> Result<()> {
        for t in self.aut.all_incoming(from) {
            let src = self.aut.src_of(t);
            let label = self.aut.label_of(t).clone();
            let w = self.aut.weight_of(t);
            self.aut.add_transition(src, onto, label, w)?;
        }
        Ok(())
    }

    fn visit(&mut self, e: &RatExp<A, W>) -> Result<()> {
        match *e {
            RatExp::Zero => {
                self.initial = self.aut.add_state();
                self.final_ = self.aut.add_state();
                Ok(())
            }
            RatExp::One => {
                self.initial = self.aut.add_state();
                self.final_ = self.aut.add_state();
                self.aut
                    .add_transition(self.initial, self.final_, Label::One, W::one())
            }
            RatExp::Atom(ref a) => {
                self.initial = self.aut.add_state();
                self.final_ = self.aut.add_state();
                self.aut.add_transition(
                    self.initial,
                    self.final_,
                    Label::Letter(a.clone()),
                    W::one(),
                )
            }
            RatExp::Sum(ref l, ref r) => {
                self.visit(l)?;
                let initial = self.initial;
                let final_ = self.final_;
                self.visit(r)?;
                self.pour_out(self.initial, initial)?;
                self.pour_in(self.final_, final_)?;
                self.aut.del_state(self.initial)?;
                self.aut.del_state(self.final_)?;
                self.initial = initial;
                self.final_ = final_;
                Ok(())
            }
            RatExp::Prod(ref l, ref r) => {
                self.visit(l)?;
                let initial = self.initial;
                let junction = self.final_;
                self.visit(r)?;
                self.pour_out(self.initial, junction)?;
                self.aut.del_state(self.initial)?;
                self.initial = initial;
                Ok(())
            }
            RatExp::Star(ref s) => {
                self.visit(s)?;
                let initial = self.aut.add_state();
                let final_ = self.aut.add_state();
                // The loop runs through the fused border state.
                self.pour_out(self.initial, self.final_)?;
                self.aut.del_state(self.initial)?;
                self.aut
                    .add_transition(initial, self.final_, Label::One, W::one())?;
                self.aut
                    .add_transition(self.final_, final_, Label::One, W::one())?;
                self.initial = initial;
                self.final_ = final_;
                Ok(())
            }
            RatExp::Maybe(ref s) => {
                self.visit(s)?;
                self.aut
                    .add_transition(self.initial, self.final_, Label::One, W::one())
            }
            RatExp::Plus(ref s) => {
                self.visit(s)?;
                let initial = self.aut.add_state();
                let final_ = self.aut.add_state();
                self.aut
                    .add_transition(initial, self.initial, Label::One, W::one())?;
                self.aut
                    .add_transition(self.final_, final_, Label::One, W::one())?;
                self.aut
                    .add_transition(self.final_, self.initial, Label::One, W::one())?;
                self.initial = initial;
                self.final_ = final_;
                Ok(())
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
                self.visit(s)?;
                for t in self.aut.all_incoming(self.final_) {
                    let scaled = self.aut.weight_of(t) * w.clone();
                    self.aut.set_weight(t, scaled)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::evaluate;
    use crate::proper::{is_eps_acyclic, proper};
    use crate::ratexp::parse_exp;
    use crate::semiring::Boolean;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn bexp(text: &str) -> (Context<char, Boolean>, RatExp<char, Boolean>) {
        let ctx = Context::from_chars("ab");
        let e = parse_exp(&ctx, text, true).unwrap();
        (ctx, e)
    }

    #[test]
    fn two_states_per_node_and_bounded_degree() {
        let (ctx, e) = bexp("a(a+b)*");
        let aut = thompson(&ctx, &e, false).unwrap();
        assert_eq!(aut.state_count(), 2 * e.size());
        let initial = aut.initial_states()[0];
        let final_ = aut.final_states()[0];
        assert!(aut.incoming(initial).is_empty());
        assert!(aut.outgoing(final_).is_empty());
        for s in aut.states() {
            assert!(aut.outgoing(s).len() <= 2);
            assert!(aut.incoming(s).len() <= 2);
        }
    }

    #[test]
    fn elimination_recovers_the_language() {
        let (ctx, e) = bexp("a(a+b)*");
        let aut = proper(&thompson(&ctx, &e, false).unwrap(), true).unwrap();
        for (w, expect) in &[
            ("a", true),
            ("aa", true),
            ("ab", true),
            ("aba", true),
            ("", false),
            ("b", false),
        ] {
            assert_eq!(
                evaluate(&aut, &word(w)).unwrap(),
                Boolean(*expect),
                "word {:?}",
                w
            );
        }
    }

    #[test]
    fn weights_ride_on_epsilon_transitions() {
        let ctx: Context<char, i64> = Context::from_chars("a");
        let e = parse_exp(&ctx, "<2>a<3>", true).unwrap();
        let aut = proper(&thompson(&ctx, &e, false).unwrap(), true).unwrap();
        assert_eq!(evaluate(&aut, &word("a")).unwrap(), 6);
    }

    #[test]
    fn compact_thompson_has_no_epsilon_cycle() {
        let (ctx, e) = bexp("(a+b)*a(a+b)");
        let compact = compact_thompson(&ctx, &e).unwrap();
        assert!(is_eps_acyclic(&compact));
        let full = thompson(&ctx, &e, false).unwrap();
        assert!(compact.state_count() < full.state_count());

        let c = proper(&compact, true).unwrap();
        let f = proper(&full, true).unwrap();
        for w in &["", "a", "aa", "ab", "ba", "aba", "bab"] {
            assert_eq!(
                evaluate(&c, &word(w)).unwrap(),
                evaluate(&f, &word(w)).unwrap(),
                "word {:?}",
                w
            );
        }
    }

    #[test]
    fn thompson_history_tags_nodes() {
        let (ctx, e) = bexp("a+b");
        let aut = thompson(&ctx, &e, true).unwrap();
        let initial = aut.initial_states()[0];
        assert_eq!(
            aut.history(initial),
            Some(&History::Expression("sum".to_string()))
        );
    }
}
