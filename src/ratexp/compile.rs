use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::alphabet::Letter;
use crate::automaton::Automaton;
use crate::context::Context;
use crate::ratexp::{compact_thompson, derived_term, standard, thompson, RatExp};
use crate::error::Result;
use crate::semiring::Semiring;

/// The selectable expression-to-automaton constructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpAlgo {
    /// Glushkov position automaton; epsilon-free, `length + 1` states.
    Standard,
    /// Classical Thompson construction with epsilon transitions.
    Thompson,
    /// Thompson with fused borders; fewer states.
    CompactThompson,
    /// Antimirov derived terms; a quotient of the standard automaton.
    DerivedTerm,
    /// Derived terms with sum left factors broken apart.
    BreakingDerivedTerm,
}

/// Compiles an expression into an automaton with the chosen construction.
pub fn exp_to_aut<A, W>(
    ctx: &Context<A, W>,
    exp: &RatExp<A, W>,
    algo: ExpAlgo,
    keep_history: bool,
) -> Result<Automaton<A, W>>
where
    A: Letter,
    W: Semiring + Eq + Hash,
{
    match algo {
        ExpAlgo::Standard => standard(ctx, exp),
        ExpAlgo::Thompson => thompson(ctx, exp, keep_history),
        ExpAlgo::CompactThompson => compact_thompson(ctx, exp),
        ExpAlgo::DerivedTerm => derived_term(ctx, exp, false, keep_history),
        ExpAlgo::BreakingDerivedTerm => derived_term(ctx, exp, true, keep_history),
    }
}
