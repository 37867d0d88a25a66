//! Weighted finite automata and rational expressions over generic weight
//! semirings and label alphabets.
//!
//! The crate is organized around a mutable [`automaton::Automaton`] tied
//! to a [`context::Context`] (a label alphabet paired with a weight
//! algebra), and four algorithm families on top of it: subset-construction
//! determinization ([`determinize`]), Moore partition-refinement
//! minimization ([`quotient`]), epsilon elimination with validity
//! analysis ([`proper`]) and compilation of rational expressions
//! ([`ratexp`]).

extern crate bit_set;
extern crate indexmap;
extern crate integeriser;
extern crate log_domain;
extern crate nom;
extern crate num_traits;
extern crate rand;
extern crate serde;
extern crate thiserror;

pub mod alphabet;
pub mod automaton;
pub mod context;
pub mod determinize;
pub mod error;
pub mod factories;
pub mod proper;
pub mod quotient;
pub mod ratexp;
pub mod semiring;
