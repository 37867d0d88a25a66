extern crate num_traits;
extern crate ratomata;

use num_traits::One;

use ratomata::alphabet::Label;
use ratomata::automaton::{evaluate, Automaton};
use ratomata::context::Context;
use ratomata::determinize::{determinize, explore_by_length, is_deterministic, weighted_determinize};
use ratomata::error::Error;
use ratomata::factories::ladybird;
use ratomata::semiring::Boolean;

fn words_up_to(letters: &[char], len: usize) -> Vec<Vec<char>> {
    let mut result: Vec<Vec<char>> = vec![Vec::new()];
    let mut layer: Vec<Vec<char>> = vec![Vec::new()];
    for _ in 0..len {
        let mut next = Vec::new();
        for w in &layer {
            for &a in letters {
                let mut v = w.clone();
                v.push(a);
                next.push(v);
            }
        }
        result.extend(next.iter().cloned());
        layer = next;
    }
    result
}

/// Words over {a,b} containing `ab` as a factor, nondeterministically.
fn contains_ab() -> Automaton<char, Boolean> {
    let mut aut = Automaton::new(Context::from_chars("ab"));
    let q0 = aut.add_state();
    let q1 = aut.add_state();
    let q2 = aut.add_state();
    aut.set_initial(q0, Boolean::one()).unwrap();
    aut.set_final(q2, Boolean::one()).unwrap();
    for &l in &['a', 'b'] {
        aut.add_transition(q0, q0, Label::Letter(l), Boolean::one())
            .unwrap();
        aut.add_transition(q2, q2, Label::Letter(l), Boolean::one())
            .unwrap();
    }
    aut.add_transition(q0, q1, Label::Letter('a'), Boolean::one())
        .unwrap();
    aut.add_transition(q1, q2, Label::Letter('b'), Boolean::one())
        .unwrap();
    aut
}

#[test]
fn determinization_preserves_every_word() {
    let aut = contains_ab();
    let det = determinize(&aut, false).unwrap();
    assert!(is_deterministic(&det));
    for w in words_up_to(&['a', 'b'], 5) {
        assert_eq!(
            evaluate(&aut, &w).unwrap(),
            evaluate(&det, &w).unwrap(),
            "disagreement on {:?}",
            w
        );
    }
}

#[test]
fn determinizing_twice_does_not_grow() {
    let det = determinize(&contains_ab(), false).unwrap();
    let again = determinize(&det, false).unwrap();
    assert!(again.state_count() <= det.state_count());
    for w in words_up_to(&['a', 'b'], 4) {
        assert_eq!(
            evaluate(&det, &w).unwrap(),
            evaluate(&again, &w).unwrap()
        );
    }
}

#[test]
fn ladybird_reaches_every_nonempty_subset() {
    let det = determinize(&ladybird(5).unwrap(), true).unwrap();
    assert_eq!(det.state_count(), 31);
}

/// Integer weights, two states; a word evaluates to its number of `b`s.
fn b_counter() -> Automaton<char, i64> {
    let mut aut = Automaton::new(Context::from_chars("ab"));
    let s = aut.add_state();
    let t = aut.add_state();
    aut.set_initial(s, 1).unwrap();
    aut.set_final(t, 1).unwrap();
    for &l in &['a', 'b'] {
        aut.add_transition(s, s, Label::Letter(l), 1).unwrap();
        aut.add_transition(t, t, Label::Letter(l), 1).unwrap();
    }
    aut.add_transition(s, t, Label::Letter('b'), 1).unwrap();
    aut
}

#[test]
fn counting_bs_with_integer_weights() {
    let aut = b_counter();
    let word: Vec<char> = "bbbaaabbaaab".chars().collect();
    assert_eq!(evaluate(&aut, &word).unwrap(), 6);
}

#[test]
fn weighted_determinization_of_the_counter_is_refused() {
    // Z is not locally finite; the subset construction would discover a
    // fresh weighted combination for every prefix.
    match weighted_determinize(&b_counter(), false, false) {
        Err(Error::Precondition(_)) => {}
        other => panic!("expected a precondition error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn bounded_exploration_of_the_counter_agrees_up_to_depth() {
    let aut = b_counter();
    let bounded = explore_by_length(&aut, 4).unwrap();
    assert!(is_deterministic(&bounded));
    for w in words_up_to(&['a', 'b'], 4) {
        assert_eq!(
            evaluate(&aut, &w).unwrap(),
            evaluate(&bounded, &w).unwrap(),
            "disagreement on {:?}",
            w
        );
    }
}
