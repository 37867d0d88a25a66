extern crate num_traits;
extern crate ratomata;

use num_traits::One;

use ratomata::alphabet::Label;
use ratomata::automaton::{evaluate, Automaton};
use ratomata::context::Context;
use ratomata::error::Error;
use ratomata::proper::{is_proper, is_valid, proper, proper_here};
use ratomata::ratexp::{parse_exp, thompson};
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

#[test]
fn elimination_agrees_with_the_input_on_epsilon_free_words() {
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    for text in &["(a+b)*", "a*b*", "(ab)*+a?", "a{1,3}b"] {
        let e = parse_exp(&ctx, text, true).unwrap();
        let raw = thompson(&ctx, &e, false).unwrap();
        let cleaned = proper(&raw, true).unwrap();
        assert!(is_proper(&cleaned));
        for w in words_up_to(&['a', 'b'], 4) {
            assert_eq!(
                evaluate(&raw, &w).unwrap(),
                evaluate(&cleaned, &w).unwrap(),
                "disagreement on {:?} for {}",
                w,
                text
            );
        }
    }
}

#[test]
fn epsilon_self_loop_of_weight_two_is_invalid() {
    // A single epsilon self-loop of weight 2 over the integers: star(2)
    // does not exist, the automaton is invalid, unconditional elimination
    // fails.
    let mut aut: Automaton<char, i64> = Automaton::new(Context::from_chars("a"));
    let s = aut.add_state();
    aut.set_initial(s, 1).unwrap();
    aut.set_final(s, 1).unwrap();
    aut.add_transition(s, s, Label::One, 2).unwrap();

    assert!(!is_valid(&aut));
    let mut in_place = aut.clone();
    match proper_here(&mut in_place, true) {
        Err(Error::Validity(_)) => {}
        other => panic!("expected a validity error, got {:?}", other),
    }
}

#[test]
fn validity_is_decided_without_mutation() {
    let mut aut: Automaton<char, Boolean> = Automaton::new(Context::from_chars("a"));
    let p = aut.add_state();
    let q = aut.add_state();
    aut.set_initial(p, Boolean::one()).unwrap();
    aut.set_final(q, Boolean::one()).unwrap();
    aut.add_transition(p, q, Label::One, Boolean::one()).unwrap();
    aut.add_transition(q, p, Label::One, Boolean::one()).unwrap();

    let before = aut.all_transitions().len();
    assert!(is_valid(&aut));
    assert_eq!(aut.all_transitions().len(), before);
    assert!(!is_proper(&aut));
}
