extern crate ratomata;

use ratomata::automaton::evaluate;
use ratomata::context::Context;
use ratomata::determinize::determinize;
use ratomata::proper::proper;
use ratomata::quotient::min_quotient;
use ratomata::ratexp::{exp_to_aut, parse_exp, print_exp, standard, ExpAlgo};
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
fn standard_of_a_a_plus_b_star() {
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    let e = parse_exp(&ctx, "a(a+b)*", true).unwrap();
    let aut = standard(&ctx, &e).unwrap();

    // One state per letter occurrence plus the standard initial state.
    assert_eq!(aut.state_count(), e.length() + 1);

    for w in &["a", "aa", "ab", "aba"] {
        let word: Vec<char> = w.chars().collect();
        assert_eq!(
            evaluate(&aut, &word).unwrap(),
            Boolean(true),
            "should accept {:?}",
            w
        );
    }
    for w in &["", "b"] {
        let word: Vec<char> = w.chars().collect();
        assert_eq!(
            evaluate(&aut, &word).unwrap(),
            Boolean(false),
            "should reject {:?}",
            w
        );
    }
}

#[test]
fn every_compilation_algorithm_denotes_the_same_language() {
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    let algos = [
        ExpAlgo::Standard,
        ExpAlgo::Thompson,
        ExpAlgo::CompactThompson,
        ExpAlgo::DerivedTerm,
        ExpAlgo::BreakingDerivedTerm,
    ];
    for text in &["a(a+b)*", "(a+b)*abb", "a?b?a?", "(ab+ba)*", "a{2,4}"] {
        let e = parse_exp(&ctx, text, true).unwrap();
        let mut evaluations: Vec<Vec<Boolean>> = Vec::new();
        for &algo in &algos {
            let aut = proper(&exp_to_aut(&ctx, &e, algo, false).unwrap(), true).unwrap();
            evaluations.push(
                words_up_to(&['a', 'b'], 5)
                    .iter()
                    .map(|w| evaluate(&aut, w).unwrap())
                    .collect(),
            );
        }
        for pair in evaluations.windows(2) {
            assert_eq!(pair[0], pair[1], "algorithms disagree on {}", text);
        }
    }
}

#[test]
fn derived_terms_quotient_the_standard_automaton() {
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    for text in &["a(a+b)*", "(ab)*", "a*b*"] {
        let e = parse_exp(&ctx, text, true).unwrap();
        let glushkov = standard(&ctx, &e).unwrap();
        let antimirov = exp_to_aut(&ctx, &e, ExpAlgo::DerivedTerm, false).unwrap();
        assert!(
            antimirov.state_count() <= glushkov.state_count(),
            "derived terms should not exceed positions for {}",
            text
        );
    }
}

#[test]
fn compilation_then_determinization_then_minimization() {
    // The full pipeline on (a+b)*abb: the minimal DFA has 4 states.
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    let e = parse_exp(&ctx, "(a+b)*abb", true).unwrap();
    let aut = standard(&ctx, &e).unwrap();
    let det = determinize(&aut, false).unwrap();
    let min = min_quotient(&det, false);
    assert_eq!(min.state_count(), 4);
    for (w, expect) in &[("abb", true), ("aabb", true), ("babb", true), ("ab", false)] {
        let word: Vec<char> = w.chars().collect();
        assert_eq!(evaluate(&min, &word).unwrap(), Boolean(*expect));
    }
}

#[test]
fn printing_parses_back_to_the_same_expression() {
    let ctx: Context<char, Boolean> = Context::from_chars("ab");
    for text in &["a(a+b)*", "(a+b)(b+a)", "a*+b*", "a?b", "(ab)*a"] {
        let e = parse_exp(&ctx, text, true).unwrap();
        let printed = print_exp(&e);
        let back = parse_exp(&ctx, &printed, true).unwrap();
        assert_eq!(e, back, "{} printed as {} which parsed differently", text, printed);
    }
}
