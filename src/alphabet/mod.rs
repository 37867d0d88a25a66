use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use nom::bytes::complete::is_not;
use nom::character::complete::{anychar, char as token};
use nom::combinator::{map, verify};
use nom::sequence::{delimited, separated_pair};
use nom::IResult;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters with a syntactic role in rational expressions; they cannot
/// appear inside bare letters.
pub const RESERVED: &str = "()[]{}<>+.*?\\ \t\r\n";

/// A letter of an alphabet: a character, a per-tape tuple, or a word.
pub trait Letter: Clone + Debug + Display + Eq + Ord + Hash {
    /// Recognize one letter at the head of `input`.
    fn parse_letter(input: &str) -> IResult<&str, Self>;

    /// Whether products of such letters need an explicit dot when printed.
    fn needs_separator() -> bool {
        true
    }

    /// The letters from `lo` to `hi` inclusive, for alphabets with a
    /// natural successor; `None` otherwise.
    fn range(lo: &Self, hi: &Self) -> Option<Vec<Self>> {
        let _ = (lo, hi);
        None
    }

    /// Concatenation, for word-like alphabets.
    fn concat(&self, other: &Self) -> Option<Self> {
        let _ = other;
        None
    }

    /// The mirror of the letter under transposition of the automaton.
    fn transpose_letter(&self) -> Self {
        self.clone()
    }
}

impl Letter for char {
    fn parse_letter(input: &str) -> IResult<&str, char> {
        verify(anychar, |c| !RESERVED.contains(*c))(input)
    }

    fn needs_separator() -> bool {
        false
    }

    fn range(lo: &char, hi: &char) -> Option<Vec<char>> {
        Some((*lo..=*hi).collect())
    }
}

/// A two-tape letter, written `[a,b]`; the label alphabet of a
/// letter-to-letter transducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairLetter(pub char, pub char);

impl fmt::Display for PairLetter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{},{}]", self.0, self.1)
    }
}

impl Letter for PairLetter {
    fn parse_letter(input: &str) -> IResult<&str, PairLetter> {
        map(
            delimited(
                token('['),
                separated_pair(
                    verify(anychar, |c| !RESERVED.contains(*c)),
                    token(','),
                    verify(anychar, |c| !RESERVED.contains(*c)),
                ),
                token(']'),
            ),
            |(a, b)| PairLetter(a, b),
        )(input)
    }
}

/// Word labels over characters.
impl Letter for String {
    fn parse_letter(input: &str) -> IResult<&str, String> {
        map(is_not(RESERVED), str::to_owned)(input)
    }

    fn concat(&self, other: &Self) -> Option<String> {
        let mut w = self.clone();
        w.push_str(other);
        Some(w)
    }

    fn transpose_letter(&self) -> String {
        self.chars().rev().collect()
    }
}

/// A transition label: an ordinary letter, the empty word, or the reserved
/// marker carried by the pre/post edges.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Label<A> {
    /// Epsilon, the unit of the free monoid.
    One,
    /// Internal marker for transitions touching the virtual states.
    Special,
    Letter(A),
}

impl<A: Letter> Label<A> {
    pub fn is_letter(&self) -> bool {
        matches!(*self, Label::Letter(_))
    }

    pub fn is_one(&self) -> bool {
        matches!(*self, Label::One)
    }

    pub fn is_special(&self) -> bool {
        matches!(*self, Label::Special)
    }

    pub fn letter(&self) -> Option<&A> {
        match *self {
            Label::Letter(ref a) => Some(a),
            _ => None,
        }
    }

    pub fn transpose(&self) -> Self {
        match *self {
            Label::Letter(ref a) => Label::Letter(a.transpose_letter()),
            ref l => l.clone(),
        }
    }
}

impl<A: Letter> Display for Label<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Label::One => write!(f, "\\e"),
            Label::Special => write!(f, "$"),
            Label::Letter(ref a) => write!(f, "{}", a),
        }
    }
}

/// A finite, ordered set of letters, optionally open for dynamic growth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet<A: Letter> {
    letters: BTreeSet<A>,
    open: bool,
}

impl<A: Letter> Alphabet<A> {
    pub fn new<I: IntoIterator<Item = A>>(letters: I) -> Self {
        Alphabet {
            letters: letters.into_iter().collect(),
            open: false,
        }
    }

    /// An empty alphabet accepting any letter added to it later.
    pub fn open() -> Self {
        Alphabet {
            letters: BTreeSet::new(),
            open: true,
        }
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn contains(&self, letter: &A) -> bool {
        self.letters.contains(letter)
    }

    pub fn add_letter(&mut self, letter: A) {
        self.letters.insert(letter);
    }

    pub fn letters(&self) -> impl Iterator<Item = &A> {
        self.letters.iter()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Checks that `label` may appear on a transition over this alphabet,
    /// recording new letters when the alphabet is open.
    pub fn admit(&mut self, label: &Label<A>) -> Result<()> {
        match *label {
            Label::One | Label::Special => Ok(()),
            Label::Letter(ref a) => {
                if self.letters.contains(a) {
                    Ok(())
                } else if self.open {
                    self.letters.insert(a.clone());
                    Ok(())
                } else {
                    Err(Error::Structural(format!(
                        "letter `{}` does not belong to the alphabet",
                        a
                    )))
                }
            }
        }
    }
}

impl Alphabet<char> {
    /// Shorthand for character alphabets: `Alphabet::chars("ab")`.
    pub fn chars(letters: &str) -> Self {
        Alphabet::new(letters.chars())
    }
}
