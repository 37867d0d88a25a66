use nom::bytes::complete::is_not;
use nom::character::complete::{char as token, digit1, multispace0};
use nom::combinator::opt;
use nom::error::{Error as NomError, ErrorKind};
use nom::sequence::delimited;
use nom::{Err, IResult};

use crate::alphabet::{Alphabet, Letter};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::ratexp::RatExp;
use crate::semiring::Semiring;

/// Parses a rational expression in the text syntax.
///
/// The grammar, loosest binding first: sums `E+E`, products `EF` (an
/// explicit dot is accepted and required between multi-character
/// letters), the postfix operators `*`, `?` and `{n}`/`{n,m}`/`{n,}`/
/// `{,m}`, and weight brackets `<w>E` / `E<w>`.  `\e` is the unit, `\z`
/// the zero; the empty string is rejected.  `[abc]` and `[a-c]` abbreviate
/// sums of letters.  Spaces are not significant.
///
/// With `strict`, letters outside the context's alphabet are rejected.
pub fn parse_exp<A, W>(ctx: &Context<A, W>, input: &str, strict: bool) -> Result<RatExp<A, W>>
where
    A: Letter,
    W: Semiring,
{
    let parser: ExpParser<A, W> = ExpParser {
        alphabet: &ctx.alphabet,
        strict,
        _weights: ::std::marker::PhantomData,
    };
    match parser.expr(input.trim_start()) {
        Ok((rest, e)) => {
            let rest = rest.trim_start();
            if rest.is_empty() {
                Ok(e)
            } else {
                Err(Error::Parse(format!(
                    "unexpected trailing input: `{}`",
                    rest
                )))
            }
        }
        Err(_) => Err(Error::Parse(format!("malformed expression: `{}`", input))),
    }
}

fn sp(input: &str) -> IResult<&str, &str> {
    multispace0(input)
}

struct ExpParser<'c, A: Letter, W: Semiring> {
    alphabet: &'c Alphabet<A>,
    strict: bool,
    _weights: ::std::marker::PhantomData<W>,
}

impl<'c, A: Letter, W: Semiring> ExpParser<'c, A, W> {
    fn expr<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        let (mut rest, mut e) = self.prod(input)?;
        loop {
            let save = rest;
            let (r, _) = sp(rest)?;
            match r.strip_prefix('+') {
                Some(r) => {
                    let (r, _) = sp(r)?;
                    let (r, next) = self.prod(r)?;
                    e = RatExp::add(e, next);
                    rest = r;
                }
                None => {
                    rest = save;
                    break;
                }
            }
        }
        Ok((rest, e))
    }

    fn prod<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        let (mut rest, mut e) = self.term(input)?;
        loop {
            let save = rest;
            let (r, _) = sp(rest)?;
            let r = match r.strip_prefix('.') {
                Some(r) => sp(r)?.0,
                None => r,
            };
            match self.term(r) {
                Ok((r, next)) => {
                    e = RatExp::mul(e, next);
                    rest = r;
                }
                Err(Err::Failure(f)) => return Err(Err::Failure(f)),
                Err(_) => {
                    rest = save;
                    break;
                }
            }
        }
        Ok((rest, e))
    }

    fn term<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        let (mut rest, mut e) = self.factor(input)?;
        loop {
            let save = rest;
            let (r, _) = sp(rest)?;
            if let Some(r) = r.strip_prefix('*') {
                e = RatExp::star(e);
                rest = r;
            } else if let Some(r) = r.strip_prefix('?') {
                e = RatExp::maybe(e);
                rest = r;
            } else if r.starts_with('{') {
                let (r, (lo, hi)) = exponent(r)?;
                e = expand_exponent(e, lo, hi);
                rest = r;
            } else {
                rest = save;
                break;
            }
        }
        Ok((rest, e))
    }

    fn factor<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        let mut prefixes: Vec<W> = Vec::new();
        let mut rest = input;
        while rest.starts_with('<') {
            let (r, w) = self.weight(rest)?;
            prefixes.push(w);
            rest = sp(r)?.0;
        }
        let (mut rest, mut e) = self.atom(rest)?;
        loop {
            let save = rest;
            let r = sp(rest)?.0;
            if r.starts_with('<') {
                let (r, w) = self.weight(r)?;
                e = RatExp::rmul(e, w);
                rest = r;
            } else {
                rest = save;
                break;
            }
        }
        for w in prefixes.into_iter().rev() {
            e = RatExp::lmul(w, e);
        }
        Ok((rest, e))
    }

    fn atom<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        if let Some(rest) = input.strip_prefix("\\e") {
            return Ok((rest, RatExp::one()));
        }
        if let Some(rest) = input.strip_prefix("\\z") {
            return Ok((rest, RatExp::zero()));
        }
        if let Some(rest) = input.strip_prefix('(') {
            let (rest, _) = sp(rest)?;
            let (rest, e) = self.expr(rest)?;
            let (rest, _) = sp(rest)?;
            let (rest, _) = token(')')(rest)?;
            return Ok((rest, e));
        }
        if let Ok((rest, a)) = A::parse_letter(input) {
            self.check_letter(input, &a)?;
            return Ok((rest, RatExp::atom(a)));
        }
        if input.starts_with('[') {
            return self.letter_list(input);
        }
        Err(Err::Error(NomError::new(input, ErrorKind::Alt)))
    }

    fn weight<'a>(&self, input: &'a str) -> IResult<&'a str, W> {
        let (rest, txt) = delimited(token('<'), is_not("<>"), token('>'))(input)?;
        match txt.trim().parse::<W>() {
            Ok(w) => Ok((rest, w)),
            Err(_) => Err(Err::Failure(NomError::new(input, ErrorKind::MapRes))),
        }
    }

    /// `[abc]` and `[a-c]`: a sum over the enumerated letters.
    fn letter_list<'a>(&self, input: &'a str) -> IResult<&'a str, RatExp<A, W>> {
        let (mut rest, _) = token('[')(input)?;
        let mut letters: Vec<A> = Vec::new();
        loop {
            if let Some(r) = rest.strip_prefix(']') {
                rest = r;
                break;
            }
            let (r, a) = A::parse_letter(rest)?;
            // A dash between two letters is a range; a trailing dash is
            // the letter itself.
            if r.starts_with('-') && !r[1..].starts_with(']') {
                let (r, b) = A::parse_letter(&r[1..])?;
                match A::range(&a, &b) {
                    Some(range) => letters.extend(range),
                    None => return Err(Err::Failure(NomError::new(rest, ErrorKind::Verify))),
                }
                rest = r;
            } else {
                letters.push(a);
                rest = r;
            }
        }
        if letters.is_empty() {
            return Err(Err::Error(NomError::new(input, ErrorKind::Many1)));
        }
        for a in &letters {
            self.check_letter(input, a)?;
        }
        let mut iter = letters.into_iter();
        let mut e = RatExp::atom(iter.next().unwrap());
        for a in iter {
            e = RatExp::add(e, RatExp::atom(a));
        }
        Ok((rest, e))
    }

    fn check_letter<'a>(&self, at: &'a str, a: &A) -> IResult<&'a str, ()> {
        if self.strict && !self.alphabet.contains(a) {
            Err(Err::Failure(NomError::new(at, ErrorKind::Verify)))
        } else {
            Ok((at, ()))
        }
    }
}

/// `{n}`, `{n,m}`, `{n,}`, `{,m}`; returns `(lo, Some(hi))` or
/// `(lo, None)` for an unbounded exponent.
fn exponent(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    let (rest, _) = token('{')(input)?;
    let (rest, _) = sp(rest)?;
    let (rest, lo) = opt(digit1)(rest)?;
    let (rest, _) = sp(rest)?;
    let (rest, comma) = opt(token(','))(rest)?;
    let (rest, _) = sp(rest)?;
    let (rest, hi) = opt(digit1)(rest)?;
    let (rest, _) = sp(rest)?;
    let (rest, _) = token('}')(rest)?;

    let number = |digits: &str| {
        digits
            .parse::<u32>()
            .map_err(|_| Err::Failure(NomError::new(input, ErrorKind::MapRes)))
    };
    let bounds = match (lo, comma, hi) {
        (Some(n), None, None) => {
            let n = number(n)?;
            (n, Some(n))
        }
        (Some(n), Some(_), None) => (number(n)?, None),
        (None, Some(_), Some(m)) => (0, Some(number(m)?)),
        (Some(n), Some(_), Some(m)) => (number(n)?, Some(number(m)?)),
        (None, Some(_), None) => (0, None),
        _ => return Err(Err::Failure(NomError::new(input, ErrorKind::Verify))),
    };
    if let (n, Some(m)) = bounds {
        if n > m {
            return Err(Err::Failure(NomError::new(input, ErrorKind::Verify)));
        }
    }
    Ok((rest, bounds))
}

fn expand_exponent<A, W>(e: RatExp<A, W>, lo: u32, hi: Option<u32>) -> RatExp<A, W>
where
    A: Letter,
    W: Semiring,
{
    let power = |n: u32| {
        let mut p = RatExp::one();
        for _ in 0..n {
            p = RatExp::mul(p, e.clone());
        }
        p
    };
    match hi {
        Some(m) => {
            // E{n,m} = Eⁿ(1 + E + … + E^(m-n))
            let mut sum = RatExp::one();
            let mut pow = RatExp::one();
            for _ in lo..m {
                pow = RatExp::mul(pow, e.clone());
                sum = RatExp::add(sum, pow.clone());
            }
            RatExp::mul(power(lo), sum)
        }
        None if lo == 1 => RatExp::plus(e),
        None => {
            let head = power(lo);
            RatExp::mul(head, RatExp::star(e))
        }
    }
}
