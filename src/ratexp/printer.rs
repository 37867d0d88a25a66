use crate::alphabet::Letter;
use crate::ratexp::RatExp;
use crate::semiring::Semiring;

/// Precedence levels of the expression syntax, loosest first:
/// `+  <  ·  <  *  <  <k>`, external weights binding tightest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Sum,
    Prod,
    Star,
    Weight,
    Atom,
}

fn precedence<A: Letter, W: Semiring>(e: &RatExp<A, W>) -> Prec {
    match *e {
        RatExp::Sum(..) => Prec::Sum,
        RatExp::Prod(..) => Prec::Prod,
        RatExp::Star(_) | RatExp::Maybe(_) | RatExp::Plus(_) => Prec::Star,
        RatExp::LeftWeight(..) | RatExp::RightWeight(..) => Prec::Weight,
        // Multi-character letters stay unambiguous because such alphabets
        // print their products with an explicit dot.
        RatExp::Zero | RatExp::One | RatExp::Atom(_) => Prec::Atom,
    }
}

fn is_postfix<A: Letter, W: Semiring>(e: &RatExp<A, W>) -> bool {
    matches!(
        *e,
        RatExp::Star(_) | RatExp::Maybe(_) | RatExp::Plus(_)
    )
}

/// Serializes the expression under the fixed precedence order, omitting
/// every parenthesis the precedence makes redundant.  Chained sums and
/// products associate to the left, so only right nesting at equal
/// precedence is parenthesized.
pub fn print_exp<A, W>(e: &RatExp<A, W>) -> String
where
    A: Letter,
    W: Semiring,
{
    let mut out = String::new();
    print_into(e, &mut out);
    out
}

fn print_into<A, W>(e: &RatExp<A, W>, out: &mut String)
where
    A: Letter,
    W: Semiring,
{
    match *e {
        RatExp::Zero => out.push_str("\\z"),
        RatExp::One => out.push_str("\\e"),
        RatExp::Atom(ref a) => out.push_str(&a.to_string()),
        RatExp::Sum(ref l, ref r) => {
            child(l, e, false, out);
            out.push('+');
            child(r, e, true, out);
        }
        RatExp::Prod(ref l, ref r) => {
            child(l, e, false, out);
            if A::needs_separator() {
                out.push('.');
            }
            child(r, e, true, out);
        }
        RatExp::Star(ref s) => {
            child(s, e, false, out);
            out.push('*');
        }
        RatExp::Maybe(ref s) => {
            child(s, e, false, out);
            out.push('?');
        }
        RatExp::Plus(ref s) => {
            child(s, e, false, out);
            out.push_str("{1,}");
        }
        RatExp::LeftWeight(ref w, ref s) => {
            out.push('<');
            out.push_str(&w.to_string());
            out.push('>');
            child(s, e, false, out);
        }
        RatExp::RightWeight(ref s, ref w) => {
            child(s, e, false, out);
            out.push('<');
            out.push_str(&w.to_string());
            out.push('>');
        }
    }
}

fn child<A, W>(sub: &RatExp<A, W>, parent: &RatExp<A, W>, right: bool, out: &mut String)
where
    A: Letter,
    W: Semiring,
{
    let ps = precedence(sub);
    let pp = precedence(parent);
    // Postfix operators chain without parentheses: a** is unambiguous.
    let needs_parens = if is_postfix(parent) && is_postfix(sub) {
        false
    } else if ps == pp {
        right
    } else {
        ps < pp
    };
    if needs_parens {
        out.push('(');
        print_into(sub, out);
        out.push(')');
    } else {
        print_into(sub, out);
    }
}
