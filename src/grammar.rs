//! A small combinator engine for ABNF rules.
//!
//! A [`Rule`] consumes a prefix of the input remaining in a [`Reader`] and
//! yields a value. On failure, the position of the reader is unspecified and
//! the caller must discard it. The combinators [`alt`], [`optional`], [`repeat`]
//! and [`separated`] restore the position themselves before trying something else.
//!
//! Rules never allocate and never panic.
//!
//! # Examples
//!
//! ```
//! use packed_url::grammar::{self, ch, dec_octet, Reader, Rule};
//!
//! let ipv4 = (dec_octet(), ch(b'.'), dec_octet(), ch(b'.'), dec_octet(), ch(b'.'), dec_octet());
//!
//! let (a, _, b, _, c, _, d) = grammar::parse_all("192.168.0.1", &ipv4)?;
//! assert_eq!([a, b, c, d], [192, 168, 0, 1]);
//!
//! // Leading zeros are rejected.
//! assert!(grammar::parse_all("192.168.00.1", &ipv4).is_err());
//! # Ok::<_, packed_url::Error>(())
//! ```

use crate::{
    error::{err, Error, ErrorKind, Production, Result},
    pct_enc::{is_hexdig_pair, Table},
};

/// A cursor over the input of a rule.
///
/// # Invariants
///
/// `pos <= bytes.len()`, and `pos` only moves forward
/// except when a combinator restores a saved position.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader at the start of a string.
    #[must_use]
    pub fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    /// Creates a reader over `bytes[start..end]` that reports absolute indexes.
    pub(crate) fn with_bounds(bytes: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            bytes: &bytes[..end],
            pos: start,
        }
    }

    /// Returns the current position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.bytes.len());
        self.pos = pos;
    }

    /// Returns the end of the input.
    #[must_use]
    pub fn end(&self) -> usize {
        self.bytes.len()
    }

    /// Checks whether any input remains.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    /// Returns the byte `i` bytes ahead of the current position.
    #[must_use]
    pub fn peek(&self, i: usize) -> Option<u8> {
        self.bytes.get(self.pos + i).copied()
    }

    pub(crate) fn skip(&mut self, n: usize) {
        self.pos += n;
        debug_assert!(self.pos <= self.bytes.len());
    }

    pub(crate) fn read_str(&mut self, s: &str) -> bool {
        if self.bytes[self.pos..].starts_with(s.as_bytes()) {
            self.skip(s.len());
            true
        } else {
            false
        }
    }

    pub(crate) fn peek_digit(&self, i: usize) -> Option<u32> {
        self.peek(i).and_then(|x| (x as char).to_digit(10))
    }
}

/// A grammar rule.
pub trait Rule {
    /// The value yielded on success.
    type Output;

    /// Consumes a prefix of the remaining input.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input does not match the rule.
    fn parse(&self, r: &mut Reader<'_>) -> Result<Self::Output>;
}

impl<R: Rule + ?Sized> Rule for &R {
    type Output = R::Output;

    fn parse(&self, r: &mut Reader<'_>) -> Result<R::Output> {
        (**self).parse(r)
    }
}

/// Runs a rule over an entire string.
///
/// # Errors
///
/// Returns `Err` if the rule fails or does not consume the whole string.
pub fn parse_all<R: Rule>(s: &str, rule: R) -> Result<R::Output> {
    let mut r = Reader::new(s);
    let out = rule.parse(&mut r)?;
    if r.has_remaining() {
        err!(r.pos(), Syntax(Char));
    }
    Ok(out)
}

/// A range of consumed input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Index of the first byte.
    pub start: usize,
    /// Index one past the last byte.
    pub end: usize,
}

impl Span {
    /// Returns the length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Checks whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// See [`ch`].
#[derive(Clone, Copy, Debug)]
pub struct Char(u8);

/// Matches a single byte.
#[must_use]
pub const fn ch(x: u8) -> Char {
    Char(x)
}

impl Rule for Char {
    type Output = ();

    fn parse(&self, r: &mut Reader<'_>) -> Result<()> {
        if r.peek(0) == Some(self.0) {
            r.skip(1);
            Ok(())
        } else {
            err!(r.pos(), Syntax(Char))
        }
    }
}

/// See [`lit`].
#[derive(Clone, Copy, Debug)]
pub struct Lit(&'static str);

/// Matches a literal string, case-sensitively.
#[must_use]
pub const fn lit(s: &'static str) -> Lit {
    Lit(s)
}

impl Rule for Lit {
    type Output = ();

    fn parse(&self, r: &mut Reader<'_>) -> Result<()> {
        if r.read_str(self.0) {
            Ok(())
        } else {
            err!(r.pos(), Syntax(Char))
        }
    }
}

/// See [`one_of`].
#[derive(Clone, Copy, Debug)]
pub struct OneOf(Table);

/// Matches a single unencoded byte allowed by a table.
#[must_use]
pub const fn one_of(table: Table) -> OneOf {
    OneOf(table)
}

impl Rule for OneOf {
    type Output = u8;

    fn parse(&self, r: &mut Reader<'_>) -> Result<u8> {
        match r.peek(0) {
            Some(x) if self.0.allows(x) => {
                r.skip(1);
                Ok(x)
            }
            _ => err!(r.pos(), Syntax(Char)),
        }
    }
}

/// See [`token`].
#[derive(Clone, Copy, Debug)]
pub struct Token(Table);

/// Matches the longest run of bytes allowed by a table, possibly empty.
///
/// If the table [allows percent-encoded octets], each `'%'` must start a
/// well-formed triplet, consumed as a unit. A malformed triplet fails with
/// [`InvalidEncoding`] at the `'%'`.
///
/// [allows percent-encoded octets]: Table::allows_pct_encoded
/// [`InvalidEncoding`]: ErrorKind::InvalidEncoding
#[must_use]
pub const fn token(table: Table) -> Token {
    Token(table)
}

impl Rule for Token {
    type Output = Span;

    fn parse(&self, r: &mut Reader<'_>) -> Result<Span> {
        let (start, end) = (r.pos, r.bytes.len());
        let mut i = start;

        while i < end {
            let x = r.bytes[i];
            if x == b'%' && self.0.allows_pct_encoded() {
                if i + 2 >= end || !is_hexdig_pair(r.bytes[i + 1], r.bytes[i + 2]) {
                    err!(i, InvalidEncoding);
                }
                i += 3;
            } else if self.0.allows(x) {
                i += 1;
            } else {
                break;
            }
        }

        r.pos = i;
        Ok(Span { start, end: i })
    }
}

/// See [`not_empty`].
#[derive(Clone, Copy, Debug)]
pub struct NotEmpty<R>(R, Production);

/// Fails with a syntax error naming `production` if `rule` matches nothing.
#[must_use]
pub const fn not_empty<R: Rule<Output = Span>>(rule: R, production: Production) -> NotEmpty<R> {
    NotEmpty(rule, production)
}

impl<R: Rule<Output = Span>> Rule for NotEmpty<R> {
    type Output = Span;

    fn parse(&self, r: &mut Reader<'_>) -> Result<Span> {
        let span = self.0.parse(r)?;
        if span.is_empty() {
            return Err(Error::syntax(span.start, self.1));
        }
        Ok(span)
    }
}

/// See [`named`].
#[derive(Clone, Copy, Debug)]
pub struct Named<R>(Production, R);

/// Reports the syntax errors of `rule` as failures to match `production`.
#[must_use]
pub const fn named<R: Rule>(production: Production, rule: R) -> Named<R> {
    Named(production, rule)
}

impl<R: Rule> Rule for Named<R> {
    type Output = R::Output;

    fn parse(&self, r: &mut Reader<'_>) -> Result<R::Output> {
        self.1.parse(r).map_err(|e| match e.kind {
            ErrorKind::Syntax(_) => Error::syntax(e.index, self.0),
            _ => e,
        })
    }
}

/// See [`alt`].
#[derive(Clone, Copy, Debug)]
pub struct Alt<A, B>(A, B);

/// Tries `a`, then `b` from the same position; the first match wins.
///
/// On failure, the error that got further into the input is returned.
#[must_use]
pub const fn alt<A, B>(a: A, b: B) -> Alt<A, B>
where
    A: Rule,
    B: Rule<Output = A::Output>,
{
    Alt(a, b)
}

impl<A, B> Rule for Alt<A, B>
where
    A: Rule,
    B: Rule<Output = A::Output>,
{
    type Output = A::Output;

    fn parse(&self, r: &mut Reader<'_>) -> Result<A::Output> {
        let save = r.pos;
        let ea = match self.0.parse(r) {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        r.pos = save;
        self.1
            .parse(r)
            .map_err(|eb| if eb.index >= ea.index { eb } else { ea })
    }
}

/// Only a syntax error means the input does not match here.
/// Malformed triplets and other errors stop the whole parse.
fn is_mismatch(e: &Error) -> bool {
    matches!(e.kind, ErrorKind::Syntax(_))
}

/// See [`optional`].
#[derive(Clone, Copy, Debug)]
pub struct Optional<R>(R);

/// Matches `rule` or nothing.
#[must_use]
pub const fn optional<R: Rule>(rule: R) -> Optional<R> {
    Optional(rule)
}

impl<R: Rule> Rule for Optional<R> {
    type Output = Option<R::Output>;

    fn parse(&self, r: &mut Reader<'_>) -> Result<Option<R::Output>> {
        let save = r.pos;
        match self.0.parse(r) {
            Ok(v) => Ok(Some(v)),
            Err(e) if is_mismatch(&e) => {
                r.pos = save;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// See [`repeat`].
#[derive(Clone, Copy, Debug)]
pub struct Repeat<R> {
    min: usize,
    max: usize,
    elem: R,
}

/// Matches `elem` between `min` and `max` times, greedily, yielding the count.
///
/// Repetition stops at the first element that fails with a syntax error
/// or consumes nothing. Any other error is returned.
#[must_use]
pub const fn repeat<R: Rule>(min: usize, max: usize, elem: R) -> Repeat<R> {
    Repeat { min, max, elem }
}

impl<R: Rule> Rule for Repeat<R> {
    type Output = usize;

    fn parse(&self, r: &mut Reader<'_>) -> Result<usize> {
        let mut n = 0;
        while n < self.max {
            let save = r.pos;
            match self.elem.parse(r) {
                Ok(_) if r.pos == save => {
                    n += 1;
                    break;
                }
                Ok(_) => n += 1,
                Err(e) if n < self.min || !is_mismatch(&e) => return Err(e),
                Err(_) => {
                    r.pos = save;
                    break;
                }
            }
        }
        if n < self.min {
            err!(r.pos, Syntax(Char));
        }
        Ok(n)
    }
}

/// See [`separated`].
#[derive(Clone, Copy, Debug)]
pub struct Separated<R, D> {
    min: usize,
    max: usize,
    elem: R,
    delim: D,
}

/// Matches between `min` and `max` occurrences of `elem` separated by `delim`,
/// yielding the count.
///
/// Once a delimiter matches, the element after it must match too:
/// there is no backtracking across consumed delimiters.
#[must_use]
pub const fn separated<R: Rule, D: Rule>(
    min: usize,
    max: usize,
    elem: R,
    delim: D,
) -> Separated<R, D> {
    Separated {
        min,
        max,
        elem,
        delim,
    }
}

impl<R: Rule, D: Rule> Rule for Separated<R, D> {
    type Output = usize;

    fn parse(&self, r: &mut Reader<'_>) -> Result<usize> {
        if self.max == 0 {
            return Ok(0);
        }

        let save = r.pos;
        match self.elem.parse(r) {
            Ok(_) => {}
            Err(e) if self.min == 0 && is_mismatch(&e) => {
                r.pos = save;
                return Ok(0);
            }
            Err(e) => return Err(e),
        }

        let mut n = 1;
        while n < self.max {
            let save = r.pos;
            match self.delim.parse(r) {
                Ok(_) => {}
                Err(e) if is_mismatch(&e) => {
                    r.pos = save;
                    break;
                }
                Err(e) => return Err(e),
            }
            self.elem.parse(r)?;
            n += 1;
        }

        if n < self.min {
            err!(r.pos, Syntax(Char));
        }
        Ok(n)
    }
}

/// See [`dec_octet`].
#[derive(Clone, Copy, Debug)]
pub struct DecOctet(());

/// Matches a `dec-octet`: a decimal number from 0 to 255 without leading zeros.
#[must_use]
pub const fn dec_octet() -> DecOctet {
    DecOctet(())
}

impl Rule for DecOctet {
    type Output = u8;

    fn parse(&self, r: &mut Reader<'_>) -> Result<u8> {
        let start = r.pos;
        let Some(mut res) = r.peek_digit(0) else {
            err!(start, Syntax(Ipv4Address));
        };
        if res == 0 {
            r.skip(1);
            return Ok(0);
        }

        let mut i = 1;
        while i < 3 {
            match r.peek_digit(i) {
                Some(x) => res = res * 10 + x,
                None => break,
            }
            i += 1;
        }

        match u8::try_from(res) {
            Ok(x) => {
                r.skip(i);
                Ok(x)
            }
            Err(_) => err!(start, Syntax(Ipv4Address)),
        }
    }
}

macro_rules! impl_seq {
    ($($T:ident . $i:tt),+) => {
        /// Matches each rule in order, short-circuiting on the first failure.
        impl<$($T: Rule),+> Rule for ($($T,)+) {
            type Output = ($($T::Output,)+);

            fn parse(&self, r: &mut Reader<'_>) -> Result<Self::Output> {
                Ok(($(self.$i.parse(r)?,)+))
            }
        }
    };
}

impl_seq!(A.0, B.1);
impl_seq!(A.0, B.1, C.2);
impl_seq!(A.0, B.1, C.2, D.3);
impl_seq!(A.0, B.1, C.2, D.3, E.4);
impl_seq!(A.0, B.1, C.2, D.3, E.4, F.5);
impl_seq!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
impl_seq!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pct_enc::table::{ALPHA, DIGIT, HEXDIG, PCHAR, SEGMENT};

    #[test]
    fn token_treats_triplets_as_units() {
        let mut r = Reader::new("a%20b/c");
        assert_eq!(token(SEGMENT).parse(&mut r), Ok(Span { start: 0, end: 5 }));
        assert_eq!(r.pos(), 5);

        let mut r = Reader::new("a%2x");
        let e = token(PCHAR).parse(&mut r).unwrap_err();
        assert_eq!((e.kind(), e.index()), (ErrorKind::InvalidEncoding, 1));
    }

    #[test]
    fn alt_restores_position() {
        let rule = alt((ch(b'a'), ch(b'b')), (ch(b'a'), ch(b'c')));
        assert!(parse_all("ac", &rule).is_ok());
        let e = parse_all("ad", &rule).unwrap_err();
        assert_eq!(e.index(), 1);
    }

    #[test]
    fn optional_and_repeat() {
        let mut r = Reader::new("xyz");
        assert_eq!(optional(ch(b'a')).parse(&mut r), Ok(None));
        assert_eq!(r.pos(), 0);

        assert_eq!(parse_all("abc", repeat(1, 8, one_of(ALPHA))), Ok(3));
        assert!(parse_all("", repeat(1, 8, one_of(ALPHA))).is_err());

        let mut r = Reader::new("abcdef");
        assert_eq!(repeat(0, 4, one_of(ALPHA)).parse(&mut r), Ok(4));
        assert_eq!(r.pos(), 4);
    }

    #[test]
    fn separated_counts_elements() {
        let rule = separated(0, usize::MAX, token(HEXDIG), ch(b':'));
        assert_eq!(parse_all("a:b::c", &rule), Ok(4));
        assert_eq!(parse_all("", &rule), Ok(1));

        let bounded = separated(2, 3, not_empty(token(DIGIT), Production::Port), ch(b'.'));
        assert_eq!(parse_all("1.2", &bounded), Ok(2));
        assert!(parse_all("1", &bounded).is_err());
        assert!(parse_all("1.", &bounded).is_err());
    }

    #[test]
    fn bad_triplet_is_not_a_mismatch() {
        let seq = separated(0, usize::MAX, token(SEGMENT), ch(b'/'));
        let e = parse_all("%zz/a", &seq).unwrap_err();
        assert_eq!((e.kind(), e.index()), (ErrorKind::InvalidEncoding, 0));

        let e = parse_all("a/b%2", &seq).unwrap_err();
        assert_eq!((e.kind(), e.index()), (ErrorKind::InvalidEncoding, 3));

        let mut r = Reader::new("%g1");
        let e = optional(token(PCHAR)).parse(&mut r).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidEncoding);

        let mut r = Reader::new("ab%");
        let e = repeat(0, 4, token(PCHAR)).parse(&mut r).unwrap_err();
        assert_eq!((e.kind(), e.index()), (ErrorKind::InvalidEncoding, 2));
    }

    #[test]
    fn named_relabels_syntax_errors() {
        let e = parse_all("x", named(Production::Scheme, one_of(DIGIT))).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Syntax(Production::Scheme));
    }

    #[test]
    fn dec_octet_is_strict() {
        assert_eq!(parse_all("0", dec_octet()), Ok(0));
        assert_eq!(parse_all("255", dec_octet()), Ok(255));
        assert!(parse_all("256", dec_octet()).is_err());
        assert!(parse_all("01", dec_octet()).is_err());
        assert!(parse_all("1000", dec_octet()).is_err());
    }
}
