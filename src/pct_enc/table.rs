//! Character-set tables for the URL grammar.
//!
//! Each constant names the production of [RFC 3986] whose characters it
//! lists. Tables that end in a percent-encoded alternative also accept
//! `%XX` triplets.
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986#appendix-A

use super::is_hexdig_pair;

/// A set of ASCII bytes, plus a flag telling whether `%XX` triplets are accepted.
///
/// Lookups are a single bit test. The byte `'%'` is never a member of
/// the set itself; it can only start a triplet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table {
    ascii: u128,
    pct_encoded: bool,
}

impl Table {
    /// Builds a table from a list of allowed bytes.
    ///
    /// # Panics
    ///
    /// Panics if a byte is `b'%'` or not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut ascii = 0u128;
        while let [x, rem @ ..] = bytes {
            assert!(*x < 128 && *x != b'%', "table byte must be ASCII and not %");
            ascii |= 1u128 << *x;
            bytes = rem;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    /// Returns the union of two tables.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self {
            ascii: self.ascii | other.ascii,
            pct_encoded: self.pct_encoded || other.pct_encoded,
        }
    }

    /// Returns a copy of this table that also accepts percent-encoded octets.
    #[must_use]
    pub const fn or_pct_encoded(self) -> Self {
        Self {
            ascii: self.ascii,
            pct_encoded: true,
        }
    }

    /// Returns the bytes of `self` that `other` does not allow.
    ///
    /// Percent-encoded octets stay accepted unless `other` accepts them too.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self {
            ascii: self.ascii & !other.ascii,
            pct_encoded: self.pct_encoded && !other.pct_encoded,
        }
    }

    /// Returns `true` if `other` accepts everything `self` accepts.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.ascii & other.ascii == self.ascii && (!self.pct_encoded || other.pct_encoded)
    }

    /// Returns `true` if the byte may appear unencoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::table::{PCHAR, UNRESERVED};
    ///
    /// assert!(UNRESERVED.allows(b'~'));
    /// assert!(!UNRESERVED.allows(b'@'));
    /// assert!(PCHAR.allows(b'@'));
    /// assert!(!PCHAR.allows(b'%'));
    /// ```
    #[inline]
    #[must_use]
    pub const fn allows(self, x: u8) -> bool {
        x < 128 && self.ascii & (1u128 << x) != 0
    }

    /// Returns `true` if `%XX` triplets are accepted.
    #[inline]
    #[must_use]
    pub const fn allows_pct_encoded(self) -> bool {
        self.pct_encoded
    }

    /// Returns `true` if every byte of `s` is allowed, or starts
    /// a well-formed triplet when triplets are accepted.
    pub(crate) const fn accepts(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if s[i] == b'%' && self.pct_encoded {
                if i + 2 >= s.len() || !is_hexdig_pair(s[i + 1], s[i + 2]) {
                    return false;
                }
                i += 3;
            } else if self.allows(s[i]) {
                i += 1;
            } else {
                return false;
            }
        }
        true
    }
}

const fn set(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

/// Letters `A-Z` and `a-z`.
pub const ALPHA: Table = set(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// Decimal digits.
pub const DIGIT: Table = set(b"0123456789");

/// Hexadecimal digits of either case.
pub const HEXDIG: Table = DIGIT.or(set(b"ABCDEFabcdef"));

/// `unreserved`: letters, digits and `-._~`.
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(set(b"-._~"));

/// `gen-delims`: the component delimiters `:/?#[]@`.
pub const GEN_DELIMS: Table = set(b":/?#[]@");

/// `sub-delims`: `!$&'()*+,;=`.
pub const SUB_DELIMS: Table = set(b"!$&'()*+,;=");

/// `reserved`: both kinds of delimiters.
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// Characters after the first letter of a scheme.
pub const SCHEME: Table = ALPHA.or(DIGIT).or(set(b"+-."));

/// `userinfo`, including the `':'` between user and password.
pub const USERINFO: Table = UNRESERVED.or(SUB_DELIMS).or(set(b":")).or_pct_encoded();

/// The user, which ends at the first `':'` of userinfo.
pub const USER: Table = USERINFO.sub(set(b":"));

/// The password, which may contain further `':'`.
pub const PASSWORD: Table = USERINFO;

/// Characters after the `"v" HEXDIG "."` prefix of an `IPvFuture` literal.
pub const IPV_FUTURE: Table = UNRESERVED.or(SUB_DELIMS).or(set(b":"));

/// `reg-name`.
pub const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS).or_pct_encoded();

/// `pchar`, the characters of a path segment.
pub const PCHAR: Table = UNRESERVED.or(SUB_DELIMS).or(set(b":@")).or_pct_encoded();

/// A single path segment.
pub const SEGMENT: Table = PCHAR;

/// The first segment of a relative path with no scheme, where `':'` is not allowed.
pub const SEGMENT_NC: Table = PCHAR.sub(set(b":"));

/// A whole path.
pub const PATH: Table = PCHAR.or(set(b"/"));

/// `query`.
pub const QUERY: Table = PCHAR.or(set(b"/?"));

/// `fragment`, which shares the characters of a query.
pub const FRAGMENT: Table = QUERY;

/// The key or value of a query param, which ends at `'&'`.
pub const PARAM: Table = QUERY.sub(set(b"&"));

/// The key of a query param, which also ends at `'='`.
pub const PARAM_KEY: Table = PARAM.sub(set(b"="));

/// Only unreserved characters and triplets, for data that must never
/// be mistaken for a delimiter.
pub const DATA: Table = UNRESERVED.or_pct_encoded();
