//! Percent-encoding and decoding.
//!
//! The free functions work on plain slices and report malformed input
//! as errors: [`decoded_size`], [`validate`], [`decode`], [`encoded_size`],
//! [`encode`] and [`encode_to`]. The [`EStr`] and [`EString`] types instead
//! carry proof of well-formedness for a particular [`Encoder`].

mod decode;
pub mod encoder;
#[cfg(feature = "alloc")]
mod estring;
mod iter;
pub mod table;

pub use decode::{Decode, DecodedChunk};
#[cfg(feature = "alloc")]
pub use estring::EString;
pub use iter::{Params, QueryParam, Segments, Split};
pub use table::Table;

pub(crate) use iter::{param_count, segment_count};

use crate::error::{err, Result};
use core::{cmp::Ordering, hash, marker::PhantomData, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

#[cfg(feature = "alloc")]
use alloc::{borrow::ToOwned, string::String, vec::Vec};

/// Names the [`Table`] that an [`EStr`] or [`EString`] is encoded with.
///
/// # Sub-encoders
///
/// `SubE` is a sub-encoder of `E` when `SubE::TABLE` is a [subset] of
/// `E::TABLE`, so that anything encoded with `SubE` is also valid for `E`.
///
/// [subset]: Table::is_subset
pub trait Encoder: 'static {
    /// What may appear in the encoded text.
    const TABLE: Table;
}

/// A borrowed string known to be well-formed for the encoder `E`.
///
/// Every byte either is allowed by `E::TABLE` or belongs to a `%XX`
/// triplet, and triplets only occur when `E::TABLE` accepts them.
/// [`EString`] is the owned form.
///
/// Comparison and hashing look at the raw bytes, so `"%7E"` and `"~"`
/// are different slices. Use [`Url::compare`] for equivalence.
///
/// [`Url::compare`]: crate::Url::compare
///
/// # Examples
///
/// ```
/// use packed_url::Url;
///
/// let url = Url::parse("?name=J%C3%BCrgen&city=M%C3%BCnchen")?;
/// let first = url.params().next().unwrap();
/// assert_eq!(first.key, "name");
/// assert_eq!(first.value.unwrap().decode().to_string().unwrap(), "Jürgen");
/// # Ok::<_, packed_url::Error>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

#[cfg(feature = "alloc")]
struct Assert<L: Encoder, R: Encoder> {
    _marker: PhantomData<(L, R)>,
}

#[cfg(feature = "alloc")]
impl<L: Encoder, R: Encoder> Assert<L, R> {
    const L_IS_SUB_ENCODER_OF_R: () = assert!(L::TABLE.is_subset(R::TABLE), "not a sub-encoder");
}

impl<E: Encoder> EStr<E> {
    const ASSERT_ALLOWS_PCT_ENCODED: () = assert!(
        E::TABLE.allows_pct_encoded(),
        "encoder does not accept percent-encoded octets"
    );

    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// The empty slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Checks `s` against `E`, panicking if it is not well-formed.
    ///
    /// Meant for constants. See [`new`](Self::new) for the fallible form.
    ///
    /// # Panics
    ///
    /// Panics if `s` is not well-formed for `E`.
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("string is not well-formed for the encoder"),
        }
    }

    /// Checks `s` against `E`.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if E::TABLE.accepts(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Returns the uppercase triplet encoding `x`, whatever `E` allows unencoded.
    ///
    /// # Panics
    ///
    /// Fails to compile if `E` does not accept percent-encoded octets.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::{encoder::Path, EStr};
    ///
    /// assert_eq!(EStr::<Path>::encode_byte(b'A'), "%41");
    /// assert_eq!(EStr::<Path>::encode_byte(0xfe), "%FE");
    /// ```
    #[must_use]
    pub fn encode_byte(x: u8) -> &'static Self {
        () = Self::ASSERT_ALLOWS_PCT_ENCODED;
        Self::new_validated(encode_byte(x))
    }

    /// Returns the encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the length after decoding.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        decoded_len_unchecked(&self.inner)
    }

    /// Decodes the slice lazily. `'+'` is left as is.
    ///
    /// Split on delimiters first: a decoded `%2F` is indistinguishable from `'/'`.
    ///
    /// # Panics
    ///
    /// Fails to compile if `E` does not accept percent-encoded octets.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::{encoder::Path, EStr};
    ///
    /// let dec = EStr::<Path>::new_or_panic("%C2%A1Hola%21").decode();
    /// assert_eq!(*dec.clone().to_bytes(), [0xc2, 0xa1, 0x48, 0x6f, 0x6c, 0x61, 0x21]);
    /// assert_eq!(dec.to_string().unwrap(), "¡Hola!");
    /// ```
    pub fn decode(&self) -> Decode<'_> {
        () = Self::ASSERT_ALLOWS_PCT_ENCODED;
        Decode::new(&self.inner, false)
    }

    /// Decodes the slice lazily, turning `'+'` into a space.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::{encoder::Param, EStr};
    ///
    /// let value = EStr::<Param>::new_or_panic("a+b%2Bc");
    /// assert_eq!(value.decode_query().to_string().unwrap(), "a b+c");
    /// assert_eq!(value.decode().to_string().unwrap(), "a+b+c");
    /// ```
    pub fn decode_query(&self) -> Decode<'_> {
        () = Self::ASSERT_ALLOWS_PCT_ENCODED;
        Decode::new(&self.inner, true)
    }

    /// Splits on every occurrence of a reserved delimiter.
    ///
    /// # Panics
    ///
    /// Panics if `delim` is not a reserved character. Splitting on anything
    /// else could cut through a triplet.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::{encoder::Path, EStr};
    ///
    /// assert!(EStr::<Path>::new_or_panic("a,b,c").split(',').eq(["a", "b", "c"]));
    /// assert!(EStr::<Path>::new_or_panic(",").split(',').eq(["", ""]));
    /// assert!(EStr::<Path>::EMPTY.split(',').eq([""]));
    /// ```
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert_reserved(delim);
        Split::new(&self.inner, delim)
    }

    /// Splits around the first occurrence of a reserved delimiter.
    ///
    /// # Panics
    ///
    /// Panics if `delim` is not a reserved character.
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert_reserved(delim);
        let (head, tail) = self.inner.split_once(delim)?;
        Some((Self::new_validated(head), Self::new_validated(tail)))
    }
}

fn assert_reserved(delim: char) {
    assert!(
        u8::try_from(delim).is_ok_and(|x| table::RESERVED.allows(x)),
        "{delim:?} is not a reserved character"
    );
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

macro_rules! impl_eq_str {
    ($($lhs:ty, $rhs:ty;)+) => {
        $(
            impl<E: Encoder> PartialEq<$rhs> for $lhs {
                fn eq(&self, other: &$rhs) -> bool {
                    let (a, b): (&str, &str) = (self.as_ref(), other.as_ref());
                    a == b
                }
            }
        )+
    };
}

impl_eq_str! {
    EStr<E>, EStr<E>;
    EStr<E>, str;
    EStr<E>, &str;
    str, EStr<E>;
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EStr<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EStr<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<E: Encoder> Default for &EStr<E> {
    fn default() -> Self {
        EStr::EMPTY
    }
}

#[cfg(feature = "alloc")]
impl<E: Encoder> ToOwned for EStr<E> {
    type Owned = EString<E>;

    fn to_owned(&self) -> EString<E> {
        EString::new_validated(self.inner.into())
    }
}

impl EStr<encoder::Path> {
    /// Returns `true` if the path starts with `'/'`.
    #[inline]
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Returns `true` if the path does not start with `'/'`. The empty path is rootless.
    #[inline]
    #[must_use]
    pub fn is_rootless(&self) -> bool {
        !self.is_absolute()
    }

    /// Iterates over the segments of the path.
    ///
    /// A single leading `'/'` is dropped before splitting, so `""` and `"/"`
    /// have no segments. `%2F` stays inside its segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::Url;
    ///
    /// let path = Url::parse("file:///path/to//dir/")?.path();
    /// assert!(path.segments().eq(["path", "to", "", "dir", ""]));
    ///
    /// let path = Url::parse("foo:bar/baz")?.path();
    /// assert!(path.segments().eq(["bar", "baz"]));
    ///
    /// let path = Url::parse("/a%2Fb")?.path();
    /// assert!(path.segments().eq(["a%2Fb"]));
    ///
    /// assert_eq!(Url::parse("http://example.com/")?.path().segments().count(), 0);
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(&self.inner)
    }
}

impl EStr<encoder::Query> {
    /// Iterates over the `'&'`-separated params, each split at its first `'='`.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::pct_enc::{encoder::Query, EStr};
    ///
    /// let query = EStr::<Query>::new_or_panic("a=1&b&c=x=y");
    /// let params: Vec<_> = query
    ///     .params()
    ///     .map(|p| (p.key.as_str(), p.value.map(|v| v.as_str())))
    ///     .collect();
    /// assert_eq!(params, [("a", Some("1")), ("b", None), ("c", Some("x=y"))]);
    /// ```
    pub fn params(&self) -> Params<'_> {
        Params::new(&self.inner)
    }
}

pub(crate) const fn is_hexdig_pair(x: u8, y: u8) -> bool {
    x.is_ascii_hexdigit() && y.is_ascii_hexdigit()
}

/// Returns the value of a hexadecimal digit.
pub(crate) const fn decode_hexdigit(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'A'..=b'F' => Some(x - b'A' + 10),
        b'a'..=b'f' => Some(x - b'a' + 10),
        _ => None,
    }
}

/// Decodes the two hexadecimal digits of a triplet.
pub(crate) fn decode_octet(hi: u8, lo: u8) -> u8 {
    debug_assert!(is_hexdig_pair(hi, lo));
    match (decode_hexdigit(hi), decode_hexdigit(lo)) {
        (Some(hi), Some(lo)) => hi << 4 | lo,
        _ => 0,
    }
}

const TRIPLETS: [u8; 768] = {
    const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = [0; 768];
    let mut x = 0;
    while x < 256 {
        out[x * 3] = b'%';
        out[x * 3 + 1] = UPPER_HEX[x >> 4];
        out[x * 3 + 2] = UPPER_HEX[x & 0xf];
        x += 1;
    }
    out
};

const TRIPLETS_STR: &str = match str::from_utf8(&TRIPLETS) {
    Ok(s) => s,
    Err(_) => panic!("triplets are ASCII"),
};

/// Returns the uppercase triplet for `x`.
pub(crate) fn encode_byte(x: u8) -> &'static str {
    let i = usize::from(x) * 3;
    &TRIPLETS_STR[i..i + 3]
}

/// Returns the decoded length of a well-formed slice.
pub(crate) fn decoded_len_unchecked(s: &str) -> usize {
    s.len() - 2 * s.bytes().filter(|&x| x == b'%').count()
}

/// Walks `s`, checking every triplet and, when given, every plain byte
/// against `table`. Returns the decoded length.
fn scan(s: &str, table: Option<Table>) -> Result<usize> {
    let bytes = s.as_bytes();
    let (mut i, mut len) = (0, 0);
    while let Some(&x) = bytes.get(i) {
        if x == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some(&[hi, lo]) if is_hexdig_pair(hi, lo) => i += 3,
                _ => err!(i, InvalidEncoding),
            }
        } else if table.map_or(true, |t| t.allows(x)) {
            i += 1;
        } else {
            err!(i, IllegalChar);
        }
        len += 1;
    }
    Ok(len)
}

/// Returns the number of bytes `s` decodes to.
///
/// # Errors
///
/// Returns [`InvalidEncoding`] at a `'%'` that is not followed by two
/// hexadecimal digits.
///
/// [`InvalidEncoding`]: crate::ErrorKind::InvalidEncoding
///
/// # Examples
///
/// ```
/// use packed_url::{pct_enc, ErrorKind};
///
/// assert_eq!(pct_enc::decoded_size("a%20b"), Ok(3));
/// assert_eq!(pct_enc::decoded_size("a%2").unwrap_err().kind(), ErrorKind::InvalidEncoding);
/// ```
pub fn decoded_size(s: &str) -> Result<usize> {
    scan(s, None)
}

/// Checks `s` against a table and returns its decoded length.
///
/// Triplets are accepted even when the table does not
/// [accept](Table::allows_pct_encoded) them.
///
/// # Errors
///
/// Returns [`IllegalChar`] at the first plain byte the table does not allow,
/// or [`InvalidEncoding`] at a malformed triplet.
///
/// [`IllegalChar`]: crate::ErrorKind::IllegalChar
/// [`InvalidEncoding`]: crate::ErrorKind::InvalidEncoding
///
/// # Examples
///
/// ```
/// use packed_url::{pct_enc::{self, table}, ErrorKind};
///
/// assert_eq!(pct_enc::validate("a%2Fb", table::SEGMENT), Ok(3));
///
/// let e = pct_enc::validate("a/b", table::SEGMENT).unwrap_err();
/// assert_eq!((e.kind(), e.index()), (ErrorKind::IllegalChar, 1));
/// ```
pub fn validate(s: &str, table: Table) -> Result<usize> {
    scan(s, Some(table))
}

/// Returns the length of `raw` once encoded with `table`.
///
/// # Examples
///
/// ```
/// use packed_url::pct_enc::{self, table};
///
/// assert_eq!(pct_enc::encoded_size(b"a b", table::UNRESERVED), 5);
/// ```
#[must_use]
pub fn encoded_size(raw: &[u8], table: Table) -> usize {
    raw.len() + 2 * raw.iter().filter(|&&x| !table.allows(x)).count()
}

/// Appends `raw` to `buf`, encoding every byte that `table` does not allow.
///
/// `'%'` is always encoded. Triplets use uppercase hexadecimal digits.
#[cfg(feature = "alloc")]
pub fn encode_to(buf: &mut String, raw: &[u8], table: Table) {
    buf.reserve(encoded_size(raw, table));
    for &x in raw {
        if table.allows(x) {
            buf.push(char::from(x));
        } else {
            buf.push_str(encode_byte(x));
        }
    }
}

/// Encodes `raw` with `table`.
///
/// # Examples
///
/// ```
/// use packed_url::pct_enc::{self, table};
///
/// assert_eq!(pct_enc::encode(b"a b/c%", table::SEGMENT), "a%20b%2Fc%25");
/// assert_eq!(pct_enc::encode("Grüße".as_bytes(), table::UNRESERVED), "Gr%C3%BC%C3%9Fe");
/// ```
#[cfg(feature = "alloc")]
#[must_use]
pub fn encode(raw: &[u8], table: Table) -> String {
    let mut buf = String::new();
    encode_to(&mut buf, raw, table);
    buf
}

/// Decodes `s` into bytes. In query mode, `'+'` becomes a space.
///
/// # Errors
///
/// Returns [`InvalidEncoding`] at a malformed triplet.
///
/// [`InvalidEncoding`]: crate::ErrorKind::InvalidEncoding
///
/// # Examples
///
/// ```
/// use packed_url::pct_enc;
///
/// assert_eq!(pct_enc::decode("a+b%2B", false)?, b"a+b+");
/// assert_eq!(pct_enc::decode("a+b%2B", true)?, b"a b+");
/// # Ok::<_, packed_url::Error>(())
/// ```
#[cfg(feature = "alloc")]
pub fn decode(s: &str, query: bool) -> Result<Vec<u8>> {
    decoded_size(s)?;
    Ok(Decode::new(s, query).to_bytes().into_owned())
}
