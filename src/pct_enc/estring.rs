use super::{encode_to, Assert, EStr, Encoder};
use alloc::{borrow::ToOwned, string::String};
use core::{borrow::Borrow, cmp::Ordering, fmt, hash, marker::PhantomData, ops::Deref};

/// An owned percent-encoded string that only grows by valid pieces.
///
/// Dereferences to [`EStr`], whose documentation explains the encoder
/// parameter `E`.
///
/// # Examples
///
/// Assemble a query from key-value pairs and put it on a URL:
///
/// ```
/// use packed_url::{
///     pct_enc::{encoder::{Data, Query}, EString},
///     Url,
/// };
///
/// let pairs = [("name", "Jürgen"), ("note", "a&b=c")];
/// let mut query = EString::<Query>::new();
/// for (k, v) in pairs {
///     if !query.is_empty() {
///         query.push('&');
///     }
///     // `Data` encodes '&' and '=' so that they stay inside the pair.
///     query.encode_str::<Data>(k);
///     query.push('=');
///     query.encode_str::<Data>(v);
/// }
/// assert_eq!(query, "name=J%C3%BCrgen&note=a%26b%3Dc");
///
/// let mut url = Url::parse("http://example.com/")?.to_owned();
/// url.set_encoded_query(query.as_str())?;
/// assert_eq!(url.as_str(), "http://example.com/?name=J%C3%BCrgen&note=a%26b%3Dc");
/// assert_eq!(url.param_count(), 2);
/// # Ok::<_, packed_url::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct EString<E: Encoder> {
    string: String,
    encoder: PhantomData<E>,
}

impl<E: Encoder> EString<E> {
    pub(crate) fn new_validated(string: String) -> Self {
        Self {
            string,
            encoder: PhantomData,
        }
    }

    /// Creates an empty `EString`.
    #[must_use]
    pub fn new() -> Self {
        Self::new_validated(String::new())
    }

    /// Creates an empty `EString` with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new_validated(String::with_capacity(capacity))
    }

    /// Borrows the contents as an `EStr`.
    #[must_use]
    pub fn as_estr(&self) -> &EStr<E> {
        EStr::new_validated(&self.string)
    }

    /// Percent-encodes `s` with the table of `SubE` and appends the result.
    ///
    /// Spaces become `%20`, never `'+'`. [`Data`] is the usual choice of `SubE`
    /// when the text must not introduce delimiters.
    ///
    /// [`Data`]: super::encoder::Data
    ///
    /// # Panics
    ///
    /// Fails to compile if `SubE` accepts something `E` does not,
    /// or if `SubE` does not accept percent-encoded octets.
    pub fn encode_str<SubE: Encoder>(&mut self, s: &str) {
        self.encode_bytes::<SubE>(s.as_bytes());
    }

    /// Percent-encodes raw bytes with the table of `SubE` and appends the result.
    ///
    /// # Panics
    ///
    /// Fails to compile under the conditions of [`encode_str`](Self::encode_str).
    pub fn encode_bytes<SubE: Encoder>(&mut self, bytes: &[u8]) {
        () = Assert::<SubE, E>::L_IS_SUB_ENCODER_OF_R;
        () = EStr::<SubE>::ASSERT_ALLOWS_PCT_ENCODED;
        encode_to(&mut self.string, bytes, SubE::TABLE);
    }

    /// Appends a character that `E` allows unencoded, typically a delimiter.
    ///
    /// # Panics
    ///
    /// Panics if the table of `E` does not allow `ch`.
    pub fn push(&mut self, ch: char) {
        assert!(
            u8::try_from(ch).is_ok_and(|x| E::TABLE.allows(x)),
            "{ch:?} is not allowed unencoded"
        );
        self.string.push(ch);
    }

    /// Appends an already encoded slice.
    pub fn push_estr(&mut self, s: &EStr<E>) {
        self.string.push_str(s.as_str());
    }

    /// Empties the string, keeping its capacity.
    pub fn clear(&mut self) {
        self.string.clear();
    }

    /// Unwraps the underlying `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.string
    }
}

impl<E: Encoder> Deref for EString<E> {
    type Target = EStr<E>;

    fn deref(&self) -> &EStr<E> {
        self.as_estr()
    }
}

impl<E: Encoder> AsRef<EStr<E>> for EString<E> {
    fn as_ref(&self) -> &EStr<E> {
        self.as_estr()
    }
}

impl<E: Encoder> AsRef<str> for EString<E> {
    fn as_ref(&self) -> &str {
        &self.string
    }
}

impl<E: Encoder> Borrow<EStr<E>> for EString<E> {
    fn borrow(&self) -> &EStr<E> {
        self.as_estr()
    }
}

impl<E: Encoder> From<&EStr<E>> for EString<E> {
    fn from(s: &EStr<E>) -> Self {
        s.to_owned()
    }
}

impl<E: Encoder> From<EString<E>> for String {
    fn from(s: EString<E>) -> Self {
        s.string
    }
}

macro_rules! impl_eq {
    ($($rhs:ty),+) => {
        $(
            impl<E: Encoder> PartialEq<$rhs> for EString<E> {
                fn eq(&self, other: &$rhs) -> bool {
                    let other: &str = other.as_ref();
                    self.string == other
                }
            }
        )+
    };
}

impl_eq!(EString<E>, EStr<E>, str, &str);

impl<E: Encoder> Eq for EString<E> {}

impl<E: Encoder> hash::Hash for EString<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.string.hash(state);
    }
}

impl<E: Encoder> PartialOrd for EString<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Encoder> Ord for EString<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.string.cmp(&other.string)
    }
}

impl<E: Encoder> fmt::Debug for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.string, f)
    }
}

impl<E: Encoder> fmt::Display for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.string, f)
    }
}
