//! Error types.

use core::fmt;

/// An ABNF production from RFC 3986 that failed to match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Production {
    /// A single expected character or literal.
    Char,
    /// `scheme`
    Scheme,
    /// `authority`
    Authority,
    /// `userinfo`
    Userinfo,
    /// `host`
    Host,
    /// `IP-literal`
    IpLiteral,
    /// `IPv6address`
    Ipv6Address,
    /// `IPvFuture`
    IpvFuture,
    /// `IPv4address`
    Ipv4Address,
    /// `port`
    Port,
    /// `path`
    Path,
    /// `query`
    Query,
    /// `fragment`
    Fragment,
    /// `URI`
    Uri,
    /// `relative-ref`
    RelativeRef,
    /// `absolute-URI`
    AbsoluteUri,
    /// `origin-form` from RFC 9112.
    OriginForm,
}

impl Production {
    fn name(self) -> &'static str {
        match self {
            Self::Char => "character",
            Self::Scheme => "scheme",
            Self::Authority => "authority",
            Self::Userinfo => "userinfo",
            Self::Host => "host",
            Self::IpLiteral => "IP-literal",
            Self::Ipv6Address => "IPv6address",
            Self::IpvFuture => "IPvFuture",
            Self::Ipv4Address => "IPv4address",
            Self::Port => "port",
            Self::Path => "path",
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::Uri => "URI",
            Self::RelativeRef => "relative-ref",
            Self::AbsoluteUri => "absolute-URI",
            Self::OriginForm => "origin-form",
        }
    }
}

/// Detailed cause of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input does not match the grammar.
    ///
    /// The error index points to the first byte that could not be matched.
    Syntax(Production),
    /// A `'%'` not followed by two hexadecimal digits.
    ///
    /// The error index points to the `'%'`.
    InvalidEncoding,
    /// A byte outside the allowed character set.
    ///
    /// The error index points to the byte.
    IllegalChar,
    /// An editor argument cannot form a valid component.
    ///
    /// The error index is relative to the argument.
    InvalidArgument,
    /// A numeric field does not fit in its representation.
    ///
    /// The error index points to the first byte of the field.
    Overflow,
}

/// An error occurred when parsing, validating, or editing a URL.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Error {
    pub(crate) index: usize,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) const fn new(index: usize, kind: ErrorKind) -> Self {
        Self { index, kind }
    }

    pub(crate) const fn syntax(index: usize, production: Production) -> Self {
        Self::new(index, ErrorKind::Syntax(production))
    }

    /// Returns the index at which the error occurred.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the detailed cause of the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Re-labels an editor input failure, keeping its index.
    pub(crate) fn into_invalid_argument(self) -> Self {
        Self::new(self.index, ErrorKind::InvalidArgument)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Syntax(p) => write!(f, "unexpected input in {} at index ", p.name())?,
            ErrorKind::InvalidEncoding => f.write_str("invalid percent-encoded octet at index ")?,
            ErrorKind::IllegalChar => f.write_str("illegal character at index ")?,
            ErrorKind::InvalidArgument => f.write_str("invalid argument at index ")?,
            ErrorKind::Overflow => f.write_str("numeric overflow at index ")?,
        }
        write!(f, "{}", self.index)
    }
}

#[cfg(feature = "impl-error")]
impl core::error::Error for Error {}

pub(crate) type Result<T, E = Error> = core::result::Result<T, E>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, Syntax($p:ident)) => {
        return Err($crate::error::Error::syntax(
            $index,
            $crate::error::Production::$p,
        ))
    };
    ($index:expr, $kind:ident) => {
        return Err($crate::error::Error::new(
            $index,
            $crate::error::ErrorKind::$kind,
        ))
    };
}

pub(crate) use err;
