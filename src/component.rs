//! URL components.

use crate::pct_enc::{encoder::RegName, table, EStr};
use ref_cast::{ref_cast_custom, RefCastCustom};

#[cfg(feature = "net")]
use core::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// The scheme of a URL, such as `http`.
///
/// Equality ignores ASCII case, as RFC 3986 treats scheme names.
/// Use [`as_str`](Self::as_str) to see the text as written.
///
/// # Examples
///
/// ```
/// use packed_url::{component::{Scheme, SchemeId}, Url};
///
/// const HTTP: &Scheme = Scheme::new_or_panic("http");
///
/// let url = Url::parse("HTTP://EXAMPLE.COM/")?;
/// let scheme = url.scheme().unwrap();
/// assert_eq!(scheme, HTTP);
/// assert_eq!(scheme.as_str(), "HTTP");
/// assert_eq!(scheme.id(), SchemeId::Http);
/// assert_eq!(scheme.default_port(), Some(80));
/// # Ok::<_, packed_url::Error>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Scheme {
    name: str,
}

impl Scheme {
    #[ref_cast_custom]
    pub(crate) const fn new_validated(name: &str) -> &Scheme;

    /// Checks a scheme name, panicking if it is invalid.
    ///
    /// # Panics
    ///
    /// Panics unless `s` is a letter followed by letters, digits, `'+'`, `'-'` or `'.'`.
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Scheme {
        match Self::new(s) {
            Some(scheme) => scheme,
            None => panic!("invalid scheme name"),
        }
    }

    /// Checks a scheme name.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Scheme> {
        match s.as_bytes() {
            [first, rest @ ..] if first.is_ascii_alphabetic() && table::SCHEME.accepts(rest) => {
                Some(Scheme::new_validated(s))
            }
            _ => None,
        }
    }

    /// Returns the name as written.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns the identifier of the scheme.
    #[must_use]
    pub fn id(&self) -> SchemeId {
        SchemeId::from_scheme(&self.name)
    }

    /// Returns the default port of a well-known scheme.
    #[must_use]
    pub fn default_port(&self) -> Option<u16> {
        self.id().default_port()
    }
}

impl PartialEq for Scheme {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Scheme {}

/// Identifies a well-known scheme, for quick dispatch without string comparison.
///
/// The identifier is computed once, when a URL is parsed or its scheme is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum SchemeId {
    /// No scheme is present.
    #[default]
    None,
    /// A scheme is present but is not one of the others.
    Unknown,
    /// `ftp`
    Ftp,
    /// `file`
    File,
    /// `http`
    Http,
    /// `https`
    Https,
    /// `ws`
    Ws,
    /// `wss`
    Wss,
}

impl SchemeId {
    /// Looks up a scheme name, ignoring case.
    ///
    /// Returns [`Unknown`](Self::Unknown) for names that are not recognized.
    #[must_use]
    pub fn from_scheme(s: &str) -> Self {
        const KNOWN: [(&str, SchemeId); 6] = [
            ("ftp", SchemeId::Ftp),
            ("file", SchemeId::File),
            ("http", SchemeId::Http),
            ("https", SchemeId::Https),
            ("ws", SchemeId::Ws),
            ("wss", SchemeId::Wss),
        ];
        KNOWN
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map_or(Self::Unknown, |&(_, id)| id)
    }

    /// Returns the default port of the scheme, if any.
    #[must_use]
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Ftp => Some(21),
            Self::Http | Self::Ws => Some(80),
            Self::Https | Self::Wss => Some(443),
            Self::None | Self::Unknown | Self::File => None,
        }
    }
}

/// Names one of the eight components of a URL, in buffer order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// The scheme.
    Scheme,
    /// The user part of the userinfo.
    User,
    /// The password part of the userinfo.
    Password,
    /// The host.
    Host,
    /// The port.
    Port,
    /// The path.
    Path,
    /// The query.
    Query,
    /// The fragment.
    Fragment,
}

impl Component {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// The kind of a host, recorded when the host is parsed or set.
///
/// Kinds are ordered as declared, which is the order used when comparing hosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostKind {
    /// No authority is present.
    #[default]
    None,
    /// An IPv4 address.
    Ipv4,
    /// An IPv6 address, written between brackets.
    Ipv6,
    /// An IP address of a future version, written between brackets.
    IpvFuture,
    /// A registered name, possibly empty.
    Name,
}

/// A host, as recognized by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Host<'a> {
    /// An IPv4 address, in network byte order.
    Ipv4([u8; 4]),
    /// An IPv6 address, in network byte order.
    Ipv6([u8; 16]),
    /// The text of an `IPvFuture` literal, such as `v7.x`, without the brackets.
    IpvFuture(&'a str),
    /// A registered name, which compares case-insensitively.
    RegName(&'a EStr<RegName>),
}

impl Host<'_> {
    /// Returns the kind of the host.
    #[must_use]
    pub fn kind(&self) -> HostKind {
        match self {
            Self::Ipv4(_) => HostKind::Ipv4,
            Self::Ipv6(_) => HostKind::Ipv6,
            Self::IpvFuture(_) => HostKind::IpvFuture,
            Self::RegName(_) => HostKind::Name,
        }
    }

    /// Returns the address of an IPv4 or IPv6 host.
    #[cfg(feature = "net")]
    #[must_use]
    pub fn to_ip_addr(&self) -> Option<IpAddr> {
        match *self {
            Self::Ipv4(octets) => Some(IpAddr::V4(Ipv4Addr::from(octets))),
            Self::Ipv6(octets) => Some(IpAddr::V6(Ipv6Addr::from(octets))),
            Self::IpvFuture(_) | Self::RegName(_) => None,
        }
    }
}
