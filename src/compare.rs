//! Comparison by syntax-based normalization, without allocating.

use crate::{
    component::HostKind,
    pct_enc::{decode_octet, encode_byte, table},
    Url,
};
use borrow_or_share::Bos;
use core::{cmp::Ordering, hash, iter::FusedIterator};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// The bytes of a properly percent-encoded string after normalization.
///
/// A triplet encoding an unreserved character yields the character;
/// any other triplet yields itself with uppercase hexadecimal digits.
#[derive(Clone)]
struct Normalized<'a> {
    bytes: &'a [u8],
    pending: &'static [u8],
    lowercase: bool,
}

impl<'a> Normalized<'a> {
    fn new(s: &'a str, lowercase: bool) -> Self {
        Self {
            bytes: s.as_bytes(),
            pending: &[],
            lowercase,
        }
    }
}

impl Iterator for Normalized<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let [x, rem @ ..] = self.pending {
            self.pending = rem;
            return Some(*x);
        }

        let (&x, rem) = self.bytes.split_first()?;
        let x = match (x, rem) {
            (b'%', &[hi, lo, ref rem @ ..]) => {
                self.bytes = rem;
                let octet = decode_octet(hi, lo);
                if !table::UNRESERVED.allows(octet) {
                    self.pending = &encode_byte(octet).as_bytes()[1..];
                    return Some(b'%');
                }
                octet
            }
            _ => {
                self.bytes = rem;
                x
            }
        };
        Some(if self.lowercase {
            x.to_ascii_lowercase()
        } else {
            x
        })
    }
}

impl FusedIterator for Normalized<'_> {}

fn norm(s: &str) -> Normalized<'_> {
    Normalized::new(s, false)
}

fn norm_lower(s: &str) -> Normalized<'_> {
    Normalized::new(s, true)
}

fn cmp_opt<T>(a: Option<T>, b: Option<T>, f: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => f(a, b),
    }
}

fn cmp_host(a: Url<&str>, b: Url<&str>) -> Ordering {
    let (ka, kb) = (a.host_kind(), b.host_kind());
    if ka != kb {
        return ka.cmp(&kb);
    }
    match ka {
        HostKind::None => Ordering::Equal,
        HostKind::Ipv4 | HostKind::Ipv6 => a.ip_address().cmp(&b.ip_address()),
        HostKind::IpvFuture => ascii_lower(a.encoded_host()).cmp(ascii_lower(b.encoded_host())),
        HostKind::Name => norm_lower(a.encoded_host()).cmp(norm_lower(b.encoded_host())),
    }
}

fn ascii_lower(s: &str) -> impl Iterator<Item = u8> + '_ {
    s.bytes().map(|x| x.to_ascii_lowercase())
}

fn significant_digits(port: &str) -> &str {
    port.trim_start_matches('0')
}

fn cmp_port(a: &str, b: &str) -> Ordering {
    (!a.is_empty()).cmp(&!b.is_empty()).then_with(|| {
        let (a, b) = (significant_digits(a), significant_digits(b));
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    })
}

pub(crate) fn compare(a: Url<&str>, b: Url<&str>) -> Ordering {
    cmp_opt(a.scheme(), b.scheme(), |x, y| {
        ascii_lower(x.as_str()).cmp(ascii_lower(y.as_str()))
    })
    .then_with(|| cmp_opt(a.user(), b.user(), |x, y| norm(x.as_str()).cmp(norm(y.as_str()))))
    .then_with(|| {
        cmp_opt(a.password(), b.password(), |x, y| {
            norm(x.as_str()).cmp(norm(y.as_str()))
        })
    })
    .then_with(|| cmp_host(a, b))
    .then_with(|| cmp_opt(a.port(), b.port(), cmp_port))
    .then_with(|| norm(a.path().as_str()).cmp(norm(b.path().as_str())))
    .then_with(|| cmp_opt(a.query(), b.query(), |x, y| norm(x.as_str()).cmp(norm(y.as_str()))))
    .then_with(|| {
        cmp_opt(a.fragment(), b.fragment(), |x, y| {
            norm(x.as_str()).cmp(norm(y.as_str()))
        })
    })
}

/// FNV-1a over tagged byte streams. Tags are never ASCII,
/// so no two different streams feed the same bytes.
struct Fnv(u64);

impl Fnv {
    fn write(&mut self, bytes: impl IntoIterator<Item = u8>) {
        for x in bytes {
            self.0 ^= u64::from(x);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn tag(&mut self, tag: u8) {
        self.write([0x80 | tag]);
    }

    fn opt<T>(&mut self, tag: u8, opt: Option<T>, f: impl FnOnce(&mut Self, T)) {
        match opt {
            Some(v) => {
                self.tag(tag);
                f(self, v);
            }
            None => self.tag(0x40 | tag),
        }
    }
}

pub(crate) fn digest(u: Url<&str>, seed: u64) -> u64 {
    let mut h = Fnv(FNV_OFFSET);
    h.write(seed.to_le_bytes());

    h.opt(0, u.scheme(), |h, s| h.write(ascii_lower(s.as_str())));
    h.opt(1, u.user(), |h, s| h.write(norm(s.as_str())));
    h.opt(2, u.password(), |h, s| h.write(norm(s.as_str())));

    h.tag(3);
    match u.host_kind() {
        HostKind::None => h.tag(0x10),
        HostKind::Ipv4 => {
            h.tag(0x11);
            h.write(u.ip_address());
        }
        HostKind::Ipv6 => {
            h.tag(0x12);
            h.write(u.ip_address());
        }
        HostKind::IpvFuture => {
            h.tag(0x13);
            h.write(ascii_lower(u.encoded_host()));
        }
        HostKind::Name => {
            h.tag(0x14);
            h.write(norm_lower(u.encoded_host()));
        }
    }

    h.opt(4, u.port(), |h, port| {
        if port.is_empty() {
            h.tag(0x20);
        } else {
            h.tag(0x21);
            h.write(significant_digits(port).bytes());
        }
    });

    h.tag(5);
    h.write(norm(u.path().as_str()));
    h.opt(6, u.query(), |h, s| h.write(norm(s.as_str())));
    h.opt(7, u.fragment(), |h, s| h.write(norm(s.as_str())));
    h.0
}

impl<T: Bos<str>> Url<T> {
    /// Compares two URLs by syntax-based normalization.
    ///
    /// Components are compared in order: scheme, user, password, host, port,
    /// path, query, fragment. An absent component orders before a present one.
    ///
    /// - The scheme ignores case.
    /// - Percent-encoded octets are compared as if every one encoding an
    ///   unreserved character were decoded and the rest had uppercase hexadecimal digits.
    /// - Hosts order by [kind](crate::component::HostKind) first. Registered names
    ///   and IPvFuture addresses ignore case; IP addresses compare by their bytes.
    /// - Ports compare by value, ignoring leading zeros. An empty port orders
    ///   before any number, and an absent port never equals a present one.
    ///
    /// Dot segments are **not** removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::Url;
    /// use std::cmp::Ordering;
    ///
    /// let a = Url::parse("HTTP://example.com/%7euser")?;
    /// let b = Url::parse("http://EXAMPLE.com/~user")?;
    /// assert_eq!(a.compare(&b), Ordering::Equal);
    /// assert_eq!(a, b);
    ///
    /// let a = Url::parse("http://example.com/A")?;
    /// let b = Url::parse("http://example.com/a")?;
    /// assert_ne!(a, b);
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    #[must_use]
    pub fn compare<U: Bos<str>>(&self, other: &Url<U>) -> Ordering {
        compare(self.view(), other.view())
    }

    /// Hashes the normalized form of the URL with a seed.
    ///
    /// URLs that [`compare`](Self::compare) equal have equal digests.
    #[must_use]
    pub fn digest(&self, seed: u64) -> u64 {
        digest(self.view(), seed)
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<Url<U>> for Url<T> {
    fn eq(&self, other: &Url<U>) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl<T: Bos<str>> Eq for Url<T> {}

impl<T: Bos<str>> PartialOrd for Url<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for Url<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<T: Bos<str>> hash::Hash for Url<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        state.write_u64(self.digest(0));
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    fn normalized(s: &str) -> alloc::vec::Vec<u8> {
        norm(s).collect()
    }

    #[test]
    fn normalized_stream() {
        assert_eq!(normalized("%7e%41%2f%2F"), b"~A%2F%2F");
        assert_eq!(normalized("a%c3%a9"), b"a%C3%A9");
        assert_eq!(norm_lower("Ex%41mple").collect::<alloc::vec::Vec<_>>(), b"example");
    }

    #[test]
    fn ports_compare_by_value() {
        assert_eq!(cmp_port("080", "80"), Ordering::Equal);
        assert_eq!(cmp_port("", "0"), Ordering::Less);
        assert_eq!(cmp_port("9", "10"), Ordering::Less);
        assert_eq!(cmp_port("65536", "65535"), Ordering::Greater);
    }
}
