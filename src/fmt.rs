use crate::{
    component::Scheme,
    pct_enc::{EStr, Encoder},
    Url,
};
use borrow_or_share::Bos;
use core::fmt;

impl<T: Bos<str>> fmt::Debug for Url<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Url")
            .field("scheme", &self.scheme())
            .field("user", &self.user())
            .field("password", &self.password())
            .field("host", &self.host())
            .field("port", &self.port())
            .field("path", &self.path())
            .field("query", &self.query())
            .field("fragment", &self.fragment())
            .finish()
    }
}

impl<T: Bos<str>> fmt::Display for Url<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl<E: Encoder> fmt::Debug for EStr<E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<E: Encoder> fmt::Display for EStr<E> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

/// Writes an IPv6 address in the canonical text form of RFC 5952, without brackets.
///
/// Hex digits are lowercase with leading zeros dropped. The longest run
/// of two or more zero groups, the first one on a tie, becomes `"::"`.
/// IPv4-mapped addresses end in dotted decimal.
#[cfg(feature = "alloc")]
pub(crate) struct Ipv6Display(pub [u8; 16]);

#[cfg(feature = "alloc")]
impl Ipv6Display {
    fn groups(&self) -> [u16; 8] {
        let mut groups = [0; 8];
        for (g, pair) in groups.iter_mut().zip(self.0.chunks_exact(2)) {
            *g = u16::from(pair[0]) << 8 | u16::from(pair[1]);
        }
        groups
    }
}

/// Returns the start and length of the longest run of zero groups.
#[cfg(feature = "alloc")]
fn longest_zero_run(groups: &[u16; 8]) -> (usize, usize) {
    let mut best = (0, 0);
    let mut i = 0;
    while i < groups.len() {
        let len = groups[i..].iter().take_while(|&&g| g == 0).count();
        if len > best.1 {
            best = (i, len);
        }
        i += len.max(1);
    }
    best
}

#[cfg(feature = "alloc")]
fn write_groups(f: &mut fmt::Formatter<'_>, groups: &[u16]) -> fmt::Result {
    for (i, g) in groups.iter().enumerate() {
        if i > 0 {
            f.write_str(":")?;
        }
        write!(f, "{g:x}")?;
    }
    Ok(())
}

#[cfg(feature = "alloc")]
impl fmt::Display for Ipv6Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, a, b, c, d] = self.0 {
            return write!(f, "::ffff:{a}.{b}.{c}.{d}");
        }

        let groups = self.groups();
        match longest_zero_run(&groups) {
            (start, len) if len >= 2 => {
                write_groups(f, &groups[..start])?;
                f.write_str("::")?;
                write_groups(f, &groups[start + len..])
            }
            _ => write_groups(f, &groups),
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::Ipv6Display;
    use alloc::string::ToString;

    fn v6(segments: [u16; 8]) -> [u8; 16] {
        let mut out = [0; 16];
        for (i, seg) in segments.iter().enumerate() {
            out[i * 2..i * 2 + 2].copy_from_slice(&seg.to_be_bytes());
        }
        out
    }

    #[test]
    fn ipv6_canonical_form() {
        let cases = [
            ([0, 0, 0, 0, 0, 0, 0, 1], "::1"),
            ([0, 0, 0, 0, 0, 0, 0, 0], "::"),
            ([0x2001, 0xdb8, 0, 0, 1, 0, 0, 1], "2001:db8::1:0:0:1"),
            ([0x2001, 0xdb8, 0, 1, 1, 1, 1, 1], "2001:db8:0:1:1:1:1:1"),
            ([0, 0, 0, 0, 0, 0xffff, 0x0102, 0x0304], "::ffff:1.2.3.4"),
            ([0xfe80, 0, 0, 0, 0xabcd, 0, 0, 0], "fe80::abcd:0:0:0"),
        ];
        for (segments, expected) in cases {
            assert_eq!(Ipv6Display(v6(segments)).to_string(), expected);
        }
    }
}
