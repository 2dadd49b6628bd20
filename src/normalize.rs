//! In-place syntax-based normalization.

use crate::{
    component::{HostKind, Scheme},
    fmt::Ipv6Display,
    imp::id,
    parse::{self, HostInfo},
    pct_enc::{decode_octet, table::UNRESERVED},
    Url,
};
use alloc::{format, string::String};

/// Configurable normalization of a [`Url<String>`].
///
/// The default performs syntax-based normalization as described in
/// Section 6.2.2 of RFC 3986:
///
/// - The scheme and a registered name or IPvFuture host are lowercased.
/// - Percent-encoded octets that encode an unreserved character are decoded;
///   the hexadecimal digits of the rest are uppercased.
/// - An IPv6 address is rewritten in the canonical form of RFC 5952.
/// - Dot segments are removed from an absolute path.
///
/// # Examples
///
/// ```
/// use packed_url::{Normalizer, Url};
///
/// let mut url = Url::parse("HTTP://Example.COM:80/a/./b/../%7ec")?.to_owned();
/// Normalizer::new().remove_default_port(true).normalize(&mut url);
/// assert_eq!(url.as_str(), "http://example.com/a/~c");
/// # Ok::<_, packed_url::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
#[must_use]
pub struct Normalizer {
    remove_default_port: bool,
}

impl Normalizer {
    /// Creates a new `Normalizer` with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to remove a port equal to the default port of the scheme.
    ///
    /// Defaults to `false`. A removed port no longer [compares](Url::compare)
    /// equal to the original.
    pub fn remove_default_port(mut self, value: bool) -> Self {
        self.remove_default_port = value;
        self
    }

    /// Normalizes the URL in place.
    pub fn normalize(&self, url: &mut Url<String>) {
        url.normalize_scheme();
        url.normalize_authority();
        if self.remove_default_port {
            if let Some(default) = url.scheme().and_then(Scheme::default_port) {
                if url.port_u16() == Ok(Some(default)) {
                    url.remove_port();
                }
            }
        }
        url.normalize_path();
        url.normalize_query();
        url.normalize_fragment();
    }
}

impl Url<String> {
    /// Normalizes every component in place with the default [`Normalizer`].
    ///
    /// Normalization is idempotent. Apart from dot-segment removal,
    /// the result [compares](Self::compare) equal to the original.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::Url;
    ///
    /// let mut url = Url::parse("eXAMPLE://a/./b/../b/%63/%7bfoo%7d")?.to_owned();
    /// url.normalize();
    /// assert_eq!(url.as_str(), "example://a/b/c/%7Bfoo%7D");
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    pub fn normalize(&mut self) {
        Normalizer::new().normalize(self);
    }

    /// Lowercases the scheme.
    pub fn normalize_scheme(&mut self) {
        let range = self.meta.range(id::SCHEME);
        self.val[range].make_ascii_lowercase();
    }

    /// Normalizes the userinfo and the host.
    ///
    /// A registered name may turn into an IPv4 address once decoded,
    /// in which case the host kind is updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::{component::HostKind, Url};
    ///
    /// let mut url = Url::parse("//%41b%2a@%31%32%37.0.0.1")?.to_owned();
    /// assert_eq!(url.host_kind(), HostKind::Name);
    ///
    /// url.normalize_authority();
    /// assert_eq!(url.as_str(), "//Ab%2A@127.0.0.1");
    /// assert_eq!(url.host_kind(), HostKind::Ipv4);
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    pub fn normalize_authority(&mut self) {
        if !self.meta.has_authority() {
            return;
        }

        let mut buf = String::new();
        if let Some(user) = self.user() {
            normalize_estr(&mut buf, user.as_str(), false);
            let user = ["//", &buf].concat();
            self.resize_component(id::USER, id::PASS, &user);
        }
        if let Some(password) = self.password() {
            buf.clear();
            normalize_estr(&mut buf, password.as_str(), false);
            let password = [":", &buf, "@"].concat();
            self.resize_component(id::PASS, id::HOST, &password);
        }

        let host = self.encoded_host();
        let (text, info) = match self.meta.host_kind {
            HostKind::None | HostKind::Ipv4 => return,
            HostKind::Ipv6 => {
                let addr = self.meta.ip_addr;
                let info = HostInfo {
                    kind: HostKind::Ipv6,
                    addr,
                };
                (format!("[{}]", Ipv6Display(addr)), info)
            }
            HostKind::IpvFuture => {
                let info = HostInfo {
                    kind: HostKind::IpvFuture,
                    addr: [0; 16],
                };
                (host.to_ascii_lowercase(), info)
            }
            HostKind::Name => {
                buf.clear();
                normalize_estr(&mut buf, host, true);
                match parse::parse_host(buf.as_bytes(), 0, buf.len()) {
                    Ok(info) => (buf, info),
                    Err(_) => return,
                }
            }
        };
        self.apply_host(&text, info);
    }

    /// Normalizes the path.
    ///
    /// Dot segments are removed from a path starting with `'/'`.
    /// Without an authority, `"/."` is prepended to a result starting with `"//"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::Url;
    ///
    /// let mut url = Url::parse("http://example.com/a/./b/../c")?.to_owned();
    /// url.normalize_path();
    /// assert_eq!(url.as_str(), "http://example.com/a/c");
    ///
    /// let mut url = Url::parse("foo:/.//bar")?.to_owned();
    /// url.normalize_path();
    /// assert_eq!(url.as_str(), "foo:/.//bar");
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    pub fn normalize_path(&mut self) {
        let mut buf = String::new();
        normalize_estr(&mut buf, self.path().as_str(), false);

        let path = if buf.starts_with('/') {
            let mut out = String::with_capacity(buf.len());
            remove_dot_segments(&mut out, &buf);
            if !self.meta.has_authority() && out.starts_with("//") {
                out.insert_str(0, "/.");
            }
            out
        } else {
            buf
        };
        self.apply_path(&path);
    }

    /// Normalizes the query, if any.
    pub fn normalize_query(&mut self) {
        if let Some(query) = self.query() {
            let mut buf = String::new();
            normalize_estr(&mut buf, query.as_str(), false);
            self.apply_query(Some(&buf));
        }
    }

    /// Normalizes the fragment, if any.
    pub fn normalize_fragment(&mut self) {
        if let Some(fragment) = self.fragment() {
            let mut buf = String::new();
            normalize_estr(&mut buf, fragment.as_str(), false);
            self.apply_fragment(Some(&buf));
        }
    }
}

/// Appends `s` to `buf`, decoding the triplets that encode an unreserved
/// character and uppercasing the rest.
fn normalize_estr(buf: &mut String, s: &str, to_lowercase: bool) {
    let mut bytes = s.as_bytes();
    while let Some((&x, rem)) = bytes.split_first() {
        match (x, rem) {
            (b'%', &[hi, lo, ref rem @ ..]) => {
                let octet = decode_octet(hi, lo);
                if UNRESERVED.allows(octet) {
                    let octet = if to_lowercase {
                        octet.to_ascii_lowercase()
                    } else {
                        octet
                    };
                    buf.push(char::from(octet));
                } else {
                    buf.push('%');
                    buf.push(char::from(hi.to_ascii_uppercase()));
                    buf.push(char::from(lo.to_ascii_uppercase()));
                }
                bytes = rem;
            }
            _ => {
                let x = if to_lowercase {
                    x.to_ascii_lowercase()
                } else {
                    x
                };
                buf.push(char::from(x));
                bytes = rem;
            }
        }
    }
}

/// Appends `path` to `buf` with dot segments removed.
///
/// `buf` must be empty or end with `'/'`.
pub(crate) fn remove_dot_segments<'a>(buf: &'a mut String, path: &str) -> &'a str {
    for seg in path.split_inclusive('/') {
        match seg {
            "." | "./" => truncate_to_slash(buf),
            ".." | "../" => {
                if buf.len() > 1 {
                    buf.pop();
                    truncate_to_slash(buf);
                }
            }
            _ => buf.push_str(seg),
        }
    }
    buf
}

fn truncate_to_slash(buf: &mut String) {
    let len = buf.rfind('/').map_or(0, |i| i + 1);
    buf.truncate(len);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed(path: &str) -> String {
        let mut buf = String::new();
        remove_dot_segments(&mut buf, path);
        buf
    }

    #[test]
    fn dot_segments() {
        let cases = [
            ("/a/b/c/./../../g", "/a/g"),
            ("/mid/content=5/../6", "/mid/6"),
            ("/..", "/"),
            ("/../..", "/"),
            ("/a/..", "/"),
            ("/a/.", "/a/"),
            ("/a//../b", "/a/b"),
            ("/.//etc", "//etc"),
            ("/a/b..", "/a/b.."),
        ];
        for (path, expected) in cases {
            assert_eq!(removed(path), expected, "{path}");
        }
    }

    #[test]
    fn percent_normalization() {
        let mut buf = String::new();
        normalize_estr(&mut buf, "%7e%2f%c3%A9x", false);
        assert_eq!(buf, "~%2F%C3%A9x");

        buf.clear();
        normalize_estr(&mut buf, "Ex%41MPLE%2e", true);
        assert_eq!(buf, "example.");
    }
}
