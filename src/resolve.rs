//! Reference resolution.

use crate::{
    error::{err, Result},
    normalize::remove_dot_segments,
    Url,
};
use alloc::string::String;
use borrow_or_share::Bos;

pub(crate) fn resolve(base: Url<&str>, r: Url<&str>) -> Result<Url<String>> {
    if !base.has_scheme() {
        err!(0, InvalidArgument);
    }
    if !base.has_authority()
        && base.path().is_rootless()
        && !r.has_scheme()
        && !matches!(r.as_str().bytes().next(), None | Some(b'#'))
    {
        err!(0, InvalidArgument);
    }

    let mut path = String::new();
    let (scheme, authority, query);

    if let Some(r_scheme) = r.scheme() {
        scheme = r_scheme.as_str();
        authority = r.encoded_authority();
        let r_path = r.path().as_str();
        // A rootless path is opaque and kept as written.
        if r_path.starts_with('/') {
            remove_dot_segments(&mut path, r_path);
        } else {
            path.push_str(r_path);
        }
        query = r.query();
    } else {
        if r.has_authority() {
            authority = r.encoded_authority();
            remove_dot_segments(&mut path, r.path().as_str());
            query = r.query();
        } else {
            let r_path = r.path().as_str();
            if r_path.is_empty() {
                path.push_str(base.path().as_str());
                query = r.query().or(base.query());
            } else {
                if r_path.starts_with('/') {
                    remove_dot_segments(&mut path, r_path);
                } else {
                    let base_path = base.path().as_str();
                    match base_path.rfind('/') {
                        Some(i) => {
                            remove_dot_segments(&mut path, &base_path[..=i]);
                        }
                        None => path.push('/'),
                    }
                    remove_dot_segments(&mut path, r_path);
                }
                query = r.query();
            }
            authority = base.encoded_authority();
        }
        scheme = base.scheme().map_or("", |s| s.as_str());
    }
    let fragment = r.fragment();

    let mut buf = String::with_capacity(
        scheme.len()
            + authority.map_or(0, |s| s.len() + 2)
            + path.len()
            + 2
            + query.map_or(0, |s| s.len() + 1)
            + fragment.map_or(0, |s| s.len() + 1),
    );
    buf.push_str(scheme);
    buf.push(':');
    if let Some(authority) = authority {
        buf.push_str("//");
        buf.push_str(authority);
    } else if path.starts_with("//") {
        buf.push_str("/.");
    }
    buf.push_str(&path);
    if let Some(query) = query {
        buf.push('?');
        buf.push_str(query.as_str());
    }
    if let Some(fragment) = fragment {
        buf.push('#');
        buf.push_str(fragment.as_str());
    }

    Url::parse_uri(buf).map_err(|(e, _)| e.into_invalid_argument())
}

impl<T: Bos<str>> Url<T> {
    /// Resolves the URL reference against the given base URL
    /// and returns the target URL.
    ///
    /// The base must have a scheme. Its fragment, if any, is ignored.
    ///
    /// This method implements the strict algorithm in Section 5.2.2 of RFC 3986.
    /// Dot segments are removed from the path of the result, but no other
    /// normalization is performed. A reference with a scheme and a rootless
    /// path, such as `foo:a/../b`, is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`InvalidArgument`] at index 0 if
    ///
    /// - the base has no scheme, or
    /// - the base has no authority and a rootless path, and the reference
    ///   is neither empty, nor a lone fragment, nor has a scheme.
    ///
    /// [`InvalidArgument`]: crate::ErrorKind::InvalidArgument
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_url::Url;
    ///
    /// let base = Url::parse("http://a/b/c/d;p?q")?;
    /// let url = Url::parse("../../g")?.resolve_against(&base)?;
    /// assert_eq!(url.as_str(), "http://a/g");
    ///
    /// let base = Url::parse("mailto:user@example.com")?;
    /// assert!(Url::parse("x")?.resolve_against(&base).is_err());
    /// # Ok::<_, packed_url::Error>(())
    /// ```
    pub fn resolve_against<U: Bos<str>>(&self, base: &Url<U>) -> Result<Url<String>> {
        resolve(base.view(), self.view())
    }

    /// Resolves a URL reference against this base URL.
    ///
    /// Equivalent to `reference.resolve_against(self)`.
    ///
    /// # Errors
    ///
    /// See [`resolve_against`](Self::resolve_against).
    pub fn resolve<U: Bos<str>>(&self, reference: &Url<U>) -> Result<Url<String>> {
        resolve(self.view(), reference.view())
    }
}
