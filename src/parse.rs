use crate::{
    component::{HostKind, SchemeId},
    error::{err, Error, Production, Result},
    grammar::{
        ch, dec_octet, named, not_empty, one_of, optional, repeat, separated, token, Reader, Rule,
        Span,
    },
    imp::{id, Meta},
    pct_enc::{self, table},
};

/// The top-level production to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// `URI-reference`
    UriReference,
    /// `URI`
    Uri,
    /// `absolute-URI`
    AbsoluteUri,
    /// `relative-ref`
    RelativeRef,
    /// `origin-form`
    OriginForm,
}

impl Target {
    fn production(self) -> Production {
        match self {
            Self::UriReference | Self::Uri => Production::Uri,
            Self::AbsoluteUri => Production::AbsoluteUri,
            Self::RelativeRef => Production::RelativeRef,
            Self::OriginForm => Production::OriginForm,
        }
    }
}

/// The grammar variant of the path, selected by what precedes it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathKind {
    /// `path-abempty`, after an authority.
    AbEmpty,
    /// `path-absolute`, `path-rootless` or `path-empty`, after a scheme.
    General,
    /// `path-absolute`, `path-noscheme` or `path-empty`, in a relative reference.
    NoScheme,
    /// `absolute-path`, in an origin-form request target.
    Absolute,
}

/// A parsed host.
#[derive(Clone, Copy)]
pub(crate) struct HostInfo {
    pub kind: HostKind,
    pub addr: [u8; 16],
}

/// A parsed authority, with absolute indexes.
#[derive(Clone, Copy)]
pub(crate) struct AuthParts {
    /// The user, without the leading `"//"`.
    pub user: Span,
    /// The userinfo delimiters and password: `":" password "@"`, `"@"` or empty.
    pub pass: Span,
    pub host: Span,
    pub host_info: HostInfo,
    /// The port including its `':'`, or empty.
    pub port: Span,
}

impl AuthParts {
    /// Moves every span `n` bytes to the right.
    pub fn offset_by(mut self, n: usize) -> Self {
        for span in [&mut self.user, &mut self.pass, &mut self.host, &mut self.port] {
            span.start += n;
            span.end += n;
        }
        self
    }
}

pub(crate) fn parse(s: &str, target: Target) -> Result<Meta> {
    let bytes = s.as_bytes();
    let mut r = Reader::new(s);
    let mut meta = Meta::default();

    let scheme = (one_of(table::ALPHA), token(table::SCHEME), ch(b':'));
    let has_scheme = match target {
        Target::Uri | Target::AbsoluteUri => {
            named(Production::Scheme, &scheme).parse(&mut r)?;
            true
        }
        Target::UriReference => optional(&scheme).parse(&mut r)?.is_some(),
        Target::RelativeRef | Target::OriginForm => false,
    };

    if has_scheme {
        let scheme_end = r.pos() - 1;
        meta.decoded[id::SCHEME] = scheme_end;
        meta.scheme_id = SchemeId::from_scheme(&s[..scheme_end]);
    }
    meta.offsets[id::USER] = r.pos();

    let path_kind = if target != Target::OriginForm && r.read_str("//") {
        let start = r.pos();
        let end = bytes[start..]
            .iter()
            .position(|&x| matches!(x, b'/' | b'?' | b'#'))
            .map_or(bytes.len(), |i| start + i);

        let auth = parse_authority(bytes, start, end)?;
        meta.set_authority(s, &auth);
        r.set_pos(end);
        PathKind::AbEmpty
    } else {
        let i = r.pos();
        meta.offsets[id::PASS..=id::PATH].fill(i);
        match target {
            Target::OriginForm => PathKind::Absolute,
            _ if has_scheme => PathKind::General,
            _ => PathKind::NoScheme,
        }
    };

    let path_start = r.pos();
    meta.nseg = read_path(&mut r, path_kind)?;
    meta.offsets[id::QUERY] = r.pos();
    meta.decoded[id::PATH] = pct_enc::decoded_len_unchecked(&s[path_start..r.pos()]);

    if !matches!(r.peek(0), None | Some(b'?' | b'#')) {
        err!(r.pos(), Syntax(Path));
    }

    if r.read_str("?") {
        let start = r.pos();
        meta.nparam = read_query(&mut r)?;
        meta.decoded[id::QUERY] = pct_enc::decoded_len_unchecked(&s[start..r.pos()]);

        if !matches!(r.peek(0), None | Some(b'#')) {
            err!(r.pos(), Syntax(Query));
        }
    }
    meta.offsets[id::FRAG] = r.pos();

    if r.peek(0) == Some(b'#') {
        if matches!(target, Target::AbsoluteUri | Target::OriginForm) {
            return Err(Error::syntax(r.pos(), target.production()));
        }
        r.skip(1);
        let frag = token(table::FRAGMENT).parse(&mut r)?;
        meta.decoded[id::FRAG] = pct_enc::decoded_len_unchecked(&s[frag.start..frag.end]);
    }

    if r.has_remaining() {
        err!(r.pos(), Syntax(Fragment));
    }
    meta.offsets[id::END] = bytes.len();
    Ok(meta)
}

/// Reads a path of the given kind, returning the number of segments.
pub(crate) fn read_path(r: &mut Reader<'_>, kind: PathKind) -> Result<usize> {
    let start = r.pos();
    let rooted = r.peek(0) == Some(b'/');

    match kind {
        PathKind::Absolute if !rooted => err!(start, Syntax(OriginForm)),
        PathKind::NoScheme if !rooted => {
            // The first segment of a relative reference cannot contain a colon.
            token(table::SEGMENT_NC).parse(r)?;
            if r.peek(0) == Some(b':') {
                err!(r.pos(), Syntax(Path));
            }
            r.set_pos(start);
        }
        _ => {}
    }

    if rooted {
        r.skip(1);
    }
    let n = separated(0, usize::MAX, token(table::SEGMENT), ch(b'/')).parse(r)?;

    Ok(if r.pos() - start <= usize::from(rooted) {
        0
    } else {
        n
    })
}

/// Reads a query, returning the number of params.
pub(crate) fn read_query(r: &mut Reader<'_>) -> Result<usize> {
    separated(0, usize::MAX, token(table::PARAM), ch(b'&')).parse(r)
}

/// Parses an authority spanning `bytes[start..end]`.
pub(crate) fn parse_authority(bytes: &[u8], start: usize, end: usize) -> Result<AuthParts> {
    let auth = &bytes[start..end];

    let (user, pass, host_start) = match auth.iter().position(|&x| x == b'@') {
        Some(i) => {
            let at = start + i;
            let mut r = Reader::with_bounds(bytes, start, at);
            let user = token(table::USER).parse(&mut r)?;
            if r.read_str(":") {
                token(table::PASSWORD).parse(&mut r)?;
            }
            if r.has_remaining() {
                err!(r.pos(), Syntax(Userinfo));
            }
            let pass = Span {
                start: user.end,
                end: at + 1,
            };
            (user, pass, at + 1)
        }
        None => {
            let empty = Span { start, end: start };
            (empty, empty, start)
        }
    };

    let host_end = if bytes.get(host_start) == Some(&b'[') {
        match bytes[host_start..end].iter().position(|&x| x == b']') {
            Some(i) => host_start + i + 1,
            None => err!(end, Syntax(IpLiteral)),
        }
    } else {
        bytes[host_start..end]
            .iter()
            .position(|&x| x == b':')
            .map_or(end, |i| host_start + i)
    };

    let host_info = parse_host(bytes, host_start, host_end)?;

    let port = if host_end < end {
        if bytes[host_end] != b':' {
            err!(host_end, Syntax(Authority));
        }
        check_port(bytes, host_end + 1, end)?;
        Span {
            start: host_end,
            end,
        }
    } else {
        Span { start: end, end }
    };

    Ok(AuthParts {
        user,
        pass,
        host: Span {
            start: host_start,
            end: host_end,
        },
        host_info,
        port,
    })
}

/// Checks that `bytes[start..end]` is all digits.
pub(crate) fn check_port(bytes: &[u8], start: usize, end: usize) -> Result<()> {
    let mut r = Reader::with_bounds(bytes, start, end);
    token(table::DIGIT).parse(&mut r)?;
    if r.has_remaining() {
        err!(r.pos(), Syntax(Port));
    }
    Ok(())
}

/// Converts port digits to a number, clipping to 0 on overflow.
pub(crate) fn port_number(digits: &[u8]) -> u16 {
    let mut n: u32 = 0;
    for &x in digits {
        n = n * 10 + u32::from(x - b'0');
        if n > u32::from(u16::MAX) {
            return 0;
        }
    }
    n as u16
}

/// Parses a host spanning exactly `bytes[start..end]`.
///
/// Tries IP-literal, then IPv4address, then reg-name.
pub(crate) fn parse_host(bytes: &[u8], start: usize, end: usize) -> Result<HostInfo> {
    let mut r = Reader::with_bounds(bytes, start, end);
    let mut addr = [0; 16];

    if r.read_str("[") {
        let kind = if let Some(segs) = read_v6(&mut r) {
            for (i, seg) in segs.iter().enumerate() {
                addr[i * 2..i * 2 + 2].copy_from_slice(&seg.to_be_bytes());
            }
            HostKind::Ipv6
        } else if r.pos() == start + 1 {
            r.set_pos(start + 1);
            read_ipv_future(&mut r)?;
            HostKind::IpvFuture
        } else {
            err!(start + 1, Syntax(Ipv6Address));
        };

        if !r.read_str("]") || r.has_remaining() {
            err!(r.pos(), Syntax(IpLiteral));
        }
        return Ok(HostInfo { kind, addr });
    }

    if let Ok(octets) = Ipv4Address.parse(&mut r) {
        if !r.has_remaining() {
            addr[..4].copy_from_slice(&octets);
            return Ok(HostInfo {
                kind: HostKind::Ipv4,
                addr,
            });
        }
    }

    r.set_pos(start);
    token(table::REG_NAME).parse(&mut r)?;
    if r.has_remaining() {
        err!(r.pos(), Syntax(Host));
    }
    Ok(HostInfo {
        kind: HostKind::Name,
        addr,
    })
}

/// `IPv4address = dec-octet "." dec-octet "." dec-octet "." dec-octet`
struct Ipv4Address;

impl Rule for Ipv4Address {
    type Output = [u8; 4];

    fn parse(&self, r: &mut Reader<'_>) -> Result<[u8; 4]> {
        let dot = ch(b'.');
        let (a, (), b, (), c, (), d) =
            (dec_octet(), dot, dec_octet(), dot, dec_octet(), dot, dec_octet()).parse(r)?;
        Ok([a, b, c, d])
    }
}

fn read_ipv_future(r: &mut Reader<'_>) -> Result<()> {
    if let Some(b'v' | b'V') = r.peek(0) {
        r.skip(1);
        let rule = (
            repeat(1, usize::MAX, one_of(table::HEXDIG)),
            ch(b'.'),
            not_empty(token(table::IPV_FUTURE), Production::IpvFuture),
        );
        named(Production::IpvFuture, rule).parse(r)?;
        return Ok(());
    }
    err!(r.pos(), Syntax(IpvFuture));
}

enum Seg {
    // *1":" 1*4HEXDIG
    Normal(u16, bool),
    // "::"
    Ellipsis,
    // *1":" 1*4HEXDIG "."
    MaybeV4(bool),
    // ":"
    SingleColon,
}

fn read_v6(r: &mut Reader<'_>) -> Option<[u16; 8]> {
    let mut segs = [0; 8];
    let mut ellipsis_idx = 8;

    let mut i = 0;
    while i < 8 {
        match read_v6_segment(r) {
            Some(Seg::Normal(seg, colon)) => {
                if colon == (i == 0 || i == ellipsis_idx) {
                    // Leading colon, triple colons, or no colon.
                    return None;
                }
                segs[i] = seg;
                i += 1;
            }
            Some(Seg::Ellipsis) => {
                if ellipsis_idx != 8 {
                    // Multiple ellipses.
                    return None;
                }
                ellipsis_idx = i;
            }
            Some(Seg::MaybeV4(colon)) => {
                if i > 6 || colon == (i == ellipsis_idx) {
                    // Not enough space, triple colons, or no colon.
                    return None;
                }
                let octets = Ipv4Address.parse(r).ok()?;
                segs[i] = u16::from_be_bytes([octets[0], octets[1]]);
                segs[i + 1] = u16::from_be_bytes([octets[2], octets[3]]);
                i += 2;
                break;
            }
            Some(Seg::SingleColon) => return None,
            None => break,
        }
    }

    if ellipsis_idx == 8 {
        // No ellipsis.
        if i != 8 {
            return None;
        }
    } else if i == 8 {
        // Eliding nothing.
        return None;
    } else {
        // Shift the segments after the ellipsis to the right.
        for j in (ellipsis_idx..i).rev() {
            segs[8 - (i - j)] = segs[j];
            segs[j] = 0;
        }
    }

    Some(segs)
}

fn read_v6_segment(r: &mut Reader<'_>) -> Option<Seg> {
    let colon = r.read_str(":");
    let Some(first) = r.peek(0) else {
        return colon.then_some(Seg::SingleColon);
    };

    let Some(mut x) = pct_enc::decode_hexdigit(first).map(u16::from) else {
        return colon.then(|| {
            if first == b':' {
                r.skip(1);
                Seg::Ellipsis
            } else {
                Seg::SingleColon
            }
        });
    };

    let mut i = 1;
    while i < 4 {
        let Some(b) = r.peek(i) else {
            r.skip(i);
            return None;
        };
        match pct_enc::decode_hexdigit(b) {
            Some(v) => {
                x = (x << 4) | u16::from(v);
                i += 1;
            }
            None if b == b'.' => return Some(Seg::MaybeV4(colon)),
            None => break,
        }
    }
    r.skip(i);
    Some(Seg::Normal(x, colon))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(s: &str) -> Result<HostInfo> {
        parse_host(s.as_bytes(), 0, s.len())
    }

    #[test]
    fn host_kinds() {
        assert_eq!(host("example.com").unwrap().kind, HostKind::Name);
        assert_eq!(host("").unwrap().kind, HostKind::Name);
        assert_eq!(host("[v1.fe:x]").unwrap().kind, HostKind::IpvFuture);

        let v4 = host("127.0.0.1").unwrap();
        assert_eq!(v4.kind, HostKind::Ipv4);
        assert_eq!(v4.addr[..4], [127, 0, 0, 1]);

        let v6 = host("[::ffff:1.2.3.4]").unwrap();
        assert_eq!(v6.kind, HostKind::Ipv6);
        assert_eq!(v6.addr[10..], [0xff, 0xff, 1, 2, 3, 4]);
    }

    #[test]
    fn non_canonical_ipv4_falls_back_to_reg_name() {
        for s in ["127.0.0.01", "1.2.3", "1.2.3.4.5", "256.1.1.1", "1.2.3.4."] {
            assert_eq!(host(s).unwrap().kind, HostKind::Name, "{s}");
        }
    }

    #[test]
    fn invalid_ip_literals() {
        for s in ["[::1", "[1::2::3]", "[:1]", "[1:2:3:4:5:6:7:8:9]", "[v.x]", "[vg.x]", "[::1]x"] {
            assert!(host(s).is_err(), "{s}");
        }
    }

    #[test]
    fn port_number_clips_on_overflow() {
        assert_eq!(port_number(b"8080"), 8080);
        assert_eq!(port_number(b"065535"), 65535);
        assert_eq!(port_number(b"65536"), 0);
        assert_eq!(port_number(b"99999999999999999999"), 0);
        assert_eq!(port_number(b""), 0);
    }
}
