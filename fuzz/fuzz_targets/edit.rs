#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use packed_url::{component::Component, Error, Url};

const COMPONENTS: [Component; 8] = [
    Component::Scheme,
    Component::User,
    Component::Password,
    Component::Host,
    Component::Port,
    Component::Path,
    Component::Query,
    Component::Fragment,
];

#[derive(Arbitrary, Debug)]
enum Op<'a> {
    Scheme(&'a str),
    RemoveScheme,
    EncodedAuthority(&'a str),
    RemoveAuthority,
    Userinfo(&'a str),
    EncodedUser(&'a str),
    Password(&'a str),
    RemovePassword,
    RemoveUserinfo,
    Host(&'a str),
    EncodedHost(&'a str),
    HostIpv4([u8; 4]),
    HostIpv6([u8; 16]),
    Port(&'a str),
    PortNumber(u16),
    RemovePort,
    Path(&'a str),
    EncodedPath(&'a str),
    Query(&'a str),
    EncodedQuery(&'a str),
    RemoveQuery,
    Fragment(&'a str),
    RemoveFragment,
    Normalize,
}

fn apply(u: &mut Url<String>, op: &Op<'_>) -> Result<(), Error> {
    match *op {
        Op::Scheme(s) => u.set_scheme(s)?,
        Op::RemoveScheme => u.remove_scheme(),
        Op::EncodedAuthority(s) => u.set_encoded_authority(s)?,
        Op::RemoveAuthority => u.remove_authority(),
        Op::Userinfo(s) => u.set_userinfo(s),
        Op::EncodedUser(s) => u.set_encoded_user(s)?,
        Op::Password(s) => u.set_password(s),
        Op::RemovePassword => u.remove_password(),
        Op::RemoveUserinfo => u.remove_userinfo(),
        Op::Host(s) => u.set_host(s)?,
        Op::EncodedHost(s) => u.set_encoded_host(s)?,
        Op::HostIpv4(octets) => u.set_host_ipv4(octets),
        Op::HostIpv6(addr) => u.set_host_ipv6(addr),
        Op::Port(s) => u.set_port(s)?,
        Op::PortNumber(n) => u.set_port_number(n),
        Op::RemovePort => u.remove_port(),
        Op::Path(s) => u.set_path(s),
        Op::EncodedPath(s) => u.set_encoded_path(s)?,
        Op::Query(s) => u.set_query(s),
        Op::EncodedQuery(s) => u.set_encoded_query(s)?,
        Op::RemoveQuery => u.remove_query(),
        Op::Fragment(s) => u.set_fragment(s),
        Op::RemoveFragment => u.remove_fragment(),
        Op::Normalize => u.normalize(),
    }
    Ok(())
}

fuzz_target!(|input: (&str, Vec<Op<'_>>)| {
    let Ok(u) = Url::parse(input.0) else {
        return;
    };
    let mut u = u.to_owned();

    for op in &input.1 {
        let before = u.clone();
        if apply(&mut u, op).is_err() {
            assert_eq!(u.as_str(), before.as_str());
        }

        let parsed = Url::parse(u.as_str()).unwrap();
        assert_eq!(u.scheme_id(), parsed.scheme_id());
        assert_eq!(u.encoded_authority(), parsed.encoded_authority());
        assert_eq!(u.host_kind(), parsed.host_kind());
        assert_eq!(u.ip_address(), parsed.ip_address());
        assert_eq!(u.port_number(), parsed.port_number());
        assert_eq!(u.path(), parsed.path());
        assert_eq!(u.segment_count(), parsed.segment_count());
        assert_eq!(u.query(), parsed.query());
        assert_eq!(u.param_count(), parsed.param_count());
        assert_eq!(u.fragment(), parsed.fragment());
        for c in COMPONENTS {
            assert_eq!(u.decoded_len(c), parsed.decoded_len(c));
        }
    }
});
