#![no_main]
use libfuzzer_sys::fuzz_target;
use packed_url::{component::Component, Url};

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

fuzz_target!(|data: &str| {
    let Ok(u) = Url::parse(data) else {
        return;
    };

    let mut u1 = u.to_owned();
    u1.normalize();
    let u2 = Url::parse(u1.as_str()).unwrap();

    assert_eq!(u1.encoded_authority(), u2.encoded_authority());
    assert_eq!(u1.host_kind(), u2.host_kind());
    assert_eq!(u1.ip_address(), u2.ip_address());
    assert_eq!(u1.port_number(), u2.port_number());
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.segment_count(), u2.segment_count());
    assert_eq!(u1.param_count(), u2.param_count());
    for c in COMPONENTS {
        assert_eq!(u1.decoded_len(c), u2.decoded_len(c));
    }

    // We cannot normalize beyond a normalized `Url`.
    let mut again = u1.clone();
    again.normalize();
    assert_eq!(again.as_str(), u1.as_str());

    // Comparison treats a URL and its normal form alike
    // unless dot segments were removed or the host kind changed.
    let has_dots = u
        .segments()
        .any(|seg| matches!(&*seg.decode().to_bytes(), b"." | b".."));
    if !has_dots && !u.path().as_str().starts_with("//") && u.host_kind() == u2.host_kind() {
        assert_eq!(u, u2);
        assert_eq!(u.digest(0), u2.digest(0));
    }
});
