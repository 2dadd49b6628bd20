#![no_main]
use libfuzzer_sys::fuzz_target;
use packed_url::{component::Component, Url};

fuzz_target!(|data: &str| {
    let Ok(u) = Url::parse(data) else {
        return;
    };
    let mut buf = String::with_capacity(data.len());
    if let Some(s) = u.scheme() {
        buf.push_str(s.as_str());
        buf.push(':');
    }
    if let Some(a) = u.encoded_authority() {
        buf.push_str("//");
        let start = buf.len();
        if let Some(ui) = u.userinfo() {
            buf.push_str(ui.as_str());
            buf.push('@');
        }
        buf.push_str(u.encoded_host());
        if let Some(p) = u.port() {
            buf.push(':');
            buf.push_str(p);
        }
        assert_eq!(&buf[start..], a);
    }
    buf.push_str(u.path().as_str());
    if let Some(q) = u.query() {
        buf.push('?');
        buf.push_str(q.as_str());
    }
    if let Some(f) = u.fragment() {
        buf.push('#');
        buf.push_str(f.as_str());
    }
    assert_eq!(data, buf);

    assert_eq!(u.segment_count(), u.segments().count());
    assert_eq!(u.param_count(), u.params().count());
    assert_eq!(
        u.decoded_len(Component::Path),
        u.path().decode().to_bytes().len()
    );
    if let Some(q) = u.query() {
        assert_eq!(u.decoded_len(Component::Query), q.decoded_len());
    }
});
