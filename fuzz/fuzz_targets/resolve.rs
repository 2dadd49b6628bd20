#![no_main]
use libfuzzer_sys::fuzz_target;
use packed_url::Url;

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (Url::parse(data.0), Url::parse(data.1)) else {
        return;
    };

    let Ok(u1) = r.resolve_against(&base) else {
        return;
    };
    let u2 = Url::parse_uri(u1.as_str()).unwrap();

    assert_eq!(u1.scheme_id(), u2.scheme_id());
    assert_eq!(u1.encoded_authority(), u2.encoded_authority());
    assert_eq!(u1.host_kind(), u2.host_kind());
    assert_eq!(u1.path(), u2.path());
    assert_eq!(u1.segment_count(), u2.segment_count());
    assert_eq!(u1.query(), u2.query());
    assert_eq!(u1.fragment(), u2.fragment());

    assert_eq!(base.resolve(&r).unwrap().as_str(), u1.as_str());
});
