use packed_url::{component::HostKind, Normalizer, Url};

#[track_caller]
fn normalized(s: &str) -> String {
    let mut url = Url::parse(s).unwrap().to_owned();
    url.normalize();

    let reparsed = Url::parse(url.as_str()).unwrap();
    assert_eq!(url.host_kind(), reparsed.host_kind());
    assert_eq!(url.segment_count(), reparsed.segment_count());
    assert_eq!(url.param_count(), reparsed.param_count());

    let again = {
        let mut again = url.clone();
        again.normalize();
        again.into_string()
    };
    assert_eq!(again, url.as_str(), "not idempotent");
    url.into_string()
}

#[test]
fn normalize() {
    let cases = [
        ("", ""),
        ("HTTP://EXAMPLE.COM/", "http://example.com/"),
        ("http://a/b/c/./../../g", "http://a/g"),
        ("http://a/b/c/%7Bfoo%7D", "http://a/b/c/%7Bfoo%7D"),
        ("eXAMPLE://a/./b/../b/%63/%7bfoo%7d", "example://a/b/c/%7Bfoo%7D"),
        ("http://%75%73%65%72@%65xample.com/", "http://user@example.com/"),
        ("http://User:P%41ss@h/", "http://User:PAss@h/"),
        ("http://h/%7e?%7e#%7e", "http://h/~?~#~"),
        ("http://h/%2f?%2f#%2f", "http://h/%2F?%2F#%2F"),
        ("http://[::FFFF:129.144.52.38]:80/", "http://[::ffff:129.144.52.38]:80/"),
        ("http://[2001:DB8:0:0:1:0:0:1]/", "http://[2001:db8::1:0:0:1]/"),
        ("http://[V1.ABC]/", "http://[v1.abc]/"),
        ("http://h:/", "http://h:/"),
        ("http://h", "http://h"),
        // Dot segments in a relative reference are kept unless the path is absolute.
        ("a/./b/../c", "a/./b/../c"),
        ("/a/./b/../c", "/a/c"),
        ("foo:a/../b", "foo:a/../b"),
        ("foo:/.//bar", "foo:/.//bar"),
        ("foo:/a/..//bar", "foo:/.//bar"),
        ("//h/a/..", "//h/"),
        ("http://h/..", "http://h/"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalized(input), expected, "{input}");
    }
}

#[test]
fn host_kind_redetected() {
    let mut url = Url::parse("http://%31%32%37.0.0.1/").unwrap().to_owned();
    assert_eq!(url.host_kind(), HostKind::Name);

    url.normalize();
    assert_eq!(url.as_str(), "http://127.0.0.1/");
    assert_eq!(url.host_kind(), HostKind::Ipv4);
    assert_eq!(url.host(), Url::parse("http://127.0.0.1/").unwrap().host());
}

#[test]
fn individual_steps() {
    let mut url = Url::parse("HTTP://%41@EXAMPLE.com/a/./b?%7e#%7e").unwrap().to_owned();

    url.normalize_scheme();
    assert_eq!(url.as_str(), "http://%41@EXAMPLE.com/a/./b?%7e#%7e");

    url.normalize_authority();
    assert_eq!(url.as_str(), "http://A@example.com/a/./b?%7e#%7e");

    url.normalize_path();
    assert_eq!(url.as_str(), "http://A@example.com/a/b?%7e#%7e");

    url.normalize_query();
    assert_eq!(url.as_str(), "http://A@example.com/a/b?~#%7e");

    url.normalize_fragment();
    assert_eq!(url.as_str(), "http://A@example.com/a/b?~#~");
}

#[test]
fn default_port() {
    let normalizer = Normalizer::new().remove_default_port(true);
    let cases = [
        ("http://h:80/", "http://h/"),
        ("HTTP://h:0080/", "http://h/"),
        ("https://h:443", "https://h"),
        ("https://h:80/", "https://h:80/"),
        ("ws://h:80/", "ws://h/"),
        ("foo://h:80/", "foo://h:80/"),
        ("http://h:/", "http://h:/"),
        ("http://h:99999/", "http://h:99999/"),
    ];
    for (input, expected) in cases {
        let mut url = Url::parse(input).unwrap().to_owned();
        normalizer.normalize(&mut url);
        assert_eq!(url.as_str(), expected, "{input}");
    }

    let mut url = Url::parse("http://h:80/").unwrap().to_owned();
    Normalizer::default().normalize(&mut url);
    assert_eq!(url.as_str(), "http://h:80/");
}

#[test]
fn preserves_equivalence() {
    let inputs = [
        "HTTP://%75@EXAMPLE.com:080/%7e?%7e#%7e",
        "http://[0:0::1]/a%2fb",
        "foo:bar%3A",
        "//h%2D1/",
    ];
    for input in inputs {
        let original = Url::parse(input).unwrap();
        let mut url = original.to_owned();
        url.normalize();
        assert_eq!(original, url, "{input}");
        assert_eq!(original.digest(3), url.digest(3), "{input}");
    }
}
