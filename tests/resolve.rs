use packed_url::{ErrorKind, Url};

#[track_caller]
fn resolve(base: &str, r: &str) -> String {
    let base = Url::parse(base).unwrap();
    let target = Url::parse(r).unwrap().resolve_against(&base).unwrap();

    let reparsed = Url::parse(target.as_str()).unwrap();
    assert_eq!(target.segment_count(), reparsed.segment_count());
    assert_eq!(target.host_kind(), reparsed.host_kind());
    target.into_string()
}

#[test]
fn resolve_normal_examples() {
    let base = "http://a/b/c/d;p?q";
    let cases = [
        ("g:h", "g:h"),
        ("g", "http://a/b/c/g"),
        ("./g", "http://a/b/c/g"),
        ("g/", "http://a/b/c/g/"),
        ("/g", "http://a/g"),
        ("//g", "http://g"),
        ("?y", "http://a/b/c/d;p?y"),
        ("g?y", "http://a/b/c/g?y"),
        ("#s", "http://a/b/c/d;p?q#s"),
        ("g#s", "http://a/b/c/g#s"),
        ("g?y#s", "http://a/b/c/g?y#s"),
        (";x", "http://a/b/c/;x"),
        ("g;x", "http://a/b/c/g;x"),
        ("g;x?y#s", "http://a/b/c/g;x?y#s"),
        ("", "http://a/b/c/d;p?q"),
        (".", "http://a/b/c/"),
        ("./", "http://a/b/c/"),
        ("..", "http://a/b/"),
        ("../", "http://a/b/"),
        ("../g", "http://a/b/g"),
        ("../..", "http://a/"),
        ("../../", "http://a/"),
        ("../../g", "http://a/g"),
    ];
    for (r, expected) in cases {
        assert_eq!(resolve(base, r), expected, "{r}");
    }
}

#[test]
fn resolve_abnormal_examples() {
    let base = "http://a/b/c/d;p?q";
    let cases = [
        ("../../../g", "http://a/g"),
        ("../../../../g", "http://a/g"),
        ("/./g", "http://a/g"),
        ("/../g", "http://a/g"),
        ("g.", "http://a/b/c/g."),
        (".g", "http://a/b/c/.g"),
        ("g..", "http://a/b/c/g.."),
        ("..g", "http://a/b/c/..g"),
        ("./../g", "http://a/b/g"),
        ("./g/.", "http://a/b/c/g/"),
        ("g/./h", "http://a/b/c/g/h"),
        ("g/../h", "http://a/b/c/h"),
        ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
        ("g;x=1/../y", "http://a/b/c/y"),
        ("g?y/./x", "http://a/b/c/g?y/./x"),
        ("g?y/../x", "http://a/b/c/g?y/../x"),
        ("g#s/./x", "http://a/b/c/g#s/./x"),
        ("g#s/../x", "http://a/b/c/g#s/../x"),
        ("http:g", "http:g"),
    ];
    for (r, expected) in cases {
        assert_eq!(resolve(base, r), expected, "{r}");
    }
}

#[test]
fn resolve_edge_cases() {
    // A base fragment is ignored.
    assert_eq!(resolve("http://a/b#f", "c"), "http://a/c");
    assert_eq!(resolve("http://a/b#f", ""), "http://a/b");

    // A base with an authority and an empty path.
    assert_eq!(resolve("http://a", "b"), "http://a/b");
    assert_eq!(resolve("http://a", "?q"), "http://a?q");

    // The result is never mistaken for a network-path reference.
    assert_eq!(resolve("foo:/a/b", "..//c"), "foo:/.//c");
    assert_eq!(resolve("foo:/", "/.//c"), "foo:/.//c");
    assert_eq!(resolve("foo:/x", ".//c"), "foo:/.//c");

    // An opaque base still accepts empty and fragment-only references.
    assert_eq!(resolve("mailto:a@b", ""), "mailto:a@b");
    assert_eq!(resolve("mailto:a@b", "#top"), "mailto:a@b#top");
    assert_eq!(resolve("mailto:a@b", "tel:1"), "tel:1");

    // Rooted paths of references with a scheme or an authority lose their dot segments.
    assert_eq!(resolve("http://a/", "foo://h/x/../y"), "foo://h/y");
    assert_eq!(resolve("http://a/", "//h/./y"), "http://h/y");

    // A rootless path after a scheme is opaque and keeps its dot segments.
    assert_eq!(resolve("http://a/", "foo:a/../b"), "foo:a/../b");
    assert_eq!(resolve("http://a/b/", "foo:./x"), "foo:./x");
    assert_eq!(resolve("mailto:a@b", "foo:.."), "foo:..");

    // Everything else is kept as written.
    assert_eq!(resolve("HTTP://A:80/%7e/", "B%7e"), "HTTP://A:80/%7e/B%7e");
}

#[test]
fn resolve_errors() {
    let r = Url::parse("g").unwrap();

    let base = Url::parse("/relative/base").unwrap();
    let e = r.resolve_against(&base).unwrap_err();
    assert_eq!((e.kind(), e.index()), (ErrorKind::InvalidArgument, 0));

    let base = Url::parse("mailto:a@b").unwrap();
    let e = r.resolve_against(&base).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);

    let e = Url::parse("?q").unwrap().resolve_against(&base).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn resolve_from_base() {
    let base = Url::parse("http://example.com/docs/index.html").unwrap().to_owned();
    let r = Url::parse("../img/logo.png").unwrap();
    assert_eq!(base.resolve(&r).unwrap().as_str(), "http://example.com/img/logo.png");
    assert_eq!(base.resolve(&r).unwrap(), r.resolve_against(&base).unwrap());
}
