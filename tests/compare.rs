use packed_url::Url;
use std::{
    cmp::Ordering,
    collections::{hash_map::DefaultHasher, BTreeSet, HashSet},
    hash::{Hash, Hasher},
};

fn cmp(a: &str, b: &str) -> Ordering {
    Url::parse(a).unwrap().compare(&Url::parse(b).unwrap())
}

fn hash_of(u: &Url<&str>) -> u64 {
    let mut h = DefaultHasher::new();
    u.hash(&mut h);
    h.finish()
}

#[track_caller]
fn assert_equivalent(a: &str, b: &str) {
    let (ua, ub) = (Url::parse(a).unwrap(), Url::parse(b).unwrap());
    assert_eq!(ua.compare(&ub), Ordering::Equal, "{a} vs {b}");
    assert_eq!(ub.compare(&ua), Ordering::Equal, "{b} vs {a}");
    assert_eq!(ua.digest(7), ub.digest(7), "{a} vs {b}");
    assert_eq!(hash_of(&ua), hash_of(&ub));
}

#[track_caller]
fn assert_distinct(a: &str, b: &str) {
    let ord = cmp(a, b);
    assert_ne!(ord, Ordering::Equal, "{a} vs {b}");
    assert_eq!(cmp(b, a), ord.reverse(), "{b} vs {a}");
}

#[test]
fn scheme_and_host_case() {
    assert_equivalent("HTTP://example.com/", "http://example.com/");
    assert_equivalent("http://EXAMPLE.com/", "http://example.com/");
    assert_equivalent("http://[V1.ABC]/", "http://[v1.abc]/");
    assert_distinct("http://example.com/A", "http://example.com/a");
    assert_distinct("http://User@h/", "http://user@h/");
}

#[test]
fn percent_encoding() {
    assert_equivalent("http://h/%7Euser", "http://h/~user");
    assert_equivalent("http://h/%7euser", "http://h/~user");
    assert_equivalent("http://h/a%2fb", "http://h/a%2Fb");
    assert_equivalent("http://h/?%61=%62", "http://h/?a=b");
    assert_equivalent("http://%75@h/", "http://u@h/");
    assert_equivalent("http://h%2Dx/", "http://h-x/");
    assert_equivalent("http://%45XAMPLE.com/", "http://example.com/");
    assert_distinct("http://h/a%2Fb", "http://h/a/b");
    assert_distinct("http://h/%20", "http://h/+");
}

#[test]
fn hosts() {
    assert_equivalent("http://[::1]/", "http://[0:0:0:0:0:0:0:1]/");
    assert_equivalent("http://[2001:DB8::1]/", "http://[2001:db8::1]/");
    assert_equivalent("http://[::ffff:1.2.3.4]/", "http://[::ffff:102:304]/");
    assert_distinct("http://127.0.0.1/", "http://[::1]/");

    // Hosts order by kind first.
    assert_eq!(cmp("http://9.9.9.9/", "http://[::]/"), Ordering::Less);
    assert_eq!(cmp("http://[::]/", "http://a/"), Ordering::Less);
    assert_eq!(cmp("http:/a", "http://a"), Ordering::Less);

    // An IPv4 address is not a name, even one written with encoded digits.
    assert_distinct("http://%31.2.3.4/", "http://1.2.3.4/");
}

#[test]
fn ports() {
    assert_equivalent("http://h:080/", "http://h:80/");
    assert_equivalent("http://h:0/", "http://h:000/");
    assert_distinct("http://h/", "http://h:80/");
    assert_distinct("http://h:/", "http://h/");
    assert_distinct("http://h:/", "http://h:0/");
    assert_eq!(cmp("http://h:9/", "http://h:10/"), Ordering::Less);
    assert_eq!(cmp("http://h:99999/", "http://h:65535/"), Ordering::Greater);
}

#[test]
fn absent_orders_first() {
    assert_eq!(cmp("//h/", "a://h/"), Ordering::Less);
    assert_eq!(cmp("http://h/", "http://u@h/"), Ordering::Less);
    assert_eq!(cmp("http://u@h/", "http://u:@h/"), Ordering::Less);
    assert_eq!(cmp("http://h/", "http://h/?"), Ordering::Less);
    assert_eq!(cmp("http://h/", "http://h/#"), Ordering::Less);
    assert_distinct("http://h/?", "http://h/#");
}

#[test]
fn no_dot_segment_removal() {
    assert_distinct("http://h/a/../b", "http://h/b");
    assert_distinct("http://h/./a", "http://h/a");
}

#[test]
fn priority_order() {
    // The scheme decides before the path.
    assert_eq!(cmp("a://h/z", "b://h/a"), Ordering::Less);
    // The host decides before the port.
    assert_eq!(cmp("http://a:9/", "http://b:1/"), Ordering::Less);
    // The path decides before the query.
    assert_eq!(cmp("http://h/a?z", "http://h/b?a"), Ordering::Less);
}

#[test]
fn trait_impls() {
    let a = Url::parse("HTTP://EXAMPLE.com/%7e").unwrap();
    let b = Url::parse("http://example.com/~").unwrap().to_owned();
    assert_eq!(a, b);
    assert_eq!(b, a);

    let mut set = HashSet::new();
    set.insert(Url::parse("http://h:080/").unwrap());
    assert!(set.contains(&Url::parse("http://h:80/").unwrap()));
    assert!(!set.contains(&Url::parse("http://h/").unwrap()));

    // `insert` keeps the first of several equivalent URLs.
    let mut set = BTreeSet::new();
    for s in ["http://b/", "http://a/", "//a/", "http://A/", "http://a/?"] {
        set.insert(Url::parse(s).unwrap());
    }
    let sorted: Vec<_> = set.iter().map(|u| u.as_str()).collect();
    assert_eq!(sorted, ["//a/", "http://a/", "http://a/?", "http://b/"]);
}

#[test]
fn digest_seeds() {
    let u = Url::parse("http://h/").unwrap();
    assert_eq!(u.digest(1), u.digest(1));
    assert_ne!(u.digest(1), u.digest(2));
    assert_ne!(
        Url::parse("http://h/?a").unwrap().digest(0),
        Url::parse("http://h/#a").unwrap().digest(0)
    );
}
