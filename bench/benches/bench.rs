use criterion::{black_box, criterion_group, criterion_main, Criterion};
use packed_url::{
    pct_enc::{self, table},
    Url,
};

criterion_group!(
    benches,
    bench_parse,
    bench_parse_owned,
    bench_build,
    bench_edit_host,
    bench_normalize,
    bench_compare,
    bench_digest,
    bench_resolve,
    bench_encode,
    bench_decode,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";
const NORMALIZE_CASE: &str = "eXAMPLE://a/./b/../b/%63/%7bfoo%7d";
const COMPARE_CASE: &str = "HTTP://%75ser@EXAMPLE.com:080/%7efoo/bar?a=%62";
const RESOLVE_CASE_BASE: &str = "http://example.com/foo/bar";
const RESOLVE_CASE_REF: &str = "../baz";
const ENCODE_CASE: &str = "name=ferret nose&path=/over/there?#frag";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Url::parse(black_box(PARSE_CASE))));
}

fn bench_parse_owned(c: &mut Criterion) {
    c.bench_function("parse_owned", |b| {
        b.iter(|| Url::parse(black_box(PARSE_CASE).to_owned()))
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build", |b| {
        b.iter(|| {
            let mut url = Url::<String>::new();
            url.set_scheme("foo")?;
            url.set_userinfo("user");
            url.set_host("example.com")?;
            url.set_port_number(8042);
            url.set_path("/over/there");
            url.set_query("name=ferret");
            url.set_fragment("nose");
            Ok::<_, packed_url::Error>(url)
        })
    });
}

fn bench_edit_host(c: &mut Criterion) {
    let url = Url::parse(PARSE_CASE).unwrap().to_owned();
    c.bench_function("edit_host", |b| {
        b.iter(|| {
            let mut url = url.clone();
            url.set_host(black_box("[2001:db8::1]"))
        })
    });
}

fn bench_normalize(c: &mut Criterion) {
    let url = Url::parse(NORMALIZE_CASE).unwrap().to_owned();
    c.bench_function("normalize", |b| {
        b.iter(|| {
            let mut url = black_box(&url).clone();
            url.normalize();
            url
        })
    });
}

fn bench_compare(c: &mut Criterion) {
    let a = Url::parse(COMPARE_CASE).unwrap();
    let mut other = a.to_owned();
    other.normalize();
    c.bench_function("compare", |b| {
        b.iter(|| black_box(&a).compare(black_box(&other)))
    });
}

fn bench_digest(c: &mut Criterion) {
    let url = Url::parse(COMPARE_CASE).unwrap();
    c.bench_function("digest", |b| b.iter(|| black_box(&url).digest(0)));
}

fn bench_resolve(c: &mut Criterion) {
    let base = Url::parse(RESOLVE_CASE_BASE).unwrap();
    let r = Url::parse(RESOLVE_CASE_REF).unwrap();
    c.bench_function("resolve", |b| {
        b.iter(|| black_box(&r).resolve_against(black_box(&base)))
    });
}

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode", |b| {
        b.iter(|| pct_enc::encode(black_box(ENCODE_CASE).as_bytes(), table::PARAM))
    });
}

fn bench_decode(c: &mut Criterion) {
    let encoded = pct_enc::encode(ENCODE_CASE.as_bytes(), table::PARAM);
    c.bench_function("decode", |b| {
        b.iter(|| pct_enc::decode(black_box(&encoded), true))
    });
}
