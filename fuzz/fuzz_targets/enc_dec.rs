#![no_main]
use libfuzzer_sys::fuzz_target;
use packed_url::pct_enc::{self, encoder::Query, table, DecodedChunk, EStr, EString};

fuzz_target!(|data: &[u8]| {
    let mut query = EString::<Query>::new();
    query.encode_bytes::<Query>(data);
    assert_eq!(query.decoded_len(), data.len());
    assert_eq!(EStr::<Query>::new(query.as_str()), Some(query.as_estr()));

    let mut out = Vec::with_capacity(data.len());
    for chunk in query.decode() {
        match chunk {
            DecodedChunk::Unencoded(s) => out.extend_from_slice(s.as_bytes()),
            DecodedChunk::Decoded(x) => out.push(x),
        }
    }
    assert_eq!(out, data);
    assert_eq!(
        query.decode().to_string_lossy(),
        String::from_utf8_lossy(data)
    );

    for t in [table::DATA, table::PATH, table::USERINFO] {
        let encoded = pct_enc::encode(data, t);
        assert_eq!(encoded.len(), pct_enc::encoded_size(data, t));
        assert_eq!(pct_enc::validate(&encoded, t), Ok(data.len()));
        assert_eq!(pct_enc::decoded_size(&encoded), Ok(data.len()));
        assert_eq!(pct_enc::decode(&encoded, false).ok().as_deref(), Some(data));
    }
});
