use super::decode_octet;
use core::iter::FusedIterator;

#[cfg(feature = "alloc")]
use {
    super::decoded_len_unchecked,
    alloc::{borrow::Cow, string::String, vec::Vec},
};

/// A lazy decoder over a well-formed percent-encoded slice.
///
/// Created by [`EStr::decode`] and [`EStr::decode_query`]. Iterating yields
/// runs of plain text and single decoded bytes, which lets a caller decode
/// without allocating. Most callers want [`to_bytes`] or [`to_string`] instead.
///
/// [`EStr::decode`]: super::EStr::decode
/// [`EStr::decode_query`]: super::EStr::decode_query
/// [`to_bytes`]: Self::to_bytes
/// [`to_string`]: Self::to_string
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    rest: &'a str,
    plus_as_space: bool,
}

/// A piece of decoded output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// Text that needed no decoding.
    Unencoded(&'a str),
    /// One byte from a triplet, or a space from `'+'` in query mode.
    Decoded(u8),
}

impl<'a> Decode<'a> {
    pub(crate) fn new(rest: &'a str, plus_as_space: bool) -> Self {
        Self {
            rest,
            plus_as_space,
        }
    }

    fn plain_len(&self) -> usize {
        let plus = self.plus_as_space;
        self.rest
            .bytes()
            .position(|x| x == b'%' || (plus && x == b'+'))
            .unwrap_or(self.rest.len())
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<DecodedChunk<'a>> {
        let bytes = self.rest.as_bytes();
        let chunk = match *bytes.first()? {
            b'%' => {
                let x = decode_octet(bytes[1], bytes[2]);
                self.rest = &self.rest[3..];
                DecodedChunk::Decoded(x)
            }
            b'+' if self.plus_as_space => {
                self.rest = &self.rest[1..];
                DecodedChunk::Decoded(b' ')
            }
            _ => {
                let (plain, rest) = self.rest.split_at(self.plain_len());
                self.rest = rest;
                DecodedChunk::Unencoded(plain)
            }
        };
        Some(chunk)
    }
}

impl FusedIterator for Decode<'_> {}

#[cfg(feature = "alloc")]
impl<'a> Decode<'a> {
    /// Decodes into bytes, borrowing when nothing needs decoding.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        if self.plain_len() == self.rest.len() {
            return Cow::Borrowed(self.rest.as_bytes());
        }

        let mut buf = Vec::with_capacity(decoded_len_unchecked(self.rest));
        for chunk in self {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::Decoded(x) => buf.push(x),
            }
        }
        Cow::Owned(buf)
    }

    /// Decodes into a string, borrowing when nothing needs decoding.
    ///
    /// # Errors
    ///
    /// Returns the decoded bytes if they are not valid UTF-8.
    pub fn to_string(self) -> Result<Cow<'a, str>, Vec<u8>> {
        match self.to_bytes() {
            Cow::Borrowed(bytes) => core::str::from_utf8(bytes)
                .map(Cow::Borrowed)
                .map_err(|_| bytes.to_vec()),
            Cow::Owned(vec) => String::from_utf8(vec)
                .map(Cow::Owned)
                .map_err(|e| e.into_bytes()),
        }
    }

    /// Decodes into a string, replacing invalid UTF-8 with
    /// [`U+FFFD`](char::REPLACEMENT_CHARACTER).
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        match self.to_bytes() {
            Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
            Cow::Owned(vec) => Cow::Owned(
                String::from_utf8(vec)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()),
            ),
        }
    }
}
