use super::{encoder, EStr, Encoder};
use core::{iter::FusedIterator, marker::PhantomData, str};

/// Subslices of an [`EStr`] between occurrences of a delimiter.
///
/// Created by [`EStr::split`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    pieces: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Split<'a, E> {
    pub(crate) fn new(s: &'a str, delim: char) -> Self {
        Self {
            pieces: s.split(delim),
            encoder: PhantomData,
        }
    }
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.pieces.next().map(EStr::new_validated)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.pieces.next_back().map(EStr::new_validated)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}

/// The segments of a path.
///
/// Created by [`EStr::segments`] and [`Url::segments`].
///
/// [`Url::segments`]: crate::Url::segments
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Segments<'a> {
    split: Option<Split<'a, encoder::Path>>,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(path: &'a str) -> Self {
        let body = path.strip_prefix('/').unwrap_or(path);
        Self {
            split: (!body.is_empty()).then(|| Split::new(body, '/')),
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a EStr<encoder::Path>;

    fn next(&mut self) -> Option<Self::Item> {
        self.split.as_mut()?.next()
    }
}

impl DoubleEndedIterator for Segments<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.split.as_mut()?.next_back()
    }
}

impl FusedIterator for Segments<'_> {}

/// One `'&'`-separated entry of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryParam<'a> {
    /// Everything before the first `'='`.
    pub key: &'a EStr<encoder::Param>,
    /// Everything after the first `'='`, or `None` when the entry has no `'='`.
    pub value: Option<&'a EStr<encoder::Param>>,
}

/// The params of a query.
///
/// Created by [`EStr::params`] and [`Url::params`]. An absent query has
/// no params; a present but empty one has a single empty param.
///
/// [`Url::params`]: crate::Url::params
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Params<'a> {
    entries: Option<str::Split<'a, char>>,
}

impl<'a> Params<'a> {
    pub(crate) fn new(query: &'a str) -> Self {
        Self {
            entries: Some(query.split('&')),
        }
    }

    pub(crate) fn empty() -> Self {
        Self { entries: None }
    }
}

impl<'a> Iterator for Params<'a> {
    type Item = QueryParam<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.as_mut()?.next()?;
        let (key, value) = match entry.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (entry, None),
        };
        Some(QueryParam {
            key: EStr::new_validated(key),
            value: value.map(EStr::new_validated),
        })
    }
}

impl FusedIterator for Params<'_> {}

/// Counts the segments of a path, agreeing with [`Segments`].
pub(crate) fn segment_count(path: &str) -> usize {
    match path.strip_prefix('/').unwrap_or(path) {
        "" => 0,
        body => body.bytes().filter(|&x| x == b'/').count() + 1,
    }
}

/// Counts the params of a present query, agreeing with [`Params`].
pub(crate) fn param_count(query: &str) -> usize {
    query.bytes().filter(|&x| x == b'&').count() + 1
}
