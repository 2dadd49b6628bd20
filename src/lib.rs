#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A URL library that strictly adheres to IETF [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986
//!
//! A parsed URL is its serialization plus a small table of offsets at which
//! each component begins, along with a few cached values such as the decoded
//! sizes, the host kind and the port number. Components are sliced out of the
//! buffer on demand and never stored on their own.
//!
//! - [`Url<&str>`] is a borrowed, read-only view that is cheap to copy.
//! - [`Url<String>`] owns its buffer and can be edited in place with
//!   `set_*` and `remove_*` methods, which keep the offset table exact.
//!
//! See the documentation of [`Url`] for more details.
//!
//! # Examples
//!
//! ```
//! use packed_url::{component::HostKind, Url};
//!
//! let url = Url::parse("http://User@Example.COM:80/a/./b/../c?x=1&y=2#f")?;
//! assert_eq!(url.scheme().unwrap().as_str(), "http");
//! assert_eq!(url.encoded_host(), "Example.COM");
//! assert_eq!(url.host_kind(), HostKind::Name);
//! assert_eq!(url.port_number(), 80);
//! assert_eq!(url.segment_count(), 5);
//! assert_eq!(url.param_count(), 2);
//!
//! let mut url = url.to_owned();
//! url.normalize();
//! assert_eq!(url.as_str(), "http://User@example.com:80/a/c?x=1&y=2#f");
//! # Ok::<_, packed_url::Error>(())
//! ```
//!
//! # Feature flags
//!
//! All features except `std` are disabled by default.
//!
//! - `std`: Enables `std` support. Implies `alloc` and `impl-error`.
//!
//! - `alloc`: Enables the owned [`Url<String>`] together with editing,
//!   normalization and reference resolution.
//!
//! - `impl-error`: Implements [`Error`](core::error::Error) for error types.
//!
//! - `net`: Enables conversion of IP address hosts into `core::net` types.
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`Url`].

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod component;
pub mod error;
pub mod grammar;
pub mod pct_enc;

mod compare;
mod fmt;
mod imp;
mod parse;

#[cfg(feature = "alloc")]
mod edit;
#[cfg(feature = "alloc")]
mod normalize;
#[cfg(feature = "alloc")]
mod resolve;

pub use error::{Error, ErrorKind};
pub use imp::Url;

#[cfg(feature = "alloc")]
pub use normalize::Normalizer;
