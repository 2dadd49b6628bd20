//! Percent-encoders for URL components.
//!
//! Each encoder is a marker type whose [`TABLE`] lists what may appear
//! unencoded in the component it names.
//!
//! [`TABLE`]: Encoder::TABLE

use super::{table, Encoder, Table};

macro_rules! encoders {
    ($($(#[$attr:meta])* $name:ident => $table:ident,)*) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug)]
            pub struct $name(());

            impl Encoder for $name {
                const TABLE: Table = table::$table;
            }
        )*
    };
}

encoders! {
    /// An encoder for the userinfo subcomponent.
    Userinfo => USERINFO,
    /// An encoder for the user part of userinfo.
    User => USER,
    /// An encoder for the password part of userinfo.
    Password => PASSWORD,
    /// An encoder for the registered name.
    RegName => REG_NAME,
    /// An encoder for the path component.
    Path => PATH,
    /// An encoder for a single path segment.
    Segment => SEGMENT,
    /// An encoder for the query component.
    Query => QUERY,
    /// An encoder for the key or value of a query param.
    Param => PARAM,
    /// An encoder for the fragment component.
    Fragment => FRAGMENT,
    /// An encoder for data that must be kept apart from delimiters.
    Data => DATA,
}
