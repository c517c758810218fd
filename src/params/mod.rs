//! Query parameter resolution
//!
//! Every fetch takes its query string from a [`QueryParams`] value. A
//! mapping is rendered as `k1=v1&k2=v2`; a raw string is passed through
//! after a leading `?` is removed. Strings carrying a fragment (`#`) cannot
//! be resolved.

mod resolver;

pub use resolver::{resolve, QueryParams};
