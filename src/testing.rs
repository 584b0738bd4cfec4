use proptest::{collection::vec, prelude::*, sample::SizeRange};

use crate::prelude::*;

/// Entries with arbitrary keys, duplicates are rare.
pub fn entries(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<(Bytes, Bytes)>> {
    vec(any::<(Bytes, Bytes)>(), size)
}

/// Entries drawn from a pool of 256 two-byte keys, so duplicate keys and shared buckets are
/// common.
pub fn colliding_entries(size: impl Into<SizeRange>) -> impl Strategy<Value = Vec<(Bytes, Bytes)>> {
    vec((small_key(), any::<Bytes>()), size)
}

pub fn small_key() -> impl Strategy<Value = Bytes> {
    (0u8..16, 0u8..16).prop_map(|(a, b)| Bytes::from(vec![a, b]))
}
