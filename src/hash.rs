/// Maps raw key bytes to a bucket index.
///
/// Implementations must be deterministic: the same bytes always produce the same hash,
/// otherwise entries become unreachable after they are linked into a chain.
pub trait ChainHasher {
    fn hash(&self, key: &[u8]) -> u64;

    /// Reduces the hash of `key` to a bucket index in `[0, capacity)`.
    ///
    /// `capacity` must be non-zero.
    fn bucket(&self, key: &[u8], capacity: usize) -> usize {
        (self.hash(key) % capacity as u64) as usize
    }
}

/// The sdbm shift-add rolling hash.
///
/// For every byte `b`: `h = b + (h << 6) + (h << 16) - h`, wrapping on overflow. Bytes are
/// taken as unsigned values, with no alignment or type assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sdbm;

impl ChainHasher for Sdbm {
    fn hash(&self, key: &[u8]) -> u64 {
        key.iter().fold(0u64, |h, &b| {
            u64::from(b)
                .wrapping_add(h << 6)
                .wrapping_add(h << 16)
                .wrapping_sub(h)
        })
    }
}

/// Bucket index of `key` in a table of `capacity` buckets, using [`Sdbm`].
pub fn hash(key: &[u8], capacity: usize) -> usize {
    Sdbm.bucket(key, capacity)
}

#[cfg(test)]
mod tests {
    use proptest::{collection::vec, prelude::*};
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn test_empty_key_hashes_to_zero() {
        assert_eq!(Sdbm.hash(&[]), 0);
        assert_eq!(hash(&[], 16), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Sdbm.hash(b"a"), 97);
        // 98 + (97 << 6) + (97 << 16) - 97
        assert_eq!(Sdbm.hash(b"ab"), 98 + 6208 + 6356992 - 97);
    }

    #[test]
    fn test_high_bytes_are_unsigned() {
        assert_eq!(Sdbm.hash(&[0xff]), 255);
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let key = vec![0xffu8; 4096];
        let _ = Sdbm.hash(&key);
    }

    #[proptest(fork = false)]
    fn test_deterministic(
        #[strategy(vec(any::<u8>(), 0..64))] key: Vec<u8>,
        #[strategy(1..10_000usize)] capacity: usize,
    ) {
        prop_assert_eq!(hash(&key, capacity), hash(&key.clone(), capacity));
    }

    #[proptest(fork = false)]
    fn test_bucket_is_in_range(
        #[strategy(vec(any::<u8>(), 0..64))] key: Vec<u8>,
        #[strategy(1..10_000usize)] capacity: usize,
    ) {
        prop_assert!(hash(&key, capacity) < capacity);
    }

    #[proptest(fork = false)]
    fn test_bucket_is_hash_modulo_capacity(
        #[strategy(vec(any::<u8>(), 0..64))] key: Vec<u8>,
        #[strategy(1..10_000usize)] capacity: usize,
    ) {
        prop_assert_eq!(hash(&key, capacity) as u64, Sdbm.hash(&key) % capacity as u64);
    }
}
