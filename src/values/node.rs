use std::fmt::{Debug, Formatter};

use proptest::prelude::*;

use crate::prelude::*;

pub(crate) type Link = Option<Box<Node>>;

/// A single entry of a bucket chain.
///
/// A node owns its key and value buffers, and exclusively owns the rest of its chain through
/// `next`. A node belongs to at most one chain at a time.
pub struct Node {
    key: Bytes,
    value: Bytes,
    pub(crate) next: Link,
}

impl Node {
    pub fn new(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            next: None,
        }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn key_size(&self) -> usize {
        self.key.len()
    }

    pub fn value_size(&self) -> usize {
        self.value.len()
    }

    pub fn value_mut(&mut self) -> &mut Bytes {
        &mut self.value
    }

    /// Replaces the value buffer, returning the previous one.
    pub fn set_value(&mut self, value: impl Into<Bytes>) -> Bytes {
        std::mem::replace(&mut self.value, value.into())
    }

    /// Splits the node into its key and value buffers.
    ///
    /// The rest of the chain, if any, is dropped.
    pub fn into_parts(mut self) -> (Bytes, Bytes) {
        (
            std::mem::take(&mut self.key),
            std::mem::take(&mut self.value),
        )
    }

    pub(crate) fn matches(&self, key: &[u8]) -> bool {
        compare(&self.key, key).is_eq()
    }
}

/// Clones the key and value only; the copy is not linked into any chain.
impl Clone for Node {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.value.clone())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Eq for Node {}

impl Drop for Node {
    // The default drop glue recurses once per linked node, which overflows the stack on long
    // chains. Unlink iteratively so every node is dropped with an empty `next`.
    fn drop(&mut self) {
        let mut next = self.next.take();

        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl Debug for Node {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

impl Arbitrary for Node {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<Bytes>(), any::<Bytes>())
            .prop_map(|(key, value)| Node::new(key, value))
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_strategy::proptest;

    use crate::prelude::*;

    #[test]
    fn test_sizes_are_explicit() {
        let node = Node::new("key", "value");

        assert_eq!(node.key(), b"key");
        assert_eq!(node.value(), b"value");
        assert_eq!(node.key_size(), 3);
        assert_eq!(node.value_size(), 5);
    }

    #[test]
    fn test_set_value_returns_previous() {
        let mut node = Node::new("key", "old");

        assert_eq!(node.set_value("new"), Bytes::from("old"));
        assert_eq!(node.value(), b"new");
    }

    #[test]
    fn test_dropping_a_long_chain_does_not_overflow_the_stack() {
        let mut head = Node::new("0", "0");

        for i in 1..200_000u32 {
            let mut node = Node::new(i.to_be_bytes().to_vec(), Bytes::empty());
            node.next = Some(Box::new(head));
            head = node;
        }

        drop(head);
    }

    #[proptest(fork = false)]
    fn test_into_parts_returns_buffers(node: Node) {
        let (key, value) = node.clone().into_parts();

        prop_assert_eq!(key.as_slice(), node.key());
        prop_assert_eq!(value.as_slice(), node.value());
    }

    #[proptest(fork = false)]
    fn test_matches_only_equal_keys(node: Node, other: Bytes) {
        prop_assert!(node.matches(node.key()));
        prop_assert_eq!(node.matches(&other), node.key() == other.as_slice());
    }
}
