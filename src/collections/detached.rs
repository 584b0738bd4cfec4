use std::fmt::{Debug, Formatter};

use crate::{prelude::*, values::Link};

/// Chains detached from a [`HashTable`](super::HashTable) by
/// [`clear`](super::HashTable::clear).
///
/// The nodes are not freed by the table. Reclaim them with [`into_nodes`](Self::into_nodes)
/// or free them with [`free`](Self::free); dropping this value otherwise leaks every node it
/// holds.
#[must_use = "dropping `Detached` leaks its nodes, reclaim them with `into_nodes` or `free`"]
pub struct Detached {
    chains: Vec<Link>,
    len: usize,
}

impl Detached {
    pub(crate) fn new(chains: Vec<Link>, len: usize) -> Self {
        Self { chains, len }
    }

    /// Number of detached nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Unlinks every detached node and hands them over individually.
    pub fn into_nodes(mut self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(self.len);

        for chain in std::mem::take(&mut self.chains) {
            let mut next = chain;

            while let Some(mut node) = next {
                next = node.next.take();
                nodes.push(*node);
            }
        }

        self.len = 0;
        nodes
    }

    /// Frees every detached node.
    pub fn free(mut self) {
        self.chains.clear();
        self.len = 0;
    }
}

impl Drop for Detached {
    fn drop(&mut self) {
        if self.len > 0 {
            log::warn!("leaking {} nodes detached from a hash table", self.len);
        }

        for chain in self.chains.drain(..) {
            std::mem::forget(chain);
        }
    }
}

impl Debug for Detached {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detached").field("len", &self.len).finish()
    }
}
