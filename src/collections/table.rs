use std::fmt::{Debug, Formatter};

use proptest::{collection::vec, prelude::*};

use crate::{collections::Detached, prelude::*, values::Link};

#[derive(Default)]
struct Bucket {
    first: Link,
    len: usize,
}

impl Bucket {
    fn push(&mut self, mut node: Box<Node>) -> usize {
        node.next = self.first.take();
        self.first = Some(node);
        self.len += 1;
        self.len
    }

    fn take(&mut self) -> Link {
        self.len = 0;
        self.first.take()
    }
}

fn allocate(capacity: usize) -> Result<Vec<Bucket>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|e| Error::out_of_memory(capacity, e))?;
    buckets.resize_with(capacity, Bucket::default);
    Ok(buckets)
}

/// A chained hash table mapping byte-string keys to byte-string values.
///
/// The table is an array of buckets, each the head of a singly-linked chain of [`Node`]s. New
/// nodes are linked at the head of their chain, so within a chain nodes are ordered
/// newest-first. Keys are not required to be unique: inserting a key twice stores two nodes,
/// and [`lookup`](Self::lookup) and [`delete`](Self::delete) act on the most recently
/// inserted one.
///
/// Every node reachable from bucket `i` hashes to `i` under the current capacity. When an
/// insertion leaves its chain longer than [`Config::chain_threshold`], the whole table is
/// rehashed into `ceil(capacity * growth_factor)` buckets.
///
/// The table is single-threaded; wrap it in a lock for shared use, since a resize rewrites
/// the entire bucket array.
pub struct HashTable<H: ChainHasher = Sdbm> {
    buckets: Vec<Bucket>,
    config: Config,
    hasher: H,
    len: usize,
    resizes: usize,
}

impl HashTable<Sdbm> {
    /// Creates a table with `capacity` empty buckets and default settings otherwise.
    pub fn create(capacity: usize) -> Result<Self> {
        Self::with_config(Config::new().capacity(capacity))
    }

    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_hasher(config, Sdbm)
    }
}

impl<H: ChainHasher> HashTable<H> {
    pub fn with_hasher(config: Config, hasher: H) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            buckets: allocate(config.capacity)?,
            config,
            hasher,
            len: 0,
            resizes: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of nodes stored, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of resizes performed since the table was created.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Bucket `key` belongs to under the current capacity.
    pub fn bucket_of(&self, key: &[u8]) -> usize {
        self.hasher.bucket(key, self.capacity())
    }

    /// Length of the chain at bucket `index`, or 0 when out of range.
    pub fn chain_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, |bucket| bucket.len)
    }

    /// Nodes of the chain at bucket `index`, newest first.
    pub fn chain(&self, index: usize) -> Chain<'_> {
        Chain {
            next: self.buckets.get(index).and_then(|b| b.first.as_deref()),
        }
    }

    /// Iterates over all nodes as `(bucket index, node)`, in bucket order then chain order.
    ///
    /// The order carries no meaning beyond that and changes on every resize.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter().enumerate(),
            index: 0,
            node: None,
        }
    }

    /// Stores `value` under `key`, taking ownership of both buffers.
    ///
    /// Existing nodes with the same key are kept; the new node shadows them. If the insertion
    /// triggers a resize and the new bucket array cannot be allocated, the entry is still
    /// stored, the table keeps its previous capacity and [`Error::OutOfMemory`] is returned.
    ///
    /// Copies of one key always share a chain, whatever the capacity. Once a key has more
    /// copies than [`Config::chain_threshold`], inserting it again does not resize the table,
    /// since no rehash could bring that chain back under the threshold.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<()> {
        self.insert_node(Node::new(key, value))
    }

    /// Links an already built node into the table.
    ///
    /// Behaves like [`insert`](Self::insert).
    pub fn insert_node(&mut self, node: Node) -> Result<()> {
        let index = self.bucket_of(node.key());
        let chain_len = self.buckets[index].push(Box::new(node));
        self.len += 1;

        if !self.config.auto_resize || chain_len <= self.config.chain_threshold {
            return Ok(());
        }

        let copies = self.copies_of_head(index);
        if copies > self.config.chain_threshold {
            log::trace!(
                "chain {index} holds {copies} copies of one key, over threshold of {}",
                self.config.chain_threshold
            );
            return Ok(());
        }

        log::trace!(
            "chain {index} has {chain_len} nodes, over threshold of {}",
            self.config.chain_threshold
        );
        self.resize()
    }

    /// Number of nodes in chain `index` sharing the key of its head.
    fn copies_of_head(&self, index: usize) -> usize {
        let mut chain = self.chain(index);

        match chain.next() {
            Some(head) => 1 + chain.filter(|node| node.matches(head.key())).count(),
            None => 0,
        }
    }

    /// Finds the most recently inserted node whose key equals `key`.
    pub fn lookup(&self, key: &[u8]) -> Option<&Node> {
        self.chain(self.bucket_of(key)).find(|node| node.matches(key))
    }

    pub fn lookup_mut(&mut self, key: &[u8]) -> Option<&mut Node> {
        let index = self.bucket_of(key);
        let mut current = self.buckets[index].first.as_deref_mut();

        while let Some(node) = current {
            if node.matches(key) {
                return Some(node);
            }
            current = node.next.as_deref_mut();
        }

        None
    }

    pub fn lookup_str(&self, key: &str) -> Option<&Node> {
        self.lookup(key.as_bytes())
    }

    /// Value of the node [`lookup`](Self::lookup) would return.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.lookup(key).map(Node::value)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.lookup(key).is_some()
    }

    /// Unlinks the node [`lookup`](Self::lookup) would return and hands it back.
    ///
    /// At most one node is removed per call; older nodes with the same key stay in place.
    /// The table does not free the node, the caller owns it.
    pub fn delete(&mut self, key: &[u8]) -> Option<Node> {
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];

        let mut cursor = &mut bucket.first;
        while cursor.as_ref().is_some_and(|node| !node.matches(key)) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut removed = cursor.take()?;
        *cursor = removed.next.take();

        bucket.len -= 1;
        self.len -= 1;

        Some(*removed)
    }

    pub fn delete_str(&mut self, key: &str) -> Option<Node> {
        self.delete(key.as_bytes())
    }

    /// Grows the bucket array by the configured growth factor and rehashes every node.
    pub fn resize(&mut self) -> Result<()> {
        let capacity = self.config.grown_capacity(self.capacity());
        self.rehash(capacity)
    }

    /// Rehashes every node into a bucket array of exactly `capacity` buckets.
    ///
    /// The capacity never shrinks: a target below the current capacity is rejected, an equal
    /// one is a no-op.
    pub fn resize_to(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.capacity() {
            return Err(Error::InvalidCapacity(capacity));
        }

        if capacity == self.capacity() {
            return Ok(());
        }

        self.rehash(capacity)
    }

    // The new array is allocated before the old one is touched, so a failed allocation leaves
    // the table as it was. Relinking moves boxes and cannot fail.
    fn rehash(&mut self, capacity: usize) -> Result<()> {
        let old_capacity = self.capacity();
        let old = std::mem::replace(&mut self.buckets, allocate(capacity)?);

        log::debug!(
            "resizing hash table from {old_capacity} to {capacity} buckets ({} nodes)",
            self.len
        );

        for mut bucket in old {
            // Duplicates of a key share an old chain. Walking it oldest-first keeps them
            // newest-first once pushed onto their new chain.
            let mut next = reverse(bucket.take());

            while let Some(mut node) = next {
                next = node.next.take();
                let index = self.hasher.bucket(node.key(), capacity);
                self.buckets[index].push(node);
            }
        }

        self.resizes += 1;
        log::debug!("resized hash table to {capacity} buckets");

        Ok(())
    }

    /// Detaches every chain from its bucket without freeing any node.
    ///
    /// The table is left empty with its capacity unchanged, and the detached nodes are handed
    /// over in a [`Detached`]. Dropping that handle without calling
    /// [`Detached::into_nodes`] or [`Detached::free`] leaks every node in it.
    pub fn clear(&mut self) -> Detached {
        let chains = self.buckets.iter_mut().map(Bucket::take).collect();
        let len = std::mem::take(&mut self.len);

        Detached::new(chains, len)
    }

    /// Frees every node and hands their key and value buffers back to the caller.
    pub fn destroy_structure(&mut self) -> Vec<(Bytes, Bytes)> {
        let mut parts = Vec::with_capacity(self.len);

        for bucket in self.buckets.iter_mut() {
            let mut next = bucket.take();

            while let Some(mut node) = next {
                next = node.next.take();
                parts.push(node.into_parts());
            }
        }

        self.len = 0;
        parts
    }

    /// Frees every node along with its key and value buffers.
    ///
    /// The table stays usable, with its capacity unchanged.
    pub fn destroy_all(&mut self) {
        for bucket in self.buckets.iter_mut() {
            drop(bucket.take());
        }

        self.len = 0;
    }
}

fn reverse(mut chain: Link) -> Link {
    let mut reversed = None;

    while let Some(mut node) = chain {
        chain = node.next.take();
        node.next = reversed;
        reversed = Some(node);
    }

    reversed
}

impl<H: ChainHasher> Debug for HashTable<H> {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("resizes", &self.resizes)
            .finish()
    }
}

impl Arbitrary for HashTable<Sdbm> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1..32usize, vec(any::<(Bytes, Bytes)>(), 0..64))
            .prop_filter_map("failed to allocate table", |(capacity, entries)| {
                let mut table = HashTable::create(capacity).ok()?;

                for (key, value) in entries {
                    table.insert(key, value).ok()?;
                }

                Some(table)
            })
            .boxed()
    }
}

/// Iterator over the nodes of one chain, newest first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

/// Iterator over every node of a table, see [`HashTable::iter`].
pub struct Iter<'a> {
    buckets: std::iter::Enumerate<std::slice::Iter<'a, Bucket>>,
    index: usize,
    node: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                return Some((self.index, node));
            }

            let (index, bucket) = self.buckets.next()?;
            self.index = index;
            self.node = bucket.first.as_deref();
        }
    }
}

impl<'a, H: ChainHasher> IntoIterator for &'a HashTable<H> {
    type Item = (usize, &'a Node);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
