mod error;

pub mod collections;
pub mod config;
pub mod hash;
pub mod prelude;
pub mod testing;
pub mod values;

pub use prelude::{Bytes, Config, Error, HashTable, Node, Result};

#[doc(hidden)]
/// This is a hidden module to make the macros defined on this crate available for the users.
pub mod __dependencies {
    pub use paste;
    pub use proptest;
    pub use test_strategy;
    pub use thiserror::Error;
}

/// Generates property tests for a [`HashTable`] using the given hasher.
///
/// The hasher must implement `Default`. An optional second argument gives the [`Config`]
/// the tables are built with.
#[macro_export]
macro_rules! test_chained_table_properties {
    ($hasher:ty) => {
        $crate::test_chained_table_properties!($hasher, $crate::prelude::Config::default());
    };
    ($hasher:ty, $config:expr) => {
        $crate::__dependencies::paste::paste! {
            mod [<test_chained_table_ $hasher:snake>] {
                use std::collections::HashMap;

                use $crate::__dependencies::{
                    proptest::prelude::*,
                    test_strategy,
                };
                use $crate::prelude::*;
                use $crate::testing::{colliding_entries, entries};

                use super::$hasher;

                #[cfg_attr(coverage_nightly, coverage(off))]
                fn build(entries: &[(Bytes, Bytes)]) -> Result<HashTable<$hasher>> {
                    let mut table = HashTable::with_hasher($config, <$hasher>::default())?;

                    for (key, value) in entries {
                        table.insert(key.clone(), value.clone())?;
                    }

                    Ok(table)
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                fn assert_placement(table: &HashTable<$hasher>) -> Result<(), TestCaseError> {
                    for (index, node) in table.iter() {
                        prop_assert_eq!(index, table.bucket_of(node.key()));
                    }

                    Ok(())
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_lookup_finds_latest_insert(
                    #[strategy(colliding_entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                ) {
                    let table = build(&pairs)?;
                    let latest: HashMap<Bytes, Bytes> = pairs.iter().cloned().collect();

                    for (key, value) in latest.iter() {
                        prop_assert_eq!(table.get(key), Some(value.as_slice()));
                    }

                    prop_assert_eq!(table.len(), pairs.len());
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_delete_uncovers_older_duplicates(
                    #[strategy(colliding_entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                ) {
                    let mut table = build(&pairs)?;
                    let mut model: HashMap<Bytes, Vec<Bytes>> = HashMap::new();

                    for (key, value) in pairs.iter() {
                        model.entry(key.clone()).or_default().push(value.clone());
                    }

                    for (key, mut values) in model {
                        while let Some(value) = values.pop() {
                            prop_assert_eq!(table.get(&key), Some(value.as_slice()));

                            let removed = table.delete(&key);
                            prop_assert_eq!(removed.as_ref().map(Node::value), Some(value.as_slice()));
                        }

                        prop_assert!(table.lookup(&key).is_none());
                        prop_assert!(table.delete(&key).is_none());
                    }

                    prop_assert!(table.is_empty());
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_every_node_sits_in_its_bucket(
                    #[strategy(colliding_entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                ) {
                    let table = build(&pairs)?;
                    assert_placement(&table)?;
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_resize_keeps_entries_reachable(
                    #[strategy(entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                    #[strategy(1..4usize)] rounds: usize,
                ) {
                    let mut table = build(&pairs)?;

                    for _ in 0..rounds {
                        let before = table.capacity();
                        table.resize()?;

                        prop_assert!(table.capacity() > before);
                        prop_assert!(
                            table.capacity() as f64 >= before as f64 * table.config().growth_factor - 1.0
                        );
                        assert_placement(&table)?;
                    }

                    for (key, _) in pairs.iter() {
                        prop_assert!(table.contains_key(key));
                    }

                    prop_assert_eq!(table.len(), pairs.len());
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_destroy_all_keeps_table_operational(
                    #[strategy(entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                ) {
                    let mut table = build(&pairs)?;
                    let capacity = table.capacity();

                    table.destroy_all();

                    prop_assert!(table.is_empty());
                    prop_assert_eq!(table.capacity(), capacity);
                    prop_assert_eq!(table.iter().count(), 0);

                    $crate::prop_assert_does_not_change!(table.destroy_all(), table.capacity());
                    prop_assert!(table.is_empty());
                }

                #[cfg_attr(coverage_nightly, coverage(off))]
                #[test_strategy::proptest(fork = false)]
                fn test_destroy_structure_returns_every_entry(
                    #[strategy(colliding_entries(0..48))] pairs: Vec<(Bytes, Bytes)>,
                ) {
                    let mut table = build(&pairs)?;

                    let mut parts = table.destroy_structure();
                    let mut expected = pairs.clone();
                    parts.sort();
                    expected.sort();

                    prop_assert_eq!(parts, expected);
                    prop_assert!(table.is_empty());
                }
            }
        }
    };
}

#[macro_export]
macro_rules! prop_assert_changes {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        prop_assert_eq!($value, old_value);

        $action;

        prop_assert_ne!($value, old_value);
    };
}

#[macro_export]
macro_rules! prop_assert_does_not_change {
    ($action: expr, $value: expr) => {
        let old_value = $value.clone();

        $action;

        prop_assert_eq!($value, old_value);
    };
}
