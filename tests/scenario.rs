use chaintable::{prelude::*, Config, HashTable};
use test_log::test;

#[test]
fn lookup_after_insert() -> chaintable::Result<()> {
    let mut table = HashTable::create(16)?;
    table.insert("key", "value")?;

    let node = table.lookup(b"key").expect("key should be present");
    assert_eq!(node.value(), b"value");
    assert_eq!(node.key_size(), 3);
    assert_eq!(node.value_size(), 5);

    Ok(())
}

#[test]
fn thousand_inserts_with_deletes() -> chaintable::Result<()> {
    let mut table = HashTable::with_config(Config::new().capacity(16).chain_threshold(4))?;

    for i in 0..1_000u32 {
        table.insert(i.to_string(), (i * 2).to_string())?;
        assert_eq!(table.get(i.to_string().as_bytes()), Some((i * 2).to_string().as_bytes()));
    }

    assert!(table.resizes() >= 1);
    assert!(table.capacity() > 16);
    assert_eq!(table.len(), 1_000);
    assert_eq!(table.lookup_str("500").map(Node::value), Some(&b"1000"[..]));

    for i in (0..1_000u32).step_by(5) {
        assert!(table.delete_str(&i.to_string()).is_some());
    }

    assert_eq!(table.len(), 800);

    for i in 0..1_000u32 {
        let found = table.lookup_str(&i.to_string());

        if i % 5 == 0 {
            assert!(found.is_none(), "{i} should have been deleted");
        } else {
            assert_eq!(found.map(Node::value), Some((i * 2).to_string().as_bytes()));
        }
    }

    for (index, node) in table.iter() {
        assert_eq!(index, table.bucket_of(node.key()));
    }

    table.destroy_all();
    assert!(table.is_empty());

    Ok(())
}

#[test]
fn interleaved_deletes_like_a_workload() -> chaintable::Result<()> {
    let mut table = HashTable::new()?;

    for i in 0..10_000u32 {
        let key = i.to_string();
        table.insert(key.clone(), (i * 2).to_string())?;
        assert!(table.contains_key(key.as_bytes()));

        if i % 5 == 0 {
            assert!(table.delete(key.as_bytes()).is_some());
        }
    }

    assert_eq!(table.len(), 8_000);
    assert_eq!(table.get(b"4321"), Some(&b"8642"[..]));
    assert!(table.get(b"4320").is_none());

    let parts = table.destroy_structure();
    assert_eq!(parts.len(), 8_000);
    assert!(table.is_empty());

    Ok(())
}

#[test]
fn capacity_is_monotonic_across_resizes() -> chaintable::Result<()> {
    let config = Config::new().capacity(1).growth_factor(2.0).chain_threshold(1);
    let mut table = HashTable::with_config(config)?;
    let mut capacity = table.capacity();
    let mut resizes = table.resizes();

    for i in 0..500u32 {
        table.insert(i.to_be_bytes().to_vec(), Bytes::empty())?;

        if table.resizes() > resizes {
            assert!(table.capacity() >= capacity * 2);
        } else {
            assert_eq!(table.capacity(), capacity);
        }

        capacity = table.capacity();
        resizes = table.resizes();
    }

    for i in 0..500u32 {
        assert!(table.contains_key(&i.to_be_bytes()));
    }

    Ok(())
}
