mod detached;
mod table;

pub use {
    detached::Detached,
    table::{Chain, HashTable, Iter},
};
