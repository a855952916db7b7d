mod avl;
mod std_btree;

pub use std_btree::StdBTreeMap;
