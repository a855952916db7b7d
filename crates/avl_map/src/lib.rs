//! Ordered map on an AVL tree with parent links and an end sentinel.
//!
//! ```
//! use avl_map::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for k in [10, 20, 5, 6, 15, 30, 25] {
//!     map.insert(k, k * 10);
//! }
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [5, 6, 10, 15, 20, 25, 30]);
//!
//! let pos = map.lower_bound(&16);
//! assert_eq!(map.entry_at(pos), Some((&20, &200)));
//! assert_eq!(map.erase(&10), 1);
//! assert!(map.at(&10).is_err());
//! ```

mod compare;
mod error;
mod iter;
mod map;
mod position;
#[cfg(test)]
mod proptests;
mod raw;

pub mod impls;

/// Ordered map interface.
///
/// - Keys are unique.
/// - `insert` keeps the existing value and reports whether the key was new.
/// - `lower_bound` returns the smallest `(k, v)` with `k >= key`.
pub trait OrderedMap {
    type Key: Ord;
    type Value;

    fn new() -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn insert(&mut self, key: Self::Key, value: Self::Value) -> bool;

    fn remove(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn lower_bound(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;
}

pub use compare::{Comparator, EntryOrder, Natural, Reversed};
pub use error::MapError;
pub use impls::StdBTreeMap;
pub use iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
pub use map::AvlMap;
pub use position::{Position, RevPosition};
