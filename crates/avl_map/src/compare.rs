use std::cmp::Ordering;

/// Total order used to arrange keys.
///
/// Implementations must be consistent: `compare(a, b)` is the reverse of
/// `compare(b, a)`, and `Less` is transitive. Keys comparing `Equal` are treated
/// as the same key.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders keys descending by their `Ord` implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed;

impl<K: Ord + ?Sized> Comparator<K> for Reversed {
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        rhs.cmp(lhs)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        self(lhs, rhs)
    }
}

/// Orders `(key, value)` entries by key alone.
#[derive(Clone, Copy, Debug)]
pub struct EntryOrder<'a, C> {
    cmp: &'a C,
}

impl<'a, C> EntryOrder<'a, C> {
    pub(crate) fn new(cmp: &'a C) -> Self {
        Self { cmp }
    }

    pub fn compare<K, V>(&self, lhs: &(K, V), rhs: &(K, V)) -> Ordering
    where
        C: Comparator<K>,
    {
        self.cmp.compare(&lhs.0, &rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::{Comparator, EntryOrder, Natural, Reversed};

    #[test]
    fn builtin_orders() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Reversed.compare(&1, &2), Ordering::Greater);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
    }

    #[test]
    fn closures_are_comparators() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        assert_eq!(
            by_len.compare(&"abc".to_string(), &"de".to_string()),
            Ordering::Greater
        );
    }

    #[test]
    fn entries_compare_by_key_only() {
        let order = EntryOrder::new(&Natural);
        assert_eq!(order.compare(&(1, "z"), &(2, "a")), Ordering::Less);
        assert_eq!(order.compare(&(2, "z"), &(2, "a")), Ordering::Equal);
    }
}
