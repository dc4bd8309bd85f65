//! Hash collections used across fontcache.
//!
//! Re-exports of the AHash-backed collections so every crate agrees on one
//! hasher.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_ahash() {
        let mut map = HashMap::new();
        map.insert(0x41u32, 7u32);
        assert_eq!(map.get(&0x41), Some(&7));
    }

    #[test]
    fn test_hashset_ahash() {
        let mut set = HashSet::new();
        set.insert(42);
        assert!(set.contains(&42));
    }
}
