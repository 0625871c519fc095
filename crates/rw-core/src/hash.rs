//! Fx hash map and set aliases.
//!
//! Manifest keys and route file names are short strings, which is the case
//! the Fx hasher from `rustc-hash` is tuned for. None of these maps hold
//! attacker-controlled keys.

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new [`FxHashMap`] with room for `capacity` entries.
///
/// # Examples
///
/// ```
/// use rw_core::hash::fx_hash_map_with_capacity;
///
/// let map: rw_core::FxHashMap<String, u8> = fx_hash_map_with_capacity(16);
/// assert!(map.capacity() >= 16);
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_with_capacity() {
        let mut map: FxHashMap<&str, &str> = fx_hash_map_with_capacity(4);
        map.insert("routes/index.svelte", "assets/index-1a2b.js");
        assert_eq!(map.get("routes/index.svelte"), Some(&"assets/index-1a2b.js"));
        assert!(map.capacity() >= 4);
    }
}
