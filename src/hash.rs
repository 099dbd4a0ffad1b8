use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem,
};

use rustc_hash::FxHasher;

use crate::arena::{Arena, NodeId};
use crate::bst::{Placement, Walk};
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::rb::Colour;
use crate::stats::Stats;

/// Smallest bucket count, smaller requests are raised to this.
pub const DEFAULT_CAPACITY: usize = 10;

/// Bucket array doubles once `len / capacity` goes above this.
pub const MAX_LOAD_FACTOR: f64 = 0.75;

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Default hash function, FxHash over `K`'s [`Hash`].
pub fn fx_hash<K: Hash>(key: &K) -> u64 {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// HashTable maps keys to values through an array of buckets, each
/// bucket a red-black tree ordered by key. Keys colliding on a bucket
/// cost O(log n) instead of a linear chain walk. All bucket trees
/// live in one arena and share its sentinel.
///
/// Re-inserting an equal key bumps that entry's multiplicity, the
/// stored value is kept and the new value dropped.
///
/// ```
/// use sorted_collections::HashTable;
///
/// let mut table = HashTable::with_hasher(10, |k: &u64| *k % 10).unwrap();
/// for (k, v) in [(3, "a"), (13, "b"), (23, "c")].iter() {
///     table.insert(*k, *v).unwrap();
/// }
/// assert_eq!(table.bucket_count(&3), 3);
/// assert_eq!(table.find_by_key(&13), Some(&"b"));
/// ```
pub struct HashTable<
    K,
    V,
    H = fn(&K) -> u64,
    CK = fn(&K, &K) -> Ordering,
    CV = fn(&V, &V) -> Ordering,
> {
    arena: Arena<Entry<K, V>, Colour>,
    buckets: Vec<NodeId>, // root of each bucket tree.
    counts: Vec<usize>,   // distinct keys in each bucket.
    n_count: usize,
    hash: H,
    cmp_key: CK,
    cmp_value: CV,
}

/// Different ways to construct a new HashTable instance.
impl<K, V> HashTable<K, V>
where
    K: Hash + Ord,
    V: Ord,
{
    /// Create an empty table with [`DEFAULT_CAPACITY`] buckets, hashing
    /// with [`fx_hash`].
    pub fn new() -> HashTable<K, V> {
        HashTable {
            arena: Arena::new(),
            buckets: vec![NodeId::NIL; DEFAULT_CAPACITY],
            counts: vec![0; DEFAULT_CAPACITY],
            n_count: 0,
            hash: fx_hash::<K>,
            cmp_key: Ord::cmp,
            cmp_value: Ord::cmp,
        }
    }

    /// Create an empty table with at least `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Result<HashTable<K, V>> {
        let hash: fn(&K) -> u64 = fx_hash::<K>;
        HashTable::with_hasher(capacity, hash)
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Hash + Ord,
    V: Ord,
{
    fn default() -> Self {
        HashTable::new()
    }
}

impl<K, V, H> HashTable<K, V, H>
where
    K: Ord,
    V: Ord,
    H: Fn(&K) -> u64,
{
    /// Create an empty table bucketing keys by `hash`. A signed hash
    /// shall be handed over as its unsigned bit pattern.
    pub fn with_hasher(capacity: usize, hash: H) -> Result<HashTable<K, V, H>> {
        let cmp_key: fn(&K, &K) -> Ordering = Ord::cmp;
        let cmp_value: fn(&V, &V) -> Ordering = Ord::cmp;
        HashTable::with_comparators(capacity, hash, cmp_key, cmp_value)
    }
}

impl<K, V, H, CK, CV> HashTable<K, V, H, CK, CV>
where
    H: Fn(&K) -> u64,
    CK: Fn(&K, &K) -> Ordering,
    CV: Fn(&V, &V) -> Ordering,
{
    /// Create an empty table with explicit hash function, key order
    /// and value order. Equal keys under `cmp_key` must hash equal.
    pub fn with_comparators(
        capacity: usize,
        hash: H,
        cmp_key: CK,
        cmp_value: CV,
    ) -> Result<HashTable<K, V, H, CK, CV>> {
        let capacity = capacity.max(DEFAULT_CAPACITY);
        let (buckets, counts) = new_buckets(capacity).ok_or(Error::AllocationFailed)?;
        Ok(HashTable {
            arena: Arena::new(),
            buckets,
            counts,
            n_count: 0,
            hash,
            cmp_key,
            cmp_value,
        })
    }
}

fn new_buckets(capacity: usize) -> Option<(Vec<NodeId>, Vec<usize>)> {
    let (mut buckets, mut counts) = (vec![], vec![]);
    buckets.try_reserve_exact(capacity).ok()?;
    counts.try_reserve_exact(capacity).ok()?;
    buckets.resize(capacity, NodeId::NIL);
    counts.resize(capacity, 0);
    Some((buckets, counts))
}

/// Maintenance API.
impl<K, V, H, CK, CV> HashTable<K, V, H, CK, CV>
where
    H: Fn(&K) -> u64,
    CK: Fn(&K, &K) -> Ordering,
    CV: Fn(&V, &V) -> Ordering,
{
    /// Return number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.n_count as f64 / self.buckets.len() as f64
    }

    /// Bucket `key` maps to, `hash(key) mod capacity`.
    #[inline]
    pub fn bucket_index(&self, key: &K) -> usize {
        bucket_of(&self.hash, key, self.buckets.len())
    }

    /// Number of distinct keys sharing `key`'s bucket.
    pub fn bucket_count(&self, key: &K) -> usize {
        self.counts[self.bucket_index(key)]
    }

    /// Return quickly with basic statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, Arena::<Entry<K, V>, Colour>::node_size())
    }

    /// Drop every entry, keep the current capacity.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.buckets.iter_mut().for_each(|root| *root = NodeId::NIL);
        self.counts.iter_mut().for_each(|n| *n = 0);
        self.n_count = 0;
    }

    /// Validate every bucket as a red-black tree, check that each key
    /// sits in the bucket it hashes to, that per-bucket and total
    /// counts agree, and that the load factor is within limit.
    pub fn validate(&self) -> Result<Stats> {
        if self.load_factor() > MAX_LOAD_FACTOR {
            let (len, capacity) = (self.n_count, self.capacity());
            return Err(Error::LoadFactor { len, capacity });
        }

        let cmp_key = &self.cmp_key;
        let cmp = |a: &Entry<K, V>, b: &Entry<K, V>| cmp_key(&a.key, &b.key);
        let (mut depths, mut total, mut blacks) = (Depth::new(), 0, 0);
        for (index, &root) in self.buckets.iter().enumerate() {
            if self.arena.meta(root) == Colour::Red {
                return Err(Error::RedRoot);
            }
            self.arena.rb_check(root)?;
            let counted = self.arena.check_tree(root, &cmp, &mut depths)?;
            if counted != self.counts[index] {
                let bookkept = self.counts[index];
                return Err(Error::CountMismatch { bookkept, counted });
            }
            for (entry, _) in Walk::new(&self.arena, root) {
                if self.bucket_index(&entry.key) != index {
                    return Err(Error::WrongBucket { index });
                }
            }
            total += counted;
            blacks = blacks.max(self.arena.black_height(root));
        }
        if total != self.n_count || total != self.arena.live() {
            let bookkept = self.n_count;
            return Err(Error::CountMismatch { bookkept, counted: total });
        }

        let mut stats = self.stats();
        stats.set_blacks(blacks);
        stats.set_depths(depths);
        Ok(stats)
    }
}

/// Write operations on HashTable instance.
impl<K, V, H, CK, CV> HashTable<K, V, H, CK, CV>
where
    H: Fn(&K) -> u64,
    CK: Fn(&K, &K) -> Ordering,
    CV: Fn(&V, &V) -> Ordering,
{
    /// Insert `key` with `value`. An existing equal key gets its
    /// multiplicity bumped and keeps its stored value. Return the
    /// multiplicity after insertion.
    ///
    /// When the load factor goes above [`MAX_LOAD_FACTOR`] the bucket
    /// array is doubled. If that fails the insertion is rolled back,
    /// the table is left as it was before the call and `RehashFailed`
    /// is returned.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize> {
        let (index, id, new) = self.link_entry(Entry { key, value })?;
        let multiplicity = self.arena[id].multiplicity;

        if self.load_factor() > MAX_LOAD_FACTOR {
            if let Err(err) = self.rehash() {
                self.unlink_entry(index, id, new);
                return Err(err);
            }
        }
        Ok(multiplicity)
    }

    /// Delete one occurrence of `key`, the entry goes away once its
    /// multiplicity drops to zero.
    pub fn delete_by_key(&mut self, key: &K) -> Result<()> {
        let (index, id) = self.node_for_removal(key)?;
        self.delete_node(index, id);
        Ok(())
    }

    /// Like [`HashTable::delete_by_key`], but only when the stored
    /// value equals `value`.
    pub fn delete_by_key_value(&mut self, key: &K, value: &V) -> Result<()> {
        let (index, id) = self.node_for_removal(key)?;
        if (self.cmp_value)(value, &self.arena.value(id).value) != Ordering::Equal {
            return Err(Error::KeyNotFound);
        }
        self.delete_node(index, id);
        Ok(())
    }

    /// Remove the entry for `key` whatever its multiplicity, and
    /// return it.
    pub fn remove_by_key(&mut self, key: &K) -> Result<(K, V)> {
        let (index, id) = self.node_for_removal(key)?;
        let entry = self.arena.rb_unlink(&mut self.buckets[index], id);
        self.n_count -= 1;
        self.counts[index] -= 1;
        Ok((entry.key, entry.value))
    }

    /// Drop every entry in `key`'s bucket. Return how many distinct
    /// keys were dropped.
    pub fn delete_bucket(&mut self, key: &K) -> usize {
        let index = self.bucket_index(key);
        let root = mem::replace(&mut self.buckets[index], NodeId::NIL);
        let n = self.arena.free_subtree(root);
        self.counts[index] = 0;
        self.n_count -= n;
        n
    }

    fn link_entry(&mut self, entry: Entry<K, V>) -> Result<(usize, NodeId, bool)> {
        let index = self.bucket_index(&entry.key);
        let cmp_key = &self.cmp_key;
        let cmp = |a: &Entry<K, V>, b: &Entry<K, V>| cmp_key(&a.key, &b.key);
        let (id, new) = self.arena.rb_insert(&mut self.buckets[index], entry, &cmp)?;
        if new {
            self.n_count += 1;
            self.counts[index] += 1;
        }
        Ok((index, id, new))
    }

    // Reverse a `link_entry` that returned `(index, id, new)`.
    fn unlink_entry(&mut self, index: usize, id: NodeId, new: bool) {
        if new {
            self.arena.rb_unlink(&mut self.buckets[index], id);
            self.n_count -= 1;
            self.counts[index] -= 1;
        } else {
            self.arena[id].multiplicity -= 1;
        }
    }

    fn node_for_removal(&self, key: &K) -> Result<(usize, NodeId)> {
        if self.is_empty() {
            return Err(Error::RemoveFromEmpty);
        }
        let index = self.bucket_index(key);
        match self.node_of(index, key) {
            id if id.is_nil() => Err(Error::KeyNotFound),
            id => Ok((index, id)),
        }
    }

    fn delete_node(&mut self, index: usize, id: NodeId) {
        if self.arena[id].multiplicity > 1 {
            self.arena[id].multiplicity -= 1;
        } else {
            self.arena.rb_unlink(&mut self.buckets[index], id);
            self.n_count -= 1;
            self.counts[index] -= 1;
        }
    }

    /// Double the bucket array and relink every node into its new
    /// bucket. Nodes stay where they are in the arena, only links
    /// change, so nothing can fail once the new array is allocated.
    fn rehash(&mut self) -> Result<()> {
        let old = self.buckets.len();
        let capacity = old.saturating_mul(2);
        let mut ids: Vec<NodeId> = vec![];
        let staged = new_buckets(capacity).filter(|_| ids.try_reserve_exact(self.n_count).is_ok());
        let (mut buckets, mut counts) = match staged {
            Some(staged) => staged,
            None => {
                tracing::warn!(old, capacity, len = self.n_count, "rehash failed");
                return Err(Error::RehashFailed { capacity });
            }
        };

        for &root in self.buckets.iter() {
            self.arena.walk_inorder(root, &mut |id| ids.push(id));
        }
        for id in ids {
            let index = bucket_of(&self.hash, &self.arena.value(id).key, capacity);
            let placement = {
                let (key, cmp_key) = (&self.arena.value(id).key, &self.cmp_key);
                self.arena.locate(buckets[index], |e| cmp_key(key, &e.key))
            };
            match placement {
                Placement::Vacant { parent, side } => {
                    self.arena.rb_link(&mut buckets[index], parent, side, id);
                    counts[index] += 1;
                }
                // equal keys that hashed apart, merge them.
                Placement::Found(other) => {
                    let multiplicity = self.arena[id].multiplicity;
                    self.arena[other].multiplicity += multiplicity;
                    self.arena.release(id);
                    self.n_count -= 1;
                }
            }
        }

        self.buckets = buckets;
        self.counts = counts;
        tracing::debug!(old, capacity, len = self.n_count, "rehashed");
        Ok(())
    }
}

/// Read operations on HashTable instance.
impl<K, V, H, CK, CV> HashTable<K, V, H, CK, CV>
where
    H: Fn(&K) -> u64,
    CK: Fn(&K, &K) -> Ordering,
    CV: Fn(&V, &V) -> Ordering,
{
    /// Get the value stored for `key`.
    pub fn find_by_key(&self, key: &K) -> Option<&V> {
        let id = self.node_of(self.bucket_index(key), key);
        self.entry_at(id).map(|entry| &entry.value)
    }

    /// Get the value stored for `key`, only if it equals `value`.
    pub fn find_by_key_value(&self, key: &K, value: &V) -> Option<&V> {
        self.find_by_key(key)
            .filter(|stored| (self.cmp_value)(value, *stored) == Ordering::Equal)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_by_key(key).is_some()
    }

    /// Return how many times `key` was inserted, net of deletes.
    pub fn multiplicity(&self, key: &K) -> usize {
        match self.node_of(self.bucket_index(key), key) {
            id if id.is_nil() => 0,
            id => self.arena[id].multiplicity,
        }
    }

    /// Entries of `key`'s bucket in key order.
    pub fn bucket_iter(&self, key: &K) -> impl Iterator<Item = (&K, &V)> + '_ {
        let root = self.buckets[self.bucket_index(key)];
        Walk::new(&self.arena, root).map(|(entry, _)| (&entry.key, &entry.value))
    }

    /// Return an iterator over all entries, buckets in index order and
    /// key order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        let arena = &self.arena;
        self.buckets
            .iter()
            .flat_map(move |&root| Walk::new(arena, root))
            .map(|(entry, _)| (&entry.key, &entry.value))
    }

    pub fn traverse_inorder<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        let arena = &self.arena;
        for &root in self.buckets.iter() {
            arena.walk_inorder(root, &mut |id| {
                let entry = arena.value(id);
                action(&entry.key, &entry.value)
            });
        }
    }

    pub fn traverse_preorder<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        let arena = &self.arena;
        for &root in self.buckets.iter() {
            arena.walk_preorder(root, &mut |id| {
                let entry = arena.value(id);
                action(&entry.key, &entry.value)
            });
        }
    }

    pub fn traverse_postorder<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        let arena = &self.arena;
        for &root in self.buckets.iter() {
            arena.walk_postorder(root, &mut |id| {
                let entry = arena.value(id);
                action(&entry.key, &entry.value)
            });
        }
    }

    pub fn traverse_level<F>(&self, mut action: F)
    where
        F: FnMut(&K, &V),
    {
        let arena = &self.arena;
        for &root in self.buckets.iter() {
            arena.walk_level(root, &mut |id| {
                let entry = arena.value(id);
                action(&entry.key, &entry.value)
            });
        }
    }

    fn node_of(&self, index: usize, key: &K) -> NodeId {
        let cmp_key = &self.cmp_key;
        self.arena
            .search(self.buckets[index], |e| cmp_key(key, &e.key))
    }

    #[inline]
    fn entry_at(&self, id: NodeId) -> Option<&Entry<K, V>> {
        if id.is_nil() {
            None
        } else {
            Some(self.arena.value(id))
        }
    }
}

#[inline]
fn bucket_of<K, H>(hash: &H, key: &K, capacity: usize) -> usize
where
    H: Fn(&K) -> u64,
{
    (hash(key) % capacity as u64) as usize
}

/// One line per non-empty bucket, prefixed by its index.
impl<K, V, H, CK, CV> fmt::Display for HashTable<K, V, H, CK, CV>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, &root) in self.buckets.iter().enumerate() {
            if root.is_nil() {
                continue;
            }
            write!(f, "[{}]", index)?;
            for (entry, _) in Walk::new(&self.arena, root) {
                write!(f, " ({}: {})", entry.key, entry.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modulo_ten(key: &u64) -> u64 {
        *key % 10
    }

    #[test]
    fn test_unlink_restores_table() {
        let hash: fn(&u64) -> u64 = modulo_ten;
        let mut table = HashTable::with_hasher(10, hash).unwrap();
        for key in [3, 13, 4, 5, 6, 7, 8].iter() {
            table.insert(*key, *key * 10).unwrap();
        }
        assert_eq!(table.capacity(), 10);
        let before = table.to_string();

        // a new key pushes the load factor over the limit.
        let (index, id, new) = table.link_entry(Entry { key: 23, value: 230 }).unwrap();
        assert!(new);
        assert!(table.load_factor() > MAX_LOAD_FACTOR);
        table.unlink_entry(index, id, new);
        assert!(table.validate().is_ok());
        assert_eq!(table.len(), 7);
        assert_eq!(table.bucket_count(&3), 2);
        assert_eq!(table.find_by_key(&23), None);
        assert_eq!(table.to_string(), before);

        let (index, id, new) = table.link_entry(Entry { key: 13, value: 0 }).unwrap();
        assert!(!new);
        assert_eq!(table.multiplicity(&13), 2);
        table.unlink_entry(index, id, new);
        assert_eq!(table.multiplicity(&13), 1);
        assert_eq!(table.find_by_key(&13), Some(&130));
        assert!(table.validate().is_ok());
        assert_eq!(table.to_string(), before);
    }
}
