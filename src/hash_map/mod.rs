use std::fmt::{Debug, Display, Formatter};
use std::ops::Index;

use itertools::Itertools;
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::hash::{DefaultHash, Hash};

use self::cursor::{ConstCursor, Cursor, MutCursor, Mutability};
use self::entry::{Entry, OccupiedEntry, VacantEntry};
use self::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use self::node::{
    clone_chain, find_in_chain, find_in_chain_mut, free_chain, unlink_where, Link, Node,
};

pub mod cursor;
pub mod entry;
pub mod iter;
mod node;

/// The number of buckets a map starts with when none is requested
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// A hash map using separate chaining: a fixed number of buckets,
/// each holding a singly linked chain of the entries whose key hashes
/// to it. The bucket count only changes through `rehash`; the load
/// factor is informational and never triggers a resize
pub struct HashMap<K, V, H = DefaultHash<K>> {
    buckets: Vec<Link<K, V>>,
    element_count: usize,
    // never reused, so a stale cursor can't match a newer node
    next_serial: u64,
    hash: H,
}

#[track_caller]
fn invalid_cursor() -> ! {
    panic!("cursor does not denote a live entry of this hash map")
}

impl<K: Eq, V> HashMap<K, V, DefaultHash<K>>
where
    DefaultHash<K>: Hash<K>,
{
    /// Creates an empty hash map with `DEFAULT_BUCKET_COUNT` buckets
    pub fn new() -> Self {
        Self::with_bucket_count(DEFAULT_BUCKET_COUNT)
    }

    /// Creates an empty hash map with the given number of buckets
    ///
    /// # Arguments
    ///
    /// `bucket_count`: The number of buckets, which must be positive
    pub fn with_bucket_count(bucket_count: usize) -> Self {
        Self::with_bucket_count_and_hasher(bucket_count, DefaultHash::new())
    }
}

impl<K, V, H> HashMap<K, V, H> {
    /// Creates an empty hash map with the given number of buckets and
    /// hash function
    ///
    /// # Arguments
    ///
    /// `bucket_count`: The number of buckets
    ///
    /// `hash`: The hash function
    ///
    /// # Panics
    ///
    /// Panics if `bucket_count` is zero
    pub fn with_bucket_count_and_hasher(bucket_count: usize, hash: H) -> Self {
        assert!(bucket_count > 0, "a hash map needs at least one bucket");
        Self {
            buckets: Self::alloc_buckets(bucket_count),
            element_count: 0,
            next_serial: 0,
            hash,
        }
    }

    /// Returns the number of elements in the hash map
    pub fn len(&self) -> usize {
        self.element_count
    }

    /// Returns true if the hash map is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the average number of entries per bucket
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    /// Returns the hash function of the map
    pub fn hasher(&self) -> &H {
        &self.hash
    }

    /// Clears the hash map, removing all key-value pairs. The bucket
    /// count is left unchanged
    pub fn clear(&mut self) {
        trace!("clearing {} entries", self.element_count);
        self.free_buckets();
        self.element_count = 0;
    }

    /// Returns an iterator over the hash map's
    /// key-value pairs
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, self.element_count)
    }

    /// Returns an iterator over the hash map's
    /// key-value pairs, where the values are
    /// mutable
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.buckets, self.element_count)
    }

    /// Returns an iterator over the hash map's keys, in cursor order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the hash map's values, in cursor order
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over the hash map's values, where the
    /// values are mutable
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns a cursor to the first entry, or the end-sentinel if the
    /// map is empty
    pub fn begin(&self) -> ConstCursor<K, V> {
        self.first_from(0)
    }

    /// Returns the end-sentinel, one past the last entry
    pub fn end(&self) -> ConstCursor<K, V> {
        Cursor::end(self.bucket_count())
    }

    /// Returns a mutable cursor to the first entry, or the end-sentinel
    /// if the map is empty
    pub fn begin_mut(&mut self) -> MutCursor<K, V> {
        self.first_from(0)
    }

    /// Returns the mutable end-sentinel
    pub fn end_mut(&mut self) -> MutCursor<K, V> {
        Cursor::end(self.bucket_count())
    }

    /// Returns a cursor to the entry following the one `cursor`
    /// denotes: the next node of its chain, else the head of the next
    /// non-empty bucket, else the end-sentinel
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end-sentinel or no longer denotes a
    /// live entry
    #[track_caller]
    pub fn advance<M: Mutability>(&self, cursor: Cursor<K, V, M>) -> Cursor<K, V, M> {
        match self.node_at(cursor) {
            Some(node) => match node.next() {
                Some(next) => Cursor::at(next, cursor.bucket_index()),
                None => self.first_from(cursor.bucket_index() + 1),
            },
            None => invalid_cursor(),
        }
    }

    /// Returns the entry a cursor denotes
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end-sentinel or no longer denotes a
    /// live entry
    #[track_caller]
    pub fn entry_at<M: Mutability>(&self, cursor: Cursor<K, V, M>) -> (&K, &V) {
        match self.node_at(cursor) {
            Some(node) => (&node.key, &node.value),
            None => invalid_cursor(),
        }
    }

    /// Returns the entry a mutable cursor denotes, with its value
    /// mutable in place
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end-sentinel or no longer denotes a
    /// live entry
    #[track_caller]
    pub fn entry_at_mut(&mut self, cursor: MutCursor<K, V>) -> (&K, &mut V) {
        match self.node_at_mut(cursor) {
            Some(node) => (&node.key, &mut node.value),
            None => invalid_cursor(),
        }
    }

    /// Removes the entry a cursor denotes, returning a cursor to the
    /// entry that followed it. Cursors to any other entry stay valid
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end-sentinel or no longer denotes a
    /// live entry
    #[track_caller]
    pub fn erase_at<M: Mutability>(&mut self, cursor: Cursor<K, V, M>) -> MutCursor<K, V> {
        let next = self.advance(cursor).retag();
        self.take_at(cursor);
        next
    }

    /// Swaps the contents, bucket arrays and hash functions of two maps
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other)
    }

    /// Moves the contents out of the map, leaving it empty with
    /// `DEFAULT_BUCKET_COUNT` buckets and a copy of its hash function.
    /// Runs in constant time regardless of the number of entries
    pub fn take(&mut self) -> Self
    where
        H: Clone,
    {
        let mut emptied =
            Self::with_bucket_count_and_hasher(DEFAULT_BUCKET_COUNT, self.hash.clone());
        emptied.next_serial = self.next_serial;
        std::mem::replace(self, emptied)
    }

    /// Renders every bucket chain along with the size, bucket count and
    /// load factor. Meant for interactive debugging only
    pub fn dump(&self) -> String
    where
        K: Display,
        V: Display,
    {
        Dump(self).to_string()
    }

    /// Writes `dump` to the debug log
    pub fn log_dump(&self)
    where
        K: Display,
        V: Display,
    {
        debug!("hash map contents:\n{}", Dump(self));
    }

    /// Unlinks the node a cursor denotes and hands its pair back
    #[track_caller]
    pub(crate) fn take_at<M: Mutability>(&mut self, cursor: Cursor<K, V, M>) -> (K, V) {
        let removed = self
            .buckets
            .get_mut(cursor.bucket_index())
            .and_then(|bucket| unlink_where(bucket, |node| cursor.denotes(node)));
        match removed {
            Some(node) => {
                self.element_count -= 1;
                let Node { key, value, .. } = *node;
                (key, value)
            }
            None => invalid_cursor(),
        }
    }

    /// Links a new node in as the head of a bucket's chain
    pub(crate) fn push_front(&mut self, bucket: usize, key: K, value: V) -> &mut Node<K, V> {
        self.element_count += 1;
        let serial = self.next_serial;
        self.next_serial += 1;
        let head = &mut self.buckets[bucket];
        let next = head.take();
        head.insert(Node::new(serial, key, value, next))
    }

    /// Allocates a bucket array with empty chains
    fn alloc_buckets(bucket_count: usize) -> Vec<Link<K, V>> {
        std::iter::repeat_with(|| None).take(bucket_count).collect()
    }

    /// Frees all chains, leaving the buckets empty
    fn free_buckets(&mut self) {
        self.buckets
            .iter_mut()
            .for_each(|bucket| free_chain(bucket.take()));
    }

    /// Returns a cursor to the head of the first non-empty bucket at or
    /// after `start`, or the end-sentinel
    fn first_from<M: Mutability>(&self, start: usize) -> Cursor<K, V, M> {
        self.buckets
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(index, bucket)| bucket.as_deref().map(|node| Cursor::at(node, index)))
            .unwrap_or_else(|| Cursor::end(self.bucket_count()))
    }

    /// Resolves a cursor against the chain of the bucket it names
    fn node_at<M: Mutability>(&self, cursor: Cursor<K, V, M>) -> Option<&Node<K, V>> {
        let bucket = self.buckets.get(cursor.bucket_index())?;
        find_in_chain(bucket.as_deref(), |node| cursor.denotes(node))
    }

    /// Resolves a cursor against the chain of the bucket it names
    fn node_at_mut<M: Mutability>(&mut self, cursor: Cursor<K, V, M>) -> Option<&mut Node<K, V>> {
        let bucket = self.buckets.get_mut(cursor.bucket_index())?;
        find_in_chain_mut(bucket.as_deref_mut(), |node| cursor.denotes(node))
    }
}

impl<K: Eq, V, H: Hash<K>> HashMap<K, V, H> {
    /// Creates a hash map from a sequence of pairs. When a key repeats,
    /// the first pair wins
    ///
    /// # Arguments
    ///
    /// `iter`: The pairs to insert
    ///
    /// `bucket_count`: The number of buckets, which must be positive
    ///
    /// `hash`: The hash function
    pub fn from_entries<I: IntoIterator<Item = (K, V)>>(
        iter: I,
        bucket_count: usize,
        hash: H,
    ) -> Self {
        let mut hm = Self::with_bucket_count_and_hasher(bucket_count, hash);
        hm.extend(iter);
        hm
    }

    /// Checks if the hash map contains the given key
    ///
    /// # Arguments
    ///
    /// `key`: The key to search for
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Fetches the associated value for a key
    ///
    /// # Arguments
    ///
    /// `key`: The key to search for
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Fetches the stored key and its associated value
    ///
    /// # Arguments
    ///
    /// `key`: The key to search for
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let bucket = &self.buckets[self.bucket_index(key)];
        find_in_chain(bucket.as_deref(), |node| node.matches(key))
            .map(|node| (&node.key, &node.value))
    }

    /// Fetches the associated value for a key
    ///
    /// # Arguments
    ///
    /// `key`: The key to search for
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        find_in_chain_mut(self.buckets[index].as_deref_mut(), |node| node.matches(key))
            .map(|node| &mut node.value)
    }

    /// Fetches the associated value for a key, failing with
    /// `Error::KeyNotFound` if it is absent
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Fetches the associated value for a key, failing with
    /// `Error::KeyNotFound` if it is absent
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a cursor to the key's entry, or the end-sentinel
    pub fn find(&self, key: &K) -> ConstCursor<K, V> {
        self.find_cursor(key)
    }

    /// Returns a mutable cursor to the key's entry, or the end-sentinel
    pub fn find_mut(&mut self, key: &K) -> MutCursor<K, V> {
        self.find_cursor(key)
    }

    /// Inserts the key-value pair into the hash map unless the key is
    /// already present, in which case the stored value is left alone.
    /// Returns a cursor to the key's entry and whether an insertion
    /// took place
    ///
    /// # Arguments
    ///
    /// `key`: The key with which to insert the pair
    ///
    /// `value`: The associated value
    pub fn insert(&mut self, key: K, value: V) -> (MutCursor<K, V>, bool) {
        let index = self.bucket_index(&key);
        if let Some(existing) =
            find_in_chain(self.buckets[index].as_deref(), |node| node.matches(&key))
        {
            return (Cursor::at(existing, index), false);
        }
        let node = self.push_front(index, key, value);
        (Cursor::at(node, index), true)
    }

    /// Removes the key's entry, returning true if there was one
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes a key-value pair from the hash map,
    /// returning the value if it was found
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key-value pair from the hash map,
    /// returning the pair if it was found
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let index = self.bucket_index(key);
        let node = unlink_where(&mut self.buckets[index], |node| node.matches(key))?;
        self.element_count -= 1;
        let Node { key, value, .. } = *node;
        Some((key, value))
    }

    /// Redistributes every entry into a new array of `bucket_count`
    /// buckets. Nodes are relinked rather than reallocated, which can
    /// reverse their order within a bucket. Outstanding cursors are
    /// invalidated
    ///
    /// # Arguments
    ///
    /// `bucket_count`: The new number of buckets. Zero fails with
    /// `Error::InvalidArgument` and leaves the map untouched
    pub fn rehash(&mut self, bucket_count: usize) -> Result<()> {
        if bucket_count == 0 {
            return Err(Error::InvalidArgument("bucket count must be positive"));
        }
        trace!(
            "rehashing {} entries from {} to {} buckets",
            self.element_count,
            self.bucket_count(),
            bucket_count
        );
        let mut new_buckets = Self::alloc_buckets(bucket_count);
        // pop each node off its old chain and push it onto its new one
        for bucket in self.buckets.iter_mut() {
            while let Some(mut node) = bucket.take() {
                *bucket = node.next.take();
                let index = Self::bucket_for(&self.hash, bucket_count, &node.key);
                node.next = new_buckets[index].take();
                new_buckets[index] = Some(node);
            }
        }
        self.buckets = new_buckets;
        Ok(())
    }

    /// Gets the key's entry for in-place manipulation
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, H> {
        let index = self.bucket_index(&key);
        let found = find_in_chain(self.buckets[index].as_deref(), |node| node.matches(&key))
            .map(|node| Cursor::at(node, index));
        match found {
            Some(cursor) => Entry::Occupied(OccupiedEntry {
                table: self,
                cursor,
            }),
            None => Entry::Vacant(VacantEntry {
                table: self,
                bucket: index,
                key,
            }),
        }
    }

    /// Returns the key's value, first inserting `V::default()` if the key
    /// is absent. The reference points into the map's own storage
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    fn find_cursor<M: Mutability>(&self, key: &K) -> Cursor<K, V, M> {
        let index = self.bucket_index(key);
        find_in_chain(self.buckets[index].as_deref(), |node| node.matches(key))
            .map_or_else(|| Cursor::end(self.bucket_count()), |node| Cursor::at(node, index))
    }

    /// Returns the index of the bucket for the given key
    fn bucket_index(&self, key: &K) -> usize {
        Self::bucket_for(&self.hash, self.bucket_count(), key)
    }

    /// Returns the index of the bucket for the given key
    ///
    /// # Arguments
    ///
    /// `hash`: The hash function
    ///
    /// `bucket_count`: The total number of buckets
    ///
    /// `key`: The key
    fn bucket_for(hash: &H, bucket_count: usize, key: &K) -> usize {
        hash.hash(key) % bucket_count
    }
}

struct Dump<'a, K, V, H>(&'a HashMap<K, V, H>);

impl<K: Display, V: Display, H> Display for Dump<'_, K, V, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let map = self.0;
        writeln!(
            f,
            "Size: {}    Buckets: {}    (load factor: {:.2})",
            map.len(),
            map.bucket_count(),
            map.load_factor()
        )?;
        for (index, bucket) in map.buckets.iter().enumerate() {
            write!(f, "[{:>3}]:", index)?;
            let mut node = bucket.as_deref();
            while let Some(current) = node {
                write!(f, " -> {}:{}", current.key, current.value)?;
                node = current.next();
            }
            writeln!(f, " /")?;
        }
        Ok(())
    }
}

impl<K: Display, V: Display, H> Display for HashMap<K, V, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .format_with(", ", |(k, v), g| g(&format_args!("{}:{}", k, v)))
        )
    }
}

impl<K: Debug, V: Debug, H> Debug for HashMap<K, V, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone, V: Clone, H: Clone> Clone for HashMap<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.iter().map(clone_chain).collect(),
            element_count: self.element_count,
            next_serial: self.next_serial,
            hash: self.hash.clone(),
        }
    }
}

impl<K: Eq, V: PartialEq, H: Hash<K>, H2: Hash<K>> PartialEq<HashMap<K, V, H2>>
    for HashMap<K, V, H>
{
    fn eq(&self, other: &HashMap<K, V, H2>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|other_v| v == other_v))
    }
}

impl<K: Eq, V: Eq, H: Hash<K>> Eq for HashMap<K, V, H> {}

impl<K: Eq, V, H: Hash<K>> Index<&K> for HashMap<K, V, H> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key)
            .unwrap_or_else(|| panic!("key not found in hash map"))
    }
}

impl<K, V, H: Default> Default for HashMap<K, V, H> {
    fn default() -> Self {
        Self::with_bucket_count_and_hasher(DEFAULT_BUCKET_COUNT, H::default())
    }
}

impl<K, V, H> Drop for HashMap<K, V, H> {
    fn drop(&mut self) {
        self.free_buckets();
    }
}

impl<K: Eq, V, H: Hash<K>> Extend<(K, V)> for HashMap<K, V, H> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        iter.into_iter().for_each(|(k, v)| {
            self.insert(k, v);
        });
    }
}

impl<K: Eq, V, H: Hash<K> + Default> FromIterator<(K, V)> for HashMap<K, V, H> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_entries(iter, DEFAULT_BUCKET_COUNT, H::default())
    }
}

impl<K: Eq, V, H: Hash<K> + Default, const N: usize> From<[(K, V); N]> for HashMap<K, V, H> {
    fn from(entries: [(K, V); N]) -> Self {
        Self::from_iter(entries)
    }
}

impl<'a, K, V, H> IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H> IntoIterator for &'a mut HashMap<K, V, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, H> IntoIterator for HashMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(std::mem::take(&mut self.buckets), self.element_count)
    }
}
