use crate::hash::Hash;

use super::cursor::MutCursor;
use super::HashMap;

/// An entry that holds a key already present in the map.
pub struct OccupiedEntry<'a, K, V, H> {
    pub(crate) table: &'a mut HashMap<K, V, H>,
    pub(crate) cursor: MutCursor<K, V>,
}

/// A vacant entry - one that has not been inserted yet.
pub struct VacantEntry<'a, K, V, H> {
    pub(crate) table: &'a mut HashMap<K, V, H>,
    pub(crate) bucket: usize,
    pub(crate) key: K,
}

/// An entry in a hash map.
pub enum Entry<'a, K, V, H> {
    /// There was a node found already for the key.
    Occupied(OccupiedEntry<'a, K, V, H>),
    /// There was not a node already present for the key.
    Vacant(VacantEntry<'a, K, V, H>),
}

impl<'a, K: Eq, V, H: Hash<K>> Entry<'a, K, V, H> {
    /// Provides in-place mutable access to the value.
    ///
    /// # Arguments
    ///
    /// `f`: A function taking a mutable reference to the value.
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Self::Occupied(occupied) = &mut self {
            f(occupied.get_mut());
        }

        self
    }

    /// Returns the key of the entry
    pub fn key(&self) -> &K {
        match self {
            Self::Occupied(occupied) => occupied.key(),
            Self::Vacant(vacant) => vacant.key(),
        }
    }

    /// Fetches the value stored in the entry, or inserts a default key.
    ///
    /// # Arguments
    ///
    /// `default`: The default value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        self.or_insert_with(|| default)
    }

    /// Fetches the value stored in the entry, or inserts a default key.
    ///
    /// # Arguments
    ///
    /// `default`: A function producing a default value.
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(occupied) => occupied.into_mut(),
            Self::Vacant(vacant) => vacant.insert(default()),
        }
    }

    /// Fetches the value stored in the entry, or inserts `V::default()`.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

impl<'a, K: Eq, V, H: Hash<K>> OccupiedEntry<'a, K, V, H> {
    /// Returns the key stored in the map
    pub fn key(&self) -> &K {
        self.table.entry_at(self.cursor).0
    }

    /// Returns the value stored in the map
    pub fn get(&self) -> &V {
        self.table.entry_at(self.cursor).1
    }

    /// Returns the value stored in the map, mutable in place. The
    /// reference is bound to the entry; see `into_mut` to keep it longer
    pub fn get_mut(&mut self) -> &mut V {
        self.table.entry_at_mut(self.cursor).1
    }

    /// Converts the entry into a reference to its value, bound to the
    /// lifetime of the map borrow
    pub fn into_mut(self) -> &'a mut V {
        self.table.entry_at_mut(self.cursor).1
    }

    /// Replaces the value of the entry, returning the old one. The
    /// stored key is kept
    ///
    /// # Arguments
    ///
    /// `value`: The new value
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    /// Takes the entry out of the map
    pub fn remove_entry(self) -> (K, V) {
        self.table.take_at(self.cursor)
    }

    /// Takes the value out of the map
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}

impl<'a, K: Eq, V, H: Hash<K>> VacantEntry<'a, K, V, H> {
    /// Returns the key that would be inserted
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes the key back without inserting anything
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value as the new head of the key's bucket chain,
    /// returning a reference to it
    ///
    /// # Arguments
    ///
    /// `value`: The value to associate with the key
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.table.push_front(self.bucket, self.key, value).value
    }
}
