use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use super::node::Node;

mod private {
    pub trait Sealed {}
}

/// The access a cursor grants to the entry it denotes
pub trait Mutability: private::Sealed {}

/// Marks a cursor through which entries can only be read
#[derive(Debug)]
pub enum Const {}

/// Marks a cursor through which values can be modified in place
#[derive(Debug)]
pub enum Mut {}

impl private::Sealed for Const {}
impl private::Sealed for Mut {}
impl Mutability for Const {}
impl Mutability for Mut {}

/// A position inside a hash map: either an entry, identified by the
/// serial number of its node and the bucket it lives in, or the
/// end-sentinel one past the last entry.
///
/// A cursor holds no borrow of its map. It is handed back to the map
/// (`HashMap::entry_at`, `HashMap::advance`, `HashMap::erase_at`, ...)
/// which looks the serial up in the named bucket's chain before using
/// it. A map never reuses a serial, so a cursor whose entry was erased
/// panics on use instead of landing on whatever entry took its place.
/// Cursors are invalidated by `rehash` and by erasing the entry they
/// denote; every other cursor keeps denoting its entry. A cursor is
/// only meaningful to the map that produced it.
///
/// `Cursor<K, V, Mut>` is only handed out by methods taking the map
/// mutably and converts into `Cursor<K, V, Const>`, never the reverse.
pub struct Cursor<K, V, M: Mutability = Const> {
    serial: Option<u64>,
    bucket: usize,
    _mutability: PhantomData<fn() -> (K, V, M)>,
}

/// A cursor granting read access
pub type ConstCursor<K, V> = Cursor<K, V, Const>;

/// A cursor granting read and in-place write access
pub type MutCursor<K, V> = Cursor<K, V, Mut>;

impl<K, V, M: Mutability> Cursor<K, V, M> {
    /// Positions a cursor at a node
    ///
    /// # Arguments
    ///
    /// `node`: The node, which must live in bucket `bucket`
    ///
    /// `bucket`: The bucket index of the node
    pub(crate) fn at(node: &Node<K, V>, bucket: usize) -> Self {
        Self {
            serial: Some(node.serial),
            bucket,
            _mutability: PhantomData,
        }
    }

    /// Creates the end-sentinel for a map with `bucket_count` buckets
    pub(crate) fn end(bucket_count: usize) -> Self {
        Self {
            serial: None,
            bucket: bucket_count,
            _mutability: PhantomData,
        }
    }

    /// Re-tags the cursor with another mutability
    pub(crate) fn retag<M2: Mutability>(self) -> Cursor<K, V, M2> {
        Cursor {
            serial: self.serial,
            bucket: self.bucket,
            _mutability: PhantomData,
        }
    }

    /// Returns true if `node` is the one this cursor denotes
    pub(crate) fn denotes(&self, node: &Node<K, V>) -> bool {
        self.serial == Some(node.serial)
    }

    /// Returns true if this cursor is the end-sentinel
    pub fn is_end(&self) -> bool {
        self.serial.is_none()
    }

    /// Returns the index of the bucket the denoted entry lives in, or
    /// the bucket count of the map for the end-sentinel
    pub fn bucket_index(&self) -> usize {
        self.bucket
    }
}

impl<K, V, M: Mutability> Clone for Cursor<K, V, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, M: Mutability> Copy for Cursor<K, V, M> {}

impl<K, V, M: Mutability, M2: Mutability> PartialEq<Cursor<K, V, M2>> for Cursor<K, V, M> {
    fn eq(&self, other: &Cursor<K, V, M2>) -> bool {
        self.serial == other.serial && self.bucket == other.bucket
    }
}

impl<K, V, M: Mutability> Eq for Cursor<K, V, M> {}

impl<K, V> From<MutCursor<K, V>> for ConstCursor<K, V> {
    fn from(cursor: MutCursor<K, V>) -> Self {
        cursor.retag()
    }
}

impl<K, V, M: Mutability> Debug for Cursor<K, V, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.serial {
            Some(serial) => f
                .debug_struct("Cursor")
                .field("serial", &serial)
                .field("bucket", &self.bucket)
                .finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}
