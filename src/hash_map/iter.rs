use std::iter::FusedIterator;

use super::node::{free_chain, Link, Node};

/// An iterator that produces key-value pairs in a hash map, in the
/// same order as walking a cursor from `begin` to `end`
///
/// # Notes
///
/// The order is unspecified and may change after a rehash
pub struct Iter<'a, K, V> {
    bucket_iter: std::slice::Iter<'a, Link<K, V>>,
    node: Option<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Creates a new hash map iterator from the map's buckets
    ///
    /// # Arguments
    ///
    /// `buckets`: The slice of buckets owned by the map
    ///
    /// `len`: The number of entries reachable from the buckets
    pub(crate) fn new(buckets: &'a [Link<K, V>], len: usize) -> Self {
        let mut new_iter = Self {
            bucket_iter: buckets.iter(),
            node: None,
            remaining: len,
        };
        new_iter.node = new_iter.next_bucket();
        new_iter
    }

    /// Finds the head of the next non-empty bucket
    fn next_bucket(&mut self) -> Option<&'a Node<K, V>> {
        self.bucket_iter.by_ref().find_map(|bucket| bucket.as_deref())
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            bucket_iter: self.bucket_iter.clone(),
            node: self.node,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        // traverse to the next node, but return the current
        self.node = node.next().or_else(|| self.next_bucket());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator that produces key-value pairs in a hash map, where
/// the values are mutable
pub struct IterMut<'a, K, V> {
    bucket_iter: std::slice::IterMut<'a, Link<K, V>>,
    node: Option<&'a mut Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(buckets: &'a mut [Link<K, V>], len: usize) -> Self {
        let mut bucket_iter = buckets.iter_mut();
        let node = Self::next_bucket(&mut bucket_iter);
        Self {
            bucket_iter,
            node,
            remaining: len,
        }
    }

    fn next_bucket(
        bucket_iter: &mut std::slice::IterMut<'a, Link<K, V>>,
    ) -> Option<&'a mut Node<K, V>> {
        bucket_iter.find_map(|bucket| bucket.as_deref_mut())
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let Node { key, value, next, .. } = self.node.take()?;
        self.node = next
            .as_deref_mut()
            .or_else(|| Self::next_bucket(&mut self.bucket_iter));
        self.remaining -= 1;
        Some((&*key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator that moves the key-value pairs out of a hash map
pub struct IntoIter<K, V> {
    bucket_iter: std::vec::IntoIter<Link<K, V>>,
    chain: Link<K, V>,
    remaining: usize,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(buckets: Vec<Link<K, V>>, len: usize) -> Self {
        Self {
            bucket_iter: buckets.into_iter(),
            chain: None,
            remaining: len,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(mut node) = self.chain.take() {
                self.chain = node.next.take();
                self.remaining -= 1;
                let Node { key, value, .. } = *node;
                return Some((key, value));
            }
            self.chain = self.bucket_iter.next()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Drop for IntoIter<K, V> {
    fn drop(&mut self) {
        free_chain(self.chain.take());
        self.bucket_iter.by_ref().for_each(free_chain);
    }
}

/// An iterator over the keys of a hash map
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a hash map
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// An iterator over the mutable values of a hash map
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}
