/// An owned link to the next node of a chain, or the chain terminus
pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A node in a bucket chain. Each node uniquely owns its successor
pub(crate) struct Node<K, V> {
    /// Identifies the node among every node its map has ever created
    pub(crate) serial: u64,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) next: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates the node from a key/value
    ///
    /// # Arguments
    ///
    /// `serial`: The serial number the map handed out for this node
    ///
    /// `key`: The key
    ///
    /// `value`: The value
    ///
    /// `next`: The next linked node in the chain
    pub(crate) fn new(serial: u64, key: K, value: V, next: Link<K, V>) -> Box<Self> {
        Box::new(Self {
            serial,
            key,
            value,
            next,
        })
    }

    /// Returns the next node following this node
    pub(crate) fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    /// Returns the next node following this node
    pub(crate) fn next_mut(&mut self) -> Option<&mut Self> {
        self.next.as_deref_mut()
    }
}

impl<K: Eq, V> Node<K, V> {
    /// Returns true if the probing key matches the node
    ///
    /// # Arguments
    ///
    /// `key`: The probing key
    pub(crate) fn matches(&self, key: &K) -> bool {
        &self.key == key
    }
}

/// Walks a chain, returning the first node satisfying `pred`
pub(crate) fn find_in_chain<K, V>(
    mut node: Option<&Node<K, V>>,
    mut pred: impl FnMut(&Node<K, V>) -> bool,
) -> Option<&Node<K, V>> {
    while let Some(current) = node {
        if pred(current) {
            return Some(current);
        }
        node = current.next();
    }
    None
}

/// Walks a chain, returning the first node satisfying `pred`
pub(crate) fn find_in_chain_mut<K, V>(
    mut node: Option<&mut Node<K, V>>,
    mut pred: impl FnMut(&Node<K, V>) -> bool,
) -> Option<&mut Node<K, V>> {
    while let Some(current) = node {
        if pred(current) {
            return Some(current);
        }
        node = current.next_mut();
    }
    None
}

/// Unlinks the first node satisfying `pred` from the chain starting
/// at `link`, handing ownership of it back. The predecessor (or the
/// bucket slot) is relinked to the removed node's successor
pub(crate) fn unlink_where<K, V>(
    mut link: &mut Link<K, V>,
    mut pred: impl FnMut(&Node<K, V>) -> bool,
) -> Option<Box<Node<K, V>>> {
    loop {
        match link {
            None => return None,
            Some(node) if pred(&**node) => {
                let mut removed = link.take()?;
                *link = removed.next.take();
                return Some(removed);
            }
            Some(node) => link = &mut node.next,
        }
    }
}

/// Drops a whole chain front to back, so that long chains don't
/// recurse through `Box`'s destructor
pub(crate) fn free_chain<K, V>(mut link: Link<K, V>) {
    while let Some(mut node) = link {
        link = node.next.take();
    }
}

/// Deep-clones a chain, preserving its order and serial numbers
pub(crate) fn clone_chain<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
    let mut head: Link<K, V> = None;
    let mut tail = &mut head;
    let mut current = link.as_deref();
    while let Some(node) = current {
        let cloned = tail.insert(Node::new(
            node.serial,
            node.key.clone(),
            node.value.clone(),
            None,
        ));
        tail = &mut cloned.next;
        current = node.next();
    }
    head
}
