/// Stable handle to a record inside an [`OrderedMap`](super::OrderedMap) arena.
///
/// Children are owned through the arena; `parent` is a plain handle used for
/// successor traversal and rotation bookkeeping, never for lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(pub(crate) usize);

/// A single record of the ordered map.
///
/// `value` is `None` only for a tombstone recorded for a key that was never
/// seen in this map.
#[derive(Debug)]
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    pub(crate) height: u32,
    pub(crate) tombstone: bool,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: Option<V>, tombstone: bool) -> Self {
        Node {
            key,
            value,
            height: 1,
            tombstone,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// True if this record marks a logical delete.
    pub fn is_tombstone(&self) -> bool {
        self.tombstone
    }

    /// Height of the subtree rooted at this record (a leaf is 1).
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Slot storage for tree records. Freed slots are recycled.
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("double release of node handle {}", id.0));
        self.free.push(id.0);
        node
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("dangling node handle {}", id.0))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("dangling node handle {}", id.0))
    }
}
