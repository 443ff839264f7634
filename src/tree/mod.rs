mod balance;
pub mod iter;
pub mod node;
mod render;

use std::cmp::Ordering;

pub use iter::Iter;
pub use node::Node;
use node::{Arena, NodeId};

/// Comparator used when keys are ordered by their `Ord` impl.
pub type NaturalOrder<K> = fn(&K, &K) -> Ordering;

fn natural_order<K: Ord>(a: &K, b: &K) -> Ordering {
    a.cmp(b)
}

/// A self-balancing (AVL) ordered map.
///
/// Serves both as the live memtable and as the transient loaded view of a
/// segment. Records live in an arena and link to each other through handles:
///
/// ```text
///            ┌───────┐
///            │ 3     │  parent: None
///            └─┬───┬─┘
///        left  │   │  right
///       ┌──────┘   └──────┐
///   ┌───▼───┐         ┌───▼───┐
///   │ 1     │         │ 7     │  parent: 3
///   └───────┘         └───────┘
/// ```
///
/// Invariants, restored after every structural change:
///   - `height(node) = 1 + max(height(left), height(right))`, `height(nil) = 0`
///   - `|height(right) - height(left)| <= 1` for every node
///   - a non-root node is the left or right child of its `parent`
///
/// Two deletion flavours exist. [`make_tombstone`](Self::make_tombstone) is a
/// logical delete that keeps a record around to shadow older data;
/// [`delete`](Self::delete) physically unlinks the record.
pub struct OrderedMap<K, V, C = NaturalOrder<K>> {
    pub(crate) arena: Arena<K, V>,
    pub(crate) root: Option<NodeId>,
    comparator: C,
    len: usize,
    max_key: Option<K>,
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Create an empty map ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(natural_order::<K>)
    }
}

impl<K: Ord, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Create an empty map ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        OrderedMap {
            arena: Arena::new(),
            root: None,
            comparator,
            len: 0,
            max_key: None,
        }
    }

    /// Number of records, tombstones included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; `0` when empty. O(1), cached at the root.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Greatest key ever inserted.
    ///
    /// Not updated by [`delete`](Self::delete): after the maximum is removed
    /// this still reports it. Iteration does not depend on it.
    pub fn max_key(&self) -> Option<&K> {
        self.max_key.as_ref()
    }

    /// Insert a live record, overwriting value and tombstone flag of an
    /// existing record with an equal key.
    pub fn insert(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        self.insert_record(key, Some(value), false);
    }

    /// Look up the record for `key`, tombstones included.
    pub fn find(&self, key: &K) -> Option<&Node<K, V>> {
        self.find_id(key).map(|id| self.arena.get(id))
    }

    /// True if `key` is present with exactly `value`.
    pub fn contains(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.find(key).and_then(Node::value) == Some(value)
    }

    /// Overwrite value and tombstone flag of an existing record.
    ///
    /// Returns `false` (and inserts nothing) when `key` is absent.
    pub fn update(&mut self, key: &K, value: Option<V>, tombstone: bool) -> bool {
        match self.find_id(key) {
            Some(id) => {
                let node = self.arena.get_mut(id);
                node.value = value;
                node.tombstone = tombstone;
                true
            }
            None => false,
        }
    }

    /// Logically delete `key`.
    ///
    /// A present record keeps its value and gets flagged. An absent key gets
    /// a value-less tombstone record so that it shadows older copies that may
    /// live elsewhere.
    pub fn make_tombstone(&mut self, key: K)
    where
        K: Clone,
    {
        match self.find_id(&key) {
            Some(id) => self.arena.get_mut(id).tombstone = true,
            None => self.insert_record(key, None, true),
        }
    }

    /// Physically remove `key`. Absent keys are ignored.
    pub fn delete(&mut self, key: &K) {
        let root = self.delete_at(self.root, key);
        self.root = root;
        self.set_parent(root, None);
    }

    /// Ascending traversal over every record, tombstones included.
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        Iter::new(self)
    }

    pub(crate) fn insert_record(&mut self, key: K, value: Option<V>, tombstone: bool)
    where
        K: Clone,
    {
        let is_new_max = match &self.max_key {
            Some(max) => (self.comparator)(&key, max) == Ordering::Greater,
            None => true,
        };
        if is_new_max {
            self.max_key = Some(key.clone());
        }

        let root = self.insert_at(self.root, key, value, tombstone);
        self.root = Some(root);
        self.set_parent(Some(root), None);
    }

    fn insert_at(
        &mut self,
        at: Option<NodeId>,
        key: K,
        value: Option<V>,
        tombstone: bool,
    ) -> NodeId {
        let Some(id) = at else {
            self.len += 1;
            return self.arena.alloc(Node::new(key, value, tombstone));
        };

        match (self.comparator)(&key, &self.arena.get(id).key) {
            Ordering::Equal => {
                let node = self.arena.get_mut(id);
                node.value = value;
                node.tombstone = tombstone;
                return id;
            }
            Ordering::Less => {
                let left = self.arena.get(id).left;
                let child = self.insert_at(left, key, value, tombstone);
                self.arena.get_mut(id).left = Some(child);
                self.set_parent(Some(child), Some(id));
            }
            Ordering::Greater => {
                let right = self.arena.get(id).right;
                let child = self.insert_at(right, key, value, tombstone);
                self.arena.get_mut(id).right = Some(child);
                self.set_parent(Some(child), Some(id));
            }
        }

        self.balance(id)
    }

    fn find_id(&self, key: &K) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.arena.get(id);
            cursor = match (self.comparator)(key, &node.key) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Standard BST deletion with in-order successor replacement:
    ///
    /// 1. No right child: splice in the left child.
    /// 2. Otherwise take the leftmost node of the right subtree, unlink it
    ///    (its right child moves up), and seat it where the target was,
    ///    adopting the target's children.
    /// 3. Rebalance on the way back up.
    fn delete_at(&mut self, at: Option<NodeId>, key: &K) -> Option<NodeId> {
        let id = at?;

        match (self.comparator)(key, &self.arena.get(id).key) {
            Ordering::Less => {
                let left = self.arena.get(id).left;
                let child = self.delete_at(left, key);
                self.arena.get_mut(id).left = child;
                self.set_parent(child, Some(id));
            }
            Ordering::Greater => {
                let right = self.arena.get(id).right;
                let child = self.delete_at(right, key);
                self.arena.get_mut(id).right = child;
                self.set_parent(child, Some(id));
            }
            Ordering::Equal => {
                let target = self.arena.release(id);
                self.len -= 1;

                let Some(right) = target.right else {
                    self.set_parent(target.left, target.parent);
                    return target.left;
                };

                let successor = self.leftmost(right);
                let rest = self.delete_min(right);

                let node = self.arena.get_mut(successor);
                node.left = target.left;
                node.right = rest;
                node.parent = target.parent;
                self.set_parent(target.left, Some(successor));
                self.set_parent(rest, Some(successor));

                return Some(self.balance(successor));
            }
        }

        Some(self.balance(id))
    }

    /// Unlink the minimum of the subtree at `id` without freeing it.
    fn delete_min(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.arena.get(id);
        let Some(left) = node.left else {
            return node.right;
        };

        let child = self.delete_min(left);
        self.arena.get_mut(id).left = child;
        self.set_parent(child, Some(id));
        Some(self.balance(id))
    }

    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena.get(id).left {
            id = left;
        }
        id
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    type Item = &'a Node<K, V>;
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
