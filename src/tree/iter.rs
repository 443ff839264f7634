use std::cmp::Ordering;
use std::iter::FusedIterator;

use super::node::{Node, NodeId};
use super::OrderedMap;

/// Ascending, single-pass traversal of an [`OrderedMap`].
///
/// The first element is the minimum. Every following element is the in-order
/// successor of the previous one:
///   - right child present → leftmost node of the right subtree
///   - otherwise climb while we are a right child, then step to the parent
///
/// Iteration ends when no successor exists. Once exhausted it stays exhausted;
/// call [`OrderedMap::iter`] again to traverse again.
pub struct Iter<'a, K, V, C> {
    map: &'a OrderedMap<K, V, C>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, C> Iter<'a, K, V, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    pub(crate) fn new(map: &'a OrderedMap<K, V, C>) -> Self {
        Iter {
            map,
            next: map.root.map(|root| map.leftmost(root)),
            remaining: map.len(),
        }
    }
}

impl<K, V, C> Iter<'_, K, V, C> {
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let arena = &self.map.arena;

        if let Some(mut cursor) = arena.get(id).right {
            while let Some(left) = arena.get(cursor).left {
                cursor = left;
            }
            return Some(cursor);
        }

        let mut child = id;
        while let Some(parent) = arena.get(child).parent {
            if arena.get(parent).right != Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.successor(current);
        self.remaining = self.remaining.saturating_sub(1);

        let map: &'a OrderedMap<K, V, C> = self.map;
        Some(map.arena.get(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, C> ExactSizeIterator for Iter<'_, K, V, C> {}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}
