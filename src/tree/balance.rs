use super::node::NodeId;
use super::OrderedMap;

// Height bookkeeping and AVL rotations.
//
// Every function here returns the handle of the (possibly new) subtree root.
// The caller stores it in the parent's child slot; the returned node's
// `parent` already points at the old subtree root's parent.

impl<K, V, C> OrderedMap<K, V, C> {
    pub(crate) fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.arena.get(id).height)
    }

    /// `height(right) - height(left)`.
    fn balance_factor(&self, id: NodeId) -> i64 {
        let node = self.arena.get(id);
        i64::from(self.height_of(node.right)) - i64::from(self.height_of(node.left))
    }

    fn fix_height(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.arena.get_mut(id).height = height;
    }

    pub(crate) fn set_parent(&mut self, child: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(child) = child {
            self.arena.get_mut(child).parent = parent;
        }
    }

    /// Single right rotation around `id`.
    ///
    /// ```text
    ///       n            l
    ///      / \          / \
    ///     l   c   →    a   n
    ///    / \              / \
    ///   a   b            b   c
    /// ```
    pub(crate) fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let pivot = self.arena.get(id).left.unwrap_or_else(|| {
            panic!("rotate_right on node {} without a left child", id.0)
        });
        let inner = self.arena.get(pivot).right;
        let parent = self.arena.get(id).parent;

        self.arena.get_mut(id).left = inner;
        self.set_parent(inner, Some(id));

        self.arena.get_mut(pivot).right = Some(id);
        self.arena.get_mut(pivot).parent = parent;
        self.arena.get_mut(id).parent = Some(pivot);

        self.fix_height(id);
        self.fix_height(pivot);
        pivot
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right).
    pub(crate) fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let pivot = self.arena.get(id).right.unwrap_or_else(|| {
            panic!("rotate_left on node {} without a right child", id.0)
        });
        let inner = self.arena.get(pivot).left;
        let parent = self.arena.get(id).parent;

        self.arena.get_mut(id).right = inner;
        self.set_parent(inner, Some(id));

        self.arena.get_mut(pivot).left = Some(id);
        self.arena.get_mut(pivot).parent = parent;
        self.arena.get_mut(id).parent = Some(pivot);

        self.fix_height(id);
        self.fix_height(pivot);
        pivot
    }

    /// Recompute the height of `id` and restore `|balance factor| <= 1`.
    ///
    /// Resolution of the four cases:
    ///   RR: factor +2, right child leaning right (or even) → rotate left
    ///   RL: factor +2, right child leaning left → rotate child right, then left
    ///   LL: factor -2, left child leaning left (or even) → rotate right
    ///   LR: factor -2, left child leaning right → rotate child left, then right
    pub(crate) fn balance(&mut self, id: NodeId) -> NodeId {
        self.fix_height(id);

        match self.balance_factor(id) {
            2 => {
                let right = self.arena.get(id).right.unwrap_or_else(|| {
                    panic!("right-heavy node {} without a right child", id.0)
                });
                if self.balance_factor(right) < 0 {
                    let new_right = self.rotate_right(right);
                    self.arena.get_mut(id).right = Some(new_right);
                }
                self.rotate_left(id)
            }
            -2 => {
                let left = self.arena.get(id).left.unwrap_or_else(|| {
                    panic!("left-heavy node {} without a left child", id.0)
                });
                if self.balance_factor(left) > 0 {
                    let new_left = self.rotate_left(left);
                    self.arena.get_mut(id).left = Some(new_left);
                }
                self.rotate_right(id)
            }
            -1..=1 => id,
            factor => panic!("AVL invariant broken: balance factor {factor} at node {}", id.0),
        }
    }
}
