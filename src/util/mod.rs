//! In-order traversal over an arena of linked nodes.
//!
//! `next`/`prev` use the endpoint caches to jump straight to the extreme
//! of a child subtree instead of walking down to it, so a full in-order
//! sweep touches each edge at most twice.

use crate::avl::AvlNodeLike;
use crate::types::{Node, NodeId};

/// Minimum node of the tree. O(1) via the root's cache.
pub fn first<N: AvlNodeLike>(arena: &[N], root: Option<NodeId>) -> Option<NodeId> {
    root.map(|r| arena[r as usize].leftmost())
}

/// Maximum node of the tree. O(1) via the root's cache.
pub fn last<N: AvlNodeLike>(arena: &[N], root: Option<NodeId>) -> Option<NodeId> {
    root.map(|r| arena[r as usize].rightmost())
}

/// In-order successor, or `None` when `curr` is the maximum.
pub fn next<N: AvlNodeLike>(arena: &[N], curr: NodeId) -> Option<NodeId> {
    if let Some(r) = arena[curr as usize].r() {
        return Some(arena[r as usize].leftmost());
    }
    // Climb while we are a right child; the first ancestor we hang off
    // the left of is the successor.
    let mut i = curr;
    loop {
        let p = arena[i as usize].p()?;
        if arena[p as usize].l() == Some(i) {
            return Some(p);
        }
        i = p;
    }
}

/// In-order predecessor, or `None` when `curr` is the minimum.
pub fn prev<N: AvlNodeLike>(arena: &[N], curr: NodeId) -> Option<NodeId> {
    if let Some(l) = arena[curr as usize].l() {
        return Some(arena[l as usize].rightmost());
    }
    let mut i = curr;
    loop {
        let p = arena[i as usize].p()?;
        if arena[p as usize].r() == Some(i) {
            return Some(p);
        }
        i = p;
    }
}

/// Finds a node by key via BST descent.
pub fn find<N, K, F, C>(
    arena: &[N],
    root: Option<NodeId>,
    key: &K,
    key_of: F,
    comparator: &C,
) -> Option<NodeId>
where
    N: Node,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, key_of(&arena[i as usize]));
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 {
            arena[i as usize].l()
        } else {
            arena[i as usize].r()
        };
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: NodeId) -> usize {
    1 + arena[root as usize].l().map_or(0, |l| size_inner(arena, l))
        + arena[root as usize].r().map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes reachable from `root`.
pub fn size<N: Node>(arena: &[N], root: Option<NodeId>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

#[cfg(test)]
mod tests {
    use super::{first, last, next, prev, size};
    use crate::avl::AvlNode;
    use crate::types::NodeId;

    // Hand-wired tree:      1
    //                      / \
    //                     0   2
    fn three_node_arena() -> Vec<AvlNode<i32>> {
        let mut arena: Vec<AvlNode<i32>> = (0..3).map(|i| AvlNode::new(i as NodeId, i)).collect();
        arena[1].l = Some(0);
        arena[1].r = Some(2);
        arena[1].height = 1;
        arena[1].leftmost = 0;
        arena[1].rightmost = 2;
        arena[0].p = Some(1);
        arena[2].p = Some(1);
        arena
    }

    #[test]
    fn next_and_prev_follow_in_order_links() {
        let arena = three_node_arena();
        assert_eq!(first(&arena, Some(1)), Some(0));
        assert_eq!(last(&arena, Some(1)), Some(2));
        assert_eq!(next(&arena, 0), Some(1));
        assert_eq!(next(&arena, 1), Some(2));
        assert_eq!(next(&arena, 2), None);
        assert_eq!(prev(&arena, 2), Some(1));
        assert_eq!(prev(&arena, 1), Some(0));
        assert_eq!(prev(&arena, 0), None);
        assert_eq!(size(&arena, Some(1)), 3);
        assert_eq!(size::<AvlNode<i32>>(&arena, None), 0);
    }
}
