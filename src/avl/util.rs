//! AVL mechanics: cache refresh, rotations, retrace walks and the
//! deletion splice. All functions operate on arena indices.

use std::fmt::Debug;

use super::node::{AvlNode, AvlNodeLike};
use crate::types::{Node, NodeId, Side};

/// Recomputes `height` and the endpoint caches of `i` from its children.
///
/// Children must already be up to date, so callers refresh bottom-up.
pub fn refresh<N: AvlNodeLike>(arena: &mut [N], i: NodeId) {
    let l = arena[i as usize].l();
    let r = arena[i as usize].r();

    let height = if l.is_none() && r.is_none() {
        0
    } else {
        let lh = l.map_or(0, |l| arena[l as usize].height());
        let rh = r.map_or(0, |r| arena[r as usize].height());
        lh.max(rh) + 1
    };
    let leftmost = l.map_or(i, |l| arena[l as usize].leftmost());
    let rightmost = r.map_or(i, |r| arena[r as usize].rightmost());

    let n = &mut arena[i as usize];
    n.set_height(height);
    n.set_leftmost(leftmost);
    n.set_rightmost(rightmost);
}

/// Balance factor of `i`: left minus right subtree height, where an
/// absent child counts as height -1.
pub fn balance_of<N: AvlNodeLike>(arena: &[N], i: NodeId) -> i32 {
    let n = &arena[i as usize];
    let lh = n.l().map_or(0, |l| 1 + arena[l as usize].height());
    let rh = n.r().map_or(0, |r| 1 + arena[r as usize].height());
    lh - rh
}

/// Single right rotation: promotes the left child of `n` over `n`.
///
/// ```text
///      n          l
///     /    →       \
///    l              n
///     \            /
///      b          b
/// ```
///
/// Refreshes the demoted node only; the promoted node is refreshed by the
/// caller's upward walk.
pub fn rotate_right<N: AvlNodeLike>(arena: &mut [N], n: NodeId) {
    let p = arena[n as usize].p();
    let l = arena[n as usize].l().expect("left child exists");

    if let Some(p) = p {
        match arena[p as usize].side_of(n) {
            Side::Left => arena[p as usize].set_l(Some(l)),
            Side::Right => arena[p as usize].set_r(Some(l)),
            Side::None => unreachable!("parent link out of sync"),
        }
    }
    arena[l as usize].set_p(p);

    let b = arena[l as usize].r();
    arena[n as usize].set_p(Some(l));
    arena[l as usize].set_r(Some(n));
    arena[n as usize].set_l(b);
    if let Some(b) = b {
        arena[b as usize].set_p(Some(n));
    }

    refresh(arena, n);
}

/// Single left rotation: promotes the right child of `n` over `n`.
/// Mirror image of [`rotate_right`].
pub fn rotate_left<N: AvlNodeLike>(arena: &mut [N], n: NodeId) {
    let p = arena[n as usize].p();
    let r = arena[n as usize].r().expect("right child exists");

    if let Some(p) = p {
        match arena[p as usize].side_of(n) {
            Side::Left => arena[p as usize].set_l(Some(r)),
            Side::Right => arena[p as usize].set_r(Some(r)),
            Side::None => unreachable!("parent link out of sync"),
        }
    }
    arena[r as usize].set_p(p);

    let b = arena[r as usize].l();
    arena[n as usize].set_p(Some(r));
    arena[r as usize].set_l(Some(n));
    arena[n as usize].set_r(b);
    if let Some(b) = b {
        arena[b as usize].set_p(Some(n));
    }

    refresh(arena, n);
}

/// Restores the balance invariant at `i`, resolving a zig-zag by
/// pre-rotating the heavy child.
pub fn rebalance<N: AvlNodeLike>(arena: &mut [N], i: NodeId) {
    let diff = balance_of(arena, i);
    if diff > 1 {
        let l = arena[i as usize].l().expect("left child exists");
        if balance_of(arena, l) < 0 {
            rotate_left(arena, l);
        }
        rotate_right(arena, i);
    } else if diff < -1 {
        let r = arena[i as usize].r().expect("right child exists");
        if balance_of(arena, r) > 0 {
            rotate_right(arena, r);
        }
        rotate_left(arena, i);
    }
}

/// Walks from `start` to the root, refreshing every ancestor's caches and
/// rebalancing where the balance invariant broke.
///
/// With `rotate_once` the walk stops *rebalancing* after the first
/// rotation but keeps refreshing caches: one rotation restores global
/// balance after an insertion. A deletion can unbalance several
/// ancestors, so removal passes `rotate_once = false` and every level is
/// checked.
pub fn retrace<N: AvlNodeLike>(arena: &mut [N], start: Option<NodeId>, rotate_once: bool) {
    let mut curr = start;
    let mut rotated = false;
    while let Some(i) = curr {
        refresh(arena, i);
        if !(rotate_once && rotated) && balance_of(arena, i).abs() > 1 {
            rebalance(arena, i);
            rotated = true;
        }
        // After a rotation the old subtree root was demoted; its parent
        // is now the promoted node, which the walk refreshes next.
        curr = arena[i as usize].p();
    }
}

/// Re-derives the cached root after a walk that may have rotated the old
/// root downwards.
pub fn ascend_root<N: Node>(arena: &[N], root: &mut Option<NodeId>) {
    while let Some(r) = *root {
        match arena[r as usize].p() {
            Some(p) => *root = Some(p),
            None => break,
        }
    }
}

/// Unlinks `n` from the tree, splicing a replacement into its structural
/// position, and returns the node where height adjustment must begin.
///
/// The replacement is the extreme descendant of the taller side, so it
/// carries at most one child of its own. When `n` is the root the cached
/// root is pre-adjusted to a surviving child; the caller re-derives the
/// real root via [`ascend_root`] after retracing.
///
/// Pure link surgery: payload disposal, size bookkeeping and the retrace
/// itself belong to the caller.
pub fn splice_out<N: AvlNodeLike>(
    arena: &mut [N],
    n: NodeId,
    root: &mut Option<NodeId>,
) -> Option<NodeId> {
    let replacement = if arena[n as usize].height() > 0 {
        Some(if balance_of(arena, n) > 0 {
            let l = arena[n as usize].l().expect("left child exists");
            arena[l as usize].rightmost()
        } else {
            let r = arena[n as usize].r().expect("right child exists");
            arena[r as usize].leftmost()
        })
    } else {
        None
    };

    if *root == Some(n) {
        *root = arena[n as usize].r().or(arena[n as usize].l());
    }

    let p = arena[n as usize].p();
    let l = arena[n as usize].l();
    let r = arena[n as usize].r();

    let start = if let Some(v) = replacement {
        debug_assert!(
            arena[v as usize].l().is_none() || arena[v as usize].r().is_none(),
            "extreme descendant cannot have two children"
        );
        let vc = arena[v as usize].r().or(arena[v as usize].l());

        let start = if arena[v as usize].p() == Some(n) {
            v
        } else {
            // Detach the replacement, handing its child to its old parent.
            let vp = arena[v as usize].p().expect("replacement has a parent");
            match arena[vp as usize].side_of(v) {
                Side::Left => arena[vp as usize].set_l(vc),
                Side::Right => arena[vp as usize].set_r(vc),
                Side::None => unreachable!("parent link out of sync"),
            }
            if let Some(vc) = vc {
                arena[vc as usize].set_p(Some(vp));
            }
            vp
        };

        arena[v as usize].set_p(p);
        if r != Some(v) {
            arena[v as usize].set_r(r);
        }
        if l != Some(v) {
            arena[v as usize].set_l(l);
        }
        Some(start)
    } else {
        p
    };

    // Re-parent the survivors and rewire the parent's child slot.
    if let Some(r) = r {
        if replacement != Some(r) {
            arena[r as usize].set_p(replacement);
        }
    }
    if let Some(l) = l {
        if replacement != Some(l) {
            arena[l as usize].set_p(replacement);
        }
    }
    if let Some(p) = p {
        match arena[p as usize].side_of(n) {
            Side::Left => arena[p as usize].set_l(replacement),
            Side::Right => arena[p as usize].set_r(replacement),
            Side::None => unreachable!("parent link out of sync"),
        }
    }

    let gone = &mut arena[n as usize];
    gone.set_p(None);
    gone.set_l(None);
    gone.set_r(None);

    start
}

/// Checks every structural invariant of an AVL tree: parent links, height
/// and endpoint caches, balance factors and in-order key ordering.
pub fn assert_avl<N, K, F, C>(
    arena: &[N],
    root: Option<NodeId>,
    key_of: F,
    comparator: &C,
) -> Result<(), String>
where
    N: AvlNodeLike,
    F: Fn(&N) -> &K,
    C: Fn(&K, &K) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };

    if arena[root as usize].p().is_some() {
        return Err("root has a parent".to_string());
    }

    // Returns (height, leftmost, rightmost) of the validated subtree.
    fn validate<N: AvlNodeLike>(
        arena: &[N],
        i: NodeId,
    ) -> Result<(i32, NodeId, NodeId), String> {
        let l = arena[i as usize].l();
        let r = arena[i as usize].r();

        let mut height = 0;
        let mut leftmost = i;
        let mut rightmost = i;
        let mut lh = -1;
        let mut rh = -1;

        if let Some(l) = l {
            if arena[l as usize].p() != Some(i) {
                return Err(format!("broken parent link on left child of {i}"));
            }
            let (h, lm, _) = validate(arena, l)?;
            lh = h;
            height = height.max(h + 1);
            leftmost = lm;
        }
        if let Some(r) = r {
            if arena[r as usize].p() != Some(i) {
                return Err(format!("broken parent link on right child of {i}"));
            }
            let (h, _, rm) = validate(arena, r)?;
            rh = h;
            height = height.max(h + 1);
            rightmost = rm;
        }

        if arena[i as usize].height() != height {
            return Err(format!(
                "height cache mismatch at {i}: expected {height}, got {}",
                arena[i as usize].height()
            ));
        }
        if arena[i as usize].leftmost() != leftmost {
            return Err(format!("leftmost cache mismatch at {i}"));
        }
        if arena[i as usize].rightmost() != rightmost {
            return Err(format!("rightmost cache mismatch at {i}"));
        }
        if !(-1..=1).contains(&(lh - rh)) {
            return Err(format!("balance violated at {i}: {}", lh - rh));
        }

        Ok((height, leftmost, rightmost))
    }

    validate(arena, root)?;

    let mut curr = crate::util::first(arena, Some(root));
    let mut prev: Option<NodeId> = None;
    while let Some(i) = curr {
        if let Some(p) = prev {
            if comparator(key_of(&arena[p as usize]), key_of(&arena[i as usize])) >= 0 {
                return Err(format!("order violated between {p} and {i}"));
            }
        }
        prev = Some(i);
        curr = crate::util::next(arena, i);
    }

    Ok(())
}

/// Debug dump of a subtree, one node per line with height annotations.
pub fn print<T: Debug>(arena: &[AvlNode<T>], node: Option<NodeId>, tab: &str) -> String {
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let deeper = format!("{tab}  ");
            let left = print(arena, n.l, &deeper);
            let right = print(arena, n.r, &deeper);
            format!(
                "Node[{i}] [h={}] {{ {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height,
                n.data()
            )
        }
    }
}
