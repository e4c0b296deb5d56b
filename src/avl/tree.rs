//! The owning tree: arena, free list, root, size and comparator.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::node::AvlNode;
use super::util::{ascend_root, assert_avl, print, retrace, splice_out};
use crate::cursor::Cursor;
use crate::error::TreeError;
use crate::types::NodeId;
use crate::util;

fn default_comparator<T: PartialOrd>(a: &T, b: &T) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Height-balanced binary search tree over elements of type `T`.
///
/// Elements are kept sorted under a caller-supplied comparator (total
/// order, `-1`/`0`/`1`), with duplicates rejected. Lookups, inserts and
/// removals are O(log n); the minimum and maximum are O(1) through the
/// endpoint caches. Nodes live in a `Vec` arena and are addressed by
/// [`NodeId`]; removed slots are recycled through a free list, so a
/// `NodeId` is only valid until the next structural mutation.
///
/// Single-threaded by design: share a tree across threads only behind
/// external synchronization.
pub struct AvlTree<T, C = fn(&T, &T) -> i32>
where
    C: Fn(&T, &T) -> i32,
{
    arena: Vec<AvlNode<T>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    size: usize,
    comparator: C,
}

impl<T> AvlTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    /// A tree ordered by `PartialOrd`, ascending.
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<T>)
    }
}

impl<T> Default for AvlTree<T, fn(&T, &T) -> i32>
where
    T: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
            comparator,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The element stored at `id`.
    ///
    /// Panics if `id` is stale (freed or from another tree).
    pub fn get(&self, id: NodeId) -> &T {
        self.arena[id as usize].data()
    }

    /// Read access to a node's links and caches.
    pub fn node(&self, id: NodeId) -> &AvlNode<T> {
        &self.arena[id as usize]
    }

    /// Mutable access to the element at `id`.
    ///
    /// Mutating the parts of the element the comparator looks at breaks
    /// the search order; only touch satellite data through this.
    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.arena[id as usize].data_mut()
    }

    fn alloc(&mut self, value: T) -> NodeId {
        match self.free.pop() {
            Some(i) => {
                self.arena[i as usize] = AvlNode::new(i, value);
                i
            }
            None => {
                let i = self.arena.len() as NodeId;
                self.arena.push(AvlNode::new(i, value));
                i
            }
        }
    }

    fn is_live(&self, id: NodeId) -> bool {
        self.arena
            .get(id as usize)
            .is_some_and(|n| n.data.is_some())
    }

    /// Inserts `value` at its sorted position and returns its node.
    ///
    /// Fails with [`TreeError::DuplicateValue`] when an equal element is
    /// already present; the tree is left untouched.
    pub fn insert(&mut self, value: T) -> Result<NodeId, TreeError> {
        let Some(mut curr) = self.root else {
            let id = self.alloc(value);
            self.root = Some(id);
            self.size += 1;
            return Ok(id);
        };

        // Descend to the leaf slot the value belongs in.
        let went_left = loop {
            let cmp = (self.comparator)(&value, self.arena[curr as usize].data());
            if cmp == 0 {
                return Err(TreeError::DuplicateValue);
            }
            let next = if cmp < 0 {
                self.arena[curr as usize].l
            } else {
                self.arena[curr as usize].r
            };
            match next {
                Some(n) => curr = n,
                None => break cmp < 0,
            }
        };

        let id = self.alloc(value);
        if went_left {
            self.arena[curr as usize].l = Some(id);
        } else {
            self.arena[curr as usize].r = Some(id);
        }
        self.arena[id as usize].p = Some(curr);

        // One rotation is enough after an insertion; the rest of the walk
        // only refreshes caches.
        retrace(&mut self.arena, Some(curr), true);
        ascend_root(&self.arena, &mut self.root);
        self.size += 1;
        Ok(id)
    }

    /// Removes the element equal to `value`. Returns whether anything was
    /// removed; absence is not an error.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.find(value) {
            Some(i) => {
                self.remove_node(i);
                true
            }
            None => false,
        }
    }

    /// Removes the node under the cursor. Returns `false` when the cursor
    /// is off-node or stale.
    pub fn remove_at(&mut self, cursor: &Cursor) -> bool {
        match cursor.node() {
            Some(i) if self.is_live(i) => {
                self.remove_node(i);
                true
            }
            _ => false,
        }
    }

    fn remove_node(&mut self, n: NodeId) {
        let start = splice_out(&mut self.arena, n, &mut self.root);
        self.arena[n as usize].data = None;
        // Unlike insertion, a deletion can unbalance several ancestors.
        retrace(&mut self.arena, start, false);
        ascend_root(&self.arena, &mut self.root);
        self.free.push(n);
        self.size -= 1;
    }

    /// Finds the node holding an element equal to `value`.
    pub fn find(&self, value: &T) -> Option<NodeId> {
        util::find(&self.arena, self.root, value, AvlNode::data, &self.comparator)
    }

    /// Descends the tree steered by `probe`, which reports how the sought
    /// key compares to each stored element (`< 0`: left, `> 0`: right,
    /// `0`: found). Allows lookup by a projected key without building an
    /// element.
    pub fn find_by<F: Fn(&T) -> i32>(&self, probe: F) -> Option<NodeId> {
        let mut curr = self.root;
        while let Some(i) = curr {
            let cmp = probe(self.arena[i as usize].data());
            if cmp == 0 {
                return Some(i);
            }
            curr = if cmp < 0 {
                self.arena[i as usize].l
            } else {
                self.arena[i as usize].r
            };
        }
        None
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Node of the minimum element. O(1).
    pub fn first(&self) -> Option<NodeId> {
        util::first(&self.arena, self.root)
    }

    /// Node of the maximum element. O(1).
    pub fn last(&self) -> Option<NodeId> {
        util::last(&self.arena, self.root)
    }

    pub fn min(&self) -> Option<&T> {
        self.first().map(|i| self.get(i))
    }

    pub fn max(&self) -> Option<&T> {
        self.last().map(|i| self.get(i))
    }

    /// Drops every element, children before parents, and resets the tree.
    pub fn clear(&mut self) {
        fn release<T>(arena: &mut [AvlNode<T>], i: NodeId) {
            if let Some(l) = arena[i as usize].l {
                release(arena, l);
            }
            if let Some(r) = arena[i as usize].r {
                release(arena, r);
            }
            arena[i as usize].data = None;
        }
        if let Some(root) = self.root {
            release(&mut self.arena, root);
        }
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }

    // ── cursors ──────────────────────────────────────────────────────

    /// Cursor on the minimum element, or [`Cursor::Detached`] when empty.
    pub fn front_cursor(&self) -> Cursor {
        self.first().map(Cursor::On).unwrap_or(Cursor::Detached)
    }

    /// Cursor on the maximum element, or [`Cursor::Detached`] when empty.
    pub fn back_cursor(&self) -> Cursor {
        self.last().map(Cursor::On).unwrap_or(Cursor::Detached)
    }

    /// The position a full forward sweep ends at.
    pub fn end_cursor(&self) -> Cursor {
        self.last().map(Cursor::AfterLast).unwrap_or(Cursor::Detached)
    }

    /// The position a full backward sweep ends at.
    pub fn rend_cursor(&self) -> Cursor {
        self.first()
            .map(Cursor::BeforeFirst)
            .unwrap_or(Cursor::Detached)
    }

    /// Cursor on the root, for manual descent with
    /// [`move_left`](Self::move_left) / [`move_right`](Self::move_right).
    pub fn root_cursor(&self) -> Cursor {
        self.root.map(Cursor::On).unwrap_or(Cursor::Detached)
    }

    /// Steps the cursor to the in-order successor. Walking off the
    /// maximum parks it [`Cursor::AfterLast`], which is terminal in this
    /// direction; advancing [`Cursor::BeforeFirst`] resumes on the
    /// remembered first node.
    pub fn advance(&self, c: &mut Cursor) {
        *c = match *c {
            Cursor::On(i) => match util::next(&self.arena, i) {
                Some(n) => Cursor::On(n),
                None => Cursor::AfterLast(i),
            },
            Cursor::BeforeFirst(f) => Cursor::On(f),
            other => other,
        };
    }

    /// Steps the cursor to the in-order predecessor; mirror of
    /// [`advance`](Self::advance).
    pub fn retreat(&self, c: &mut Cursor) {
        *c = match *c {
            Cursor::On(i) => match util::prev(&self.arena, i) {
                Some(n) => Cursor::On(n),
                None => Cursor::BeforeFirst(i),
            },
            Cursor::AfterLast(l) => Cursor::On(l),
            other => other,
        };
    }

    /// The element under the cursor; `None` off-node.
    pub fn get_at(&self, c: &Cursor) -> Option<&T> {
        c.node()
            .and_then(|i| self.arena.get(i as usize))
            .and_then(|n| n.data.as_ref())
    }

    /// Moves to the left child. Returns whether the move happened.
    pub fn move_left(&self, c: &mut Cursor) -> bool {
        match c.node().and_then(|i| self.arena[i as usize].l) {
            Some(l) => {
                *c = Cursor::On(l);
                true
            }
            None => false,
        }
    }

    /// Moves to the right child. Returns whether the move happened.
    pub fn move_right(&self, c: &mut Cursor) -> bool {
        match c.node().and_then(|i| self.arena[i as usize].r) {
            Some(r) => {
                *c = Cursor::On(r);
                true
            }
            None => false,
        }
    }

    /// Moves to the parent. Returns whether the move happened.
    pub fn move_up(&self, c: &mut Cursor) -> bool {
        match c.node().and_then(|i| self.arena[i as usize].p) {
            Some(p) => {
                *c = Cursor::On(p);
                true
            }
            None => false,
        }
    }

    /// Orders two cursors: on-node positions by their elements,
    /// [`Cursor::BeforeFirst`] before everything, [`Cursor::AfterLast`]
    /// (and the empty-tree [`Cursor::Detached`]) after everything.
    pub fn cursor_cmp(&self, a: &Cursor, b: &Cursor) -> Ordering {
        fn rank(c: &Cursor) -> u8 {
            match c {
                Cursor::BeforeFirst(_) => 0,
                Cursor::On(_) => 1,
                Cursor::AfterLast(_) | Cursor::Detached => 2,
            }
        }
        match (a, b) {
            (Cursor::On(x), Cursor::On(y)) => {
                (self.comparator)(self.get(*x), self.get(*y)).cmp(&0)
            }
            _ => rank(a).cmp(&rank(b)),
        }
    }

    // ── iteration ────────────────────────────────────────────────────

    /// In-order iterator over the elements; supports iteration from both
    /// ends.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            exhausted: self.root.is_none(),
        }
    }

    /// Visits `(node, element)` pairs in order.
    pub fn for_each<F: FnMut(NodeId, &T)>(&self, mut f: F) {
        let mut curr = self.first();
        while let Some(i) = curr {
            f(i, self.get(i));
            curr = util::next(&self.arena, i);
        }
    }

    /// The elements as a sorted `Vec`. O(n), so building a tree and
    /// exporting doubles as an O(n log n) sort.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.size);
        self.for_each(|_, v| out.push(v.clone()));
        out
    }

    // ── diagnostics ──────────────────────────────────────────────────

    /// Verifies every structural invariant: parent links, height and
    /// endpoint caches, balance factors, in-order ordering, and that
    /// `len()` matches both the reachable and the live node count.
    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl(&self.arena, self.root, AvlNode::data, &self.comparator)?;
        let reachable = util::size(&self.arena, self.root);
        if reachable != self.size {
            return Err(format!(
                "size mismatch: counted {reachable}, recorded {}",
                self.size
            ));
        }
        let live = self.arena.iter().filter(|n| n.data.is_some()).count();
        if live != self.size {
            return Err(format!(
                "live-slot mismatch: {live} occupied slots for size {}",
                self.size
            ));
        }
        Ok(())
    }

    /// Debug dump of the whole tree.
    pub fn print(&self) -> String
    where
        T: Debug,
    {
        print(&self.arena, self.root, "")
    }
}

impl<T, C> Clone for AvlTree<T, C>
where
    T: Clone,
    C: Fn(&T, &T) -> i32 + Clone,
{
    /// Deep copy by in-order re-insertion. O(n log n).
    fn clone(&self) -> Self {
        let mut out = Self::with_comparator(self.comparator.clone());
        self.for_each(|_, v| {
            let _ = out.insert(v.clone());
        });
        out
    }
}

/// Double-ended in-order iterator borrowed from an [`AvlTree`].
pub struct Iter<'a, T, C>
where
    C: Fn(&T, &T) -> i32,
{
    tree: &'a AvlTree<T, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    exhausted: bool,
}

impl<'a, T, C> Iterator for Iter<'a, T, C>
where
    C: Fn(&T, &T) -> i32,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.exhausted {
            return None;
        }
        let i = self.front?;
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.front = util::next(&self.tree.arena, i);
        }
        Some(self.tree.get(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.tree.size))
    }
}

impl<'a, T, C> DoubleEndedIterator for Iter<'a, T, C>
where
    C: Fn(&T, &T) -> i32,
{
    fn next_back(&mut self) -> Option<&'a T> {
        if self.exhausted {
            return None;
        }
        let i = self.back?;
        if self.front == self.back {
            self.exhausted = true;
        } else {
            self.back = util::prev(&self.tree.arena, i);
        }
        Some(self.tree.get(i))
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C>
where
    C: Fn(&T, &T) -> i32,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}
