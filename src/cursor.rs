//! Two-ended tree cursor.
//!
//! A cursor is a plain value; all motion is mediated by the owning
//! [`AvlTree`](crate::avl::AvlTree) (`advance`, `retreat`, `get_at`, …),
//! the same way the arena mediates every link in this crate.
//!
//! Besides sitting on a node, a cursor can rest *past* either end of the
//! tree, and the two off-end states are distinct: each remembers the node
//! it walked off of, so reversing direction at a boundary lands back on
//! the correct end instead of losing the position. A full forward sweep
//! ends at [`Cursor::AfterLast`], where further `advance` calls are
//! no-ops; the mirror holds for [`Cursor::BeforeFirst`] and `retreat`.

use crate::types::NodeId;

/// Logical position inside (or just past the ends of) a tree.
#[derive(Clone, Copy, Debug)]
pub enum Cursor {
    /// On a live node.
    On(NodeId),
    /// Before the minimum; advancing resumes at the remembered first node.
    BeforeFirst(NodeId),
    /// After the maximum; retreating resumes at the remembered last node.
    AfterLast(NodeId),
    /// The boundary cursor of an empty tree.
    Detached,
}

impl Cursor {
    /// The node under the cursor, if it is on one.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Cursor::On(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Cursor::On(_))
    }
}

/// Two off-end cursors are interchangeable whichever node they walked off
/// of, so boundary states compare by state alone.
impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cursor::On(a), Cursor::On(b)) => a == b,
            (Cursor::BeforeFirst(_), Cursor::BeforeFirst(_)) => true,
            (Cursor::AfterLast(_), Cursor::AfterLast(_)) => true,
            (Cursor::Detached, Cursor::Detached) => true,
            _ => false,
        }
    }
}

impl Eq for Cursor {}

#[cfg(test)]
mod tests {
    use super::Cursor;

    #[test]
    fn boundary_states_ignore_the_remembered_node() {
        assert_eq!(Cursor::AfterLast(1), Cursor::AfterLast(7));
        assert_eq!(Cursor::BeforeFirst(0), Cursor::BeforeFirst(3));
        assert_ne!(Cursor::BeforeFirst(1), Cursor::AfterLast(1));
        assert_ne!(Cursor::On(1), Cursor::On(2));
        assert_ne!(Cursor::On(1), Cursor::Detached);
        assert_eq!(Cursor::Detached, Cursor::Detached);
    }
}
