//! Height-balanced (AVL) search tree family.

pub mod node;
pub mod tree;
pub mod util;

pub use node::{AvlNode, AvlNodeLike};
pub use tree::{AvlTree, Iter};
