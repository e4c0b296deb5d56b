use thiserror::Error;

/// Errors surfaced by tree mutation.
///
/// Absence is never an error: `remove` of a missing value and `find` of a
/// missing value report through `bool` / `Option` returns instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `insert` found an existing element that compares equal to the new
    /// value. Nothing was mutated; the rejected value is dropped.
    #[error("value already exists in the tree")]
    DuplicateValue,
}
