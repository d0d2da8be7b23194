use thiserror::Error;

/// Errors returned by [`Blackwood`](crate::Blackwood) and [`RecordTree`](crate::RecordTree).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlackwoodError {
    /// The key is already stored and duplicates are rejected.
    #[error("key is already present in the tree")]
    DuplicateKey,

    /// The key is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,

    /// A value does not satisfy the key-bearing contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A structural check found a broken red-black invariant.
    #[error("tree invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Red-black or search-tree invariants reported by [`Blackwood::validate`](crate::Blackwood::validate).
///
/// Nodes are identified by their arena slot so that keys need not be printable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root node {0} is red")]
    RedRoot(usize),

    #[error("red node {parent} has red child {child}")]
    RedRed { parent: usize, child: usize },

    #[error("black height mismatch under node {node}: left {left}, right {right}")]
    BlackHeight {
        node: usize,
        left: usize,
        right: usize,
    },

    #[error("node {0} is out of search order")]
    Ordering(usize),

    #[error("node {child} does not point back to its parent {expected:?}")]
    ParentLink {
        child: usize,
        expected: Option<usize>,
    },

    #[error("tree reports {recorded} nodes but {reachable} are reachable")]
    SizeMismatch { recorded: usize, reachable: usize },
}
