use thiserror::Error;

use crate::{Direction, NodeIndex};

/// A precondition fault: the caller handed the tree something it cannot act on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} is not a live node of this tree")]
    DetachedNode(NodeIndex),
    #[error("node {0} was issued by another tree")]
    ForeignNode(NodeIndex),
    #[error("cannot rotate around node {node}: it has no {missing} child")]
    MissingRotationChild { node: NodeIndex, missing: Direction },
}

/// The first broken structural invariant found by [`Blackwood::validate`].
///
/// [`Blackwood::validate`]: crate::Blackwood::validate
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("root node {0} is red")]
    RedRoot(NodeIndex),
    #[error("red node {0} has a red child")]
    RedRed(NodeIndex),
    #[error("children of node {node} disagree on black height ({left} vs {right})")]
    BlackHeightMismatch {
        node: NodeIndex,
        left: usize,
        right: usize,
    },
    #[error("node {0} breaks the in-order key sequence")]
    Unordered(NodeIndex),
    #[error("node {child} does not point back to its parent")]
    BrokenParentLink { child: NodeIndex },
    #[error("tree records {recorded} nodes but {reachable} are reachable from the root")]
    CountMismatch { recorded: usize, reachable: usize },
}
