use core::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeColor {
    #[default]
    Red,
    Black,
}

impl NodeColor {
    #[must_use]
    pub fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    #[must_use]
    pub fn is_black(self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Side of a node a child hangs from, also used to name a rotation.
///
/// A `Left` rotation lifts the right child of the pivot, and the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Handle to a node stored in a [`Blackwood`](crate::Blackwood).
///
/// Handles stay valid across rotations and across the removal of other nodes. Removing the
/// node itself, or clearing the tree, turns the handle stale: the tree reports it as
/// [`TreeError::DetachedNode`](crate::TreeError::DetachedNode) instead of resolving it to
/// whatever node later reuses the storage slot. A handle is only accepted by the tree that
/// issued it; any other tree, clones included, reports
/// [`TreeError::ForeignNode`](crate::TreeError::ForeignNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex {
    pub(crate) tree: u32,
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{} (tree {})", self.slot, self.generation, self.tree)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BlackwoodNode<K> {
    pub(crate) key: K,
    pub(crate) color: NodeColor,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<K> BlackwoodNode<K> {
    pub(crate) fn new_isolated(key: K, parent: Option<usize>) -> Self {
        Self {
            key,
            color: NodeColor::default(),
            parent,
            left: None,
            right: None,
        }
    }

    pub(crate) fn child(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, dir: Direction, child: Option<usize>) {
        match dir {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}

/*
vacant slots form an intrusive linked list: the tree stores the head, and every vacant slot
stores the next one. allocating pops the head, releasing pushes the slot back.
the generation is bumped on release so that handles to the old occupant stop resolving.
*/
#[derive(Debug, Clone)]
pub(crate) enum Slot<K> {
    Occupied {
        generation: u32,
        node: BlackwoodNode<K>,
    },
    Vacant {
        generation: u32,
        next_free: Option<usize>,
    },
}

impl<K> Slot<K> {
    pub(crate) fn generation(&self) -> u32 {
        match self {
            Self::Occupied { generation, .. } | Self::Vacant { generation, .. } => *generation,
        }
    }
}

/// Read-only view of one node, enough for an external renderer to rebuild the tree.
#[derive(Debug)]
pub struct NodeView<'a, K> {
    pub(crate) index: NodeIndex,
    pub(crate) key: &'a K,
    pub(crate) color: NodeColor,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) left: Option<NodeIndex>,
    pub(crate) right: Option<NodeIndex>,
}

impl<'a, K> NodeView<'a, K> {
    #[must_use]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    #[must_use]
    pub fn key(&self) -> &'a K {
        self.key
    }

    #[must_use]
    pub fn color(&self) -> NodeColor {
        self.color
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[must_use]
    pub fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    #[must_use]
    pub fn right(&self) -> Option<NodeIndex> {
        self.right
    }

    #[must_use]
    pub fn child(&self, dir: Direction) -> Option<NodeIndex> {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}
