use core::iter::FusedIterator;

use alloc::vec::Vec;

use crate::Blackwood;

/// Order in which [`Blackwood::traverse`] visits the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Node, then its left subtree, then its right subtree.
    PreOrder,
    /// Sorted order.
    InOrder,
    /// Left subtree, right subtree, then the node.
    PostOrder,
}

/// Sorted walk over the keys of a tree.
pub struct InOrder<'a, K> {
    pub(crate) tree: &'a Blackwood<K>,
    pub(crate) curr: Option<usize>,
    pub(crate) stack: Vec<usize>,
}

impl<'a, K> InOrder<'a, K> {
    pub(crate) fn new(tree: &'a Blackwood<K>) -> Self {
        Self {
            tree,
            curr: tree.root_slot(),
            stack: Vec::new(),
        }
    }

    pub(crate) fn next_slot(&mut self) -> Option<usize> {
        while let Some(curr) = self.curr {
            self.stack.push(curr);
            self.curr = self.tree.node_at(curr).left;
        }

        let node = self.stack.pop()?;
        self.curr = self.tree.node_at(node).right;

        Some(node)
    }
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.next_slot().map(|slot| &tree.node_at(slot).key)
    }
}

impl<K> FusedIterator for InOrder<'_, K> {}

pub struct PreOrder<'a, K> {
    tree: &'a Blackwood<K>,
    stack: Vec<usize>,
}

impl<'a, K> PreOrder<'a, K> {
    fn new(tree: &'a Blackwood<K>) -> Self {
        Self {
            tree,
            stack: tree.root_slot().into_iter().collect(),
        }
    }
}

impl<'a, K> Iterator for PreOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.node_at(self.stack.pop()?);

        self.stack.extend(node.right);
        self.stack.extend(node.left);

        Some(&node.key)
    }
}

impl<K> FusedIterator for PreOrder<'_, K> {}

pub struct PostOrder<'a, K> {
    tree: &'a Blackwood<K>,
    curr: Option<usize>,
    stack: Vec<usize>,
    last_visited: Option<usize>,
}

impl<'a, K> PostOrder<'a, K> {
    fn new(tree: &'a Blackwood<K>) -> Self {
        Self {
            tree,
            curr: tree.root_slot(),
            stack: Vec::new(),
            last_visited: None,
        }
    }
}

impl<'a, K> Iterator for PostOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(curr) = self.curr {
                self.stack.push(curr);
                self.curr = self.tree.node_at(curr).left;
            }

            let top = *self.stack.last()?;
            let right = self.tree.node_at(top).right;

            // descend right once; on the way back up the node itself is due
            if right.is_some() && right != self.last_visited {
                self.curr = right;
                continue;
            }

            self.stack.pop();
            self.last_visited = Some(top);

            return Some(&self.tree.node_at(top).key);
        }
    }
}

impl<K> FusedIterator for PostOrder<'_, K> {}

/// Walk returned by [`Blackwood::traverse`].
pub enum Traversal<'a, K> {
    PreOrder(PreOrder<'a, K>),
    InOrder(InOrder<'a, K>),
    PostOrder(PostOrder<'a, K>),
}

impl<'a, K> Iterator for Traversal<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::PreOrder(walk) => walk.next(),
            Self::InOrder(walk) => walk.next(),
            Self::PostOrder(walk) => walk.next(),
        }
    }
}

impl<K> FusedIterator for Traversal<'_, K> {}

impl<K> Blackwood<K> {
    /// Keys in sorted order.
    #[must_use]
    pub fn iter(&self) -> InOrder<'_, K> {
        InOrder::new(self)
    }

    #[must_use]
    pub fn preorder(&self) -> PreOrder<'_, K> {
        PreOrder::new(self)
    }

    #[must_use]
    pub fn postorder(&self) -> PostOrder<'_, K> {
        PostOrder::new(self)
    }

    /// Fresh walk over the current structure in the requested order.
    #[must_use]
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_, K> {
        match order {
            TraversalOrder::PreOrder => Traversal::PreOrder(self.preorder()),
            TraversalOrder::InOrder => Traversal::InOrder(self.iter()),
            TraversalOrder::PostOrder => Traversal::PostOrder(self.postorder()),
        }
    }
}

impl<'a, K> IntoIterator for &'a Blackwood<K> {
    type Item = &'a K;
    type IntoIter = InOrder<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
