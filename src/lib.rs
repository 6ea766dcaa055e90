//! Red-Black Tree based ordered containers.
//!
//! [`Blackwood`] is an ordered set of unique keys whose height stays within `2 * log2(n + 1)`.
//! Nodes live in an arena owned by the tree and link to each other by slot index, parent
//! links included, so the upward walks of the rebalancing passes need no shared ownership.
//! [`BlackwoodMap`] layers a key/value map on top of the same balancing core.
//!
//! The tree performs no I/O. Rebalancing steps are reported through the [`log`] facade at
//! `trace` level for whoever installs a logger.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use alloc::vec::Vec;
use log::{debug, trace};

mod error;
pub mod iter;
pub mod map;
mod node;
mod validate;

pub use error::{InvariantViolation, TreeError};
pub use iter::{InOrder, PostOrder, PreOrder, Traversal, TraversalOrder};
pub use map::BlackwoodMap;
pub use node::{Direction, NodeColor, NodeIndex, NodeView};

use node::{BlackwoodNode, Slot};

/// Result of [`Blackwood::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was stored in a new node.
    Inserted(NodeIndex),
    /// An equal key was already present; the tree is unchanged. Carries the existing node.
    DuplicateIgnored(NodeIndex),
}

impl InsertOutcome {
    #[must_use]
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }

    #[must_use]
    pub fn node(&self) -> NodeIndex {
        match *self {
            Self::Inserted(node) | Self::DuplicateIgnored(node) => node,
        }
    }
}

/// Result of [`Blackwood::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

impl RemoveOutcome {
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(0);

fn next_tree_id() -> u32 {
    NEXT_TREE_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A Red-Black tree storing unique, totally ordered keys.
#[derive(Debug)]
pub struct Blackwood<K> {
    id: u32,
    storage: Vec<Slot<K>>,
    root: Option<usize>,
    free_head: Option<usize>,
    len: usize,
}

impl<K> Blackwood<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: next_tree_id(),
            storage: Vec::new(),
            root: None,
            free_head: None,
            len: 0,
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes reachable from the root.
    #[must_use]
    pub fn count(&self) -> usize {
        self.len
    }

    /// Number of nodes in the subtree rooted at `node`, `node` included.
    pub fn subtree_count(&self, node: NodeIndex) -> Result<usize, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self.count_below(Some(slot)))
    }

    /// Edges on the longest root-to-leaf path; `-1` for an empty tree.
    #[must_use]
    pub fn height(&self) -> isize {
        self.height_below(self.root)
    }

    pub fn subtree_height(&self, node: NodeIndex) -> Result<isize, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self.height_below(Some(slot)))
    }

    /// Drops every key. Handles obtained before the call no longer resolve.
    pub fn clear(&mut self) {
        let released = self.len;
        let mut next_free = None;

        for (slot, cell) in self.storage.iter_mut().enumerate().rev() {
            let generation = match cell {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => *generation,
            };

            *cell = Slot::Vacant {
                generation,
                next_free,
            };
            next_free = Some(slot);
        }

        self.free_head = next_free;
        self.root = None;
        self.len = 0;

        debug!("cleared tree, released {released} nodes");
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeIndex> {
        self.root.map(|slot| self.handle(slot))
    }

    /// Structural view of a node: key, color and neighbour handles.
    pub fn node(&self, index: NodeIndex) -> Result<NodeView<'_, K>, TreeError> {
        let slot = self.resolve(index)?;
        let node = self.node_at(slot);

        Ok(NodeView {
            index,
            key: &node.key,
            color: node.color,
            parent: node.parent.map(|s| self.handle(s)),
            left: node.left.map(|s| self.handle(s)),
            right: node.right.map(|s| self.handle(s)),
        })
    }

    pub fn key(&self, index: NodeIndex) -> Result<&K, TreeError> {
        let slot = self.resolve(index)?;
        Ok(&self.node_at(slot).key)
    }

    #[must_use]
    pub fn minimum(&self) -> Option<NodeIndex> {
        self.root
            .map(|root| self.handle(self.extreme_slot(root, Direction::Left)))
    }

    #[must_use]
    pub fn maximum(&self) -> Option<NodeIndex> {
        self.root
            .map(|root| self.handle(self.extreme_slot(root, Direction::Right)))
    }

    pub fn subtree_minimum(&self, node: NodeIndex) -> Result<NodeIndex, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self.handle(self.extreme_slot(slot, Direction::Left)))
    }

    pub fn subtree_maximum(&self, node: NodeIndex) -> Result<NodeIndex, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self.handle(self.extreme_slot(slot, Direction::Right)))
    }

    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.root
            .map(|root| &self.node_at(self.extreme_slot(root, Direction::Left)).key)
    }

    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.root
            .map(|root| &self.node_at(self.extreme_slot(root, Direction::Right)).key)
    }

    /// Node holding the next larger key, `None` if `node` holds the largest one.
    pub fn successor(&self, node: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self
            .neighbour_slot(slot, Direction::Right)
            .map(|s| self.handle(s)))
    }

    /// Node holding the next smaller key, `None` if `node` holds the smallest one.
    pub fn predecessor(&self, node: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        let slot = self.resolve(node)?;
        Ok(self
            .neighbour_slot(slot, Direction::Left)
            .map(|s| self.handle(s)))
    }

    /// Lifts the right child of `node` into its place.
    ///
    /// Keeps the in-order sequence and every parent link intact, but not the coloring rules:
    /// check [`Blackwood::is_valid`] afterwards if the caller cares.
    ///
    /// Repeated rotations can stretch the tree into a chain as long as [`Blackwood::len`].
    /// [`Blackwood::is_valid`] and [`Blackwood::validate`] recurse once per level, so on such a
    /// chain their stack depth grows with the number of nodes.
    pub fn rotate_left(&mut self, node: NodeIndex) -> Result<(), TreeError> {
        self.try_rotate(node, Direction::Left)
    }

    /// Lifts the left child of `node` into its place. See [`Blackwood::rotate_left`].
    pub fn rotate_right(&mut self, node: NodeIndex) -> Result<(), TreeError> {
        self.try_rotate(node, Direction::Right)
    }

    fn try_rotate(&mut self, node: NodeIndex, dir: Direction) -> Result<(), TreeError> {
        let slot = self.resolve(node)?;

        if self.node_at(slot).child(dir.opposite()).is_none() {
            return Err(TreeError::MissingRotationChild {
                node,
                missing: dir.opposite(),
            });
        }

        self.rotate(slot, dir);
        Ok(())
    }

    pub(crate) fn root_slot(&self) -> Option<usize> {
        self.root
    }

    pub(crate) fn node_at(&self, slot: usize) -> &BlackwoodNode<K> {
        match &self.storage[slot] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {slot}"),
        }
    }

    fn node_at_mut(&mut self, slot: usize) -> &mut BlackwoodNode<K> {
        match &mut self.storage[slot] {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => unreachable!("link to vacant slot {slot}"),
        }
    }

    pub(crate) fn handle(&self, slot: usize) -> NodeIndex {
        NodeIndex {
            tree: self.id,
            slot,
            generation: self.storage[slot].generation(),
        }
    }

    fn resolve(&self, index: NodeIndex) -> Result<usize, TreeError> {
        if index.tree != self.id {
            return Err(TreeError::ForeignNode(index));
        }

        match self.storage.get(index.slot) {
            Some(Slot::Occupied { generation, .. }) if *generation == index.generation => {
                Ok(index.slot)
            }
            _ => Err(TreeError::DetachedNode(index)),
        }
    }

    fn allocate(&mut self, node: BlackwoodNode<K>) -> usize {
        match self.free_head {
            Some(slot) => {
                let Slot::Vacant {
                    generation,
                    next_free,
                } = self.storage[slot]
                else {
                    unreachable!("free list reaches occupied slot {slot}");
                };

                self.free_head = next_free;
                self.storage[slot] = Slot::Occupied { generation, node };
                slot
            }
            None => {
                self.storage.push(Slot::Occupied {
                    generation: 0,
                    node,
                });
                self.storage.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> BlackwoodNode<K> {
        let vacant = Slot::Vacant {
            generation: self.storage[slot].generation().wrapping_add(1),
            next_free: self.free_head,
        };
        self.free_head = Some(slot);

        match mem::replace(&mut self.storage[slot], vacant) {
            Slot::Occupied { node, .. } => node,
            Slot::Vacant { .. } => unreachable!("released vacant slot {slot}"),
        }
    }

    /// Absent children count as black.
    fn is_red(&self, slot: Option<usize>) -> bool {
        slot.is_some_and(|s| self.node_at(s).color.is_red())
    }

    fn set_color(&mut self, slot: usize, color: NodeColor) {
        self.node_at_mut(slot).color = color;
    }

    fn side_of(&self, child: usize, parent: usize) -> Direction {
        if self.node_at(parent).left == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn extreme_slot(&self, from: usize, dir: Direction) -> usize {
        let mut current = from;
        while let Some(next) = self.node_at(current).child(dir) {
            current = next;
        }
        current
    }

    /// In-order neighbour on the `dir` side: `Right` for the successor, `Left` for the
    /// predecessor.
    fn neighbour_slot(&self, slot: usize, dir: Direction) -> Option<usize> {
        if let Some(child) = self.node_at(slot).child(dir) {
            return Some(self.extreme_slot(child, dir.opposite()));
        }

        let mut current = slot;
        while let Some(parent) = self.node_at(current).parent {
            if self.node_at(parent).child(dir) != Some(current) {
                return Some(parent);
            }
            current = parent;
        }

        None
    }

    fn height_below(&self, slot: Option<usize>) -> isize {
        let mut height = -1;
        let mut stack: Vec<(usize, isize)> = slot.map(|s| (s, 0)).into_iter().collect();

        while let Some((slot, depth)) = stack.pop() {
            height = height.max(depth);

            let node = self.node_at(slot);
            stack.extend(node.left.map(|s| (s, depth + 1)));
            stack.extend(node.right.map(|s| (s, depth + 1)));
        }

        height
    }

    fn count_below(&self, slot: Option<usize>) -> usize {
        let mut count = 0;
        let mut stack: Vec<usize> = slot.into_iter().collect();

        while let Some(slot) = stack.pop() {
            count += 1;

            let node = self.node_at(slot);
            stack.extend(node.left);
            stack.extend(node.right);
        }

        count
    }

    /// Points whatever referenced `old` from above (its parent, or the root handle) at `new`.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent_node = self.node_at_mut(parent);
                if parent_node.left == Some(old) {
                    parent_node.left = new;
                } else {
                    parent_node.right = new;
                }
            }
        }
    }

    fn transplant(&mut self, old: usize, new: Option<usize>) {
        let parent = self.node_at(old).parent;
        self.replace_child(parent, old, new);

        if let Some(new) = new {
            self.node_at_mut(new).parent = parent;
        }
    }

    /// `dir` names the rotation: a left rotation lifts the right child of `center`.
    fn rotate(&mut self, center: usize, dir: Direction) {
        let Some(pivot) = self.node_at(center).child(dir.opposite()) else {
            unreachable!(
                "{dir} rotation around slot {center} without a {} child",
                dir.opposite()
            );
        };
        trace!("rotating {dir} around slot {center}, lifting slot {pivot}");

        let parent = self.node_at(center).parent;
        let inner = self.node_at(pivot).child(dir);

        self.node_at_mut(center).set_child(dir.opposite(), inner);
        if let Some(inner) = inner {
            self.node_at_mut(inner).parent = Some(center);
        }

        self.node_at_mut(pivot).set_child(dir, Some(center));
        self.node_at_mut(center).parent = Some(pivot);
        self.node_at_mut(pivot).parent = parent;

        self.replace_child(parent, center, Some(pivot));
    }

    fn fix_red_violation(&mut self, start_slot: usize) {
        let mut current = start_slot;

        while let Some(parent) = self.node_at(current).parent {
            if self.node_at(parent).color.is_black() {
                break;
            }

            let Some(grandparent) = self.node_at(parent).parent else {
                self.set_color(parent, NodeColor::Black);
                break;
            };

            let parent_side = self.side_of(parent, grandparent);
            let uncle = self.node_at(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.node_at(u).color.is_red()) {
                trace!("insert fixup: red uncle at slot {uncle}, moving up to slot {grandparent}");
                self.set_color(parent, NodeColor::Black);
                self.set_color(uncle, NodeColor::Black);
                self.set_color(grandparent, NodeColor::Red);

                current = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.node_at(parent).child(parent_side.opposite()) == Some(current) {
                trace!("insert fixup: straightening inner grandchild at slot {current}");
                self.rotate(parent, parent_side);
                parent = current;
            }

            trace!("insert fixup: black uncle, rotating at slot {grandparent}");
            self.set_color(parent, NodeColor::Black);
            self.set_color(grandparent, NodeColor::Red);
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, NodeColor::Black);
        }
    }

    /// Physically unlinks the node at `target` and hands back the key it held.
    ///
    /// A node with two children keeps its slot and takes over its successor's key; the
    /// successor's slot is the one released.
    fn remove_slot(&mut self, target: usize) -> K {
        let target_node = self.node_at(target);
        let victim = match (target_node.left, target_node.right) {
            (Some(_), Some(right)) => self.extreme_slot(right, Direction::Left),
            _ => target,
        };

        let victim_node = self.node_at(victim);
        let child = victim_node.left.or(victim_node.right);
        let victim_was_black = victim_node.color.is_black();

        match child {
            Some(child) => {
                self.transplant(victim, Some(child));
                if victim_was_black {
                    self.fix_double_black(child);
                }
            }
            None => {
                // the leaf stands in for the empty position while the fixup runs
                if victim_was_black {
                    self.fix_double_black(victim);
                }
                self.transplant(victim, None);
            }
        }

        let removed = self.release(victim);
        self.len -= 1;

        if victim == target {
            removed.key
        } else {
            mem::replace(&mut self.node_at_mut(target).key, removed.key)
        }
    }

    fn fix_double_black(&mut self, start_slot: usize) {
        let mut current = start_slot;

        while self.root != Some(current) && self.node_at(current).color.is_black() {
            let Some(parent) = self.node_at(current).parent else {
                break;
            };

            let side = self.side_of(current, parent);
            let far = side.opposite();

            let Some(mut sibling) = self.node_at(parent).child(far) else {
                unreachable!("double-black slot {current} has no sibling");
            };

            if self.node_at(sibling).color.is_red() {
                trace!("delete fixup: red sibling at slot {sibling}");
                self.set_color(sibling, NodeColor::Black);
                self.set_color(parent, NodeColor::Red);
                self.rotate(parent, side);

                let Some(new_sibling) = self.node_at(parent).child(far) else {
                    unreachable!("red sibling rotation left slot {current} without a sibling");
                };
                sibling = new_sibling;
            }

            let near_nephew = self.node_at(sibling).child(side);
            let far_nephew = self.node_at(sibling).child(far);

            if !self.is_red(near_nephew) && !self.is_red(far_nephew) {
                trace!("delete fixup: black nephews, moving deficit up to slot {parent}");
                self.set_color(sibling, NodeColor::Red);
                current = parent;
                continue;
            }

            if !self.is_red(far_nephew) {
                if let Some(near) = near_nephew {
                    trace!("delete fixup: turning near red nephew at slot {near} outward");
                    self.set_color(near, NodeColor::Black);
                }
                self.set_color(sibling, NodeColor::Red);
                self.rotate(sibling, far);

                let Some(new_sibling) = self.node_at(parent).child(far) else {
                    unreachable!("nephew rotation left slot {current} without a sibling");
                };
                sibling = new_sibling;
            }

            trace!("delete fixup: far red nephew, rotating at slot {parent}");
            let parent_color = self.node_at(parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, NodeColor::Black);
            if let Some(far_nephew) = self.node_at(sibling).child(far) {
                self.set_color(far_nephew, NodeColor::Black);
            }
            self.rotate(parent, side);
            break;
        }

        self.set_color(current, NodeColor::Black);
        if let Some(root) = self.root {
            self.set_color(root, NodeColor::Black);
        }
    }
}

impl<K: Ord> Blackwood<K> {
    /// Stores `key` unless an equal key is already present.
    pub fn insert(&mut self, key: K) -> InsertOutcome {
        let mut parent = None;
        let mut dir = Direction::Left;
        let mut current = self.root;

        while let Some(slot) = current {
            let node = self.node_at(slot);

            dir = match key.cmp(&node.key) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => return InsertOutcome::DuplicateIgnored(self.handle(slot)),
            };

            parent = Some(slot);
            current = node.child(dir);
        }

        let new_slot = self.allocate(BlackwoodNode::new_isolated(key, parent));
        match parent {
            None => self.root = Some(new_slot),
            Some(parent) => self.node_at_mut(parent).set_child(dir, Some(new_slot)),
        }
        self.len += 1;

        self.fix_red_violation(new_slot);

        InsertOutcome::Inserted(self.handle(new_slot))
    }

    pub fn remove<Q>(&mut self, key: &Q) -> RemoveOutcome
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.take(key) {
            Some(_) => RemoveOutcome::Removed,
            None => RemoveOutcome::NotFound,
        }
    }

    /// Removes the key equal to `key` and returns it.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.find_slot(key)?;
        Some(self.remove_slot(slot))
    }

    pub fn search<Q>(&self, key: &Q) -> Option<NodeIndex>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_slot(key).map(|slot| self.handle(slot))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_slot(key).is_some()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_slot(key).map(|slot| &self.node_at(slot).key)
    }

    /// Mutable access for wrappers whose ordering ignores part of the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.find_slot(key)?;
        Some(&mut self.node_at_mut(slot).key)
    }

    fn find_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;

        while let Some(slot) = current {
            let node = self.node_at(slot);

            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left,
                Ordering::Equal => return Some(slot),
                Ordering::Greater => current = node.right,
            }
        }

        None
    }
}

impl<K: Clone> Clone for Blackwood<K> {
    /// The copy is a separate tree: handles issued by `self` are foreign to it.
    fn clone(&self) -> Self {
        Self {
            id: next_tree_id(),
            storage: self.storage.clone(),
            root: self.root,
            free_head: self.free_head,
            len: self.len,
        }
    }
}

impl<K> Default for Blackwood<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> Extend<K> for Blackwood<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for Blackwood<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
