use crate::iter::InOrder;
use crate::{Blackwood, InvariantViolation, NodeColor};

impl<K> Blackwood<K> {
    /// Checks the coloring rules: black root, no red node with a red child, and the same
    /// number of black nodes on every downward path.
    ///
    /// This is a diagnostic walk over the whole tree; nothing in the crate relies on it.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if let Some(root) = self.root_slot()
            && self.node_at(root).color != NodeColor::Black
        {
            return false;
        }

        self.color_check(self.root_slot()).1
    }

    /// Returns `(black height, valid)` for the subtree at `slot`. Absent children count as
    /// one black unit.
    fn color_check(&self, slot: Option<usize>) -> (usize, bool) {
        let Some(slot) = slot else {
            return (1, true);
        };

        let node = self.node_at(slot);
        let (left_height, left_valid) = self.color_check(node.left);
        let (right_height, right_valid) = self.color_check(node.right);

        if !left_valid || !right_valid || left_height != right_height {
            return (0, false);
        }

        if node.color.is_red() && (self.is_red(node.left) || self.is_red(node.right)) {
            return (0, false);
        }

        match node.color {
            NodeColor::Black => (left_height + 1, true),
            NodeColor::Red => (left_height, true),
        }
    }

    /// Checks every structural invariant and reports the first one found broken: key order,
    /// root color, red-red adjacency, black heights, parent back-links and the recorded
    /// node count.
    pub fn validate(&self) -> Result<(), InvariantViolation>
    where
        K: Ord,
    {
        let Some(root) = self.root_slot() else {
            return match self.len() {
                0 => Ok(()),
                recorded => Err(InvariantViolation::CountMismatch {
                    recorded,
                    reachable: 0,
                }),
            };
        };

        if self.node_at(root).color.is_red() {
            return Err(InvariantViolation::RedRoot(self.handle(root)));
        }
        if self.node_at(root).parent.is_some() {
            return Err(InvariantViolation::BrokenParentLink {
                child: self.handle(root),
            });
        }

        let mut reachable = 0;
        self.check_subtree(root, &mut reachable)?;

        if reachable != self.len() {
            return Err(InvariantViolation::CountMismatch {
                recorded: self.len(),
                reachable,
            });
        }

        let mut walk = InOrder::new(self);
        let mut previous = walk.next_slot();
        while let Some(current) = walk.next_slot() {
            if let Some(previous) = previous
                && self.node_at(previous).key >= self.node_at(current).key
            {
                return Err(InvariantViolation::Unordered(self.handle(current)));
            }
            previous = Some(current);
        }

        Ok(())
    }

    /// Black height of the subtree at `slot`, counting absent children as one.
    fn check_subtree(
        &self,
        slot: usize,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        *reachable += 1;
        let node = self.node_at(slot);

        let mut heights = [1; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            let Some(child) = child else {
                continue;
            };

            if self.node_at(child).parent != Some(slot) {
                return Err(InvariantViolation::BrokenParentLink {
                    child: self.handle(child),
                });
            }
            if node.color.is_red() && self.node_at(child).color.is_red() {
                return Err(InvariantViolation::RedRed(self.handle(slot)));
            }

            *height = self.check_subtree(child, reachable)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                node: self.handle(slot),
                left,
                right,
            });
        }

        Ok(left + usize::from(node.color.is_black()))
    }
}
