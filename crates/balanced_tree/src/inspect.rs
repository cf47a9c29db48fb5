//! Balanced Tree - Inspection
//!
//! Read-only diagnostics over a tree: structural statistics, a full red-black invariant check, and a sideways text
//! rendering.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt;

use crate::{NodeId, Rbt};

/// Structural statistics of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shape {
    /// Nodes on the longest root-to-leaf path.
    pub height: usize,
    /// Nodes without children.
    pub leaves: usize,
    /// Nodes with exactly one child.
    pub half_nodes: usize,
    /// Nodes with two children.
    pub full_nodes: usize,
    /// Nodes that are the left child of their parent.
    pub left_children: usize,
    /// Nodes that are the right child of their parent.
    pub right_children: usize,
}

impl Shape {
    /// Nodes with at least one child.
    pub fn non_leaves(&self) -> usize {
        self.half_nodes + self.full_nodes
    }
}

/// A broken red-black or search tree property, found by [check_invariants](Rbt::check_invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The root is red.
    RedRoot,
    /// A red node has a red child.
    RedRedEdge { parent: NodeId },
    /// The two subtrees of a node have different black-heights.
    BlackHeightMismatch { node: NodeId },
    /// A key sits on the wrong side of one of its ancestors.
    OrderViolation { node: NodeId },
    /// A node's parent link does not point at the node holding it.
    BrokenParentLink { node: NodeId },
    /// The recorded node count differs from the nodes reachable from the root.
    SizeMismatch { counted: usize, recorded: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RedRoot => write!(f, "root is red"),
            Violation::RedRedEdge { parent } => write!(f, "red node {:?} has a red child", parent),
            Violation::BlackHeightMismatch { node } => write!(f, "subtrees of {:?} differ in black-height", node),
            Violation::OrderViolation { node } => write!(f, "key of {:?} is out of order", node),
            Violation::BrokenParentLink { node } => write!(f, "parent link of {:?} is broken", node),
            Violation::SizeMismatch { counted, recorded } => {
                write!(f, "{} nodes reachable but {} recorded", counted, recorded)
            }
        }
    }
}

impl<K> Rbt<K> {
    /// Returns the number of nodes on the longest root-to-leaf path, 0 for an empty tree.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.subtree_height(root))
    }

    fn subtree_height(&self, id: NodeId) -> usize {
        let node = &self.storage[id];
        let left = node.left.map_or(0, |left| self.subtree_height(left));
        let right = node.right.map_or(0, |right| self.subtree_height(right));
        core::cmp::max(left, right) + 1
    }

    /// Counts the nodes of the tree by how many children they have and which side they hang from.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn shape(&self) -> Shape {
        let mut shape = Shape { height: self.height(), ..Shape::default() };
        self.pre_order_iterative(None, |id, _| {
            let node = &self.storage[id];
            match (node.left, node.right) {
                (None, None) => shape.leaves += 1,
                (Some(_), Some(_)) => shape.full_nodes += 1,
                _ => shape.half_nodes += 1,
            }
            shape.left_children += node.left.is_some() as usize;
            shape.right_children += node.right.is_some() as usize;
        });
        shape
    }
}

impl<K> Rbt<K>
where
    K: Ord,
{
    /// Verifies every red-black and search tree property over the whole tree.
    ///
    /// Returns the black-height of the root: the black nodes on any path from the root down to an absent child, not
    /// counting the root itself.
    ///
    /// # Errors
    ///
    /// Returns the first [Violation] found.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn check_invariants(&self) -> core::result::Result<usize, Violation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(0),
                recorded => Err(Violation::SizeMismatch { counted: 0, recorded }),
            };
        };

        if self.storage[root].parent.is_some() {
            return Err(Violation::BrokenParentLink { node: root });
        }
        if self.storage[root].color.is_red() {
            return Err(Violation::RedRoot);
        }

        let mut counted = 0;
        let black_height = self.check_subtree(root, None, None, &mut counted)?;
        if counted != self.len() {
            return Err(Violation::SizeMismatch { counted, recorded: self.len() });
        }
        Ok(black_height - 1)
    }

    /// Checks the subtree at `id`, whose keys must lie within `lower..=upper`, returning its black-height counting
    /// `id` itself.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        counted: &mut usize,
    ) -> core::result::Result<usize, Violation> {
        let node = &self.storage[id];
        *counted += 1;

        if lower.is_some_and(|lower| node.key < *lower) || upper.is_some_and(|upper| node.key > *upper) {
            return Err(Violation::OrderViolation { node: id });
        }

        for child in [node.left, node.right].into_iter().flatten() {
            if self.storage[child].parent != Some(id) {
                return Err(Violation::BrokenParentLink { node: child });
            }
            if node.color.is_red() && self.storage[child].color.is_red() {
                return Err(Violation::RedRedEdge { parent: id });
            }
        }

        // Equal keys may end up on either side after rotations, so both bounds are inclusive.
        let left = match node.left {
            Some(left) => self.check_subtree(left, lower, Some(&node.key), counted)?,
            None => 0,
        };
        let right = match node.right {
            Some(right) => self.check_subtree(right, Some(&node.key), upper, counted)?,
            None => 0,
        };
        if left != right {
            return Err(Violation::BlackHeightMismatch { node: id });
        }

        Ok(left + node.color.is_black() as usize)
    }
}

/// Renders the tree sideways: the right subtree above each node, the left subtree below it.
///
/// ```text
/// |----20-R
/// 18-B
/// |----17-R
/// ```
impl<K> fmt::Display for Rbt<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_subtree(f, root, 0),
            None => Ok(()),
        }
    }
}

impl<K> Rbt<K>
where
    K: fmt::Display,
{
    fn fmt_subtree(&self, f: &mut fmt::Formatter<'_>, id: NodeId, level: usize) -> fmt::Result {
        let node = &self.storage[id];
        if let Some(right) = node.right {
            self.fmt_subtree(f, right, level + 1)?;
        }

        if level != 0 {
            for _ in 0..level - 1 {
                f.write_str("|    ")?;
            }
            f.write_str("|----")?;
        }
        let color = if node.color.is_red() { "R" } else { "B" };
        writeln!(f, "{}-{}", node.key, color)?;

        if let Some(left) = node.left {
            self.fmt_subtree(f, left, level + 1)?;
        }
        Ok(())
    }
}
