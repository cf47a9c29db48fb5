//! Balanced Tree - Traversals
//!
//! Every walk takes an optional starting node (`None` walks the whole tree) and calls the visitor with each node's
//! handle and key. The recursive walks recurse once per level, which a red-black tree bounds at 2 * log2(n + 1). The
//! `_iterative` variants visit the same nodes in the same order using an explicit stack instead.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;

use crate::{NodeId, Rbt};

impl<K> Rbt<K> {
    /// Visits the subtree in ascending key order: left subtree, node, right subtree.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn in_order<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        if let Some(start) = self.start_node(start) {
            self.in_order_from(start, &mut visit);
        }
    }

    /// Visits each node before its subtrees.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn pre_order<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        if let Some(start) = self.start_node(start) {
            self.pre_order_from(start, &mut visit);
        }
    }

    /// Visits each node after its subtrees.
    ///
    /// # Time Complexity
    ///
    /// O(n)
    ///
    pub fn post_order<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        if let Some(start) = self.start_node(start) {
            self.post_order_from(start, &mut visit);
        }
    }

    fn in_order_from<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(NodeId, &K),
    {
        let node = &self.storage[id];
        if let Some(left) = node.left {
            self.in_order_from(left, visit);
        }
        visit(id, &node.key);
        if let Some(right) = node.right {
            self.in_order_from(right, visit);
        }
    }

    fn pre_order_from<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(NodeId, &K),
    {
        let node = &self.storage[id];
        visit(id, &node.key);
        if let Some(left) = node.left {
            self.pre_order_from(left, visit);
        }
        if let Some(right) = node.right {
            self.pre_order_from(right, visit);
        }
    }

    fn post_order_from<F>(&self, id: NodeId, visit: &mut F)
    where
        F: FnMut(NodeId, &K),
    {
        let node = &self.storage[id];
        if let Some(left) = node.left {
            self.post_order_from(left, visit);
        }
        if let Some(right) = node.right {
            self.post_order_from(right, visit);
        }
        visit(id, &node.key);
    }

    /// Same visit order as [in_order](Self::in_order), walked with an explicit stack.
    pub fn in_order_iterative<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        let mut stack = self.walk_stack();
        let mut current = self.start_node(start);
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.storage[id].left;
            }
            let Some(id) = stack.pop() else {
                break;
            };
            let node = &self.storage[id];
            visit(id, &node.key);
            current = node.right;
        }
    }

    /// Same visit order as [pre_order](Self::pre_order), walked with an explicit stack.
    pub fn pre_order_iterative<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        let mut stack = self.walk_stack();
        stack.extend(self.start_node(start));
        while let Some(id) = stack.pop() {
            let node = &self.storage[id];
            visit(id, &node.key);
            // Right goes under left so the left subtree is finished first.
            stack.extend(node.right);
            stack.extend(node.left);
        }
    }

    /// Same visit order as [post_order](Self::post_order), walked with an explicit stack.
    pub fn post_order_iterative<F>(&self, start: Option<NodeId>, mut visit: F)
    where
        F: FnMut(NodeId, &K),
    {
        let mut stack = self.walk_stack();
        let mut current = self.start_node(start);
        let mut last_visited: Option<NodeId> = None;
        loop {
            while let Some(id) = current {
                stack.push(id);
                current = self.storage[id].left;
            }
            let Some(&top) = stack.last() else {
                break;
            };
            let right = self.storage[top].right;
            if right.is_some() && right != last_visited {
                current = right;
            } else {
                visit(top, &self.storage[top].key);
                last_visited = Some(top);
                stack.pop();
            }
        }
    }

    /// A stack deep enough for any root-to-leaf path without regrowing.
    fn walk_stack(&self) -> Vec<NodeId> {
        let bits = (usize::BITS - self.len().leading_zeros()) as usize;
        Vec::with_capacity(2 * bits + 1)
    }
}
