//! Balanced Tree - Red-Black Tree
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::node::{Color, Node, NodeId, Storage};

use super::{Error, Result};
use core::cmp::Ordering;

/// A red-black tree over keys of type `K`.
///
/// Nodes live in a growable arena owned by the tree and are addressed through [NodeId] handles. Duplicate keys are
/// allowed; a key equal to an existing one is placed in that node's right subtree.
pub struct Rbt<K> {
    pub(crate) storage: Storage<K>,
    pub(crate) root: Option<NodeId>,
}

impl<K> Rbt<K> {
    /// Creates an empty tree without allocating.
    pub const fn new() -> Self {
        Rbt { storage: Storage::new(), root: None }
    }

    /// Creates an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Rbt { storage: Storage::with_capacity(capacity), root: None }
    }

    /// Returns the number of nodes in the tree.
    ///
    /// # Time Complexity
    ///
    /// O(1)
    ///
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Indicates whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    /// Returns the number of nodes the tree can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Reserves room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    /// Releases unused arena capacity.
    pub fn shrink_to_fit(&mut self) {
        self.storage.shrink_to_fit();
    }

    /// Removes every node. Handles issued before the call become stale.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.root = None;
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Indicates whether `id` refers to a node currently in this tree.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.storage.contains(id)
    }

    /// Returns the key stored at `id`.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.storage.get(id).map(|node| &node.key)
    }

    /// Returns the color of the node at `id`.
    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.storage.get(id).map(|node| node.color)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.storage.get(id).and_then(|node| node.parent)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.storage.get(id).and_then(|node| node.left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.storage.get(id).and_then(|node| node.right)
    }

    /// Resolves an optional starting node: `None` means the root, a stale handle means nothing.
    pub(crate) fn start_node(&self, start: Option<NodeId>) -> Option<NodeId> {
        match start {
            None => self.root,
            Some(id) if self.storage.contains(id) => Some(id),
            Some(_) => None,
        }
    }

    /// Returns the leftmost node of the subtree at `start`, or of the whole tree if `start` is `None`.
    ///
    /// Returns `None` if the tree is empty or `start` is stale.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn min(&self, start: Option<NodeId>) -> Option<NodeId> {
        self.start_node(start).map(|id| self.subtree_min(id))
    }

    /// Returns the rightmost node of the subtree at `start`, or of the whole tree if `start` is `None`.
    ///
    /// Returns `None` if the tree is empty or `start` is stale.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn max(&self, start: Option<NodeId>) -> Option<NodeId> {
        self.start_node(start).map(|id| self.subtree_max(id))
    }

    /// Returns the first ordered key in the tree.
    pub fn first(&self) -> Option<&K> {
        self.min(None).map(|id| &self.storage[id].key)
    }

    /// Returns the last ordered key in the tree.
    pub fn last(&self) -> Option<&K> {
        self.max(None).map(|id| &self.storage[id].key)
    }

    fn subtree_min(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.storage[id].left {
            id = left;
        }
        id
    }

    fn subtree_max(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.storage[id].right {
            id = right;
        }
        id
    }

    /// Returns the node that follows `id` in key order.
    ///
    /// # Errors
    ///
    /// Returns [NotFound](Error::NotFound) if `id` holds the largest key or is stale.
    ///
    /// # Time Complexity
    ///
    /// O(1) ~ O(log n)
    ///
    pub fn successor(&self, id: NodeId) -> Result<NodeId> {
        let node = self.storage.get(id).ok_or(Error::NotFound)?;
        if let Some(right) = node.right {
            return Ok(self.subtree_min(right));
        }

        // Climb while we are a right child; the first parent reached from its left side is next.
        let mut current = id;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.storage[p].right != Some(current) {
                return Ok(p);
            }
            current = p;
            parent = self.storage[p].parent;
        }
        Err(Error::NotFound)
    }

    /// Returns the node that precedes `id` in key order.
    ///
    /// # Errors
    ///
    /// Returns [NotFound](Error::NotFound) if `id` holds the smallest key or is stale.
    ///
    /// # Time Complexity
    ///
    /// O(1) ~ O(log n)
    ///
    pub fn predecessor(&self, id: NodeId) -> Result<NodeId> {
        let node = self.storage.get(id).ok_or(Error::NotFound)?;
        if let Some(left) = node.left {
            return Ok(self.subtree_max(left));
        }

        let mut current = id;
        let mut parent = node.parent;
        while let Some(p) = parent {
            if self.storage[p].left != Some(current) {
                return Ok(p);
            }
            current = p;
            parent = self.storage[p].parent;
        }
        Err(Error::NotFound)
    }

    /// Deletes the node at `id` from the tree, returning its key.
    ///
    /// Returns `None` and leaves the tree untouched if `id` is stale.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn delete(&mut self, id: NodeId) -> Option<K> {
        let Some(node) = self.storage.get(id) else {
            log::debug!("delete ignored stale node handle {:?}", id);
            return None;
        };
        let (left, right, parent, color) = (node.left, node.right, node.parent, node.color);

        // Color of the node that actually leaves its position, and the subtree that takes it over.
        let mut removed_color = color;
        let moved_up;
        let moved_up_parent;

        match (left, right) {
            (None, _) => {
                moved_up = right;
                moved_up_parent = parent;
                self.transplant(id, right);
            }
            (Some(_), None) => {
                moved_up = left;
                moved_up_parent = parent;
                self.transplant(id, left);
            }
            (Some(left), Some(right)) => {
                let successor = self.subtree_min(right);
                removed_color = self.storage[successor].color;
                moved_up = self.storage[successor].right;

                if self.storage[successor].parent == Some(id) {
                    moved_up_parent = Some(successor);
                } else {
                    moved_up_parent = self.storage[successor].parent;
                    self.transplant(successor, moved_up);
                    self.storage[successor].right = Some(right);
                    self.storage[right].parent = Some(successor);
                }

                self.transplant(id, Some(successor));
                self.storage[successor].left = Some(left);
                self.storage[left].parent = Some(successor);
                self.storage[successor].color = color;
                log::trace!("delete: successor {:?} replaced {:?}", successor, id);
            }
        }

        if removed_color.is_black() {
            self.delete_fixup(moved_up, moved_up_parent);
        }

        self.storage.delete(id).map(|node| node.key)
    }

    /// Puts `new` in the position `old` holds under its parent.
    ///
    /// `old` keeps its own links; the caller relinks or releases it.
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>) {
        let parent = self.storage[old].parent;
        self.replace_child(parent, old, new);
        self.storage.set_parent(new, parent);
    }

    /// Points whichever child link of `parent` referenced `old` at `new`, or the root if there is no parent.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) if self.storage[parent].left == Some(old) => self.storage[parent].left = new,
            Some(parent) => self.storage[parent].right = new,
        }
    }

    /// Rotate the subtree at `node` to the left, its right child takes its place.
    ///
    /// ```text
    ///      n                m
    ///     / \              / \
    ///    a   m    --->    n   c
    ///       / \          / \
    ///      b   c        a   b
    /// ```
    fn rotate_left(&mut self, node: NodeId) {
        let right = self.storage[node].right.expect("Rotating left requires a right child");
        log::trace!("rotate left at {:?}", node);

        let right_left = self.storage[right].left;
        self.storage[node].right = right_left;
        self.storage.set_parent(right_left, Some(node));

        let parent = self.storage[node].parent;
        self.storage[right].parent = parent;
        self.replace_child(parent, node, Some(right));

        self.storage[right].left = Some(node);
        self.storage[node].parent = Some(right);
    }

    /// Rotate the subtree at `node` to the right, its left child takes its place.
    ///
    /// ```text
    ///        n            m
    ///       / \          / \
    ///      m   c  --->  a   n
    ///     / \              / \
    ///    a   b            b   c
    /// ```
    fn rotate_right(&mut self, node: NodeId) {
        let left = self.storage[node].left.expect("Rotating right requires a left child");
        log::trace!("rotate right at {:?}", node);

        let left_right = self.storage[left].right;
        self.storage[node].left = left_right;
        self.storage.set_parent(left_right, Some(node));

        let parent = self.storage[node].parent;
        self.storage[left].parent = parent;
        self.replace_child(parent, node, Some(left));

        self.storage[left].right = Some(node);
        self.storage[node].parent = Some(left);
    }

    /// Updates the tree after a node has been added, to meet the red-black tree properties.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.storage[node].parent {
            if self.storage[parent].color.is_black() {
                break;
            }
            // The root is black, so a red parent always has a parent of its own.
            let grandparent = self.storage[parent].parent.expect("Parent is red, grandparent should exist");

            // Parent is left child of grandparent
            if self.storage[grandparent].left == Some(parent) {
                let uncle = self.storage[grandparent].right;

                // Uncle is red: recolor and continue from the grandparent.
                if self.storage.is_red(uncle) {
                    log::trace!("insert fixup: red uncle, recolor at {:?}", grandparent);
                    self.storage[parent].color = Color::Black;
                    self.storage.set_color(uncle, Color::Black);
                    self.storage[grandparent].color = Color::Red;
                    node = grandparent;
                    continue;
                }

                // Uncle is black and node is the inner grandchild, turn it into the outer one.
                if self.storage[parent].right == Some(node) {
                    node = parent;
                    self.rotate_left(node);
                }

                // Uncle is black and node is the outer grandchild.
                let parent = self.storage[node].parent.expect("Rotated node keeps a parent");
                let grandparent = self.storage[parent].parent.expect("Rotated node keeps a grandparent");
                self.storage[parent].color = Color::Black;
                self.storage[grandparent].color = Color::Red;
                self.rotate_right(grandparent);
            }
            // Parent is right child of grandparent
            else {
                let uncle = self.storage[grandparent].left;

                if self.storage.is_red(uncle) {
                    log::trace!("insert fixup: red uncle, recolor at {:?}", grandparent);
                    self.storage[parent].color = Color::Black;
                    self.storage.set_color(uncle, Color::Black);
                    self.storage[grandparent].color = Color::Red;
                    node = grandparent;
                    continue;
                }

                if self.storage[parent].left == Some(node) {
                    node = parent;
                    self.rotate_right(node);
                }

                let parent = self.storage[node].parent.expect("Rotated node keeps a parent");
                let grandparent = self.storage[parent].parent.expect("Rotated node keeps a grandparent");
                self.storage[parent].color = Color::Black;
                self.storage[grandparent].color = Color::Red;
                self.rotate_left(grandparent);
            }
        }

        let root = self.root;
        self.storage.set_color(root, Color::Black);
    }

    /// Updates the tree after a black node has been removed, to meet the red-black tree properties.
    ///
    /// `node` carries the extra black and may be absent, so its parent is tracked alongside it.
    fn delete_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && self.storage.is_black(node) {
            let Some(p) = parent else {
                break;
            };

            // Node is left child of its parent
            if self.storage[p].left == node {
                let mut sibling = self.storage[p].right.expect("Double black node must have a sibling");

                // Red sibling: rotate it above the parent so the new sibling is black.
                if self.storage[sibling].color.is_red() {
                    log::trace!("delete fixup: red sibling {:?}", sibling);
                    self.storage[sibling].color = Color::Black;
                    self.storage[p].color = Color::Red;
                    self.rotate_left(p);
                    sibling = self.storage[p].right.expect("Double black node must have a sibling");
                }

                let (near, far) = (self.storage[sibling].left, self.storage[sibling].right);

                // Black sibling with two black children: push the extra black up.
                if self.storage.is_black(near) && self.storage.is_black(far) {
                    self.storage[sibling].color = Color::Red;
                    node = Some(p);
                    parent = self.storage[p].parent;
                    continue;
                }

                // Black sibling with a black outer child: rotate the red inner child outward.
                if self.storage.is_black(far) {
                    self.storage.set_color(near, Color::Black);
                    self.storage[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self.storage[p].right.expect("Double black node must have a sibling");
                }

                // Black sibling with a red outer child: rotate around the parent and stop.
                let parent_color = self.storage[p].color;
                self.storage[sibling].color = parent_color;
                self.storage[p].color = Color::Black;
                let far = self.storage[sibling].right;
                self.storage.set_color(far, Color::Black);
                self.rotate_left(p);
            }
            // Node is right child of its parent
            else {
                let mut sibling = self.storage[p].left.expect("Double black node must have a sibling");

                if self.storage[sibling].color.is_red() {
                    log::trace!("delete fixup: red sibling {:?}", sibling);
                    self.storage[sibling].color = Color::Black;
                    self.storage[p].color = Color::Red;
                    self.rotate_right(p);
                    sibling = self.storage[p].left.expect("Double black node must have a sibling");
                }

                let (near, far) = (self.storage[sibling].right, self.storage[sibling].left);

                if self.storage.is_black(near) && self.storage.is_black(far) {
                    self.storage[sibling].color = Color::Red;
                    node = Some(p);
                    parent = self.storage[p].parent;
                    continue;
                }

                if self.storage.is_black(far) {
                    self.storage.set_color(near, Color::Black);
                    self.storage[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    sibling = self.storage[p].left.expect("Double black node must have a sibling");
                }

                let parent_color = self.storage[p].color;
                self.storage[sibling].color = parent_color;
                self.storage[p].color = Color::Black;
                let far = self.storage[sibling].left;
                self.storage.set_color(far, Color::Black);
                self.rotate_right(p);
            }

            node = self.root;
            parent = None;
        }

        self.storage.set_color(node, Color::Black);
    }
}

impl<K> Rbt<K>
where
    K: Ord,
{
    /// Adds a key into the tree, returning the handle of its node.
    ///
    /// Duplicates are allowed and are placed to the right of an equal key.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn insert(&mut self, key: K) -> NodeId {
        let mut parent = None;
        let mut current = self.root;
        let mut is_left_child = false;

        while let Some(id) = current {
            parent = Some(id);
            let node = &self.storage[id];
            is_left_child = key < node.key;
            current = if is_left_child { node.left } else { node.right };
        }

        let mut node = Node::new(key);
        node.parent = parent;
        let id = self.storage.add(node);

        match parent {
            None => self.root = Some(id),
            Some(parent) if is_left_child => self.storage[parent].left = Some(id),
            Some(parent) => self.storage[parent].right = Some(id),
        }

        self.insert_fixup(id);
        id
    }

    /// Adds many keys into the tree, returning the handle of the last one added.
    ///
    /// # Time Complexity
    ///
    /// O(m log n), where m is the number of keys to add.
    ///
    pub fn insert_many<I>(&mut self, keys: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = K>,
    {
        let keys = keys.into_iter();
        self.reserve(keys.size_hint().0);
        keys.fold(None, |_, key| Some(self.insert(key)))
    }

    /// Searches for `key` in the subtree at `start`, or in the whole tree if `start` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [NotFound](Error::NotFound) if no node holds the key or `start` is stale.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn search(&self, start: Option<NodeId>, key: &K) -> Result<NodeId> {
        if let Some(id) = start {
            if !self.storage.contains(id) {
                return Err(Error::NotFound);
            }
        }

        let mut current = self.start_node(start);
        while let Some(id) = current {
            let node = &self.storage[id];
            match key.cmp(&node.key) {
                Ordering::Equal => return Ok(id),
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
            }
        }
        Err(Error::NotFound)
    }

    /// Searches for a key in the tree, returning it if it exists.
    pub fn get(&self, key: &K) -> Option<&K> {
        self.search(None, key).ok().map(|id| &self.storage[id].key)
    }

    /// Indicates whether a key is in the tree.
    pub fn contains(&self, key: &K) -> bool {
        self.search(None, key).is_ok()
    }

    /// Deletes a node holding `key`, returning the stored key.
    ///
    /// # Errors
    ///
    /// Returns [NotFound](Error::NotFound) if the key is not in the tree.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn delete_key(&mut self, key: &K) -> Result<K> {
        let id = self.search(None, key)?;
        self.delete(id).ok_or(Error::NotFound)
    }
}

impl<K> Rbt<K>
where
    K: Clone,
{
    #[cfg(feature = "alloc")]
    /// Returns every key in ascending order.
    pub fn ordered_keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        self.in_order(None, |_, key| keys.push(key.clone()));
        keys
    }
}

impl<K> Default for Rbt<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> core::fmt::Debug for Rbt<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rbt")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("height", &self.height())
            .finish()
    }
}
