//! Balanced Tree - Nodes and Node Storage
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

/// The color of a node in a red-black tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    pub fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

/// A handle to a node owned by a tree.
///
/// Handles are plain indices into the tree's node storage, tagged with the generation of the slot they point at.
/// Deleting a node bumps the generation of its slot, so a handle kept across a delete is detectably stale and is
/// treated as an absent node by every operation that accepts one. Handles are only meaningful for the tree that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The position of the node in the tree's storage.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// A single key in the tree.
///
/// `left` and `right` are the owning edges of the tree. `parent` is a lookup-only back reference; it never decides
/// when a node is released.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    pub key: K,
    pub color: Color,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<K> Node<K> {
    /// Nodes always start out red and detached.
    pub fn new(key: K) -> Self {
        Node { key, color: Color::Red, parent: None, left: None, right: None }
    }
}

enum Slot<K> {
    Occupied(Node<K>),
    /// A released slot, linked into the free list.
    Vacant { next_free: Option<u32> },
}

struct Entry<K> {
    generation: u32,
    slot: Slot<K>,
}

/// A growable arena of nodes.
///
/// Deleting a node does not shrink the arena, the slot is pushed onto a free list and handed out again by the next
/// [add](Self::add).
pub(crate) struct Storage<K> {
    entries: Vec<Entry<K>>,
    /// Head of the linked list of vacant slots.
    available: Option<u32>,
    length: usize,
}

impl<K> Storage<K> {
    pub const fn new() -> Self {
        Storage { entries: Vec::new(), available: None, length: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Storage { entries: Vec::with_capacity(capacity), available: None, length: 0 }
    }

    /// Get the number of live nodes in the storage container.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Get the number of nodes the storage can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        let free = self.entries.len() - self.length;
        if additional > free {
            self.entries.reserve(additional - free);
            log::debug!("node storage reserved, capacity now {}", self.entries.capacity());
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    /// Add a new node to the storage container, returning its handle.
    ///
    /// # Time Complexity
    ///
    /// O(1) amortized
    ///
    pub fn add(&mut self, node: Node<K>) -> NodeId {
        self.length += 1;
        match self.available {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                self.available = match entry.slot {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => panic!("Free list points at an occupied slot."),
                };
                entry.slot = Slot::Occupied(node);
                log::debug!("node storage reused slot {}", index);
                NodeId { index, generation: entry.generation }
            }
            None => {
                let index = u32::try_from(self.entries.len()).expect("Node storage exceeds u32::MAX slots.");
                if self.entries.len() == self.entries.capacity() {
                    log::debug!("node storage growing past {} slots", self.entries.capacity());
                }
                self.entries.push(Entry { generation: 0, slot: Slot::Occupied(node) });
                NodeId { index, generation: 0 }
            }
        }
    }

    /// Release a node, returning it if the handle was live.
    ///
    /// # Time Complexity
    ///
    /// O(1)
    ///
    pub fn delete(&mut self, id: NodeId) -> Option<Node<K>> {
        if !self.contains(id) {
            return None;
        }
        let entry = &mut self.entries[id.index()];
        let slot = core::mem::replace(&mut entry.slot, Slot::Vacant { next_free: self.available });
        entry.generation = entry.generation.wrapping_add(1);
        self.available = Some(id.index);
        self.length -= 1;
        match slot {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Drops every node while keeping the allocation.
    ///
    /// Generations keep counting, so handles issued before the clear stay stale.
    pub fn clear(&mut self) {
        let mut available = None;
        for (index, entry) in self.entries.iter_mut().enumerate().rev() {
            if let Slot::Occupied(_) = entry.slot {
                entry.generation = entry.generation.wrapping_add(1);
            }
            entry.slot = Slot::Vacant { next_free: available };
            available = Some(index as u32);
        }
        self.available = available;
        self.length = 0;
    }

    /// Indicates whether the handle points at a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Gets a reference to a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node<K>> {
        match self.entries.get(id.index()) {
            Some(Entry { generation, slot: Slot::Occupied(node) }) if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    /// Gets a mutable reference to a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K>> {
        match self.entries.get_mut(id.index()) {
            Some(Entry { generation, slot: Slot::Occupied(node) }) if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    // Helpers below treat an absent node as a black nil leaf.

    pub fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self[id].color)
    }

    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color(id).is_red()
    }

    pub fn is_black(&self, id: Option<NodeId>) -> bool {
        self.color(id).is_black()
    }

    pub fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self[id].color = color;
        }
    }

    pub fn set_parent(&mut self, id: Option<NodeId>, parent: Option<NodeId>) {
        if let Some(id) = id {
            self[id].parent = parent;
        }
    }
}

impl<K> Default for Storage<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal access by handle. A stale handle here is a broken tree, not a caller error.
impl<K> Index<NodeId> for Storage<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        self.get(id).expect("Tree links point at a released node.")
    }
}

impl<K> IndexMut<NodeId> for Storage<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.get_mut(id).expect("Tree links point at a released node.")
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_storage() {
        let mut storage = Storage::<usize>::with_capacity(10);

        // Fill the storage
        let mut ids = Vec::new();
        for i in 0..10 {
            let id = storage.add(Node::new(i));
            assert_eq!(id.index(), i);
            assert_eq!(storage[id].key, i);
            assert_eq!(storage.len(), i + 1);
            ids.push(id);
        }

        // Delete a node and add a new one, make sure the new one is in the same spot
        let removed = storage.delete(ids[5]).unwrap();
        assert_eq!(removed.key, 5);
        assert_eq!(storage.len(), 9);
        let id = storage.add(Node::new(11));
        assert_eq!(id.index(), 5);
        assert_eq!(storage[id].key, 11);

        // Try and get a mutable reference to a node
        storage.get_mut(id).unwrap().key = 12;
        assert_eq!(storage.get(id).unwrap().key, 12);
    }

    #[test]
    fn test_stale_handle() {
        let mut storage = Storage::<i32>::new();
        let a = storage.add(Node::new(1));
        assert!(storage.contains(a));

        assert!(storage.delete(a).is_some());
        assert!(!storage.contains(a));
        assert!(storage.delete(a).is_none());
        assert_eq!(storage.len(), 0);

        // The slot is reused, but the old handle must not see the new node.
        let b = storage.add(Node::new(2));
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(storage.get(a).is_none());
        assert_eq!(storage.get(b).unwrap().key, 2);
    }

    #[test]
    fn test_free_list_order() {
        let mut storage = Storage::<i32>::new();
        let ids: Vec<_> = (0..4).map(|i| storage.add(Node::new(i))).collect();

        storage.delete(ids[1]);
        storage.delete(ids[3]);

        // Most recently released slot is handed out first.
        assert_eq!(storage.add(Node::new(10)).index(), 3);
        assert_eq!(storage.add(Node::new(11)).index(), 1);
        assert_eq!(storage.add(Node::new(12)).index(), 4);
    }

    #[test]
    fn test_clear() {
        let mut storage = Storage::<i32>::new();
        let ids: Vec<_> = (0..3).map(|i| storage.add(Node::new(i))).collect();
        storage.clear();

        assert_eq!(storage.len(), 0);
        assert!(ids.iter().all(|id| !storage.contains(*id)));

        let id = storage.add(Node::new(7));
        assert_eq!(id.index(), 0);
        assert!(!storage.contains(ids[0]));
    }

    #[test]
    fn test_absent_node_is_black() {
        let mut storage = Storage::<i32>::new();
        assert!(storage.is_black(None));
        assert!(!storage.is_red(None));

        // Recoloring or relinking nothing is a no-op.
        storage.set_color(None, Color::Red);
        storage.set_parent(None, None);

        let id = storage.add(Node::new(1));
        assert!(storage.is_red(Some(id)));
        storage.set_color(Some(id), Color::Black);
        assert!(storage.is_black(Some(id)));
    }

    #[test]
    #[should_panic = "Tree links point at a released node."]
    fn test_index_stale_panics() {
        let mut storage = Storage::<i32>::new();
        let id = storage.add(Node::new(1));
        storage.delete(id);
        let _ = &storage[id];
    }
}
