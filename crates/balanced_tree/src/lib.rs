//! A `no_std` [Red-Black Tree](Rbt) over any ordered key type.
//!
//! The tree owns its nodes in a growable arena and hands out [NodeId] handles to them. Handles stay valid until the
//! node they name is deleted; after that they are stale and every operation treats them as an absent node instead of
//! reading whatever now occupies the slot. Insertion, search and deletion are O(log n), guaranteed by keeping the
//! usual red-black properties after every mutation:
//!
//! 1. Every node is either red or black.
//! 2. The root is black.
//! 3. Every absent child counts as a black leaf.
//! 4. A red node has only black children.
//! 5. Every path from a node down to an absent child crosses the same number of black nodes.
//! 6. Left subtree keys are no greater than the node's key, right subtree keys are no less.
//!
//! [Rbt::check_invariants] verifies all of them and reports the first [Violation] it finds.
//!
//! The crate only needs `alloc` for the node arena. The `alloc` feature (on by default) adds the methods that hand
//! back owned collections, such as [Rbt::ordered_keys].
//!
//! ## Benchmarks
//!
//! The `benches` directory measures the tree with 4096 random keys of 32bit, 128bit, and 384bit sizes:
//!
//! - Insertion: Time to insert every key into an empty tree.
//! - Search: Time to search for every key in a filled tree once.
//! - Delete: Time to delete every key from a filled tree.
//!
//! ## Examples
//!
//! ```rust
//! use balanced_tree::{Color, Error, Rbt};
//!
//! let mut rbt: Rbt<u32> = Rbt::with_capacity(16);
//! for key in [15, 6, 18, 3, 7, 17, 20, 2, 4, 13, 9] {
//!     rbt.insert(key);
//! }
//! assert_eq!(rbt.len(), 11);
//! assert!(rbt.check_invariants().is_ok());
//!
//! let root = rbt.root().unwrap();
//! assert_eq!(rbt.key(root), Some(&15));
//! assert_eq!(rbt.color(root), Some(Color::Black));
//!
//! let thirteen = rbt.search(None, &13).unwrap();
//! let next = rbt.successor(thirteen).unwrap();
//! assert_eq!(rbt.key(next), Some(&15));
//!
//! assert_eq!(rbt.delete(thirteen), Some(13));
//! assert_eq!(rbt.search(None, &13), Err(Error::NotFound));
//! assert_eq!(rbt.successor(thirteen), Err(Error::NotFound));
//!
//! let mut keys = Vec::new();
//! rbt.in_order(None, |_, key| keys.push(*key));
//! assert_eq!(keys, [2, 3, 4, 6, 7, 9, 15, 17, 18, 20]);
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![no_std]
extern crate alloc;

mod inspect;
mod node;
mod rbt;
mod traversal;

pub use inspect::{Shape, Violation};
pub use node::{Color, NodeId};
pub use rbt::Rbt;

/// Public result type for the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Public error types for the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key or node was not found in the tree, or the node handle is stale.
    NotFound,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotFound => write!(f, "node not found"),
        }
    }
}
