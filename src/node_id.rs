// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::num::NonZeroUsize;

/// Ephemeral node identifier.
///
/// Unique among all nodes that have ever been created within a single
/// [`ModelTree`](crate::ModelTree). Identifiers of different trees may
/// collide and must never be mixed or stored permanently!
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// Generator of unique node identifiers, owned by a single tree.
///
/// The first identifier is always reserved for the root node.
///
/// ```
/// # use industry_model_tree::IdAllocator;
/// let mut ids = IdAllocator::default();
/// let root_id = ids.next_id();
/// let child_id = ids.next_id();
/// assert_ne!(root_id, child_id);
/// assert!(root_id < child_id);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last_value: usize,
}

impl IdAllocator {
    /// Allocate the next identifier.
    ///
    /// Only the first [`usize::MAX`] identifiers are guaranteed to be unique.
    pub fn next_id(&mut self) -> NodeId {
        loop {
            self.last_value = self.last_value.wrapping_add(1);
            if let Some(next_value) = NonZeroUsize::new(self.last_value) {
                return NodeId(next_value);
            }
            // Looping happens only on overflow and at most once.
        }
    }

    /// The number of identifiers that have been handed out so far.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.last_value
    }
}
