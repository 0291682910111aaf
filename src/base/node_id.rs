//! Node identifiers for tracking syntax nodes across edits.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(0);

/// A process-unique identifier for a constructed syntax node.
///
/// `NodeId` is a lightweight handle (just a u32). Every node construction,
/// including a clone, draws a fresh id, so two value-equal nodes built at
/// different times are still distinguishable:
/// - Conflicts can point at a precise site in one tree snapshot
/// - Edits can tell an original child from its replacement
/// - Comparisons and hashing stay O(1)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    /// Allocate the next unused id.
    #[inline]
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}
