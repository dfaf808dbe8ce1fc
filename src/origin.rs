//! Origin Registry
//!
//! Remembers which remote resource each locally held tree was loaded from.
//! Entries are keyed by [`TreeId`] only; the registry never holds a tree and
//! never tracks liveness. Callers untrack explicitly when they release a tree.

use crate::catalog::ResourceDescriptor;
use crate::types::TreeId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Association of one local tree with its remote resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginRecord {
    pub tree_id: TreeId,
    pub resource: ResourceDescriptor,
}

#[derive(Debug, Default)]
pub struct OriginRegistry {
    records: RwLock<HashMap<TreeId, ResourceDescriptor>>,
}

impl OriginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `tree` with `resource`, replacing any prior association.
    pub fn track(&self, tree: TreeId, resource: ResourceDescriptor) {
        self.records.write().insert(tree, resource);
    }

    pub fn lookup(&self, tree: TreeId) -> Option<ResourceDescriptor> {
        self.records.read().get(&tree).cloned()
    }

    pub fn record(&self, tree: TreeId) -> Option<OriginRecord> {
        self.lookup(tree).map(|resource| OriginRecord {
            tree_id: tree,
            resource,
        })
    }

    pub fn is_tracked(&self, tree: TreeId) -> bool {
        self.records.read().contains_key(&tree)
    }

    /// Remove the association for `tree`. Untracking an unknown tree is a no-op.
    pub fn untrack(&self, tree: TreeId) {
        self.records.write().remove(&tree);
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Whether any tracked tree originates from the given remote resource.
    pub fn is_resource_tracked(&self, store_name: &str, resource_name: &str) -> bool {
        self.records
            .read()
            .values()
            .any(|r| r.matches(store_name, resource_name))
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
