//! Reconciler
//!
//! Merges freshly fetched elements into a local tree. Each element is promoted
//! to a [`CaexObject`] and handed to a [`StructuralInsert`], which may reject it.

use crate::domain::CaexObject;
use crate::schema::SchemaPolicy;
use crate::tree::{Document, Element};
use crate::types::NodeId;
use std::sync::Arc;
use tracing::debug;

/// Structural insertion of one object under a parent node.
pub trait StructuralInsert: Send + Sync {
    /// Insert `child` under `parent`; `false` when the insertion is rejected.
    fn insert(&self, doc: &mut Document, parent: NodeId, child: CaexObject) -> bool;
}

/// Inserter enforcing the CAEX content model order and sibling identity uniqueness.
pub struct CaexInserter {
    schema: Arc<dyn SchemaPolicy>,
}

impl CaexInserter {
    pub fn new(schema: Arc<dyn SchemaPolicy>) -> Self {
        Self { schema }
    }
}

impl StructuralInsert for CaexInserter {
    fn insert(&self, doc: &mut Document, parent: NodeId, child: CaexObject) -> bool {
        let Some(parent_tag) = doc.tag(parent).map(str::to_owned) else {
            return false;
        };
        let child_tag = child.kind.tag();
        let Some(rank) = self.schema.child_rank(&parent_tag, child_tag) else {
            return false;
        };

        if let (Some(key), Some(identity)) = (child.kind.identity_attribute(), child.identity()) {
            let duplicate = doc
                .children_named(parent, child_tag)
                .into_iter()
                .any(|sibling| doc.node(sibling).and_then(|n| n.attribute(key)) == Some(identity));
            if duplicate {
                debug!(tag = child_tag, identity, "Rejecting duplicate sibling");
                return false;
            }
        }

        // Before the first sibling that ranks after the new child.
        let index = doc
            .children(parent)
            .iter()
            .position(|sibling| {
                doc.tag(*sibling)
                    .and_then(|tag| self.schema.child_rank(&parent_tag, tag))
                    .map_or(false, |sibling_rank| sibling_rank > rank)
            })
            .unwrap_or(doc.children(parent).len());

        doc.insert_subtree(parent, index, child.into_element()).is_some()
    }
}

/// Result of merging a projected set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub rejected: usize,
}

impl MergeOutcome {
    /// A merge succeeds when at least one element was accepted.
    pub fn succeeded(&self) -> bool {
        self.inserted > 0
    }
}

/// Insert `elements` under `parent` in the given order.
///
/// Elements that are not CAEX objects count as rejected.
pub fn reconcile(
    inserter: &dyn StructuralInsert,
    doc: &mut Document,
    parent: NodeId,
    elements: &[Element],
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    for element in elements {
        let accepted = match CaexObject::wrap(element.clone()) {
            Some(object) => inserter.insert(doc, parent, object),
            None => false,
        };
        if accepted {
            outcome.inserted += 1;
        } else {
            outcome.rejected += 1;
        }
    }
    outcome
}
