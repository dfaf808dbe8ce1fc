//! Local Trees
//!
//! Locally held AutomationML documents. A tree is either a full copy of a remote
//! resource or a header-only shell that grows as children are fetched on demand.

pub mod node;
pub mod parse;
pub mod path;
pub mod write;

pub use node::{Attributes, Document, Element, TreeNode};
pub use parse::{parse_document, parse_element};
pub use path::{PathStep, StepSelector, StructuralPath};

use crate::types::TreeId;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A document together with its identity and the lock that serializes merges.
///
/// The caller owns the tree; the origin registry only refers to it by [`TreeId`].
#[derive(Debug)]
pub struct LocalTree {
    id: TreeId,
    document: RwLock<Document>,
}

impl LocalTree {
    pub fn new(document: Document) -> Self {
        Self {
            id: TreeId::next(),
            document: RwLock::new(document),
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.document.read()
    }

    /// Exclusive access; held only for the duration of a structural insertion.
    pub fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.document.write()
    }
}
