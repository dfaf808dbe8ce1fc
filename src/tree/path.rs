//! Absolute structural paths from a document root to a node

use super::node::Document;
use crate::domain::ID_ATTRIBUTE;
use crate::types::NodeId;
use std::fmt;

/// How one step picks its node among the parent's `tag` children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepSelector {
    /// `[@ID='…']`; stable even when local siblings are missing.
    Id(String),
    /// `[n]`, 1-based among same-tag siblings held locally.
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub tag: String,
    pub selector: StepSelector,
}

/// Rooted path rendered in XPath form, e.g. `/CAEXFile[1]/InstanceHierarchy[2]/InternalElement[@ID='r1']`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuralPath {
    pub steps: Vec<PathStep>,
}

impl StructuralPath {
    /// Compute the path from the document root to `id`.
    ///
    /// Non-root nodes carrying an `ID` are addressed by it; the rest by position.
    /// Returns `None` when `id` is not part of the document.
    pub fn to_node(doc: &Document, id: NodeId) -> Option<Self> {
        let mut steps = Vec::new();
        let mut current = id;
        loop {
            let node = doc.node(current)?;
            let identity = node.attribute(ID_ATTRIBUTE).filter(|value| !value.is_empty());
            let selector = match (node.parent, identity) {
                (Some(_), Some(value)) => StepSelector::Id(value.to_string()),
                (Some(parent), None) => StepSelector::Position(
                    doc.children(parent)
                        .iter()
                        .take_while(|sibling| **sibling != current)
                        .filter(|sibling| doc.tag(**sibling) == Some(node.tag.as_str()))
                        .count()
                        + 1,
                ),
                (None, _) => StepSelector::Position(1),
            };
            steps.push(PathStep {
                tag: node.tag.clone(),
                selector,
            });
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        steps.reverse();
        Some(StructuralPath { steps })
    }
}

impl fmt::Display for StepSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSelector::Id(value) => write!(f, "[@{}='{}']", ID_ATTRIBUTE, value.replace('\'', "''")),
            StepSelector::Position(position) => write!(f, "[{}]", position),
        }
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}{}", step.tag, step.selector)?;
        }
        Ok(())
    }
}
