//! Tree node types: detached elements and the document arena

use crate::types::NodeId;
use indexmap::IndexMap;

/// Attributes in document order
pub type Attributes = IndexMap<String, String>;

/// Detached, owned XML element
///
/// Produced by parsing a query response; promoted into a [`Document`] when merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The CAEX `Name` attribute, when present.
    pub fn object_name(&self) -> Option<&str> {
        self.attribute("Name")
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// TreeNode: one element held inside a [`Document`]
///
/// `parent` is an index back into the owning arena and never keeps anything alive.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub tag: String,
    pub attributes: Attributes,
    pub text: Option<String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl TreeNode {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn object_name(&self) -> Option<&str> {
        self.attribute("Name")
    }
}

/// Arena-backed document tree
///
/// Nodes are only ever added, so a `NodeId` stays valid for the life of the document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl Document {
    /// Build a document whose root is the given element.
    pub fn from_element(root: Element) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: 0,
        };
        doc.root = doc.alloc(root, None);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Children of `id` with the given tag, in tree order.
    pub fn children_named(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.nodes[*c].tag == tag)
            .collect()
    }

    pub fn has_child_named(&self, id: NodeId, tag: &str) -> bool {
        self.children(id).iter().any(|c| self.nodes[*c].tag == tag)
    }

    /// Insert a detached element as the `index`-th child of `parent`.
    ///
    /// Returns `None` when `parent` is not part of this document. An index past the
    /// end appends.
    pub fn insert_subtree(&mut self, parent: NodeId, index: usize, element: Element) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.alloc(element, Some(parent));
        let children = &mut self.nodes[parent].children;
        let index = index.min(children.len());
        children.insert(index, id);
        Some(id)
    }

    /// Copy the subtree rooted at `id` out as a detached element.
    pub fn to_element(&self, id: NodeId) -> Option<Element> {
        let node = self.node(id)?;
        Some(Element {
            name: node.tag.clone(),
            attributes: node.attributes.clone(),
            text: node.text.clone(),
            children: node
                .children
                .iter()
                .filter_map(|c| self.to_element(*c))
                .collect(),
        })
    }

    fn alloc(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            tag: element.name,
            attributes: element.attributes,
            text: element.text,
            children: Vec::with_capacity(element.children.len()),
            parent,
        });
        for child in element.children {
            let child_id = self.alloc(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }
}
