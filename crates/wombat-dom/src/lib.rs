//! DOM tree implementation for the Wombat document engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! A parent exclusively owns its children through its `children` list; the
//! child's `parent` field is a plain index back-reference, so the tree has no
//! ownership cycles while upward traversal stays O(1).
//!
//! Every node also carries its [`ComputedStyle`], filled in by the cascade.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Map of attribute names to values for an element.
///
/// Keys are lowercased by the parser, so lookups are effectively
/// case-insensitive.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    ///
    /// After parsing, this is the `html` element.
    pub const ROOT: Self = Self(0);
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Element or text payload.
    pub node_type: NodeType,

    /// Non-owning back-reference to the parent, `None` for the root and for
    /// nodes that have not been attached yet.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// Computed style, empty until the cascade runs.
    pub style: ComputedStyle,
}

/// The two node kinds the engine understands.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercased tag name.
    pub tag_name: String,
    /// Attribute list with lowercased keys.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attrs
            .get("class")
            .map(|classlist| classlist.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the element has `class` among its class names.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classlist| classlist.split_ascii_whitespace().any(|c| c == class))
    }
}

/// Computed style of a node: property name to string value.
///
/// Values are kept as the strings the stylesheet supplied (after `%`
/// font sizes have been resolved to `px`); consumers parse what they need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    /// Create an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Look up a property value, falling back to `default` when unset.
    #[must_use]
    pub fn get_or<'a>(&'a self, property: &str, default: &'a str) -> &'a str {
        self.get(property).unwrap_or(default)
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, property: &str, value: &str) {
        let _ = self
            .properties
            .insert(property.to_string(), value.to_string());
    }

    /// Whether the property has a value.
    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Number of properties set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over properties in name order (stable output for dumps).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

/// Arena-based DOM tree.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
///
/// Nodes can be allocated before they are attached: the HTML parser creates
/// an element when its start tag is seen but only attaches it to its parent
/// when the element is closed.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create an empty tree. The first allocated node becomes the root.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of allocated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            style: ComputedStyle::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent` and points the child's
    /// parent link back at `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the subtree rooted at the root in document (pre-)order.
    #[must_use]
    pub fn iter_all(&self) -> PreOrderIterator<'_> {
        let stack = if self.is_empty() {
            Vec::new()
        } else {
            vec![self.root()]
        };
        PreOrderIterator { tree: self, stack }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Whether the node is an element with the given tag name.
    #[must_use]
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.tag_name == tag)
    }

    /// Get the computed style of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &ComputedStyle {
        &self.nodes[id.0].style
    }

    /// Get the computed style of a node for modification.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    pub fn style_mut(&mut self, id: NodeId) -> &mut ComputedStyle {
        &mut self.nodes[id.0].style
    }

    /// Find the first element in document order whose `id` attribute equals
    /// `element_id`. Used to resolve `#fragment` navigation.
    #[must_use]
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.iter_all()
            .find(|&id| self.as_element(id).and_then(ElementData::id) == Some(element_id))
    }

    /// Concatenated text of all text descendants of `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => out.push_str(text),
            Some(NodeType::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the attached tree.
pub struct PreOrderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrderIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
