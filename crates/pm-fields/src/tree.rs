//! In-memory markup tree.
//!
//! An arena of element and text nodes with explicit ordered children. Template
//! elements keep their content outside the live tree: content roots have no
//! parent, so id lookups and ancestor walks never cross into or out of it.
//! Detached subtrees are released immediately. Their slots are reused, and a
//! generation counter keeps stale ids from resolving to the new occupant.

use std::fmt;

use pm_ui_types::FieldRules;

use crate::error::TreeError;
use crate::host::FieldHost;

const VOID_TAGS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}.{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        /// `Some` only for `<template>`.
        content: Option<Vec<NodeId>>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    /// Template whose content this node is a root of.
    owner: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// Detached top-level nodes produced by instantiating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    roots: Vec<NodeId>,
}

impl Fragment {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }
}

#[derive(Debug, Clone)]
pub struct MemoryTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// An empty tree whose root is a `<body>` element.
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.create_element("body");
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            owner: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.data = Some(data);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    data: Some(data),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, TreeError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, TreeError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(TreeError::UnknownNode(id))
    }

    // ── Construction ──

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            content: None,
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_owned()))
    }

    pub fn create_template(&mut self) -> NodeId {
        self.alloc(NodeKind::Element {
            tag: "template".to_owned(),
            attributes: Vec::new(),
            content: Some(Vec::new()),
        })
    }

    /// Create an element with attributes in one call.
    pub fn element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        if let Ok(NodeData {
            kind: NodeKind::Element { attributes: attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            for (name, value) in attributes {
                attrs.push(((*name).to_owned(), (*value).to_owned()));
            }
        }
        id
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                    Some((_, v)) => *v = value.to_owned(),
                    None => attributes.push((name.to_owned(), value.to_owned())),
                }
                Ok(())
            }
            NodeKind::Text(_) => Err(TreeError::NotAnElement(id)),
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        match &self.node(parent)?.kind {
            NodeKind::Element { .. } => {}
            NodeKind::Text(_) => return Err(TreeError::NotAnElement(parent)),
        }
        if self.is_attached(child)? {
            return Err(TreeError::AlreadyAttached { child });
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Add a detached node to a template's inert content.
    pub fn append_to_template(&mut self, template: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.is_attached(child)? {
            return Err(TreeError::AlreadyAttached { child });
        }
        if self.is_inclusive_ancestor(child, template) {
            return Err(TreeError::Cycle {
                parent: template,
                child,
            });
        }
        match &mut self.node_mut(template)?.kind {
            NodeKind::Element {
                content: Some(content),
                ..
            } => content.push(child),
            _ => return Err(TreeError::NotATemplate(template)),
        }
        self.node_mut(child)?.owner = Some(template);
        Ok(())
    }

    fn is_attached(&self, id: NodeId) -> Result<bool, TreeError> {
        let node = self.node(id)?;
        Ok(node.parent.is_some() || node.owner.is_some())
    }

    // Crosses template boundaries, unlike every other walk.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node(id).ok().and_then(|n| n.parent.or(n.owner));
        }
        false
    }

    // ── Inspection ──

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of nodes not yet released.
    pub fn live_nodes(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }

    /// Top-level nodes of a template's content; empty for other nodes.
    pub fn template_content(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).map(|n| &n.kind) {
            Ok(NodeKind::Element {
                content: Some(items),
                ..
            }) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| self.tag(*c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    /// Inclusive preorder walk over live children (template content skipped).
    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.node(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    fn fields_under(&self, from: NodeId, rules: &FieldRules) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|n| self.tag(*n).is_some_and(|t| rules.is_field_tag(t)))
            .collect()
    }

    // ── Cloning and release ──

    fn deep_clone(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        let source = self.node(id)?.clone();
        let kind = match source.kind {
            NodeKind::Element {
                tag,
                attributes,
                content,
            } => {
                let content = match content {
                    Some(items) => Some(
                        items
                            .into_iter()
                            .map(|c| self.deep_clone(c))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    None => None,
                };
                NodeKind::Element {
                    tag,
                    attributes,
                    content,
                }
            }
            NodeKind::Text(t) => NodeKind::Text(t),
        };
        let copy = self.alloc(kind);
        let content_items = match &self.node(copy)?.kind {
            NodeKind::Element {
                content: Some(items),
                ..
            } => items.clone(),
            _ => Vec::new(),
        };
        for item in content_items {
            self.node_mut(item)?.owner = Some(copy);
        }
        for child in source.children {
            let child_copy = self.deep_clone(child)?;
            self.node_mut(child_copy)?.parent = Some(copy);
            self.node_mut(copy)?.children.push(child_copy);
        }
        Ok(copy)
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index) else { return };
        if slot.generation != id.generation {
            return;
        }
        let Some(node) = slot.data.take() else { return };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        for child in node.children {
            self.release(child);
        }
        if let NodeKind::Element {
            content: Some(items),
            ..
        } = node.kind
        {
            for item in items {
                self.release(item);
            }
        }
    }

    // ── Projection ──

    /// Serialize a node and its subtree as HTML.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serialize only the children of a node (a template's content).
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Ok(node) = self.node(id) {
            for child in self.rendered_children(node) {
                self.write_html(*child, &mut out);
            }
        }
        out
    }

    fn rendered_children<'a>(&self, node: &'a NodeData) -> &'a [NodeId] {
        match &node.kind {
            NodeKind::Element {
                content: Some(items),
                ..
            } => items,
            _ => &node.children,
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(t) => out.push_str(&escape(t, false)),
            NodeKind::Element { tag, attributes, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for child in self.rendered_children(node) {
                    self.write_html(*child, out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn escape(s: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
    out
}

impl FieldHost for MemoryTree {
    type Node = NodeId;
    type Fragment = Fragment;
    type Error = TreeError;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.get_element_by_id(id)
    }

    fn instantiate(&mut self, template: &NodeId) -> Result<Option<Fragment>, TreeError> {
        let items = match &self.node(*template)?.kind {
            NodeKind::Element {
                content: Some(items),
                ..
            } => items.clone(),
            _ => return Ok(None),
        };
        let roots = items
            .into_iter()
            .map(|item| self.deep_clone(item))
            .collect::<Result<Vec<_>, TreeError>>()?;
        Ok(Some(Fragment { roots }))
    }

    fn children(&self, container: &NodeId) -> Vec<NodeId> {
        self.element_children(*container)
    }

    fn fragment_fields(&self, fragment: &Fragment, rules: &FieldRules) -> Vec<NodeId> {
        fragment
            .roots
            .iter()
            .flat_map(|root| self.fields_under(*root, rules))
            .collect()
    }

    fn element_fields(&self, element: &NodeId, rules: &FieldRules) -> Vec<NodeId> {
        self.fields_under(*element, rules)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        self.set_attr(*node, name, value)
    }

    fn append(&mut self, container: &NodeId, fragment: Fragment) -> Result<(), TreeError> {
        for root in fragment.roots {
            self.append_child(*container, root)?;
        }
        Ok(())
    }

    fn closest_group(&self, node: &NodeId, rules: &FieldRules) -> Option<NodeId> {
        let mut cur = Some(*node);
        while let Some(id) = cur {
            if self.has_class(id, &rules.group_class) {
                return Some(id);
            }
            cur = self.parent_of(id);
        }
        None
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.parent_of(*node)
    }

    fn detach(&mut self, node: &NodeId) -> Result<(), TreeError> {
        let data = self.node(*node)?;
        match (data.parent, data.owner) {
            (Some(parent), _) => self.node_mut(parent)?.children.retain(|c| c != node),
            (None, Some(template)) => {
                if let NodeKind::Element {
                    content: Some(items),
                    ..
                } = &mut self.node_mut(template)?.kind
                {
                    items.retain(|c| c != node);
                }
            }
            (None, None) => return Ok(()),
        }
        self.release(*node);
        Ok(())
    }
}
