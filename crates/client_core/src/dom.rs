//! Retained element tree that the roster view is rendered into.
//!
//! Nodes live in a generational arena: a [`NodeId`] held across a rebuild
//! goes stale instead of aliasing whatever element reuses its slot, so late
//! handlers (a busy control restored after a refresh) degrade to no-ops.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    Id(String),
}

impl Selector {
    /// `.name` selects by class, `#name` by id, anything else by tag.
    pub fn parse(raw: &str) -> Self {
        if let Some(class) = raw.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else if let Some(id) = raw.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else {
            Selector::Tag(raw.to_ascii_lowercase())
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Tag(tag) => element.tag == *tag,
            Selector::Class(class) => element.has_class(class),
            Selector::Id(id) => element.id.as_deref() == Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    attrs: BTreeMap<String, String>,
    dataset: BTreeMap<String, String>,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Replaces the whole class list, like assigning `className`.
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes = class_name.split_whitespace().map(str::to_string).collect();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn dataset(&self) -> &BTreeMap<String, String> {
        &self.dataset
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.dataset.insert(key.into(), value.into());
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        doc.root = doc.create_element("body");
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let element = Element::new(tag);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.element = Some(element);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                element: Some(element),
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Returns false when either handle is stale or
    /// the move would make a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        self.detach(child);
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.get_mut(parent) {
            element.children.push(child);
        }
        true
    }

    /// Creates an element and appends it to `parent` in one step.
    pub fn append_new(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    /// Drops every descendant of `node`; their handles become stale.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.get_mut(node) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        for child in children {
            self.release(child);
        }
    }

    /// Detaches `node` from its parent and drops its whole subtree.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if !self.contains(node) || node == self.root {
            return false;
        }
        self.detach(node);
        self.release(node);
        true
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, node)
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let selector = Selector::Id(id.to_string());
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.matches(*node, &selector))
    }

    /// Walks from `node` up through its ancestors and returns the first match.
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            let element = self.get(current)?;
            if selector.matches(element) {
                return Some(current);
            }
            cursor = element.parent;
        }
        None
    }

    /// Descendants of `root` (excluding `root`) matching `selector`, in document order.
    pub fn find_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.matches(*node, selector))
            .collect()
    }

    pub fn find_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.find_all(root, selector).into_iter().next()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Indented one-line-per-element rendering of the subtree under `node`.
    pub fn outline(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_outline(node, 0, &mut out);
        out
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.get(node).is_some_and(|element| selector.matches(element))
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.get(root) {
            Some(element) => element.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(node) = stack.pop() {
            if let Some(element) = self.get(node) {
                out.push(node);
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.get_mut(node).and_then(|element| element.parent.take()) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != node);
        }
    }

    fn release(&mut self, node: NodeId) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(element) = slot.element.take() {
                pending.extend(element.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        out.push_str(&element.text);
        for child in &element.children {
            self.collect_text(*child, out);
        }
    }

    fn write_outline(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        let _ = write!(out, "{}<{}", "  ".repeat(depth), element.tag);
        if let Some(id) = &element.id {
            let _ = write!(out, " #{id}");
        }
        for class in &element.classes {
            let _ = write!(out, " .{class}");
        }
        for (key, value) in &element.dataset {
            let _ = write!(out, " data-{key}={value:?}");
        }
        if element.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        if !element.text.is_empty() {
            let _ = write!(out, " {}", element.text);
        }
        out.push('\n');
        for child in &element.children {
            self.write_outline(*child, depth + 1, out);
        }
    }
}

/// Handle to the one document every component mutates.
///
/// Locks are only taken for synchronous tree edits and are never held across
/// an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument(Arc<Mutex<Document>>);

impl SharedDocument {
    pub fn new(doc: Document) -> Self {
        Self(Arc::new(Mutex::new(doc)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/dom_tests.rs"]
mod tests;
