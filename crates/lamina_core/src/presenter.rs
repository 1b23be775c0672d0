//! Presentation medium contract
//!
//! Views are layered over an external retained tree (a DOM, a native layer
//! tree, ...). That tree is the single source of truth for parent/child
//! structure: views never store their own parent or children, they ask the
//! presenter.
//!
//! [`MemoryPresenter`] is an in-memory retained tree used for headless runs
//! and tests.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

/// Identity of an element in the presentation tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Operations a presentation tree must support.
///
/// All methods are infallible; operations naming an unknown element, or an
/// element in the wrong position (e.g. inserting before a detached sibling),
/// are silently ignored.
pub trait Presenter {
    /// Create a new detached element
    fn create_element(&mut self) -> ElementId;

    /// True if the element exists (it may still be detached)
    fn contains(&self, element: ElementId) -> bool;

    /// Direct parent element, if attached
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Direct children in document order
    fn children(&self, element: ElementId) -> Vec<ElementId>;

    /// Append `child` as the last child of `parent`, moving it if needed
    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Insert `child` as the previous sibling of `reference`
    fn insert_before(&mut self, reference: ElementId, child: ElementId);

    /// Insert `child` as the next sibling of `reference`
    fn insert_after(&mut self, reference: ElementId, child: ElementId);

    /// Take the element out of the tree, keeping it (and its subtree) alive
    fn detach(&mut self, element: ElementId);

    /// Take the element out of the tree and destroy it with its subtree
    fn remove(&mut self, element: ElementId);

    /// Write a single style property
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);
}

#[derive(Debug, Default)]
struct ElementNode {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    styles: IndexMap<String, String>,
    classes: IndexSet<String>,
    style_writes: usize,
}

/// In-memory retained tree with a document root
#[derive(Debug)]
pub struct MemoryPresenter {
    elements: FxHashMap<ElementId, ElementNode>,
    document: ElementId,
    next: u64,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        let document = ElementId(1);
        let mut elements = FxHashMap::default();
        elements.insert(document, ElementNode::default());
        Self {
            elements,
            document,
            next: 2,
        }
    }

    /// The document root (never a view)
    pub fn document(&self) -> ElementId {
        self.document
    }

    /// Current value of a style property
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.elements
            .get(&element)
            .and_then(|node| node.styles.get(property))
            .map(String::as_str)
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|node| node.classes.contains(class))
    }

    /// Number of style writes the element has received
    pub fn style_writes(&self, element: ElementId) -> usize {
        self.elements
            .get(&element)
            .map_or(0, |node| node.style_writes)
    }

    /// Number of live elements, including the document root
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn unlink(&mut self, element: ElementId) {
        let Some(parent) = self.elements.get_mut(&element).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.retain(|c| *c != element);
        }
    }

    /// True if `ancestor` is `element` or one of its ancestors
    fn is_ancestor(&self, ancestor: ElementId, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn insert_at(&mut self, parent: ElementId, index: usize, child: ElementId) {
        if !self.elements.contains_key(&child) || self.is_ancestor(child, parent) {
            return;
        }
        self.unlink(child);
        let Some(parent_node) = self.elements.get_mut(&parent) else {
            return;
        };
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        if let Some(node) = self.elements.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn insert_relative(&mut self, reference: ElementId, child: ElementId, after: bool) {
        if reference == child {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        // Unlink first so the reference index accounts for a move within the
        // same parent.
        if self.is_ancestor(child, parent) {
            return;
        }
        self.unlink(child);
        let Some(index) = self
            .elements
            .get(&parent)
            .and_then(|p| p.children.iter().position(|c| *c == reference))
        else {
            return;
        };
        let index = if after { index + 1 } else { index };
        self.insert_at(parent, index, child);
    }
}

impl Default for MemoryPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for MemoryPresenter {
    fn create_element(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        self.elements.insert(id, ElementNode::default());
        id
    }

    fn contains(&self, element: ElementId) -> bool {
        self.elements.contains_key(&element)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(&element).and_then(|node| node.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.elements
            .get(&element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_at(parent, usize::MAX, child);
    }

    fn insert_before(&mut self, reference: ElementId, child: ElementId) {
        self.insert_relative(reference, child, false);
    }

    fn insert_after(&mut self, reference: ElementId, child: ElementId) {
        self.insert_relative(reference, child, true);
    }

    fn detach(&mut self, element: ElementId) {
        self.unlink(element);
    }

    fn remove(&mut self, element: ElementId) {
        if element == self.document {
            return;
        }
        self.unlink(element);
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.elements.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.elements.get_mut(&element) {
            node.styles.insert(property.to_string(), value.to_string());
            node.style_writes += 1;
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.elements.get_mut(&element) {
            node.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.elements.get_mut(&element) {
            node.classes.shift_remove(class);
        }
    }
}
