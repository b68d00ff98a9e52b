//! Headless element node
//!
//! [`ElementNode`] is the node a widget renders into: a tag name, an id, a
//! class list, markup content, a tab index, computed style values and the
//! layout metrics reported by the host. It also keeps focus listeners the
//! way a document node does, including removal by callback identity.
//!
//! Nodes are shared, single-threaded handles. Layout reads
//! ([`ElementNode::offset_width`], [`ElementNode::offset_left`],
//! [`ElementNode::computed_style`]) are counted, because on a real host each
//! of them forces a synchronous style/layout pass.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::text;

/// Kinds of node events widgets listen for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeEventKind {
    Focus,
}

/// Event delivered to node listeners
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeEvent {
    pub kind: NodeEventKind,
}

impl NodeEvent {
    pub fn new(kind: NodeEventKind) -> Self {
        Self { kind }
    }
}

/// Node event listener
///
/// Uses Rc since UI is single-threaded. Listeners are identified by the
/// allocation they point to, so removal needs the same `Rc`.
pub type NodeListener = Rc<dyn Fn(&NodeEvent)>;

/// Layout metrics reported by the host for a node
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutMetrics {
    /// Rendered width including padding and border
    pub offset_width: f32,
    /// Distance from the offset parent's left edge
    pub offset_left: f32,
}

struct NodeInner {
    tag_name: String,
    id: Option<String>,
    classes: SmallVec<[String; 6]>,
    inner_html: String,
    tab_index: i32,
    style: FxHashMap<String, String>,
    metrics: LayoutMetrics,
    layout_queries: usize,
    listeners: Vec<(NodeEventKind, NodeListener)>,
    connected: bool,
}

/// Shared handle to a headless element node
#[derive(Clone)]
pub struct ElementNode {
    inner: Rc<RefCell<NodeInner>>,
}

fn same_listener(a: &NodeListener, b: &NodeListener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl ElementNode {
    /// Create a connected node with the given tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(NodeInner {
                tag_name: tag_name.into(),
                id: None,
                classes: SmallVec::new(),
                inner_html: String::new(),
                tab_index: -1,
                style: FxHashMap::default(),
                metrics: LayoutMetrics::default(),
                layout_queries: 0,
                listeners: Vec::new(),
                connected: true,
            })),
        }
    }

    pub fn tag_name(&self) -> String {
        self.inner.borrow().tag_name.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.inner.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.inner.borrow_mut().id = Some(id.into());
    }

    // =========================================================================
    // Class list
    // =========================================================================

    /// Add a class; no-op if present
    pub fn add_class(&self, class: &str) {
        let mut inner = self.inner.borrow_mut();
        if !inner.classes.iter().any(|c| c == class) {
            inner.classes.push(class.to_string());
        }
    }

    /// Remove a class; no-op if absent
    pub fn remove_class(&self, class: &str) {
        self.inner.borrow_mut().classes.retain(|c| c.as_str() != class);
    }

    /// Add or remove a class
    pub fn toggle_class(&self, class: &str, present: bool) {
        if present {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    /// Classes in insertion order
    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.to_vec()
    }

    // =========================================================================
    // Content and focus order
    // =========================================================================

    pub fn set_inner_html(&self, markup: impl Into<String>) {
        self.inner.borrow_mut().inner_html = markup.into();
    }

    /// Visible text of the node's content
    pub fn inner_text(&self) -> String {
        text::inner_text(&self.inner.borrow().inner_html)
    }

    pub fn set_tab_index(&self, index: i32) {
        self.inner.borrow_mut().tab_index = index;
    }

    pub fn tab_index(&self) -> i32 {
        self.inner.borrow().tab_index
    }

    // =========================================================================
    // Style and layout
    // =========================================================================

    /// Set a resolved style property, as the host's style pass would
    pub fn set_style_property(&self, property: &str, value: impl Into<String>) {
        self.inner
            .borrow_mut()
            .style
            .insert(property.to_string(), value.into());
    }

    /// Report layout metrics, as the host's layout pass would
    pub fn set_layout_metrics(&self, metrics: LayoutMetrics) {
        self.inner.borrow_mut().metrics = metrics;
    }

    /// Read a computed style property (forces layout)
    pub fn computed_style(&self, property: &str) -> Option<String> {
        let mut inner = self.inner.borrow_mut();
        inner.layout_queries += 1;
        inner.style.get(property).cloned()
    }

    /// Rendered width (forces layout)
    pub fn offset_width(&self) -> f32 {
        let mut inner = self.inner.borrow_mut();
        inner.layout_queries += 1;
        inner.metrics.offset_width
    }

    /// Left offset (forces layout)
    pub fn offset_left(&self) -> f32 {
        let mut inner = self.inner.borrow_mut();
        inner.layout_queries += 1;
        inner.metrics.offset_left
    }

    /// Number of layout-forcing reads performed on this node
    pub fn layout_query_count(&self) -> usize {
        self.inner.borrow().layout_queries
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a listener
    ///
    /// Registering the same `Rc` twice for the same kind is a no-op and
    /// returns `false`.
    pub fn add_event_listener(&self, kind: NodeEventKind, listener: NodeListener) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner
            .listeners
            .iter()
            .any(|(k, l)| *k == kind && same_listener(l, &listener))
        {
            return false;
        }
        inner.listeners.push((kind, listener));
        true
    }

    /// Remove a listener by identity
    ///
    /// Returns `false` if it was not registered.
    pub fn remove_event_listener(&self, kind: NodeEventKind, listener: &NodeListener) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner
            .listeners
            .retain(|(k, l)| !(*k == kind && same_listener(l, listener)));
        inner.listeners.len() != before
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: NodeEventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Deliver an event to the listeners registered for its kind
    ///
    /// Listeners are snapshotted first, so they may add or remove listeners.
    pub fn dispatch_event(&self, event: &NodeEvent) {
        let snapshot: SmallVec<[NodeListener; 2]> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(k, _)| *k == event.kind)
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in snapshot {
            listener(event);
        }
    }

    /// Move focus to the node
    ///
    /// Detached nodes cannot take focus.
    pub fn focus(&self) {
        if self.is_connected() {
            self.dispatch_event(&NodeEvent::new(NodeEventKind::Focus));
        }
    }

    // =========================================================================
    // Tree membership
    // =========================================================================

    pub fn is_connected(&self) -> bool {
        self.inner.borrow().connected
    }

    /// Detach the node from its document
    ///
    /// Listeners stay registered, as on a detached document node.
    pub fn detach(&self) {
        self.inner.borrow_mut().connected = false;
    }
}

impl fmt::Debug for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ElementNode")
            .field("tag_name", &inner.tag_name)
            .field("id", &inner.id)
            .field("classes", &inner.classes)
            .field("connected", &inner.connected)
            .finish()
    }
}
