//! Base element
//!
//! [`BasicElement`] owns the node a widget renders into. It materializes the
//! node from [`ElementOptions`], applies the generic options (`set_data`) and
//! detaches the node on `dealloc`. Widgets compose a `BasicElement` and
//! expose it through the [`Element`] capability trait instead of inheriting
//! from it.

use std::cell::Cell;

use cform_core::error::{FormError, Result};

use crate::node::ElementNode;

/// Capability shared by everything that owns a node
pub trait Element {
    /// The node this element renders into
    fn node(&self) -> &ElementNode;

    /// Tear the element down; calling it again is a no-op
    fn dealloc(&self);

    /// Whether `dealloc` has run
    fn is_deallocated(&self) -> bool;
}

/// Generic element options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementOptions {
    /// Node tag name
    pub tag_name: String,
    /// Node id attribute
    pub id: Option<String>,
    /// Classes applied at creation, besides marker classes
    pub class_names: Vec<String>,
    /// Markup content
    pub content: String,
    /// Initial tab index
    pub tab_index: Option<i32>,
}

impl Default for ElementOptions {
    fn default() -> Self {
        Self {
            tag_name: "cf-button".to_string(),
            id: None,
            class_names: Vec::new(),
            content: String::new(),
            tab_index: None,
        }
    }
}

impl ElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class_names.push(class.into());
        self
    }

    pub fn content(mut self, markup: impl Into<String>) -> Self {
        self.content = markup.into();
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    /// Reject options no node could be built from
    pub fn validate(&self) -> Result<()> {
        let tag_name = self.tag_name.trim();
        if tag_name.is_empty() {
            return Err(FormError::configuration("element tag name is empty"));
        }
        if tag_name.chars().any(char::is_whitespace) {
            return Err(FormError::configuration(format!(
                "element tag name {:?} contains whitespace",
                self.tag_name
            )));
        }
        if let Some(class) = self
            .class_names
            .iter()
            .find(|c| c.is_empty() || c.chars().any(char::is_whitespace))
        {
            return Err(FormError::configuration(format!(
                "invalid class name {class:?}"
            )));
        }
        Ok(())
    }
}

/// Element that owns a node and applies generic options to it
#[derive(Debug)]
pub struct BasicElement {
    node: ElementNode,
    deallocated: Cell<bool>,
}

impl BasicElement {
    /// Materialize a node and apply `options`
    pub fn new(options: &ElementOptions) -> Result<Self> {
        options.validate()?;
        let element = Self {
            node: ElementNode::new(options.tag_name.trim()),
            deallocated: Cell::new(false),
        };
        element.set_data(options);
        Ok(element)
    }

    /// Apply generic options to the node
    pub fn set_data(&self, options: &ElementOptions) {
        if let Some(ref id) = options.id {
            self.node.set_id(id.clone());
        }
        for class in &options.class_names {
            self.node.add_class(class);
        }
        if !options.content.is_empty() {
            self.node.set_inner_html(options.content.clone());
        }
        if let Some(index) = options.tab_index {
            self.node.set_tab_index(index);
        }
    }
}

impl Element for BasicElement {
    fn node(&self) -> &ElementNode {
        &self.node
    }

    fn dealloc(&self) {
        if self.deallocated.replace(true) {
            return;
        }
        self.node.detach();
        tracing::trace!(tag_name = %self.node.tag_name(), "element node detached");
    }

    fn is_deallocated(&self) -> bool {
        self.deallocated.get()
    }
}
