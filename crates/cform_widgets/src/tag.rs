//! Reference tags
//!
//! A reference tag is the logical form field a widget answers. Widgets only
//! hold a shared reference to it; the form model owns and mutates it.

use std::fmt;
use std::rc::Rc;

/// Logical form field bound to a widget
pub trait FormTag: fmt::Debug {
    /// Field name, as submitted with the form
    fn name(&self) -> &str;
}

/// Shared reference to a form tag
pub type TagRef = Rc<dyn FormTag>;

/// Check whether two tag references point at the same tag
pub fn same_tag(a: &TagRef, b: &TagRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Plain form tag descriptor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Wrap into a shared reference
    pub fn into_ref(self) -> TagRef {
        Rc::new(self)
    }
}

impl FormTag for Tag {
    fn name(&self) -> &str {
        &self.name
    }
}
