//! Conversational Form Widgets
//!
//! Interactive controls for a conversational form, built headless on top of
//! `cform_core`.
//!
//! # Architecture
//!
//! 1. **Composition**: widgets own a [`BasicElement`] and expose its node
//!    through the [`Element`] capability trait.
//!
//! 2. **Marker State**: presentation flags live in an enum-backed set that
//!    is projected one way onto the node's class list.
//!
//! 3. **Broadcast Notifications**: widgets never call their owners; they
//!    publish [`ControlElementEvent`]s on the injected channel of a
//!    [`FormContext`].
//!
//! # Example
//!
//! ```rust
//! use cform_widgets::prelude::*;
//!
//! let ctx = FormContext::new();
//! let tag = Tag::new("color").into_ref();
//! let control = ControlElement::new(
//!     &ctx,
//!     ControlElementOptions::new(tag).content("Red"),
//! )
//! .unwrap();
//!
//! control.set_visible(false);
//! assert_eq!(control.rect(), ControlElementVector::ZERO);
//!
//! control.set_visible(true);
//! control.animate_in();
//! control.animate_in(); // restart: re-added on the next tick
//! ctx.tick();
//! assert_eq!(control.animation_phase(), AnimationPhase::AnimatingIn);
//!
//! control.dealloc();
//! ```

pub mod context;
pub mod control_element;
pub mod element;
pub mod events;
pub mod node;
pub mod tag;
pub mod text;

pub use context::{ControlChannel, FormContext};
pub use control_element::{
    AnimationPhase, ControlElement, ControlElementOptions, ControlElementVector,
    CONTROL_ELEMENT_TYPE,
};
pub use element::{BasicElement, Element, ElementOptions};
pub use events::{event_names, ControlElementEvent, ProgressState};
pub use node::{ElementNode, LayoutMetrics, NodeEvent, NodeEventKind, NodeListener};
pub use tag::{FormTag, Tag, TagRef};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::context::{ControlChannel, FormContext};
    pub use crate::control_element::{
        AnimationPhase, ControlElement, ControlElementOptions, ControlElementVector,
    };
    pub use crate::element::{Element, ElementOptions};
    pub use crate::events::{event_names, ControlElementEvent, ProgressState};
    pub use crate::node::{LayoutMetrics, NodeEventKind};
    pub use crate::tag::{FormTag, Tag, TagRef};
    pub use cform_core::{FormConfig, FormError};
}
