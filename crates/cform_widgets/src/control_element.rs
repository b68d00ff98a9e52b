//! Control element
//!
//! A control element is the interactive widget for one answerable input
//! (a button, a choice, ...) bound to a reference tag. It provides:
//! - Marker-driven presentation: visibility, highlight, entry/exit animation
//! - Geometry for horizontal layout (`rect`)
//! - A focus-to-notification bridge (`OnFocus`)
//! - A choose action that submits the element as the answer (`SubmitValue`)
//! - Teardown that leaves no listener or pending task behind
//!
//! # Example
//!
//! ```rust
//! use cform_widgets::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let ctx = FormContext::new();
//! let submitted = Rc::new(RefCell::new(Vec::new()));
//! let sink = submitted.clone();
//! ctx.channel().subscribe(move |event| {
//!     if let ControlElementEvent::SubmitValue(element) = event {
//!         sink.borrow_mut().push(element.value());
//!     }
//! });
//!
//! let options = ControlElementOptions::new(Tag::new("color").into_ref())
//!     .content("<span>Red</span>");
//! let button = ControlElement::new(&ctx, options).unwrap();
//!
//! button.on_choose();
//! assert_eq!(*submitted.borrow(), vec!["Red".to_string()]);
//!
//! button.dealloc();
//! ```
//!
//! # Animation states
//!
//! ```text
//!            animate_in()                 animate_in()
//!   Out ─────────────────► AnimatingIn ─────────────────► Retriggering
//!                              ▲                               │
//!                              └────────── next tick ──────────┘
//! ```
//!
//! Re-entering `AnimatingIn` needs the class to be absent for one frame,
//! otherwise the styling layer never restarts the animation. The re-add is
//! deferred to the next scheduler tick and at most one such task is ever
//! pending per element.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use cform_core::error::{FormError, Result};
use cform_core::flow::FlowIllustrator;
use cform_core::markers::{Marker, MarkerClasses, MarkerSet};
use cform_core::scheduler::{SchedulerHandle, TaskId};

use crate::context::{ControlChannel, FormContext};
use crate::element::{BasicElement, Element, ElementOptions};
use crate::events::{event_names, ControlElementEvent};
use crate::node::{ElementNode, NodeEvent, NodeEventKind, NodeListener};
use crate::tag::{same_tag, TagRef};
use crate::text;

/// Type name reported by [`ControlElement::control_type`]
pub const CONTROL_ELEMENT_TYPE: &str = "ControlElement";

/// Horizontal footprint of a control
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlElementVector {
    /// Offset width plus right margin
    pub width: f32,
    /// Offset from the left edge of the offset parent
    pub left: f32,
}

impl ControlElementVector {
    pub const ZERO: Self = Self {
        width: 0.0,
        left: 0.0,
    };
}

/// Entry/exit animation state, derived from markers and the pending task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// No animation marker
    Out,
    /// Entry animation marker present
    AnimatingIn,
    /// Entry marker removed, re-add pending on the next tick
    Retriggering,
    /// Exit animation marker present
    AnimatingOut,
}

/// Control element options
#[derive(Clone, Debug, Default)]
pub struct ControlElementOptions {
    /// Form field this control answers; required
    pub reference_tag: Option<TagRef>,
    /// Generic options forwarded to the base element
    pub element: ElementOptions,
}

impl ControlElementOptions {
    /// Options for a control bound to `tag`
    pub fn new(tag: TagRef) -> Self {
        Self {
            reference_tag: Some(tag),
            element: ElementOptions::default(),
        }
    }

    pub fn reference_tag(mut self, tag: TagRef) -> Self {
        self.reference_tag = Some(tag);
        self
    }

    /// Replace the generic element options
    pub fn element(mut self, element: ElementOptions) -> Self {
        self.element = element;
        self
    }

    pub fn tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.element = self.element.tag_name(tag_name);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.element = self.element.id(id);
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.element = self.element.class(class);
        self
    }

    pub fn content(mut self, markup: impl Into<String>) -> Self {
        self.element = self.element.content(markup);
        self
    }

    pub fn tab_index(mut self, index: i32) -> Self {
        self.element = self.element.tab_index(index);
        self
    }
}

struct ControlInner {
    base: BasicElement,
    reference_tag: TagRef,
    /// Single source of truth for presentation; the node's classes follow it
    markers: Cell<MarkerSet>,
    marker_classes: MarkerClasses,
    /// Geometry from the last visible `rect` read
    cached_geometry: Cell<Option<ControlElementVector>>,
    /// The exact callback registered on the node, until dealloc
    focus_callback: RefCell<Option<NodeListener>>,
    pending_retrigger: Cell<Option<TaskId>>,
    channel: ControlChannel,
    illustrator: Rc<dyn FlowIllustrator>,
    scheduler: SchedulerHandle,
}

/// Interactive widget bound to one reference tag
///
/// Cloning yields another handle to the same element; this is what
/// `SubmitValue` carries.
#[derive(Clone)]
pub struct ControlElement {
    inner: Rc<ControlInner>,
}

impl ControlElement {
    /// Create a control element
    ///
    /// Fails with [`FormError::Configuration`] when the reference tag is
    /// missing or the element options are malformed.
    pub fn new(ctx: &FormContext, options: ControlElementOptions) -> Result<Self> {
        let reference_tag = options
            .reference_tag
            .ok_or_else(|| FormError::configuration("control element requires a reference tag"))?;
        let base = BasicElement::new(&options.element)?;

        let element = Self {
            inner: Rc::new(ControlInner {
                base,
                reference_tag,
                markers: Cell::new(MarkerSet::empty()),
                marker_classes: ctx.config().markers.clone(),
                cached_geometry: Cell::new(None),
                focus_callback: RefCell::new(None),
                pending_retrigger: Cell::new(None),
                channel: ctx.channel().clone(),
                illustrator: ctx.illustrator(),
                scheduler: ctx.scheduler(),
            }),
        };

        element.project_markers();
        element.bind_focus_listener();

        tracing::debug!(
            tag = element.inner.reference_tag.name(),
            node = %element.node().tag_name(),
            "control element created"
        );
        Ok(element)
    }

    fn from_weak(weak: &Weak<ControlInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn bind_focus_listener(&self) {
        let weak = Rc::downgrade(&self.inner);
        let callback: NodeListener = Rc::new(move |_: &NodeEvent| {
            if let Some(element) = ControlElement::from_weak(&weak) {
                element.handle_focus();
            }
        });
        self.node()
            .add_event_listener(NodeEventKind::Focus, Rc::clone(&callback));
        *self.inner.focus_callback.borrow_mut() = Some(callback);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Type name of this control
    pub fn control_type(&self) -> &'static str {
        CONTROL_ELEMENT_TYPE
    }

    /// The form field this control answers
    pub fn reference_tag(&self) -> &TagRef {
        &self.inner.reference_tag
    }

    /// Visible text of the node
    pub fn value(&self) -> String {
        self.node().inner_text()
    }

    /// Horizontal footprint for layout
    ///
    /// Hidden elements report zero without touching layout. Otherwise every
    /// call reads the computed right margin and the offset metrics, each of
    /// which forces a synchronous layout pass on a real host, so call it
    /// sparingly. The result is kept for the next `OnFocus` notification.
    pub fn rect(&self) -> ControlElementVector {
        if !self.visible() {
            return ControlElementVector::ZERO;
        }

        let node = self.node();
        let margin_right = node
            .computed_style("margin-right")
            .as_deref()
            .and_then(text::parse_leading_int)
            .unwrap_or(0.0) as f32;

        let vector = ControlElementVector {
            width: node.offset_width() + margin_right,
            left: node.offset_left(),
        };
        self.inner.cached_geometry.set(Some(vector));
        vector
    }

    /// Geometry from the last visible `rect` read
    pub fn cached_rect(&self) -> Option<ControlElementVector> {
        self.inner.cached_geometry.get()
    }

    /// Forward the tab order to the node
    pub fn set_tab_index(&self, index: i32) {
        self.node().set_tab_index(index);
    }

    pub fn visible(&self) -> bool {
        !self.markers().contains(Marker::Hide)
    }

    /// Show or hide instantly; no animation is triggered
    pub fn set_visible(&self, visible: bool) {
        self.set_marker(Marker::Hide, !visible);
    }

    pub fn highlight(&self) -> bool {
        self.markers().contains(Marker::Highlight)
    }

    pub fn set_highlight(&self, highlight: bool) {
        self.set_marker(Marker::Highlight, highlight);
    }

    /// Current presentation markers
    pub fn markers(&self) -> MarkerSet {
        self.inner.markers.get()
    }

    pub fn animation_phase(&self) -> AnimationPhase {
        let markers = self.markers();
        if self.has_pending_retrigger() {
            AnimationPhase::Retriggering
        } else if markers.contains(Marker::AnimateIn) {
            AnimationPhase::AnimatingIn
        } else if markers.contains(Marker::AnimateOut) {
            AnimationPhase::AnimatingOut
        } else {
            AnimationPhase::Out
        }
    }

    pub fn has_pending_retrigger(&self) -> bool {
        self.inner
            .pending_retrigger
            .get()
            .is_some_and(|id| self.inner.scheduler.is_pending(id))
    }

    /// Check whether two handles refer to the same element
    pub fn same_element(&self, other: &ControlElement) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Check whether this element answers `tag`
    pub fn answers(&self, tag: &TagRef) -> bool {
        same_tag(&self.inner.reference_tag, tag)
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Start, or restart, the entry animation
    pub fn animate_in(&self) {
        self.cancel_retrigger();

        if !self.markers().contains(Marker::AnimateIn) {
            self.set_marker(Marker::AnimateIn, true);
            return;
        }

        self.set_marker(Marker::AnimateIn, false);

        let weak = Rc::downgrade(&self.inner);
        let task = self.inner.scheduler.defer(move || {
            if let Some(element) = ControlElement::from_weak(&weak) {
                element.inner.pending_retrigger.set(None);
                element.set_marker(Marker::AnimateIn, true);
                tracing::trace!(
                    tag = element.inner.reference_tag.name(),
                    "animate-in restarted"
                );
            }
        });

        match task {
            Some(id) => self.inner.pending_retrigger.set(Some(id)),
            None => {
                tracing::warn!(
                    tag = self.inner.reference_tag.name(),
                    "scheduler gone, restoring animate-in without a restart frame"
                );
                self.set_marker(Marker::AnimateIn, true);
            }
        }
    }

    /// Start the exit animation
    ///
    /// The marker stays until the owning controller clears it with
    /// [`ControlElement::clear_animate_out`].
    pub fn animate_out(&self) {
        self.set_marker(Marker::AnimateOut, true);
    }

    /// Remove the exit animation marker once the animation has finished
    pub fn clear_animate_out(&self) {
        self.set_marker(Marker::AnimateOut, false);
    }

    fn cancel_retrigger(&self) -> bool {
        match self.inner.pending_retrigger.take() {
            Some(id) => self.inner.scheduler.cancel(id),
            None => false,
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Submit this control as the user's answer
    ///
    /// Broadcasts `SubmitValue` carrying this element. Nothing else changes;
    /// hiding or destroying the element is up to the listener.
    pub fn on_choose(&self) {
        self.illustrate(event_names::SUBMIT_VALUE);
        tracing::debug!(
            tag = self.inner.reference_tag.name(),
            value = %self.value(),
            "control element chosen"
        );
        self.inner
            .channel
            .publish(&ControlElementEvent::SubmitValue(self.clone()));
    }

    fn handle_focus(&self) {
        self.illustrate(event_names::ON_FOCUS);
        self.inner
            .channel
            .publish(&ControlElementEvent::OnFocus(self.cached_rect()));
    }

    fn illustrate(&self, event: &str) {
        self.inner.illustrator.illustrate(
            CONTROL_ELEMENT_TYPE,
            event,
            &self.inner.reference_tag,
        );
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn set_marker(&self, marker: Marker, present: bool) {
        let mut markers = self.inner.markers.get();
        if markers.set(marker, present) {
            self.inner.markers.set(markers);
            self.project_markers();
        }
    }

    /// Write the marker set onto the node's class list
    fn project_markers(&self) {
        let node = self.node();
        for (class, present) in self.inner.marker_classes.project(self.markers()) {
            node.toggle_class(class, present);
        }
    }
}

impl Element for ControlElement {
    fn node(&self) -> &ElementNode {
        self.inner.base.node()
    }

    /// Remove the focus listener, cancel a pending animation restart and
    /// detach the node. Safe to call more than once.
    fn dealloc(&self) {
        let callback = self.inner.focus_callback.borrow_mut().take();
        if let Some(callback) = callback {
            self.node()
                .remove_event_listener(NodeEventKind::Focus, &callback);
        }

        if self.cancel_retrigger() {
            tracing::debug!(
                tag = self.inner.reference_tag.name(),
                "cancelled pending animate-in restart"
            );
        }

        if !self.inner.base.is_deallocated() {
            tracing::debug!(
                tag = self.inner.reference_tag.name(),
                "control element deallocated"
            );
        }
        self.inner.base.dealloc();
    }

    fn is_deallocated(&self) -> bool {
        self.inner.base.is_deallocated()
    }
}

impl fmt::Debug for ControlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlElement")
            .field("reference_tag", &self.inner.reference_tag.name())
            .field("markers", &self.markers())
            .field("deallocated", &self.is_deallocated())
            .finish()
    }
}
