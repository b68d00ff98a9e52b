//! Control element notifications
//!
//! Broadcast on the form's [`EventChannel`](cform_core::EventChannel).
//! Each notification keeps the wire name the rest of a conversational form
//! listens for, available through [`ControlElementEvent::name`].

use crate::control_element::{ControlElement, ControlElementVector};

/// Wire names of control element notifications
pub mod event_names {
    /// The user finalized a control as their answer
    pub const SUBMIT_VALUE: &str = "cf-basic-element-submit";
    /// Busy/ready progress of a control
    pub const PROGRESS_CHANGE: &str = "cf-basic-element-progress";
    /// A control received focus
    pub const ON_FOCUS: &str = "cf-basic-element-on-focus";
}

/// Progress states carried by `PROGRESS_CHANGE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgressState {
    Busy,
    Ready,
}

impl ProgressState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressState::Busy => "cf-control-element-progress-BUSY",
            ProgressState::Ready => "cf-control-element-progress-READY",
        }
    }
}

/// Notification emitted by control elements
#[derive(Clone, Debug)]
pub enum ControlElementEvent {
    /// `on_choose` was called; carries the chosen element
    SubmitValue(ControlElement),
    /// Reserved for busy/ready signalling owned by other components
    ProgressChange(ProgressState),
    /// The element's node took focus; carries the last measured geometry,
    /// `None` if `rect` was never read
    OnFocus(Option<ControlElementVector>),
}

impl ControlElementEvent {
    /// Wire name of this notification
    pub fn name(&self) -> &'static str {
        match self {
            ControlElementEvent::SubmitValue(_) => event_names::SUBMIT_VALUE,
            ControlElementEvent::ProgressChange(_) => event_names::PROGRESS_CHANGE,
            ControlElementEvent::OnFocus(_) => event_names::ON_FOCUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            ControlElementEvent::ProgressChange(ProgressState::Busy).name(),
            "cf-basic-element-progress"
        );
        assert_eq!(
            ControlElementEvent::OnFocus(None).name(),
            "cf-basic-element-on-focus"
        );
        assert_eq!(
            ProgressState::Ready.as_str(),
            "cf-control-element-progress-READY"
        );
    }
}
