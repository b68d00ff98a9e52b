//! Form Context - shared services for the widgets of one form
//!
//! The FormContext provides:
//! - The broadcast channel widgets publish notifications on
//! - The deferred task scheduler, advanced by the form flow via `tick`
//! - The flow illustrator used for diagnostic traces
//! - The form configuration (marker class names, tracing switch)
//!
//! Widgets take what they need from the context at construction and keep
//! their own handles, so the context can be shared by any number of widgets.

use std::fmt;
use std::rc::Rc;

use cform_core::channel::EventChannel;
use cform_core::config::FormConfig;
use cform_core::flow::{FlowIllustrator, TracingFlowIllustrator};
use cform_core::scheduler::{SchedulerHandle, TaskScheduler};

use crate::events::ControlElementEvent;

/// Channel carrying control element notifications
pub type ControlChannel = EventChannel<ControlElementEvent>;

/// Services shared by the widgets of one form
pub struct FormContext {
    config: FormConfig,
    channel: ControlChannel,
    scheduler: TaskScheduler,
    illustrator: Rc<dyn FlowIllustrator>,
}

impl Default for FormContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FormContext {
    /// Create a context with the default configuration
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Create a context from a configuration
    ///
    /// Flow illustration goes through `tracing` and is enabled by
    /// `illustrate_flow`.
    pub fn with_config(config: FormConfig) -> Self {
        let illustrator = Rc::new(TracingFlowIllustrator::new(config.illustrate_flow));
        Self {
            config,
            channel: EventChannel::new(),
            scheduler: TaskScheduler::new(),
            illustrator,
        }
    }

    /// Publish on an existing channel instead of a private one
    pub fn with_channel(mut self, channel: ControlChannel) -> Self {
        self.channel = channel;
        self
    }

    /// Replace the flow illustrator
    pub fn with_illustrator<I: FlowIllustrator + 'static>(mut self, illustrator: I) -> Self {
        self.illustrator = Rc::new(illustrator);
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The notification channel
    pub fn channel(&self) -> &ControlChannel {
        &self.channel
    }

    /// Weak handle to the deferred task scheduler
    pub fn scheduler(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn illustrator(&self) -> Rc<dyn FlowIllustrator> {
        Rc::clone(&self.illustrator)
    }

    /// Advance deferred work by one tick
    ///
    /// Returns the number of tasks that ran.
    pub fn tick(&self) -> usize {
        self.scheduler.tick()
    }

    /// Number of deferred tasks waiting to run
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }
}

impl fmt::Debug for FormContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormContext")
            .field("config", &self.config)
            .field("channel", &self.channel)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cform_core::markers::MarkerClasses;

    #[test]
    fn test_context_from_config() {
        let config = FormConfig::new().illustrate_flow(true).markers(MarkerClasses {
            hide: "cf-hide".to_string(),
            ..MarkerClasses::default()
        });
        let ctx = FormContext::with_config(config);

        assert!(ctx.config().illustrate_flow);
        assert_eq!(ctx.config().markers.hide, "cf-hide");
        assert_eq!(ctx.pending_tasks(), 0);
    }

    #[test]
    fn test_shared_channel() {
        let channel = ControlChannel::new();
        let ctx = FormContext::new().with_channel(channel.clone());
        assert!(ctx.channel().same_channel(&channel));
    }

    #[test]
    fn test_tick_drives_scheduler() {
        let ctx = FormContext::new();
        let handle = ctx.scheduler();
        handle.defer(|| {});

        assert_eq!(ctx.pending_tasks(), 1);
        assert_eq!(ctx.tick(), 1);
        assert_eq!(ctx.pending_tasks(), 0);
    }
}
