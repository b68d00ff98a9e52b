//! Conversational Form Core Runtime
//!
//! Foundational primitives shared by the conversational-form widgets:
//!
//! - **Event Channel**: Injectable synchronous publish/subscribe broadcast
//! - **Task Scheduler**: Cooperative deferred tasks driven by explicit ticks
//! - **Markers**: Enum-backed presentation flags projected onto class names
//! - **Flow Illustration**: Diagnostic sink for component interactions
//! - **Configuration**: TOML-backed form settings
//!
//! # Example
//!
//! ```rust
//! use cform_core::channel::EventChannel;
//! use cform_core::scheduler::TaskScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let channel: EventChannel<u32> = EventChannel::new();
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! channel.subscribe(move |value| sink.set(*value));
//!
//! let scheduler = TaskScheduler::new();
//! let handle = scheduler.handle();
//! let deferred = channel.clone();
//! handle.defer(move || deferred.publish(&7));
//!
//! assert_eq!(seen.get(), 0);
//! scheduler.tick();
//! assert_eq!(seen.get(), 7);
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod flow;
pub mod markers;
pub mod scheduler;

pub use channel::{EventChannel, SubscriptionId};
pub use config::FormConfig;
pub use error::{FormError, Result};
pub use flow::{FlowIllustrator, NoopFlowIllustrator, TracingFlowIllustrator};
pub use markers::{Marker, MarkerClasses, MarkerSet};
pub use scheduler::{SchedulerHandle, TaskId, TaskScheduler};
