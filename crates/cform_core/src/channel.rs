//! Broadcast event channel
//!
//! A synchronous publish/subscribe medium shared by every widget of a form.
//! The channel is a cheap clonable handle: clones publish to, and subscribe
//! on, the same set of subscribers.
//!
//! Delivery is synchronous and in subscription order. Subscribers are
//! snapshotted before delivery, so a callback may subscribe or unsubscribe
//! (itself included) without affecting the publish in progress.
//!
//! # Example
//!
//! ```rust
//! use cform_core::channel::EventChannel;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let channel: EventChannel<&'static str> = EventChannel::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = log.clone();
//! let id = channel.subscribe(move |name| sink.borrow_mut().push(*name));
//!
//! channel.publish(&"cf-basic-element-submit");
//! channel.unsubscribe(id);
//! channel.publish(&"cf-basic-element-on-focus");
//!
//! assert_eq!(*log.borrow(), vec!["cf-basic-element-submit"]);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`EventChannel::subscribe`]
    pub struct SubscriptionId;
}

/// Subscriber callback
///
/// Uses Rc since delivery is single-threaded.
pub type Subscriber<E> = Rc<dyn Fn(&E)>;

struct ChannelInner<E> {
    ids: SlotMap<SubscriptionId, ()>,
    /// Subscribers in subscription order
    subscribers: Vec<(SubscriptionId, Subscriber<E>)>,
}

/// Injectable synchronous broadcast channel
pub struct EventChannel<E> {
    inner: Rc<RefCell<ChannelInner<E>>>,
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventChannel<E> {
    /// Create an empty channel
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                ids: SlotMap::with_key(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Subscribe to every event published on this channel
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + 'static,
    {
        let callback: Subscriber<E> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        let id = inner.ids.insert(());
        inner.subscribers.push((id, callback));
        id
    }

    /// Remove a subscriber
    ///
    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.ids.remove(id).is_none() {
            return false;
        }
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        true
    }

    /// Deliver an event to all current subscribers
    pub fn publish(&self, event: &E) {
        let snapshot: Vec<Subscriber<E>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Check whether two handles refer to the same channel
    pub fn same_channel(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.inner.borrow().subscribers.len())
            .finish()
    }
}
