//! Primitive host capabilities shared by the router, the resize watcher and
//! the orchestrator.

#[cfg(test)]
#[path = "platform_test.rs"]
mod platform_test;

use crate::resize::ViewportSize;

/// The on-screen element the engine draws into and receives input on.
pub trait Surface: 'static {
    /// A captured keyboard event that can be re-delivered to the surface.
    type Event: Clone + 'static;

    /// Give the surface keyboard focus.
    fn focus(&self);

    /// Whether the surface is currently the document's active element.
    fn is_active(&self) -> bool;

    /// Route further events for `pointer_id` to the surface, even once the
    /// pointer leaves its bounds.
    fn capture_pointer(&self, pointer_id: i32);

    /// Dispatch a previously captured event on the surface.
    fn dispatch(&self, event: &Self::Event);

    /// Set the backing-store dimensions.
    fn set_backing_size(&self, size: ViewportSize);
}

/// Runs work on a later turn of the host event loop.
pub trait Scheduler {
    /// Queue `task` to run after the current turn completes.
    fn defer(&self, task: Box<dyn FnOnce()>);
}

/// A live listener or observer registration.
///
/// Dropping the subscription (or calling [`Subscription::cancel`]) removes
/// the registration. The removal runs at most once.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the removal routine for a registration.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Remove the registration now.
    pub fn cancel(mut self) {
        self.run();
    }

    fn run(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// A group of subscriptions released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.items.push(subscription);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every registration, in the order they were added.
    pub fn release(self) {
        for subscription in self.items {
            subscription.cancel();
        }
    }
}
