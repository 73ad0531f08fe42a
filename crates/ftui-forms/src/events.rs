#![forbid(unsafe_code)]

//! Push-style broadcast channels for control notifications.
//!
//! Every control owns two [`EventEmitter`]s (`value_changes` and
//! `status_changes`). Subscribers receive every event emitted after they
//! subscribe, in emission order. There is no replay and no buffering.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    emission.
//! 3. Emission never holds a borrow while a callback runs, so callbacks may
//!    subscribe, unsubscribe, or mutate the emitting control.
//!
//! Callbacks are stored as `Weak` pointers; the strong side lives in the
//! `Subscription` guard. Dead entries are pruned lazily during emission.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

/// A multicast channel delivering `T` events to subscribers.
pub struct EventEmitter<T> {
    listeners: RefCell<Vec<Weak<Callback<T>>>>,
}

impl<T: 'static> EventEmitter<T> {
    /// Create an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Register `callback` for every future event.
    ///
    /// The callback stays registered while the returned guard is alive.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    /// Deliver `event` to every live subscriber.
    pub(crate) fn emit(&self, event: &T) {
        let live: Vec<Rc<Callback<T>>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(event);
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<T: 'static> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// RAII guard keeping a callback registered on an [`EventEmitter`].
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SubscriptionScope
// ---------------------------------------------------------------------------

/// Holds subscriptions for a logical owner (for example a UI binding).
///
/// Dropping the scope, or calling [`clear`](Self::clear), releases every
/// held subscription at once.
#[derive(Debug, Default)]
pub struct SubscriptionScope {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `emitter` within this scope.
    pub fn subscribe<T: 'static>(
        &mut self,
        emitter: &EventEmitter<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(emitter.subscribe(callback));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions; the scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}
