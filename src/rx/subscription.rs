//! Subscription handles and the bag that owns them.

use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send + 'static>;

/// Owned teardown for an active subscription.
///
/// Dropping the handle detaches from the source. Use [`Subscription::detach`]
/// for fire-and-forget pipelines that end on their own.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    teardown: Option<Teardown>,
}

impl Subscription {
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    /// Disarm the handle so dropping it no longer unsubscribes.
    pub fn detach(mut self) {
        self.teardown = None;
    }

    /// Hand ownership to a bag.
    pub fn disposed_by(self, bag: &SubscriptionBag) {
        bag.insert(self);
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("armed", &self.teardown.is_some())
            .finish()
    }
}

/// Owns a set of subscriptions and detaches all of them at once.
#[derive(Default)]
pub struct SubscriptionBag {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl SubscriptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions.lock().push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.lock().is_empty()
    }

    /// Detach every subscription. The bag can be reused afterwards.
    pub fn dispose(&self) {
        // Teardowns may re-enter the bag, so run them after releasing the lock.
        let drained = std::mem::take(&mut *self.subscriptions.lock());
        drop(drained);
    }
}

impl Drop for SubscriptionBag {
    fn drop(&mut self) {
        self.dispose();
    }
}
