//! Per-domain dispatch channels.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::rx::Subject;

use super::reducer::Reducer;

struct ChannelEntry {
    subject: Box<dyn Any + Send + Sync>,
    complete: Arc<dyn Fn() + Send + Sync>,
}

/// Broadcast path from actions to the store of each domain.
///
/// Each domain gets one publish subject, created on first use. Intents go to
/// whoever is subscribed at that moment; nothing is buffered, so an intent
/// dispatched while no store is registered is gone.
#[derive(Clone, Default)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

#[derive(Default)]
struct DispatcherInner {
    channels: Mutex<HashMap<TypeId, ChannelEntry>>,
    closed: AtomicBool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The channel for domain `R`.
    pub fn channel<R: Reducer>(&self) -> Subject<R::Intent> {
        let mut channels = self.inner.channels.lock();
        let entry = channels.entry(TypeId::of::<R>()).or_insert_with(|| {
            let subject = Subject::<R::Intent>::new();
            let completer = subject.clone();
            ChannelEntry {
                subject: Box::new(subject),
                complete: Arc::new(move || completer.on_completed()),
            }
        });
        match entry.subject.downcast_ref::<Subject<R::Intent>>() {
            Some(subject) => subject.clone(),
            // Entries are keyed by the reducer's TypeId, which fixes the intent type.
            None => unreachable!("dispatch channel type mismatch for {}", R::DOMAIN),
        }
    }

    pub fn dispatch<R: Reducer>(&self, intent: R::Intent) {
        if self.is_closed() {
            tracing::error!(domain = R::DOMAIN, ?intent, "dispatch after shutdown, intent dropped");
            return;
        }
        tracing::trace!(domain = R::DOMAIN, ?intent, "dispatch");
        self.channel::<R>().on_next(intent);
    }

    /// Complete every channel. Later dispatches are dropped.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let completers: Vec<Arc<dyn Fn() + Send + Sync>> = self
            .inner
            .channels
            .lock()
            .values()
            .map(|entry| Arc::clone(&entry.complete))
            .collect();
        tracing::debug!(channels = completers.len(), "closing dispatcher");
        for complete in completers {
            complete();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::{Intent, State};

    #[derive(Debug, Clone, PartialEq)]
    struct Ping(u32);
    impl Intent for Ping {}

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Count(u32);
    impl State for Count {}

    struct PingReducer;
    impl Reducer for PingReducer {
        const DOMAIN: &'static str = "ping";
        type State = Count;
        type Intent = Ping;

        fn reduce(state: Count, intent: Ping) -> Count {
            Count(state.0 + intent.0)
        }
    }

    #[test]
    fn channel_is_shared_per_domain() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = dispatcher.channel::<PingReducer>().as_observable().subscribe({
            let seen = Arc::clone(&seen);
            move |p: Ping| seen.lock().push(p.0)
        });

        dispatcher.dispatch::<PingReducer>(Ping(1));
        dispatcher.clone().dispatch::<PingReducer>(Ping(2));
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn close_completes_channels_and_drops_later_intents() {
        let dispatcher = Dispatcher::new();
        let completed = Arc::new(AtomicBool::new(false));
        let _sub = dispatcher
            .channel::<PingReducer>()
            .as_observable()
            .subscribe_all(|_| panic!("no intents after close"), {
                let completed = Arc::clone(&completed);
                move || completed.store(true, Ordering::SeqCst)
            });

        dispatcher.close();
        dispatcher.dispatch::<PingReducer>(Ping(1));
        assert!(completed.load(Ordering::SeqCst));
        assert!(dispatcher.is_closed());
    }
}
