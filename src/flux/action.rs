//! Typed command objects that publish intents.

use std::marker::PhantomData;

use super::dispatcher::Dispatcher;
use super::reducer::Reducer;

/// Publishes intents onto the dispatch channel of domain `R`.
///
/// Holds no subscription state: every `Action<R>` built from the same
/// dispatcher writes to the same channel.
pub struct Action<R: Reducer> {
    dispatcher: Dispatcher,
    _domain: PhantomData<fn() -> R>,
}

impl<R: Reducer> Clone for Action<R> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            _domain: PhantomData,
        }
    }
}

impl<R: Reducer> Action<R> {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            _domain: PhantomData,
        }
    }

    pub fn invoke(&self, intent: R::Intent) {
        self.dispatcher.dispatch::<R>(intent);
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl<R: Reducer> std::fmt::Debug for Action<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action").field("domain", &R::DOMAIN).finish()
    }
}
