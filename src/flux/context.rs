//! Process-wide Flux context.

use std::sync::OnceLock;

use super::action::Action;
use super::dispatcher::Dispatcher;
use super::reducer::Reducer;
use super::registry::{StoreHandle, StoreRegistry};

/// Owns the dispatcher and the store registry.
///
/// Build one explicitly with [`Flux::new`], or use [`Flux::shared`] for the
/// process-wide instance created on first use.
#[derive(Clone)]
pub struct Flux {
    dispatcher: Dispatcher,
    registry: StoreRegistry,
}

static SHARED: OnceLock<Flux> = OnceLock::new();

impl Default for Flux {
    fn default() -> Self {
        Self::new()
    }
}

impl Flux {
    pub fn new() -> Self {
        let dispatcher = Dispatcher::new();
        let registry = StoreRegistry::new(dispatcher.clone());
        Self {
            dispatcher,
            registry,
        }
    }

    pub fn shared() -> &'static Flux {
        SHARED.get_or_init(Flux::new)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn action<R: Reducer>(&self) -> Action<R> {
        Action::new(self.dispatcher.clone())
    }

    pub fn register<R: Reducer>(&self) -> StoreHandle<R> {
        self.registry.register::<R>()
    }

    /// Close every dispatch channel. Invoking actions afterwards is a
    /// programmer error; the intents are logged and dropped.
    pub fn shutdown(&self) {
        self.dispatcher.close();
    }
}
