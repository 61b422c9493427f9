//! Reference-counted store registration.

use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

use super::dispatcher::Dispatcher;
use super::reducer::Reducer;
use super::store::Store;

/// Contract violations on store registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("store '{domain}' released without a live registration")]
    NotRegistered { domain: &'static str },
}

struct Entry {
    count: usize,
    store: Arc<dyn Any + Send + Sync>,
}

/// Checkout/checkin registry holding at most one store per domain.
///
/// The first [`register`](Self::register) creates the store, the release that
/// brings the count back to zero tears it down. The lock covers the whole
/// get-or-create step, so concurrent registrations share one instance.
#[derive(Clone)]
pub struct StoreRegistry {
    entries: Arc<Mutex<HashMap<TypeId, Entry>>>,
    dispatcher: Dispatcher,
}

impl StoreRegistry {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            dispatcher,
        }
    }

    /// Acquire the shared store for `R`, creating it if absent.
    pub fn register<R: Reducer>(&self) -> StoreHandle<R> {
        let (store, count) = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(TypeId::of::<R>()).or_insert_with(|| Entry {
                count: 0,
                store: Arc::new(Store::<R>::new(&self.dispatcher)),
            });
            entry.count += 1;
            (downcast::<R>(&entry.store), entry.count)
        };
        tracing::debug!(domain = R::DOMAIN, count, "store registered");
        StoreHandle {
            store,
            registry: self.clone(),
            released: false,
            _domain: PhantomData,
        }
    }

    /// Drop one registration of `R`; tears the store down at zero.
    pub(crate) fn release<R: Reducer>(&self) -> Result<(), RegistryError> {
        let retired = {
            let mut entries = self.entries.lock();
            let Some(entry) = entries.get_mut(&TypeId::of::<R>()) else {
                return Err(RegistryError::NotRegistered { domain: R::DOMAIN });
            };
            entry.count -= 1;
            tracing::debug!(domain = R::DOMAIN, count = entry.count, "store released");
            if entry.count == 0 {
                entries.remove(&TypeId::of::<R>())
            } else {
                None
            }
        };

        // Teardown completes streams, which may call back into the registry.
        if let Some(entry) = retired {
            downcast::<R>(&entry.store).teardown();
        }
        Ok(())
    }

    pub fn ref_count<R: Reducer>(&self) -> usize {
        self.entries
            .lock()
            .get(&TypeId::of::<R>())
            .map_or(0, |entry| entry.count)
    }

    pub fn is_registered<R: Reducer>(&self) -> bool {
        self.ref_count::<R>() > 0
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

fn downcast<R: Reducer>(store: &Arc<dyn Any + Send + Sync>) -> Arc<Store<R>> {
    match Arc::clone(store).downcast::<Store<R>>() {
        Ok(store) => store,
        // Entries are keyed by the reducer's TypeId.
        Err(_) => unreachable!("store registry type mismatch for {}", R::DOMAIN),
    }
}

/// A counted reference to a shared store.
///
/// Releases its registration exactly once: through [`release`](Self::release)
/// or, failing that, on drop. Cloning registers again.
pub struct StoreHandle<R: Reducer> {
    store: Arc<Store<R>>,
    registry: StoreRegistry,
    released: bool,
    _domain: PhantomData<fn() -> R>,
}

impl<R: Reducer> StoreHandle<R> {
    pub fn release(mut self) {
        self.release_once();
    }

    /// Shared pointer to the store. Does not count as a registration.
    pub fn store(&self) -> Arc<Store<R>> {
        Arc::clone(&self.store)
    }

    fn release_once(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        if let Err(err) = self.registry.release::<R>() {
            tracing::error!(error = %err, "store release failed");
        }
    }
}

impl<R: Reducer> Deref for StoreHandle<R> {
    type Target = Store<R>;

    fn deref(&self) -> &Store<R> {
        &self.store
    }
}

impl<R: Reducer> Clone for StoreHandle<R> {
    fn clone(&self) -> Self {
        self.registry.register::<R>()
    }
}

impl<R: Reducer> Drop for StoreHandle<R> {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl<R: Reducer> std::fmt::Debug for StoreHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("domain", &R::DOMAIN)
            .field("instance_id", &self.store.instance_id())
            .field("released", &self.released)
            .finish()
    }
}
