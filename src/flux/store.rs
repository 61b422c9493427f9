//! Observable state container for one domain.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::rx::{transaction, Element, Observable, Subject, Subscription, Variable};

use super::dispatcher::Dispatcher;
use super::reducer::Reducer;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Holds the state of domain `R` and applies its reducer to every intent on
/// the domain's dispatch channel.
///
/// Stores are created and torn down by the [`StoreRegistry`](super::StoreRegistry);
/// view models only read them.
pub struct Store<R: Reducer> {
    state: Variable<R::State>,
    applied: Subject<R::Intent>,
    dispatch: Mutex<Option<Subscription>>,
    instance_id: u64,
}

impl<R: Reducer> Store<R> {
    pub(crate) fn new(dispatcher: &Dispatcher) -> Self {
        let state = Variable::new(R::State::default());
        let applied = Subject::new();
        let (reducer_state, reducer_applied) = (state.clone(), applied.clone());
        let dispatch = dispatcher
            .channel::<R>()
            .as_observable()
            .subscribe(move |intent| apply::<R>(&reducer_state, &reducer_applied, intent));
        let instance_id = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(domain = R::DOMAIN, instance_id, "store created");
        Self {
            state,
            applied,
            dispatch: Mutex::new(Some(dispatch)),
            instance_id,
        }
    }

    /// Synchronous snapshot of the current state.
    pub fn value(&self) -> R::State {
        self.state.value()
    }

    /// State stream; replays the current state to each subscriber.
    pub fn state(&self) -> Observable<R::State> {
        self.state.observable()
    }

    /// State stream without replay: only states produced after subscribing.
    pub fn updates(&self) -> Observable<R::State> {
        self.state.changes()
    }

    /// Per-field stream with replay, deduplicated.
    pub fn select<U, F>(&self, field: F) -> Observable<U>
    where
        U: Element + PartialEq,
        F: Fn(&R::State) -> U + Send + Sync + 'static,
    {
        self.state().map(move |state| field(&state)).distinct_until_changed()
    }

    /// Per-field stream without replay. Emits when the field changes.
    pub fn select_updates<U, F>(&self, field: F) -> Observable<U>
    where
        U: Element + PartialEq,
        F: Fn(&R::State) -> U + Send + Sync + 'static,
    {
        let state = self.state.clone();
        let field = Arc::new(field);
        Observable::create(move |observer| {
            // Baseline is taken per subscriber, at subscription time.
            let last = Mutex::new(field(&state.value()));
            let field = Arc::clone(&field);
            state
                .changes()
                .filter_map(move |next_state| {
                    let next = field(&next_state);
                    let mut last = last.lock();
                    if *last == next {
                        None
                    } else {
                        *last = next.clone();
                        Some(next)
                    }
                })
                .subscribe_with(observer)
        })
    }

    /// Every intent this store has reduced, published after the resulting
    /// state. Emits even when the intent left the state unchanged, so a
    /// repeated selection is still observable as an event.
    pub fn applied(&self) -> Observable<R::Intent> {
        self.applied.as_observable()
    }

    /// Unique per creation; a store recreated after teardown gets a new id.
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.is_completed()
    }

    /// Stop reducing and complete every stream.
    pub(crate) fn teardown(&self) {
        let dispatch = self.dispatch.lock().take();
        drop(dispatch);
        self.state.complete();
        self.applied.on_completed();
        tracing::debug!(domain = R::DOMAIN, instance_id = self.instance_id, "store torn down");
    }
}

fn apply<R: Reducer>(state: &Variable<R::State>, applied: &Subject<R::Intent>, intent: R::Intent) {
    let current = state.value();
    let next = R::reduce(current.clone(), intent.clone());
    if next != current {
        // One intent, one propagation step: combined fields never tear.
        transaction(|| state.set(next));
    }
    applied.on_next(intent);
}
