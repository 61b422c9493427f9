//! View-model lifecycle: phase machine and the appear/disappear gate.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::flux::{Intent, Reducer, State};
use crate::rx::{Element, Observable, Subscription};

/// Lifecycle of a view model.
///
/// ```text
/// Created ──appear──→ Active ⇄ Inactive ──destroy──→ Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewModelPhase {
    #[default]
    Created,
    /// Subscribed to lifecycle-gated store streams.
    Active,
    Inactive,
    /// Store reference released; absorbing.
    Destroyed,
}

impl State for ViewModelPhase {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Appear,
    Disappear,
    Destroy,
}

impl Intent for LifecycleEvent {}

pub struct LifecycleReducer;

impl Reducer for LifecycleReducer {
    const DOMAIN: &'static str = "view_model_lifecycle";
    type State = ViewModelPhase;
    type Intent = LifecycleEvent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match (state, intent) {
            (ViewModelPhase::Destroyed, _) => ViewModelPhase::Destroyed,
            (_, LifecycleEvent::Destroy) => ViewModelPhase::Destroyed,
            (_, LifecycleEvent::Appear) => ViewModelPhase::Active,
            (ViewModelPhase::Active, LifecycleEvent::Disappear) => ViewModelPhase::Inactive,
            // Disappear before the first appear leaves the phase alone
            (other, LifecycleEvent::Disappear) => other,
        }
    }
}

impl ViewModelPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Current phase of one view model, advanced by [`LifecycleReducer`].
#[derive(Clone, Default)]
pub(crate) struct PhaseTracker {
    phase: Arc<Mutex<ViewModelPhase>>,
}

impl PhaseTracker {
    pub(crate) fn get(&self) -> ViewModelPhase {
        *self.phase.lock()
    }

    pub(crate) fn apply(&self, event: LifecycleEvent) {
        let (from, to) = {
            let mut phase = self.phase.lock();
            let from = *phase;
            *phase = LifecycleReducer::reduce(from, event);
            (from, *phase)
        };
        if from != to {
            tracing::debug!(?from, ?to, "view model phase");
        }
    }

    /// Follow the appear/disappear signals. The subscription only holds a
    /// weak reference to the tracker.
    pub(crate) fn track(&self, appear: &Observable<()>, disappear: &Observable<()>) -> Subscription {
        let phase: Weak<Mutex<ViewModelPhase>> = Arc::downgrade(&self.phase);
        lifecycle_events(appear, disappear).subscribe(move |event| {
            if let Some(phase) = phase.upgrade() {
                PhaseTracker { phase }.apply(event);
            }
        })
    }
}

/// Merge the two lifecycle signals into one event stream.
pub fn lifecycle_events(
    appear: &Observable<()>,
    disappear: &Observable<()>,
) -> Observable<LifecycleEvent> {
    Observable::merge(vec![
        appear.map(|_| LifecycleEvent::Appear),
        disappear.map(|_| LifecycleEvent::Disappear),
    ])
}

/// Forward `inner` only between an appear and the next disappear.
///
/// Each appear subscribes `inner` afresh and each disappear drops that
/// subscription, so at most one window is open and nothing emitted while
/// inactive reaches the view.
pub fn lifecycle_gate<T: Element>(
    appear: &Observable<()>,
    disappear: &Observable<()>,
    inner: Observable<T>,
) -> Observable<T> {
    Observable::merge(vec![appear.map(|_| true), disappear.map(|_| false)]).flat_map_latest(
        move |active| {
            if active {
                inner.clone()
            } else {
                Observable::empty()
            }
        },
    )
}
