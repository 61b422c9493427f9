//! The closed operator set used by stores and view models.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::observable::Observable;
use super::observer::{Element, Observer};
use super::scheduler::Scheduler;
use super::subscription::Subscription;
use super::transaction;

impl<T: Element> Observable<T> {
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::create(move |observer: Observer<U>| {
            let f = Arc::clone(&f);
            let downstream = observer.clone();
            source.subscribe_with(Observer::new(
                move |value| downstream.on_next(f(value)),
                move || observer.on_completed(),
            ))
        })
    }

    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_map(move |value| predicate(&value).then_some(value))
    }

    pub fn filter_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::create(move |observer: Observer<U>| {
            let f = Arc::clone(&f);
            let downstream = observer.clone();
            source.subscribe_with(Observer::new(
                move |value| {
                    if let Some(mapped) = f(value) {
                        downstream.on_next(mapped);
                    }
                },
                move || observer.on_completed(),
            ))
        })
    }

    /// Interleave every source; completes once all of them have completed.
    pub fn merge(sources: Vec<Observable<T>>) -> Observable<T> {
        Observable::create(move |observer| {
            if sources.is_empty() {
                observer.on_completed();
                return Subscription::empty();
            }
            let remaining = Arc::new(AtomicUsize::new(sources.len()));
            let upstream: Vec<Subscription> = sources
                .iter()
                .map(|source| {
                    let next = observer.clone();
                    let done = observer.clone();
                    let remaining = Arc::clone(&remaining);
                    source.subscribe_with(Observer::new(
                        move |value| next.on_next(value),
                        move || {
                            if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                                done.on_completed();
                            }
                        },
                    ))
                })
                .collect();
            Subscription::new(move || drop(upstream))
        })
    }

    pub fn merge_with(&self, other: &Observable<T>) -> Observable<T> {
        Observable::merge(vec![self.clone(), other.clone()])
    }

    pub fn distinct_until_changed(&self) -> Observable<T>
    where
        T: PartialEq,
    {
        let source = self.clone();
        Observable::create(move |observer| {
            let last: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));
            let downstream = observer.clone();
            source.subscribe_with(Observer::new(
                move |value: T| {
                    let changed = {
                        let mut last = last.lock();
                        if last.as_ref() == Some(&value) {
                            false
                        } else {
                            *last = Some(value.clone());
                            true
                        }
                    };
                    if changed {
                        downstream.on_next(value);
                    }
                },
                move || observer.on_completed(),
            ))
        })
    }

    /// Map each value to an inner stream and forward only the most recent one.
    ///
    /// A new outer value disposes the previous inner subscription before the
    /// next one is made, so at most one inner subscription is alive.
    pub fn flat_map_latest<U, F>(&self, f: F) -> Observable<U>
    where
        U: Element,
        F: Fn(T) -> Observable<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::create(move |observer: Observer<U>| {
            let node = Arc::new(SwitchNode {
                state: Mutex::new(SwitchState {
                    generation: 0,
                    inner: None,
                    inner_active: false,
                    outer_done: false,
                }),
                observer,
            });
            let f = Arc::clone(&f);
            let on_value = Arc::clone(&node);
            let on_done = Arc::clone(&node);
            let outer = source.subscribe_with(Observer::new(
                move |value| on_value.switch_to(f(value)),
                move || on_done.outer_completed(),
            ));
            Subscription::new(move || {
                drop(outer);
                let inner = node.state.lock().inner.take();
                drop(inner);
            })
        })
    }

    /// Pair each value with the latest value of `other` at that moment.
    /// Values arriving before `other` has produced anything are dropped.
    pub fn with_latest_from<U, R, F>(&self, other: &Observable<U>, f: F) -> Observable<R>
    where
        U: Element,
        R: Element,
        F: Fn(T, U) -> R + Send + Sync + 'static,
    {
        let source = self.clone();
        let other = other.clone();
        let f = Arc::new(f);
        Observable::create(move |observer: Observer<R>| {
            let latest: Arc<Mutex<Option<U>>> = Arc::new(Mutex::new(None));
            let other_sub = other.subscribe({
                let latest = Arc::clone(&latest);
                move |value| *latest.lock() = Some(value)
            });
            let f = Arc::clone(&f);
            let downstream = observer.clone();
            let source_sub = source.subscribe_with(Observer::new(
                move |value| {
                    let sample = latest.lock().as_ref().cloned();
                    if let Some(sample) = sample {
                        downstream.on_next(f(value, sample));
                    }
                },
                move || observer.on_completed(),
            ));
            Subscription::new(move || {
                drop(source_sub);
                drop(other_sub);
            })
        })
    }

    /// Emit the latest value once `due` has passed without a newer one.
    /// A pending value is flushed when the source completes.
    pub fn debounce(&self, due: Duration, scheduler: Arc<dyn Scheduler>) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer| {
            let node = Arc::new(DebounceNode {
                state: Mutex::new(DebounceState {
                    generation: 0,
                    latest: None,
                    timer: None,
                }),
                observer,
                due,
                scheduler: Arc::clone(&scheduler),
            });
            let on_value = Arc::clone(&node);
            let on_done = Arc::clone(&node);
            let upstream = source.subscribe_with(Observer::new(
                move |value| on_value.push(value),
                move || on_done.completed(),
            ));
            Subscription::new(move || {
                drop(upstream);
                let timer = node.state.lock().timer.take();
                drop(timer);
            })
        })
    }

    /// Deliver values and completion through `scheduler`.
    pub fn observe_on(&self, scheduler: Arc<dyn Scheduler>) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer| {
            let next_scheduler = Arc::clone(&scheduler);
            let done_scheduler = Arc::clone(&scheduler);
            let next = observer.clone();
            source.subscribe_with(Observer::new(
                move |value| {
                    let next = next.clone();
                    next_scheduler
                        .schedule(Box::new(move || next.on_next(value)))
                        .detach();
                },
                move || {
                    let done = observer.clone();
                    done_scheduler
                        .schedule(Box::new(move || done.on_completed()))
                        .detach();
                },
            ))
        })
    }
}

/// Combine the latest values of two streams.
///
/// Emits once both sides have produced and again whenever either changes.
/// Inside a [`transaction`](super::transaction) the emission is deferred to
/// the end of the step, so two fields of one store update never show a torn
/// pair.
pub fn combine_latest<A, B, R, F>(a: &Observable<A>, b: &Observable<B>, f: F) -> Observable<R>
where
    A: Element,
    B: Element,
    R: Element,
    F: Fn(A, B) -> R + Send + Sync + 'static,
{
    let a = a.clone();
    let b = b.clone();
    let f: Arc<dyn Fn(A, B) -> R + Send + Sync> = Arc::new(f);
    Observable::create(move |observer: Observer<R>| {
        let node = Arc::new(CombineNode {
            state: Mutex::new(CombineState {
                a: None,
                b: None,
                completed: 0,
                flush_pending: false,
            }),
            observer,
            combine: Arc::clone(&f),
        });

        let (on_a, done_a) = (Arc::clone(&node), Arc::clone(&node));
        let sub_a = a.subscribe_with(Observer::new(
            move |value| {
                on_a.state.lock().a = Some(value);
                on_a.changed();
            },
            move || done_a.side_completed(),
        ));
        let (on_b, done_b) = (Arc::clone(&node), Arc::clone(&node));
        let sub_b = b.subscribe_with(Observer::new(
            move |value| {
                on_b.state.lock().b = Some(value);
                on_b.changed();
            },
            move || done_b.side_completed(),
        ));
        Subscription::new(move || {
            drop(sub_a);
            drop(sub_b);
        })
    })
}

struct SwitchState {
    generation: u64,
    inner: Option<Subscription>,
    inner_active: bool,
    outer_done: bool,
}

struct SwitchNode<U> {
    state: Mutex<SwitchState>,
    observer: Observer<U>,
}

impl<U: Element> SwitchNode<U> {
    fn switch_to(self: &Arc<Self>, inner: Observable<U>) {
        let (generation, previous) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.inner_active = true;
            (state.generation, state.inner.take())
        };
        drop(previous);

        let on_value = Arc::clone(self);
        let on_done = Arc::clone(self);
        let subscription = inner.subscribe_with(Observer::new(
            move |value| {
                let current = on_value.state.lock().generation == generation;
                if current {
                    on_value.observer.on_next(value);
                }
            },
            move || on_done.inner_completed(generation),
        ));

        let stale = {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.inner = Some(subscription);
                None
            } else {
                Some(subscription)
            }
        };
        drop(stale);
    }

    fn inner_completed(&self, generation: u64) {
        let finished = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            state.inner_active = false;
            state.outer_done
        };
        if finished {
            self.observer.on_completed();
        }
    }

    fn outer_completed(&self) {
        let finished = {
            let mut state = self.state.lock();
            state.outer_done = true;
            !state.inner_active
        };
        if finished {
            self.observer.on_completed();
        }
    }
}

struct DebounceState<T> {
    generation: u64,
    latest: Option<T>,
    timer: Option<Subscription>,
}

struct DebounceNode<T> {
    state: Mutex<DebounceState<T>>,
    observer: Observer<T>,
    due: Duration,
    scheduler: Arc<dyn Scheduler>,
}

impl<T: Element> DebounceNode<T> {
    fn push(self: &Arc<Self>, value: T) {
        let (generation, previous) = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.latest = Some(value);
            (state.generation, state.timer.take())
        };
        drop(previous);

        let node = Arc::downgrade(self);
        let timer = self.scheduler.schedule_after(
            self.due,
            Box::new(move || {
                if let Some(node) = node.upgrade() {
                    node.fire(generation);
                }
            }),
        );

        let stale = {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.timer = Some(timer);
                None
            } else {
                Some(timer)
            }
        };
        drop(stale);
    }

    fn fire(&self, generation: u64) {
        let (value, timer) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                return;
            }
            (state.latest.take(), state.timer.take())
        };
        if let Some(timer) = timer {
            timer.detach();
        }
        if let Some(value) = value {
            self.observer.on_next(value);
        }
    }

    fn completed(&self) {
        let (value, timer) = {
            let mut state = self.state.lock();
            state.generation += 1;
            (state.latest.take(), state.timer.take())
        };
        drop(timer);
        if let Some(value) = value {
            self.observer.on_next(value);
        }
        self.observer.on_completed();
    }
}

struct CombineState<A, B> {
    a: Option<A>,
    b: Option<B>,
    completed: u8,
    flush_pending: bool,
}

struct CombineNode<A, B, R> {
    state: Mutex<CombineState<A, B>>,
    observer: Observer<R>,
    combine: Arc<dyn Fn(A, B) -> R + Send + Sync>,
}

impl<A: Element, B: Element, R: Element> CombineNode<A, B, R> {
    fn changed(self: &Arc<Self>) {
        if !transaction::in_transaction() {
            self.flush();
            return;
        }
        let first = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.flush_pending, true)
        };
        if first {
            let node = Arc::clone(self);
            transaction::defer(move || node.flush());
        }
    }

    fn flush(&self) {
        let pair = {
            let mut state = self.state.lock();
            state.flush_pending = false;
            match (&state.a, &state.b) {
                (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                _ => None,
            }
        };
        if let Some((a, b)) = pair {
            self.observer.on_next((self.combine)(a, b));
        }
    }

    fn side_completed(&self) {
        let done = {
            let mut state = self.state.lock();
            state.completed += 1;
            state.completed == 2
        };
        if done {
            self.observer.on_completed();
        }
    }
}
