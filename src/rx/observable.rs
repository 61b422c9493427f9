//! Cold observable pipelines.

use std::sync::Arc;

use super::observer::{Element, Observer};
use super::subject::Subject;
use super::subscription::Subscription;

type SubscribeFn<T> = dyn Fn(Observer<T>) -> Subscription + Send + Sync + 'static;

/// A stream description. Nothing happens until it is subscribed.
///
/// Cloning is cheap: clones share the same subscribe function.
pub struct Observable<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T: Element> Observable<T> {
    pub fn create<F>(subscribe: F) -> Self
    where
        F: Fn(Observer<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            subscribe_fn: Arc::new(subscribe),
        }
    }

    /// Completes immediately without emitting.
    pub fn empty() -> Self {
        Self::create(|observer| {
            observer.on_completed();
            Subscription::empty()
        })
    }

    /// Never emits and never completes.
    pub fn never() -> Self {
        Self::create(|_| Subscription::empty())
    }

    pub fn just(value: T) -> Self {
        Self::create(move |observer| {
            observer.on_next(value.clone());
            observer.on_completed();
            Subscription::empty()
        })
    }

    pub fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Vec<T> = values.into_iter().collect();
        Self::create(move |observer| {
            for value in &values {
                if observer.is_closed() {
                    break;
                }
                observer.on_next(value.clone());
            }
            observer.on_completed();
            Subscription::empty()
        })
    }

    /// Subscribe with an explicit observer.
    ///
    /// The returned subscription closes the observer before tearing down the
    /// source, so no callback arrives after it is dropped.
    pub fn subscribe_with(&self, observer: Observer<T>) -> Subscription {
        let upstream = (self.subscribe_fn)(observer.clone());
        Subscription::new(move || {
            observer.close();
            drop(upstream);
        })
    }

    pub fn subscribe<N>(&self, next: N) -> Subscription
    where
        N: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe_with(Observer::from_fn(next))
    }

    pub fn subscribe_all<N, C>(&self, next: N, completed: C) -> Subscription
    where
        N: Fn(T) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        self.subscribe_with(Observer::new(next, completed))
    }

    /// Forward every element into `subject`. Completion is not forwarded, so a
    /// view-model output survives the end of any single source.
    pub fn bind_to(&self, subject: &Subject<T>) -> Subscription {
        let subject = subject.clone();
        self.subscribe(move |value| subject.on_next(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn from_iter_emits_in_order_then_completes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Mutex::new(false));
        let _sub = Observable::from_iter(vec![1, 2, 3]).subscribe_all(
            {
                let seen = Arc::clone(&seen);
                move |v| seen.lock().push(v)
            },
            {
                let done = Arc::clone(&done);
                move || *done.lock() = true
            },
        );
        assert_eq!(*seen.lock(), vec![1, 2, 3]);
        assert!(*done.lock());
    }

    #[test]
    fn empty_only_completes() {
        let completed = Arc::new(Mutex::new(0));
        let _sub = Observable::<i32>::empty().subscribe_all(|_| panic!("no values"), {
            let completed = Arc::clone(&completed);
            move || *completed.lock() += 1
        });
        assert_eq!(*completed.lock(), 1);
    }
}
