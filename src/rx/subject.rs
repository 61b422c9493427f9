//! Hot multicast subjects.

use parking_lot::Mutex;
use std::sync::Arc;

use super::observable::Observable;
use super::observer::{Element, Observer};
use super::subscription::Subscription;

struct SubjectInner<T> {
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
    completed: bool,
}

/// Publish subject: forwards each value to the observers subscribed at the
/// time of emission. Late subscribers see nothing that came before.
pub struct Subject<T> {
    inner: Arc<Mutex<SubjectInner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Subject<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SubjectInner {
                observers: Vec::new(),
                next_id: 0,
                completed: false,
            })),
        }
    }

    pub fn on_next(&self, value: T) {
        let observers: Vec<Observer<T>> = {
            let inner = self.inner.lock();
            if inner.completed {
                return;
            }
            inner.observers.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in observers {
            observer.on_next(value.clone());
        }
    }

    /// Complete every current observer. Further values are ignored and late
    /// subscribers complete immediately.
    pub fn on_completed(&self) {
        let observers = {
            let mut inner = self.inner.lock();
            if inner.completed {
                return;
            }
            inner.completed = true;
            std::mem::take(&mut inner.observers)
        };
        for (_, observer) in observers {
            observer.on_completed();
        }
    }

    pub fn is_completed(&self) -> bool {
        self.inner.lock().completed
    }

    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }

    pub fn as_observable(&self) -> Observable<T> {
        let inner = Arc::clone(&self.inner);
        Observable::create(move |observer| attach(&inner, observer))
    }
}

fn attach<T: Element>(inner: &Arc<Mutex<SubjectInner<T>>>, observer: Observer<T>) -> Subscription {
    let id = {
        let mut guard = inner.lock();
        if guard.completed {
            drop(guard);
            observer.on_completed();
            return Subscription::empty();
        }
        let id = guard.next_id;
        guard.next_id += 1;
        guard.observers.push((id, observer));
        id
    };

    let inner = Arc::downgrade(inner);
    Subscription::new(move || {
        if let Some(inner) = inner.upgrade() {
            let removed = {
                let mut guard = inner.lock();
                let position = guard.observers.iter().position(|(oid, _)| *oid == id);
                position.map(|p| guard.observers.remove(p))
            };
            drop(removed);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_subscriber_misses_earlier_values() {
        let subject = Subject::new();
        subject.on_next(1);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = subject.as_observable().subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.lock().push(v)
        });
        subject.on_next(2);

        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn unsubscribe_inside_emission_stops_sibling() {
        let subject = Subject::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let _killer = subject.as_observable().subscribe({
            let victim = Arc::clone(&victim);
            move |_: i32| {
                let taken = victim.lock().take();
                drop(taken);
            }
        });
        let sub = subject.as_observable().subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.lock().push(v)
        });
        *victim.lock() = Some(sub);

        subject.on_next(7);
        assert!(seen.lock().is_empty());
        assert_eq!(subject.observer_count(), 1);
    }

    #[test]
    fn completed_subject_completes_late_subscribers() {
        let subject = Subject::<i32>::new();
        subject.on_completed();
        subject.on_next(1);

        let completed = Arc::new(Mutex::new(false));
        let _sub = subject.as_observable().subscribe_all(|_| panic!("no values"), {
            let completed = Arc::clone(&completed);
            move || *completed.lock() = true
        });
        assert!(*completed.lock());
        assert_eq!(subject.observer_count(), 0);
    }
}
