//! Behaviour subject holding a current value.

use parking_lot::Mutex;
use std::sync::Arc;

use super::observable::Observable;
use super::observer::Element;
use super::subject::Subject;

/// A value cell that publishes every replacement.
///
/// [`Variable::observable`] replays the current value to each new subscriber;
/// [`Variable::changes`] only forwards later replacements.
pub struct Variable<T> {
    value: Arc<Mutex<T>>,
    subject: Subject<T>,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subject: self.subject.clone(),
        }
    }
}

impl<T: Element + Default> Default for Variable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Element> Variable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
            subject: Subject::new(),
        }
    }

    pub fn value(&self) -> T {
        self.value.lock().clone()
    }

    /// Replace the value and publish it. Ignored once completed.
    pub fn set(&self, value: T) {
        if self.subject.is_completed() {
            return;
        }
        *self.value.lock() = value.clone();
        self.subject.on_next(value);
    }

    pub fn complete(&self) {
        self.subject.on_completed();
    }

    pub fn is_completed(&self) -> bool {
        self.subject.is_completed()
    }

    pub fn observable(&self) -> Observable<T> {
        let value = Arc::clone(&self.value);
        let changes = self.subject.as_observable();
        let subject = self.subject.clone();
        Observable::create(move |observer| {
            if subject.is_completed() {
                observer.on_completed();
                return super::Subscription::empty();
            }
            let current = value.lock().clone();
            observer.on_next(current);
            changes.subscribe_with(observer)
        })
    }

    pub fn changes(&self) -> Observable<T> {
        self.subject.as_observable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observable_replays_current_value() {
        let var = Variable::new(1);
        var.set(2);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = var.observable().subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.lock().push(v)
        });
        var.set(3);

        assert_eq!(*seen.lock(), vec![2, 3]);
    }

    #[test]
    fn changes_skip_current_value() {
        let var = Variable::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = var.changes().subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.lock().push(v)
        });
        var.set(5);
        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn completed_variable_stops_emitting() {
        let var = Variable::new(0);
        var.complete();
        var.set(9);

        assert_eq!(var.value(), 0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = var.observable().subscribe({
            let seen = Arc::clone(&seen);
            move |v| seen.lock().push(v)
        });
        assert!(seen.lock().is_empty());
    }
}
