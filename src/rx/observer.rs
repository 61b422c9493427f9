//! Observer callbacks with a closed flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Values that can travel through a stream.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

type NextFn<T> = Box<dyn Fn(T) + Send + Sync + 'static>;
type CompletedFn = Box<dyn Fn() + Send + Sync + 'static>;

struct ObserverInner<T> {
    next: NextFn<T>,
    completed: CompletedFn,
    closed: AtomicBool,
}

/// Receiving end of a stream.
///
/// Once closed, by completion or by unsubscribing, it never calls back again.
pub struct Observer<T> {
    inner: Arc<ObserverInner<T>>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> Observer<T> {
    pub fn new<N, C>(next: N, completed: C) -> Self
    where
        N: Fn(T) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ObserverInner {
                next: Box::new(next),
                completed: Box::new(completed),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Observer that ignores completion.
    pub fn from_fn<N>(next: N) -> Self
    where
        N: Fn(T) + Send + Sync + 'static,
    {
        Self::new(next, || {})
    }

    pub fn on_next(&self, value: T) {
        if !self.is_closed() {
            (self.inner.next)(value);
        }
    }

    pub fn on_completed(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            (self.inner.completed)();
        }
    }

    /// Close without signalling completion.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}
