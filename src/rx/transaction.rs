//! Atomic propagation steps.
//!
//! A store publishes each reduced state inside [`transaction`]. Nodes that
//! combine several inputs call [`defer`] instead of emitting while a
//! transaction is open, and the outermost transaction flushes them once every
//! input has seen the new state.

use std::cell::RefCell;
use std::collections::VecDeque;

type Deferred = Box<dyn FnOnce() + 'static>;

#[derive(Default)]
struct TransactionState {
    depth: usize,
    deferred: VecDeque<Deferred>,
}

thread_local! {
    static TRANSACTION: RefCell<TransactionState> = RefCell::new(TransactionState::default());
}

/// Run `f` as one propagation step.
pub fn transaction<R>(f: impl FnOnce() -> R) -> R {
    TRANSACTION.with(|t| t.borrow_mut().depth += 1);
    let _depth = scopeguard::guard((), |_| {
        TRANSACTION.with(|t| {
            let mut t = t.borrow_mut();
            t.depth -= 1;
            if t.depth == 0 {
                t.deferred.clear();
            }
        });
    });

    let result = f();

    let outermost = TRANSACTION.with(|t| t.borrow().depth == 1);
    if outermost {
        // Deferred work may defer more work; drain until quiet.
        while let Some(job) = TRANSACTION.with(|t| t.borrow_mut().deferred.pop_front()) {
            job();
        }
    }
    result
}

pub fn in_transaction() -> bool {
    TRANSACTION.with(|t| t.borrow().depth > 0)
}

/// Queue `job` for the end of the current transaction, or run it now when no
/// transaction is open.
pub fn defer(job: impl FnOnce() + 'static) {
    let job: Deferred = Box::new(job);
    let pending = TRANSACTION.with(|t| {
        let mut t = t.borrow_mut();
        if t.depth > 0 {
            t.deferred.push_back(job);
            None
        } else {
            Some(job)
        }
    });
    if let Some(job) = pending {
        job();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn deferred_jobs_run_after_outermost() {
        let log = Rc::new(RefCell::new(Vec::new()));
        transaction(|| {
            let inner_log = Rc::clone(&log);
            defer(move || inner_log.borrow_mut().push("deferred"));
            transaction(|| log.borrow_mut().push("nested"));
            log.borrow_mut().push("body");
        });
        assert_eq!(*log.borrow(), vec!["nested", "body", "deferred"]);
        assert!(!in_transaction());
    }

    #[test]
    fn defer_outside_transaction_runs_immediately() {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        defer(move || *flag.borrow_mut() = true);
        assert!(*ran.borrow());
    }
}
