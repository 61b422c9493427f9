//! Schedulers: where and when deferred stream work runs.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::subscription::Subscription;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs later. Dropping the returned subscription cancels a job that
/// has not started yet.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule_after(&self, delay: Duration, job: Job) -> Subscription;

    fn schedule(&self, job: Job) -> Subscription {
        self.schedule_after(Duration::ZERO, job)
    }
}

/// The single UI-affine execution context.
///
/// Every job scheduled through a [`MainScheduler`] runs sequentially inside
/// [`MainLoop::run`], so store mutation and view-model composition never race.
pub struct MainLoop {
    receiver: mpsc::UnboundedReceiver<Job>,
}

/// Cloneable handle that posts work onto a [`MainLoop`].
#[derive(Clone)]
pub struct MainScheduler {
    sender: mpsc::UnboundedSender<Job>,
    runtime: Handle,
}

impl MainLoop {
    /// Create the loop and its scheduler. Timers are driven by `runtime`.
    pub fn new(runtime: Handle) -> (Self, MainScheduler) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { receiver }, MainScheduler { sender, runtime })
    }

    /// Run jobs until every scheduler handle is gone.
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            job();
        }
        tracing::debug!("main loop drained");
    }

    /// Run whatever is queued right now without waiting.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for MainScheduler {
    fn schedule_after(&self, delay: Duration, job: Job) -> Subscription {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let guarded: Job = Box::new(move || {
            if !flag.load(Ordering::SeqCst) {
                job();
            }
        });

        if delay.is_zero() {
            if self.sender.send(guarded).is_err() {
                tracing::trace!("main loop gone, job dropped");
            }
            return Subscription::new(move || cancelled.store(true, Ordering::SeqCst));
        }

        let sender = self.sender.clone();
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(guarded).is_err() {
                tracing::trace!("main loop gone, delayed job dropped");
            }
        });
        Subscription::new(move || {
            cancelled.store(true, Ordering::SeqCst);
            timer.abort();
        })
    }
}

struct VirtualClock {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), Job>,
}

/// Deterministic scheduler with a manually advanced clock.
///
/// Jobs run synchronously inside [`VirtualTimeScheduler::advance_by`], in
/// due-time order, with the clock set to each job's due time.
#[derive(Clone)]
pub struct VirtualTimeScheduler {
    clock: Arc<Mutex<VirtualClock>>,
}

impl Default for VirtualTimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTimeScheduler {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(Mutex::new(VirtualClock {
                now: Duration::ZERO,
                seq: 0,
                queue: BTreeMap::new(),
            })),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    pub fn pending(&self) -> usize {
        self.clock.lock().queue.len()
    }

    pub fn advance_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    pub fn advance_to(&self, target: Duration) {
        loop {
            let due = {
                let mut clock = self.clock.lock();
                match clock.queue.keys().next().copied() {
                    Some(key) if key.0 <= target => {
                        clock.now = key.0;
                        clock.queue.remove(&key)
                    }
                    _ => None,
                }
            };
            match due {
                Some(job) => job(),
                None => break,
            }
        }
        let mut clock = self.clock.lock();
        if clock.now < target {
            clock.now = target;
        }
    }
}

impl Scheduler for VirtualTimeScheduler {
    fn schedule_after(&self, delay: Duration, job: Job) -> Subscription {
        let key = {
            let mut clock = self.clock.lock();
            let key = (clock.now + delay, clock.seq);
            clock.seq += 1;
            clock.queue.insert(key, job);
            key
        };
        let clock = Arc::downgrade(&self.clock);
        Subscription::new(move || {
            if let Some(clock) = clock.upgrade() {
                let removed = clock.lock().queue.remove(&key);
                drop(removed);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_jobs_run_in_due_order() {
        let scheduler = VirtualTimeScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = Arc::clone(&log);
            scheduler
                .schedule_after(Duration::from_millis(delay), Box::new(move || log.lock().push(tag)))
                .detach();
        }

        scheduler.advance_by(Duration::from_millis(15));
        assert_eq!(*log.lock(), vec!["a"]);

        scheduler.advance_by(Duration::from_millis(100));
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), Duration::from_millis(115));
    }

    #[test]
    fn dropped_subscription_cancels_virtual_job() {
        let scheduler = VirtualTimeScheduler::new();
        let ran = Arc::new(AtomicBool::new(false));
        let sub = {
            let ran = Arc::clone(&ran);
            scheduler.schedule_after(
                Duration::from_millis(5),
                Box::new(move || ran.store(true, Ordering::SeqCst)),
            )
        };
        drop(sub);
        scheduler.advance_by(Duration::from_secs(1));
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending(), 0);
    }
}
