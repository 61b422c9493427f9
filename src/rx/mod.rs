//! Reactive stream substrate.
//!
//! A deliberately small operator set over hot subjects and cold pipelines:
//!
//! ```text
//! Subject / Variable ──→ map · filter · merge · flat_map_latest
//!                        with_latest_from · combine_latest
//!                        debounce · distinct_until_changed · observe_on ──→ Observer
//! ```
//!
//! Dropping a [`Subscription`] detaches from the source; no callback reaches
//! an observer after that point.

mod observable;
mod observer;
mod operators;
mod scheduler;
mod subject;
mod subscription;
pub mod transaction;
mod variable;

pub use observable::Observable;
pub use observer::{Element, Observer};
pub use operators::combine_latest;
pub use scheduler::{Job, MainLoop, MainScheduler, Scheduler, VirtualTimeScheduler};
pub use subject::Subject;
pub use subscription::{Subscription, SubscriptionBag};
pub use transaction::transaction;
pub use variable::Variable;
