//! Per-screen view models.
//!
//! A view model takes the view's event streams as inputs, reads one store,
//! invokes one action, and exposes derived output streams. It owns its
//! subscriptions and its store registration; destroying it detaches both.

mod favorite;
mod lifecycle;
mod search;

pub use favorite::{FavoriteInputs, FavoriteViewModel};
pub use lifecycle::{
    lifecycle_events, lifecycle_gate, LifecycleEvent, LifecycleReducer, ViewModelPhase,
};
pub use search::{SearchInputs, SearchViewModel};
