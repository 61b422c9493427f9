//! Flux primitives: actions, dispatch channels, and reference-counted stores.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Dispatcher ──→ Store (Reducer) ──→ state streams ──→ View-Model
//!    ↑                                                               │
//!    └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **Intent**: closed set of commands for one domain
//! - **Reducer**: pure function that transforms state based on intents
//! - **Store**: shared, reference-counted holder of one domain's state
//! - **StoreRegistry**: checkout/checkin of stores, one instance per domain

mod action;
mod context;
mod dispatcher;
mod intent;
mod reducer;
mod registry;
mod state;
mod store;

pub use action::Action;
pub use context::Flux;
pub use dispatcher::Dispatcher;
pub use intent::Intent;
pub use reducer::Reducer;
pub use registry::{RegistryError, StoreHandle, StoreRegistry};
pub use state::State;
pub use store::Store;
