//! Flux stores under MVVM view models.
//!
//! ```text
//! View events ──→ View-Model ──→ Action ──→ Dispatcher ──→ Store (Reducer)
//!      ↑                                                        │
//!      └──────────── View-Model outputs ←── state streams ←─────┘
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod flux;
pub mod rx;
pub mod viewmodel;
