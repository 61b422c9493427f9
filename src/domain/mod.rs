//! Domains: one reducer, state, intent set and action per store.

mod model;
pub mod repository;
pub mod user;

pub use model::{Page, PageInfo, Repository, User};
