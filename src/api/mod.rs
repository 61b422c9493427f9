//! Boundary to the data collaborator that fetches users and repositories.
//!
//! The core only needs streams of pages; transport, retries and decoding
//! belong to the implementation behind [`SearchClient`].

mod memory;

use thiserror::Error;

use crate::domain::{Page, Repository, User};
use crate::rx::Observable;

pub use memory::InMemoryClient;

/// Failures reported by a [`SearchClient`]. They surface in stores only as
/// a fetch ending without new items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request for '{query}' failed: {message}")]
    Request { query: String, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type PageResult<T> = Result<Page<T>, ApiError>;

pub trait SearchClient: Send + Sync + 'static {
    /// Users whose login matches `query`, starting after `after`.
    fn search_users(&self, query: &str, after: Option<&str>) -> Observable<PageResult<User>>;

    /// Repositories owned by `owner_login`, starting after `after`.
    fn user_repositories(
        &self,
        owner_login: &str,
        after: Option<&str>,
    ) -> Observable<PageResult<Repository>>;
}
