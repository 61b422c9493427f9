//! Intents for the repository domain.

use crate::domain::{Page, PageInfo, Repository};
use crate::flux::Intent;

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryIntent {
    AddRepositories(Vec<Repository>),
    RemoveAllRepositories,
    SelectedRepository(Option<Repository>),
    LastPageInfo(Option<PageInfo>),
    TotalCount(usize),
    /// Owner whose repositories are being requested. Pages for anyone else
    /// are dropped from then on.
    Owner(String),
    IsFetching(bool),
    /// Add to favorites; a repository already present is left as is.
    AddFavorite(Repository),
    RemoveFavorite(Repository),
    /// A fetched page of `owner`'s repositories, applied in one step.
    PageLoaded { owner: String, page: Page<Repository> },
}

impl Intent for RepositoryIntent {}
