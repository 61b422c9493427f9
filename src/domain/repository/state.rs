use serde::Serialize;

use crate::domain::{PageInfo, Repository};
use crate::flux::State;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RepositoryState {
    pub repositories: Vec<Repository>,
    pub favorites: Vec<Repository>,
    pub selected_repository: Option<Repository>,
    /// Owner whose repositories are listed.
    pub owner: Option<String>,
    pub last_page_info: Option<PageInfo>,
    pub total_count: usize,
    pub is_fetching: bool,
}

impl State for RepositoryState {}

impl RepositoryState {
    pub fn is_favorite(&self, repository: &Repository) -> bool {
        self.favorites.iter().any(|f| f.id == repository.id)
    }
}
