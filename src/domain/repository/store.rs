//! Field accessors for the repository store.

use crate::domain::Repository;
use crate::flux::Store;
use crate::rx::Observable;

use super::intent::RepositoryIntent;
use super::reducer::RepositoryReducer;

pub type RepositoryStore = Store<RepositoryReducer>;

impl Store<RepositoryReducer> {
    pub fn repositories(&self) -> Observable<Vec<Repository>> {
        self.select(|s| s.repositories.clone())
    }

    pub fn favorites(&self) -> Observable<Vec<Repository>> {
        self.select(|s| s.favorites.clone())
    }

    pub fn favorites_value(&self) -> Vec<Repository> {
        self.value().favorites
    }

    pub fn selected_repository(&self) -> Observable<Option<Repository>> {
        self.select(|s| s.selected_repository.clone())
    }

    pub fn selected_repository_updates(&self) -> Observable<Option<Repository>> {
        self.select_updates(|s| s.selected_repository.clone())
    }

    /// Every repository selection applied after subscribing, repeats included.
    pub fn repository_selections(&self) -> Observable<Repository> {
        self.applied().filter_map(|intent| match intent {
            RepositoryIntent::SelectedRepository(repository) => repository,
            _ => None,
        })
    }

    pub fn total_count(&self) -> Observable<usize> {
        self.select(|s| s.total_count)
    }
}
