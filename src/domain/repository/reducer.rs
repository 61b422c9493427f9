//! Reducer for the repository domain.

use crate::flux::Reducer;

use super::intent::RepositoryIntent;
use super::state::RepositoryState;

pub struct RepositoryReducer;

impl Reducer for RepositoryReducer {
    const DOMAIN: &'static str = "repository";
    type State = RepositoryState;
    type Intent = RepositoryIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            RepositoryIntent::AddRepositories(repositories) => {
                state.repositories.extend(repositories)
            }
            RepositoryIntent::RemoveAllRepositories => {
                state.repositories.clear();
                state.owner = None;
            }
            RepositoryIntent::SelectedRepository(repository) => {
                state.selected_repository = repository
            }
            RepositoryIntent::LastPageInfo(info) => state.last_page_info = info,
            RepositoryIntent::TotalCount(count) => state.total_count = count,
            RepositoryIntent::IsFetching(fetching) => state.is_fetching = fetching,
            RepositoryIntent::AddFavorite(repository) => {
                if !state.is_favorite(&repository) {
                    state.favorites.push(repository);
                }
            }
            RepositoryIntent::RemoveFavorite(repository) => {
                state.favorites.retain(|f| f.id != repository.id)
            }
            RepositoryIntent::Owner(owner) => state.owner = Some(owner),
            RepositoryIntent::PageLoaded { owner, page } => {
                // Late page for an owner that is no longer requested
                if state.owner.as_deref() != Some(owner.as_str()) {
                    return state;
                }
                state.repositories.extend(page.items);
                state.last_page_info = Some(page.page_info);
                state.total_count = page.total_count;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Page, PageInfo, Repository};

    fn repo(id: &str) -> Repository {
        Repository {
            id: id.to_string(),
            name: format!("repo-{id}"),
            owner_login: "octo".to_string(),
            description: None,
            stargazer_count: 0,
            url: format!("https://example.invalid/octo/{id}"),
        }
    }

    #[test]
    fn add_favorite_is_idempotent() {
        let state = RepositoryReducer::reduce(
            RepositoryState::default(),
            RepositoryIntent::AddFavorite(repo("1")),
        );
        let state = RepositoryReducer::reduce(state, RepositoryIntent::AddFavorite(repo("1")));
        assert_eq!(state.favorites.len(), 1);
    }

    #[test]
    fn remove_favorite_by_id() {
        let mut state = RepositoryState::default();
        state.favorites = vec![repo("1"), repo("2")];
        let state = RepositoryReducer::reduce(state, RepositoryIntent::RemoveFavorite(repo("1")));
        assert_eq!(state.favorites, vec![repo("2")]);
    }

    #[test]
    fn page_for_other_owner_is_ignored() {
        let mut state = RepositoryState::default();
        state.owner = Some("someone".to_string());
        let before = state.clone();
        let after = RepositoryReducer::reduce(
            state,
            RepositoryIntent::PageLoaded {
                owner: "octo".to_string(),
                page: Page {
                    items: vec![repo("1")],
                    page_info: PageInfo::default(),
                    total_count: 1,
                },
            },
        );
        assert_eq!(after, before);
    }

    fn page(id: &str) -> Page<Repository> {
        Page {
            items: vec![repo(id)],
            page_info: PageInfo::default(),
            total_count: 1,
        }
    }

    #[test]
    fn late_page_after_reset_does_not_claim_the_store() {
        let mut state = RepositoryState::default();
        state.owner = Some("alice".to_string());
        let state = RepositoryReducer::reduce(state, RepositoryIntent::RemoveAllRepositories);
        let state = RepositoryReducer::reduce(state, RepositoryIntent::Owner("bob".to_string()));
        let state = RepositoryReducer::reduce(
            state,
            RepositoryIntent::PageLoaded {
                owner: "alice".to_string(),
                page: page("a1"),
            },
        );
        let state = RepositoryReducer::reduce(
            state,
            RepositoryIntent::PageLoaded {
                owner: "bob".to_string(),
                page: page("b1"),
            },
        );
        assert_eq!(state.owner.as_deref(), Some("bob"));
        assert_eq!(state.repositories, vec![repo("b1")]);
    }

    #[test]
    fn page_without_requested_owner_is_ignored() {
        let state = RepositoryReducer::reduce(
            RepositoryState::default(),
            RepositoryIntent::PageLoaded {
                owner: "octo".to_string(),
                page: page("1"),
            },
        );
        assert_eq!(state, RepositoryState::default());
    }

    #[test]
    fn remove_all_resets_owner() {
        let mut state = RepositoryState::default();
        state.owner = Some("octo".to_string());
        state.repositories = vec![repo("1")];
        let state = RepositoryReducer::reduce(state, RepositoryIntent::RemoveAllRepositories);
        assert!(state.repositories.is_empty());
        assert!(state.owner.is_none());
    }
}
