//! Commands for the repository domain.

use std::sync::Arc;

use crate::api::SearchClient;
use crate::domain::User;
use crate::flux::{Action, Flux};

use super::intent::RepositoryIntent;
use super::reducer::RepositoryReducer;

#[derive(Clone)]
pub struct RepositoryAction {
    action: Action<RepositoryReducer>,
    client: Arc<dyn SearchClient>,
}

impl RepositoryAction {
    pub fn new(flux: &Flux, client: Arc<dyn SearchClient>) -> Self {
        Self {
            action: flux.action::<RepositoryReducer>(),
            client,
        }
    }

    pub fn invoke(&self, intent: RepositoryIntent) {
        self.action.invoke(intent);
    }

    /// Fetch one page of `user`'s repositories, starting after `after`.
    ///
    /// Records `user` as the requested owner first, so pages still in flight
    /// for an earlier owner are dropped.
    pub fn fetch_repositories(&self, user: &User, after: Option<&str>) {
        self.invoke(RepositoryIntent::Owner(user.login.clone()));
        self.invoke(RepositoryIntent::IsFetching(true));

        let on_page = self.action.clone();
        let on_done = self.action.clone();
        let owner = user.login.clone();
        self.client
            .user_repositories(&user.login, after)
            .subscribe_all(
                move |result| match result {
                    Ok(page) => on_page.invoke(RepositoryIntent::PageLoaded {
                        owner: owner.clone(),
                        page,
                    }),
                    Err(err) => tracing::warn!(owner = %owner, error = %err, "repository fetch failed"),
                },
                move || on_done.invoke(RepositoryIntent::IsFetching(false)),
            )
            .detach();
    }
}
