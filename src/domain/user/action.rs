//! Commands for the user search domain.

use std::sync::Arc;

use crate::api::SearchClient;
use crate::flux::{Action, Flux};

use super::intent::UserIntent;
use super::reducer::UserReducer;

/// Publishes user intents and runs user searches against the collaborator.
#[derive(Clone)]
pub struct UserAction {
    action: Action<UserReducer>,
    client: Arc<dyn SearchClient>,
}

impl UserAction {
    pub fn new(flux: &Flux, client: Arc<dyn SearchClient>) -> Self {
        Self {
            action: flux.action::<UserReducer>(),
            client,
        }
    }

    pub fn invoke(&self, intent: UserIntent) {
        self.action.invoke(intent);
    }

    /// Fetch one page of users for `query`, starting after `after`.
    ///
    /// Dispatches `LastSearchQuery` and `IsFetching(true)` first, then one
    /// `PageLoaded` per page, then `IsFetching(false)` when the request ends.
    pub fn fetch_users(&self, query: &str, after: Option<&str>) {
        self.invoke(UserIntent::LastSearchQuery(query.to_string()));
        self.invoke(UserIntent::IsFetching(true));

        let on_page = self.action.clone();
        let on_done = self.action.clone();
        let request = query.to_string();
        self.client
            .search_users(query, after)
            .subscribe_all(
                move |result| match result {
                    Ok(page) => on_page.invoke(UserIntent::PageLoaded {
                        query: request.clone(),
                        page,
                    }),
                    Err(err) => tracing::warn!(query = %request, error = %err, "user search failed"),
                },
                move || on_done.invoke(UserIntent::IsFetching(false)),
            )
            // The request ends on its own; stale pages are dropped by the reducer.
            .detach();
    }
}
