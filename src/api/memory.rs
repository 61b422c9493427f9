//! In-process directory used by the demo binary and tests.

use std::collections::HashMap;

use crate::domain::{Page, PageInfo, Repository, User};
use crate::rx::Observable;

use super::{ApiError, PageResult, SearchClient};

/// Serves pages out of memory. Cursors are decimal offsets.
#[derive(Debug, Clone)]
pub struct InMemoryClient {
    users: Vec<User>,
    repositories: HashMap<String, Vec<Repository>>,
    page_size: usize,
}

impl InMemoryClient {
    pub fn new(page_size: usize) -> Self {
        Self {
            users: Vec::new(),
            repositories: HashMap::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users);
        self
    }

    pub fn with_repositories(mut self, repositories: impl IntoIterator<Item = Repository>) -> Self {
        for repository in repositories {
            self.repositories
                .entry(repository.owner_login.clone())
                .or_default()
                .push(repository);
        }
        self
    }

    fn page_of<T: Clone>(&self, matches: &[T], query: &str, after: Option<&str>) -> PageResult<T> {
        let start = match after {
            None => 0,
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| ApiError::Request {
                    query: query.to_string(),
                    message: format!("invalid cursor '{cursor}'"),
                })?,
        };
        let end = (start + self.page_size).min(matches.len());
        let items = matches.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
        Ok(Page {
            items,
            page_info: PageInfo {
                has_next_page: end < matches.len(),
                end_cursor: (end > start).then(|| end.to_string()),
            },
            total_count: matches.len(),
        })
    }
}

impl SearchClient for InMemoryClient {
    fn search_users(&self, query: &str, after: Option<&str>) -> Observable<PageResult<User>> {
        if query.trim().is_empty() {
            return Observable::just(Ok(Page::empty()));
        }
        let needle = query.to_lowercase();
        let matches: Vec<User> = self
            .users
            .iter()
            .filter(|user| user.login.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Observable::just(self.page_of(&matches, query, after))
    }

    fn user_repositories(
        &self,
        owner_login: &str,
        after: Option<&str>,
    ) -> Observable<PageResult<Repository>> {
        let owned = self.repositories.get(owner_login).cloned().unwrap_or_default();
        Observable::just(self.page_of(&owned, owner_login, after))
    }
}
