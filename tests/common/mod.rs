//! Shared test utilities and fixtures.

#![allow(dead_code, unused_imports)]

use flux_mvvm::api::{ApiError, InMemoryClient, PageResult, SearchClient};
use flux_mvvm::domain::{Page, PageInfo, Repository, User};
use flux_mvvm::flux::{Flux, Reducer};
use flux_mvvm::rx::{Element, Observable, Subject, Subscription};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Collects every value a stream emits while it is alive.
pub struct Recorder<T> {
    values: Arc<Mutex<Vec<T>>>,
    completed: Arc<Mutex<bool>>,
    _subscription: Subscription,
}

impl<T: Element> Recorder<T> {
    pub fn attach(source: &Observable<T>) -> Self {
        let values = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(Mutex::new(false));
        let subscription = source.subscribe_all(
            {
                let values = Arc::clone(&values);
                move |value| values.lock().push(value)
            },
            {
                let completed = Arc::clone(&completed);
                move || *completed.lock() = true
            },
        );
        Self {
            values,
            completed,
            _subscription: subscription,
        }
    }

    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }

    pub fn last(&self) -> Option<T> {
        self.values.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn clear(&self) {
        self.values.lock().clear();
    }

    pub fn is_completed(&self) -> bool {
        *self.completed.lock()
    }
}

/// Record every intent published on `R`'s dispatch channel.
pub fn record_intents<R: Reducer>(flux: &Flux) -> Recorder<R::Intent> {
    Recorder::attach(&flux.dispatcher().channel::<R>().as_observable())
}

pub fn user(login: &str) -> User {
    User {
        id: format!("id-{login}"),
        login: login.to_string(),
        avatar_url: None,
        repository_count: 0,
    }
}

pub fn users(logins: &[&str]) -> Vec<User> {
    logins.iter().map(|login| user(login)).collect()
}

pub fn repository(owner: &str, name: &str) -> Repository {
    Repository {
        id: format!("{owner}/{name}"),
        name: name.to_string(),
        owner_login: owner.to_string(),
        description: None,
        stargazer_count: 0,
        url: format!("https://example.invalid/{owner}/{name}"),
    }
}

pub fn page<T>(items: Vec<T>, total_count: usize, has_next_page: bool) -> Page<T> {
    let end = items.len();
    Page {
        items,
        page_info: PageInfo {
            has_next_page,
            end_cursor: Some(end.to_string()),
        },
        total_count,
    }
}

/// Directory with a predictable mix of logins.
pub fn directory(page_size: usize) -> InMemoryClient {
    InMemoryClient::new(page_size).with_users(users(&[
        "abc", "abcd", "abcde", "abce", "abcf", "alice", "alan", "bob",
    ]))
}

/// Wraps another client and records every request it sees.
pub struct RecordingClient<C> {
    inner: C,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl<C: SearchClient> RecordingClient<C> {
    pub fn new(inner: C) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().clone()
    }
}

impl<C: SearchClient> SearchClient for RecordingClient<C> {
    fn search_users(&self, query: &str, after: Option<&str>) -> Observable<PageResult<User>> {
        self.calls
            .lock()
            .push((query.to_string(), after.map(str::to_string)));
        self.inner.search_users(query, after)
    }

    fn user_repositories(
        &self,
        owner_login: &str,
        after: Option<&str>,
    ) -> Observable<PageResult<Repository>> {
        self.calls
            .lock()
            .push((owner_login.to_string(), after.map(str::to_string)));
        self.inner.user_repositories(owner_login, after)
    }
}

/// Client whose user searches stay in flight until the test answers them.
#[derive(Default)]
pub struct ManualClient {
    pending: Mutex<HashMap<String, Subject<PageResult<User>>>>,
}

impl ManualClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver `result` for the in-flight search of `query` and end it.
    pub fn respond(&self, query: &str, result: PageResult<User>) {
        let subject = self.pending.lock().remove(query);
        if let Some(subject) = subject {
            subject.on_next(result);
            subject.on_completed();
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.lock().len()
    }
}

impl SearchClient for ManualClient {
    fn search_users(&self, query: &str, _after: Option<&str>) -> Observable<PageResult<User>> {
        let subject = Subject::new();
        self.pending
            .lock()
            .insert(query.to_string(), subject.clone());
        subject.as_observable()
    }

    fn user_repositories(
        &self,
        owner_login: &str,
        _after: Option<&str>,
    ) -> Observable<PageResult<Repository>> {
        Observable::just(Err(ApiError::Request {
            query: owner_login.to_string(),
            message: "not served".to_string(),
        }))
    }
}
