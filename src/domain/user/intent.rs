//! Intents for the user search domain.

use crate::domain::{Page, PageInfo, User};
use crate::flux::Intent;

/// Intents that can be dispatched to the user store.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    /// Append users to the current result list.
    AddUsers(Vec<User>),

    /// Clear the result list.
    RemoveAllUsers,

    /// Drop the previous search in one step: results, cursor, query and total.
    Reset,

    /// User tapped a row; `None` clears the selection.
    SelectedUser(Option<User>),

    LastPageInfo(Option<PageInfo>),

    LastSearchQuery(String),

    TotalCount(usize),

    IsFetching(bool),

    /// A fetched page for `query`, applied in one step.
    /// Ignored when the store has moved on to a different query.
    PageLoaded { query: String, page: Page<User> },
}

impl Intent for UserIntent {}
