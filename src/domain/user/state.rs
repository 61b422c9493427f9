//! State for the user search domain.

use serde::Serialize;

use crate::domain::{PageInfo, User};
use crate::flux::State;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserState {
    pub users: Vec<User>,
    pub selected_user: Option<User>,
    pub last_page_info: Option<PageInfo>,
    pub last_search_query: String,
    pub total_count: usize,
    pub is_fetching: bool,
}

impl State for UserState {}

impl UserState {
    /// Whether another page can be requested right now.
    pub fn can_fetch_next_page(&self) -> bool {
        !self.is_fetching
            && !self.last_search_query.is_empty()
            && self
                .last_page_info
                .as_ref()
                .is_some_and(|info| info.has_next_page)
    }
}
