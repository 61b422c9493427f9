//! Field accessors for the user store.

use crate::domain::{PageInfo, User};
use crate::flux::Store;
use crate::rx::Observable;

use super::intent::UserIntent;
use super::reducer::UserReducer;

pub type UserStore = Store<UserReducer>;

impl Store<UserReducer> {
    pub fn users(&self) -> Observable<Vec<User>> {
        self.select(|s| s.users.clone())
    }

    pub fn users_value(&self) -> Vec<User> {
        self.value().users
    }

    pub fn selected_user(&self) -> Observable<Option<User>> {
        self.select(|s| s.selected_user.clone())
    }

    /// Selection changes after subscribing; the current selection is not replayed.
    pub fn selected_user_updates(&self) -> Observable<Option<User>> {
        self.select_updates(|s| s.selected_user.clone())
    }

    /// Every user selection applied after subscribing, repeats included.
    pub fn user_selections(&self) -> Observable<User> {
        self.applied().filter_map(|intent| match intent {
            UserIntent::SelectedUser(user) => user,
            _ => None,
        })
    }

    pub fn total_count(&self) -> Observable<usize> {
        self.select(|s| s.total_count)
    }

    pub fn is_fetching(&self) -> Observable<bool> {
        self.select(|s| s.is_fetching)
    }

    pub fn last_page_info_value(&self) -> Option<PageInfo> {
        self.value().last_page_info
    }

    pub fn last_search_query_value(&self) -> String {
        self.value().last_search_query
    }
}
