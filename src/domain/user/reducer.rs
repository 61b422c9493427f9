//! Reducer for the user search domain.

use crate::flux::Reducer;

use super::intent::UserIntent;
use super::state::UserState;

pub struct UserReducer;

impl Reducer for UserReducer {
    const DOMAIN: &'static str = "user";
    type State = UserState;
    type Intent = UserIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            UserIntent::AddUsers(users) => state.users.extend(users),
            UserIntent::RemoveAllUsers => state.users.clear(),
            UserIntent::Reset => {
                state.users.clear();
                state.last_page_info = None;
                state.last_search_query.clear();
                state.total_count = 0;
            }
            UserIntent::SelectedUser(user) => state.selected_user = user,
            UserIntent::LastPageInfo(info) => state.last_page_info = info,
            UserIntent::LastSearchQuery(query) => state.last_search_query = query,
            UserIntent::TotalCount(count) => state.total_count = count,
            UserIntent::IsFetching(fetching) => state.is_fetching = fetching,
            UserIntent::PageLoaded { query, page } => {
                // Stale page from a search that has since been reset
                if query != state.last_search_query {
                    return state;
                }
                state.users.extend(page.items);
                state.last_page_info = Some(page.page_info);
                state.total_count = page.total_count;
            }
        }
        state
    }
}
