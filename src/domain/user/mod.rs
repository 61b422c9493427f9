mod action;
mod intent;
mod reducer;
mod state;
mod store;

pub use action::UserAction;
pub use intent::UserIntent;
pub use reducer::UserReducer;
pub use state::UserState;
pub use store::UserStore;
