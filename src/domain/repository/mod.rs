mod action;
mod intent;
mod reducer;
mod state;
mod store;

pub use action::RepositoryAction;
pub use intent::RepositoryIntent;
pub use reducer::RepositoryReducer;
pub use state::RepositoryState;
pub use store::RepositoryStore;
