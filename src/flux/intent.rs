//! Base trait for intents dispatched into a store.

use std::fmt::Debug;

/// Marker trait for intent objects.
///
/// Intents are a closed set per domain:
/// - User actions (select a row, change a query)
/// - Collaborator results (a page of entities arrived)
/// - Resets (remove everything, clear a cursor)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Clone + Debug + Send + Sync + 'static {}
