//! Reducer trait for the Flux store.

use super::intent::Intent;
use super::state::State;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> State. Intents a domain
/// does not care about return the state unchanged.
///
/// The reducer type doubles as the domain key for dispatch channels and the
/// store registry.
pub trait Reducer: Send + Sync + 'static {
    /// Domain name, used in logs.
    const DOMAIN: &'static str;

    /// The state type this reducer operates on.
    type State: State;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
