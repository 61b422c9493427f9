//! Base trait for store state.

/// Marker trait for store state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (every field a view model may read)
/// - Comparable (PartialEq so unchanged states are not republished)
/// - Defaultable (a freshly created store starts from `Default`)
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {}
