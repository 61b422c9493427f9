//! Favorite repositories screen.

use std::sync::{Arc, Weak};

use crate::domain::repository::{RepositoryIntent, RepositoryReducer};
use crate::domain::Repository;
use crate::flux::{Action, Flux, Store, StoreHandle};
use crate::rx::{Observable, Subject, SubscriptionBag};

use super::lifecycle::{lifecycle_gate, LifecycleEvent, PhaseTracker, ViewModelPhase};

#[derive(Clone)]
pub struct FavoriteInputs {
    pub view_did_appear: Observable<()>,
    pub view_did_disappear: Observable<()>,
    pub select_repository_row_at: Observable<usize>,
}

impl Default for FavoriteInputs {
    fn default() -> Self {
        Self {
            view_did_appear: Observable::never(),
            view_did_disappear: Observable::never(),
            select_repository_row_at: Observable::never(),
        }
    }
}

pub struct FavoriteViewModel {
    action: Arc<Action<RepositoryReducer>>,
    store: Option<StoreHandle<RepositoryReducer>>,
    favorites: Arc<Store<RepositoryReducer>>,
    bag: SubscriptionBag,
    phase: PhaseTracker,
    reload_data: Subject<()>,
    show_repository: Subject<()>,
}

impl FavoriteViewModel {
    pub fn new(flux: &Flux, inputs: FavoriteInputs) -> Self {
        Self::with_store(
            flux.action::<RepositoryReducer>(),
            flux.register::<RepositoryReducer>(),
            inputs,
        )
    }

    pub fn with_store(
        action: Action<RepositoryReducer>,
        store: StoreHandle<RepositoryReducer>,
        inputs: FavoriteInputs,
    ) -> Self {
        let vm = Self {
            action: Arc::new(action),
            favorites: store.store(),
            store: Some(store),
            bag: SubscriptionBag::new(),
            phase: PhaseTracker::default(),
            reload_data: Subject::new(),
            show_repository: Subject::new(),
        };
        vm.bind(inputs);
        vm
    }

    fn bind(&self, inputs: FavoriteInputs) {
        let store = &self.favorites;

        self.phase
            .track(&inputs.view_did_appear, &inputs.view_did_disappear)
            .disposed_by(&self.bag);

        lifecycle_gate(
            &inputs.view_did_appear,
            &inputs.view_did_disappear,
            store.repository_selections().map(|_| ()),
        )
        .bind_to(&self.show_repository)
        .disposed_by(&self.bag);

        let action: Weak<Action<RepositoryReducer>> = Arc::downgrade(&self.action);
        inputs
            .select_repository_row_at
            .with_latest_from(&store.favorites(), |row, favorites: Vec<Repository>| {
                favorites.get(row).cloned()
            })
            .filter_map(|repository| repository)
            .subscribe(move |repository| {
                if let Some(action) = action.upgrade() {
                    action.invoke(RepositoryIntent::SelectedRepository(Some(repository)));
                }
            })
            .disposed_by(&self.bag);

        store
            .favorites()
            .map(|_| ())
            .bind_to(&self.reload_data)
            .disposed_by(&self.bag);
    }

    pub fn reload_data(&self) -> Observable<()> {
        self.reload_data.as_observable()
    }

    pub fn show_repository(&self) -> Observable<()> {
        self.show_repository.as_observable()
    }

    pub fn favorites_value(&self) -> Vec<Repository> {
        self.favorites.favorites_value()
    }

    pub fn phase(&self) -> ViewModelPhase {
        self.phase.get()
    }

    pub fn dispose(mut self) {
        self.destroy();
    }

    fn destroy(&mut self) {
        let Some(store) = self.store.take() else {
            return;
        };
        self.bag.dispose();
        self.phase.apply(LifecycleEvent::Destroy);
        store.release();
    }
}

impl Drop for FavoriteViewModel {
    fn drop(&mut self) {
        self.destroy();
    }
}
