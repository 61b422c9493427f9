//! User search screen.

use std::sync::{Arc, Weak};

use crate::api::SearchClient;
use crate::config::SearchConfig;
use crate::domain::user::{UserAction, UserIntent, UserReducer, UserStore};
use crate::domain::User;
use crate::flux::{Flux, StoreHandle};
use crate::rx::{combine_latest, Observable, Scheduler, Subject, SubscriptionBag, Variable};

use super::lifecycle::{lifecycle_gate, LifecycleEvent, PhaseTracker, ViewModelPhase};

/// Event streams the search view feeds in. Unused inputs default to streams
/// that never emit.
#[derive(Clone)]
pub struct SearchInputs {
    pub view_did_appear: Observable<()>,
    pub view_did_disappear: Observable<()>,
    pub search_text: Observable<String>,
    pub select_user_row_at: Observable<usize>,
    /// The list was scrolled to its last row.
    pub reached_bottom: Observable<()>,
    pub search_button_clicked: Observable<()>,
    pub cancel_button_clicked: Observable<()>,
    pub text_did_begin_editing: Observable<()>,
    pub text_did_end_editing: Observable<()>,
}

impl Default for SearchInputs {
    fn default() -> Self {
        Self {
            view_did_appear: Observable::never(),
            view_did_disappear: Observable::never(),
            search_text: Observable::never(),
            select_user_row_at: Observable::never(),
            reached_bottom: Observable::never(),
            search_button_clicked: Observable::never(),
            cancel_button_clicked: Observable::never(),
            text_did_begin_editing: Observable::never(),
            text_did_end_editing: Observable::never(),
        }
    }
}

/// What the subscriptions call back into. Pipelines hold it weakly.
struct SearchCore {
    action: UserAction,
    store: Arc<UserStore>,
}

impl SearchCore {
    /// Clear every trace of the previous search, then fetch the new one.
    fn reset_and_fetch(&self, query: &str) {
        tracing::debug!(query, "search query settled");
        self.action.invoke(UserIntent::Reset);
        self.action.fetch_users(query, None);
    }

    fn fetch_next_page(&self) {
        let state = self.store.value();
        if !state.can_fetch_next_page() {
            return;
        }
        let cursor = state.last_page_info.and_then(|info| info.end_cursor);
        self.action.fetch_users(&state.last_search_query, cursor.as_deref());
    }

    fn select(&self, user: User) {
        self.action.invoke(UserIntent::SelectedUser(Some(user)));
    }
}

fn with_core(core: &Weak<SearchCore>, f: impl FnOnce(&SearchCore)) {
    if let Some(core) = core.upgrade() {
        f(&core);
    }
}

pub struct SearchViewModel {
    core: Arc<SearchCore>,
    store: Option<StoreHandle<UserReducer>>,
    bag: SubscriptionBag,
    phase: PhaseTracker,
    reload_data: Subject<()>,
    show_user_repository: Subject<()>,
    counter_text: Variable<String>,
    dismiss_keyboard: Subject<()>,
    shows_cancel_button: Variable<bool>,
}

impl SearchViewModel {
    /// Build against the shared user store of `flux`, registering it.
    pub fn new(
        flux: &Flux,
        client: Arc<dyn SearchClient>,
        config: &SearchConfig,
        scheduler: Arc<dyn Scheduler>,
        inputs: SearchInputs,
    ) -> Self {
        Self::with_store(
            UserAction::new(flux, client),
            flux.register::<UserReducer>(),
            config,
            scheduler,
            inputs,
        )
    }

    /// Build with an injected action and store registration. The view model
    /// owns `store` and releases it when destroyed.
    pub fn with_store(
        action: UserAction,
        store: StoreHandle<UserReducer>,
        config: &SearchConfig,
        scheduler: Arc<dyn Scheduler>,
        inputs: SearchInputs,
    ) -> Self {
        let core = Arc::new(SearchCore {
            action,
            store: store.store(),
        });
        let vm = Self {
            core,
            store: Some(store),
            bag: SubscriptionBag::new(),
            phase: PhaseTracker::default(),
            reload_data: Subject::new(),
            show_user_repository: Subject::new(),
            counter_text: Variable::new(String::new()),
            dismiss_keyboard: Subject::new(),
            shows_cancel_button: Variable::new(false),
        };
        vm.bind(config, scheduler, inputs);
        vm
    }

    fn bind(&self, config: &SearchConfig, scheduler: Arc<dyn Scheduler>, inputs: SearchInputs) {
        let store = &self.core.store;
        let weak = Arc::downgrade(&self.core);

        self.phase
            .track(&inputs.view_did_appear, &inputs.view_did_disappear)
            .disposed_by(&self.bag);

        // Store → view
        Observable::merge(vec![
            store.users().map(|_| ()),
            store.is_fetching().map(|_| ()),
        ])
        .bind_to(&self.reload_data)
        .disposed_by(&self.bag);

        lifecycle_gate(
            &inputs.view_did_appear,
            &inputs.view_did_disappear,
            store.user_selections().map(|_| ()),
        )
        .bind_to(&self.show_user_repository)
        .disposed_by(&self.bag);

        let counter_text = self.counter_text.clone();
        combine_latest(
            &store.users().map(|users| users.len()),
            &store.total_count(),
            |count, total| format!("{count} / {total}"),
        )
        .observe_on(Arc::clone(&scheduler))
        .subscribe(move |text| counter_text.set(text))
        .disposed_by(&self.bag);

        // View → actions
        let on_query = weak.clone();
        inputs
            .search_text
            .debounce(config.debounce(), scheduler)
            .distinct_until_changed()
            .subscribe(move |text| with_core(&on_query, |core| core.reset_and_fetch(&text)))
            .disposed_by(&self.bag);

        let on_select = weak.clone();
        inputs
            .select_user_row_at
            .with_latest_from(&store.users(), |row, users: Vec<User>| users.get(row).cloned())
            .filter_map(|user| user)
            .subscribe(move |user| with_core(&on_select, |core| core.select(user)))
            .disposed_by(&self.bag);

        let on_bottom = weak;
        inputs
            .reached_bottom
            .subscribe(move |_| with_core(&on_bottom, SearchCore::fetch_next_page))
            .disposed_by(&self.bag);

        // View → view
        inputs
            .search_button_clicked
            .merge_with(&inputs.cancel_button_clicked)
            .bind_to(&self.dismiss_keyboard)
            .disposed_by(&self.bag);

        let shows_cancel_button = self.shows_cancel_button.clone();
        Observable::merge(vec![
            inputs.text_did_begin_editing.map(|_| true),
            inputs.text_did_end_editing.map(|_| false),
        ])
        .subscribe(move |shows| shows_cancel_button.set(shows))
        .disposed_by(&self.bag);
    }

    pub fn reload_data(&self) -> Observable<()> {
        self.reload_data.as_observable()
    }

    /// Fires when a row selection should navigate, only while the view is visible.
    pub fn show_user_repository(&self) -> Observable<()> {
        self.show_user_repository.as_observable()
    }

    /// `"{loaded} / {total}"`, replayed to new subscribers.
    pub fn counter_text(&self) -> Observable<String> {
        self.counter_text.observable()
    }

    pub fn dismiss_keyboard(&self) -> Observable<()> {
        self.dismiss_keyboard.as_observable()
    }

    pub fn shows_cancel_button(&self) -> Observable<bool> {
        self.shows_cancel_button.observable()
    }

    pub fn users_value(&self) -> Vec<User> {
        self.core.store.users_value()
    }

    pub fn user_at(&self, row: usize) -> Option<User> {
        self.users_value().get(row).cloned()
    }

    pub fn phase(&self) -> ViewModelPhase {
        self.phase.get()
    }

    /// Detach every subscription and release the store reference.
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

impl Drop for SearchViewModel {
    fn drop(&mut self) {
        self.destroy();
    }
}
