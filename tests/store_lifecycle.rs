mod common;

use common::{record_intents, user, users, Recorder};
use flux_mvvm::domain::user::{UserIntent, UserReducer, UserState};
use flux_mvvm::flux::{Flux, StoreRegistry};

#[test]
fn register_unregister_scenario() {
    let flux = Flux::new();
    let registry = flux.registry();
    let action = flux.action::<UserReducer>();

    let first = flux.register::<UserReducer>();
    assert_eq!(registry.ref_count::<UserReducer>(), 1);
    let original_id = first.instance_id();

    action.invoke(UserIntent::AddUsers(users(&["alice", "bob"])));
    action.invoke(UserIntent::RemoveAllUsers);
    assert!(first.users_value().is_empty());

    let second = flux.register::<UserReducer>();
    assert_eq!(registry.ref_count::<UserReducer>(), 2);
    assert_eq!(second.instance_id(), original_id);

    second.release();
    assert_eq!(registry.ref_count::<UserReducer>(), 1);
    assert!(!first.is_torn_down());
    assert!(first.users_value().is_empty());

    let retired = first.store();
    first.release();
    assert_eq!(registry.ref_count::<UserReducer>(), 0);
    assert!(!registry.is_registered::<UserReducer>());
    assert!(retired.is_torn_down());

    let third = flux.register::<UserReducer>();
    assert_eq!(registry.ref_count::<UserReducer>(), 1);
    assert_ne!(third.instance_id(), original_id);
    assert_eq!(third.value(), UserState::default());
}

#[test]
fn one_instance_per_positive_run() {
    let flux = Flux::new();
    let mut ids = Vec::new();

    for _ in 0..3 {
        let a = flux.register::<UserReducer>();
        let b = flux.register::<UserReducer>();
        let c = a.clone();
        assert_eq!(a.instance_id(), b.instance_id());
        assert_eq!(a.instance_id(), c.instance_id());
        assert_eq!(flux.registry().ref_count::<UserReducer>(), 3);
        ids.push(a.instance_id());
        drop(b);
        drop(c);
        drop(a);
        assert_eq!(flux.registry().ref_count::<UserReducer>(), 0);
    }

    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn teardown_happens_exactly_once() {
    let flux = Flux::new();
    let a = flux.register::<UserReducer>();
    let b = flux.register::<UserReducer>();
    let states = Recorder::attach(&a.state());

    a.release();
    assert!(!states.is_completed());
    b.release();
    assert!(states.is_completed());

    // A clone is a registration of its own.
    let c = flux.register::<UserReducer>();
    let d = c.clone();
    c.release();
    assert_eq!(flux.registry().ref_count::<UserReducer>(), 1);
    d.release();
    assert_eq!(flux.registry().ref_count::<UserReducer>(), 0);
}

#[test]
fn intents_dispatched_before_registration_are_not_replayed() {
    let flux = Flux::new();
    let action = flux.action::<UserReducer>();

    action.invoke(UserIntent::AddUsers(users(&["ghost"])));
    action.invoke(UserIntent::TotalCount(42));

    let store = flux.register::<UserReducer>();
    assert_eq!(store.value(), UserState::default());

    action.invoke(UserIntent::AddUsers(vec![user("alice")]));
    assert_eq!(store.users_value(), vec![user("alice")]);
}

#[test]
fn torn_down_store_stops_emitting() {
    let flux = Flux::new();
    let action = flux.action::<UserReducer>();
    let handle = flux.register::<UserReducer>();
    let store = handle.store();
    let recorded = Recorder::attach(&store.users());
    handle.release();

    action.invoke(UserIntent::AddUsers(users(&["alice", "bob"])));

    assert!(recorded.is_completed());
    assert_eq!(recorded.values(), vec![Vec::new()]);
    assert!(store.users_value().is_empty());

    let late = Recorder::attach(&store.total_count());
    assert!(late.is_completed());
    assert!(late.values().is_empty());
}

#[test]
fn every_action_shares_one_channel() {
    let flux = Flux::new();
    let store = flux.register::<UserReducer>();
    let intents = record_intents::<UserReducer>(&flux);

    flux.action::<UserReducer>().invoke(UserIntent::TotalCount(3));
    flux.action::<UserReducer>().invoke(UserIntent::TotalCount(7));

    assert_eq!(
        intents.values(),
        vec![UserIntent::TotalCount(3), UserIntent::TotalCount(7)]
    );
    assert_eq!(store.value().total_count, 7);
}

#[test]
fn dispatch_after_shutdown_is_dropped() {
    let flux = Flux::new();
    let store = flux.register::<UserReducer>();
    flux.shutdown();

    flux.action::<UserReducer>().invoke(UserIntent::TotalCount(9));

    assert!(flux.dispatcher().is_closed());
    assert_eq!(store.value().total_count, 0);
}

#[test]
fn select_updates_skips_the_current_value() {
    let flux = Flux::new();
    let store = flux.register::<UserReducer>();
    let action = flux.action::<UserReducer>();
    action.invoke(UserIntent::SelectedUser(Some(user("alice"))));

    let replayed = Recorder::attach(&store.selected_user());
    let updates = Recorder::attach(&store.selected_user_updates());
    action.invoke(UserIntent::TotalCount(1));
    action.invoke(UserIntent::SelectedUser(Some(user("bob"))));

    assert_eq!(
        replayed.values(),
        vec![Some(user("alice")), Some(user("bob"))]
    );
    assert_eq!(updates.values(), vec![Some(user("bob"))]);
}

#[test]
fn separate_registries_do_not_share_stores() {
    let one = Flux::new();
    let two = StoreRegistry::new(one.dispatcher().clone());
    let a = one.register::<UserReducer>();
    let b = two.register::<UserReducer>();
    assert_ne!(a.instance_id(), b.instance_id());
}

#[test]
fn applied_reports_repeated_selections() {
    let flux = Flux::new();
    let store = flux.register::<UserReducer>();
    let action = flux.action::<UserReducer>();
    let selections = Recorder::attach(&store.user_selections());

    action.invoke(UserIntent::SelectedUser(Some(user("alice"))));
    action.invoke(UserIntent::SelectedUser(Some(user("alice"))));
    action.invoke(UserIntent::SelectedUser(None));

    assert_eq!(selections.values(), vec![user("alice"), user("alice")]);
    assert_eq!(store.value().selected_user, None);
}
