use macrosplit::services::redistributor::Redistributor;
use macrosplit::structs::category_set::CategorySet;
use macrosplit::ui::session_manager::SessionManager;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn default_set(budget: f64, locked: bool) -> CategorySet {
    CategorySet::new(
        budget,
        &[("protein", 30.0), ("carbs", 40.0), ("fat", 30.0)],
        locked,
    )
}

fn percentile(set: &CategorySet, name: &str) -> f64 {
    set.find(name).unwrap().percentile
}

fn value(set: &CategorySet, name: &str) -> f64 {
    set.find(name).unwrap().value
}

#[test]
fn edit_spreads_delta_across_unlocked_peers() {
    // Scenario A: 30/40/30 all unlocked, protein edited to 50.
    let mut set = default_set(2000.0, false);

    Redistributor::apply_percentile_change(&mut set, "protein", 50.0);

    assert!(approx(percentile(&set, "protein"), 50.0));
    assert!(approx(percentile(&set, "carbs"), 30.0));
    assert!(approx(percentile(&set, "fat"), 20.0));
    assert!(approx(value(&set, "protein"), 1000.0));
    assert!(approx(value(&set, "carbs"), 600.0));
    assert!(approx(value(&set, "fat"), 400.0));
}

#[test]
fn single_unlocked_peer_absorbs_whole_delta() {
    // Scenario B: carbs locked, protein edited to 50, fat takes all of it.
    let mut set = default_set(2000.0, false);
    Redistributor::toggle_lock(&mut set, "carbs");

    Redistributor::apply_percentile_change(&mut set, "protein", 50.0);

    assert!(approx(percentile(&set, "protein"), 50.0));
    assert!(approx(percentile(&set, "carbs"), 40.0));
    assert!(approx(percentile(&set, "fat"), 10.0));
    assert!(approx(value(&set, "protein"), 1000.0));
    assert!(approx(value(&set, "carbs"), 800.0));
    assert!(approx(value(&set, "fat"), 200.0));
}

#[test]
fn decrement_gives_the_step_to_the_unlocked_peer() {
    // Scenario C: fat locked, protein decremented once, carbs gains one.
    let mut set = default_set(2000.0, false);
    Redistributor::toggle_lock(&mut set, "fat");

    Redistributor::decrement(&mut set, "protein");

    assert!(approx(percentile(&set, "protein"), 29.0));
    assert!(approx(percentile(&set, "carbs"), 41.0));
    assert!(approx(percentile(&set, "fat"), 30.0));
}

#[test]
fn budget_change_recomputes_values_and_keeps_percentiles() {
    // Scenario D: budget 2000 -> 2500.
    let mut set = default_set(2000.0, true);

    Redistributor::apply_budget_change(&mut set, 2500.0);

    assert!(approx(percentile(&set, "protein"), 30.0));
    assert!(approx(percentile(&set, "carbs"), 40.0));
    assert!(approx(percentile(&set, "fat"), 30.0));
    assert!(approx(value(&set, "protein"), 750.0));
    assert!(approx(value(&set, "carbs"), 1000.0));
    assert!(approx(value(&set, "fat"), 750.0));
}

#[test]
fn increment_mirrors_a_plus_one_edit() {
    let mut set = default_set(2000.0, false);

    Redistributor::increment(&mut set, "carbs");

    assert!(approx(percentile(&set, "carbs"), 41.0));
    assert!(approx(percentile(&set, "protein"), 29.5));
    assert!(approx(percentile(&set, "fat"), 29.5));
}

#[test]
fn edit_with_no_unlocked_peers_moves_only_the_edited_category() {
    // Divisor defensively 1: the edited category absorbs the whole delta.
    let mut set = default_set(2000.0, true);
    Redistributor::toggle_lock(&mut set, "protein");

    Redistributor::apply_percentile_change(&mut set, "protein", 45.0);

    assert!(approx(percentile(&set, "protein"), 45.0));
    assert!(approx(percentile(&set, "carbs"), 40.0));
    assert!(approx(percentile(&set, "fat"), 30.0));
    assert!(approx(value(&set, "protein"), 900.0));
}

#[test]
fn unknown_category_edit_is_a_no_op() {
    let mut set = default_set(2000.0, false);
    let before = set.clone();

    Redistributor::apply_percentile_change(&mut set, "fiber", 10.0);

    for (a, b) in before.categories.iter().zip(set.categories.iter()) {
        assert_eq!(a.percentile, b.percentile);
        assert_eq!(a.value, b.value);
        assert_eq!(a.is_locked, b.is_locked);
    }
}

#[test]
fn lock_toggle_never_recomputes() {
    let mut set = default_set(2000.0, false);
    let before = set.clone();

    Redistributor::toggle_lock(&mut set, "carbs");

    assert!(set.find("carbs").unwrap().is_locked);
    for (a, b) in before.categories.iter().zip(set.categories.iter()) {
        assert_eq!(a.percentile, b.percentile);
        assert_eq!(a.value, b.value);
    }
}

#[test]
fn percentiles_are_not_clamped() {
    // Pushing protein far above 100 drags a peer below 0; both are allowed.
    let mut set = default_set(2000.0, false);
    Redistributor::toggle_lock(&mut set, "carbs");

    Redistributor::apply_percentile_change(&mut set, "protein", 120.0);

    assert!(approx(percentile(&set, "protein"), 120.0));
    assert!(approx(percentile(&set, "fat"), -60.0));
}

#[test]
fn can_edit_requires_two_unlocked_categories() {
    let mut set = default_set(2000.0, true);
    assert!(!Redistributor::can_edit(&set));

    Redistributor::toggle_lock(&mut set, "protein");
    assert!(!Redistributor::can_edit(&set));

    Redistributor::toggle_lock(&mut set, "carbs");
    assert!(Redistributor::can_edit(&set));

    Redistributor::toggle_lock(&mut set, "fat");
    assert!(Redistributor::can_edit(&set));
}

#[test]
fn new_sessions_start_locked_at_the_default_split() {
    let manager = SessionManager::new(2000.0);
    let state = manager.create_session();

    assert_eq!(state.categories.len(), 3);
    assert!(state.categories.iter().all(|c| c.is_locked));
    assert!(!state.can_edit);
    assert!(approx(state.budget, 2000.0));
    assert!(approx(state.categories.iter().map(|c| c.percentile).sum::<f64>(), 100.0));
}

#[test]
fn session_edits_flow_through_the_redistributor() {
    let manager = SessionManager::new(2000.0);
    let state = manager.create_session();
    let id = state.session_id;

    manager.toggle_lock(&id, "protein").unwrap();
    manager.toggle_lock(&id, "carbs").unwrap();
    let state = manager.set_percentile(&id, "protein", 50.0).unwrap();

    let protein = state.categories.iter().find(|c| c.name == "protein").unwrap();
    let carbs = state.categories.iter().find(|c| c.name == "carbs").unwrap();
    let fat = state.categories.iter().find(|c| c.name == "fat").unwrap();
    assert!(approx(protein.percentile, 50.0));
    assert!(approx(carbs.percentile, 20.0));
    assert!(approx(fat.percentile, 30.0));
    assert!(approx(protein.value, 1000.0));
}

#[test]
fn session_manager_rejects_bad_input() {
    let manager = SessionManager::new(2000.0);
    let state = manager.create_session();
    let id = state.session_id;

    assert!(manager.get_session_state("no-such-session").is_err());
    assert!(manager.set_percentile(&id, "fiber", 10.0).is_err());
    assert!(manager.set_percentile(&id, "protein", f64::NAN).is_err());
    assert!(manager.set_budget(&id, -10.0).is_err());

    // Failed edits leave the state untouched.
    let state = manager.get_session_state(&id).unwrap();
    assert!(approx(state.budget, 2000.0));
    assert!(approx(state.categories.iter().map(|c| c.percentile).sum::<f64>(), 100.0));
}

#[test]
fn closed_sessions_are_swept_by_cleanup() {
    let manager = SessionManager::new(2000.0);
    let kept = manager.create_session();
    let closed = manager.create_session();

    manager.close_session(&closed.session_id).unwrap();
    manager.cleanup_expired_sessions();

    assert_eq!(manager.session_count(), 1);
    assert!(manager.get_session_state(&kept.session_id).is_ok());
    assert!(manager.get_session_state(&closed.session_id).is_err());
}

// Strategy: a 30-ish/40-ish/30-ish split that always sums to exactly 100,
// with protein and carbs unlocked so every case has at least two unlocked
// categories.
fn split_strategy() -> impl Strategy<Value = (f64, f64, bool)> {
    (0.0f64..100.0).prop_flat_map(|protein| {
        (Just(protein), 0.0f64..(100.0 - protein), any::<bool>())
    })
}

proptest! {
    // P1: one edit keeps the percentile sum at 100 within epsilon.
    #[test]
    fn sum_is_preserved_by_one_edit(
        (protein, carbs, fat_locked) in split_strategy(),
        new_percentile in -50.0f64..150.0,
    ) {
        let fat = 100.0 - protein - carbs;
        let mut set = CategorySet::new(
            2000.0,
            &[("protein", protein), ("carbs", carbs), ("fat", fat)],
            false,
        );
        if fat_locked {
            Redistributor::toggle_lock(&mut set, "fat");
        }

        Redistributor::apply_percentile_change(&mut set, "protein", new_percentile);

        prop_assert!((set.percentile_sum() - 100.0).abs() < 1e-7);
    }

    // P2: locked categories are never touched by edits or steps.
    #[test]
    fn locked_categories_are_invariant(
        (protein, carbs, _) in split_strategy(),
        new_percentile in -50.0f64..150.0,
    ) {
        let fat = 100.0 - protein - carbs;
        let mut set = CategorySet::new(
            2000.0,
            &[("protein", protein), ("carbs", carbs), ("fat", fat)],
            false,
        );
        Redistributor::toggle_lock(&mut set, "fat");
        let locked_before = set.find("fat").unwrap().clone();

        Redistributor::apply_percentile_change(&mut set, "protein", new_percentile);
        Redistributor::increment(&mut set, "carbs");
        Redistributor::decrement(&mut set, "protein");

        let locked_after = set.find("fat").unwrap();
        prop_assert_eq!(locked_before.percentile, locked_after.percentile);
        prop_assert_eq!(locked_before.value, locked_after.value);
    }

    // P3: value derivation holds for every category after any operation.
    #[test]
    fn values_always_derive_from_budget_and_percentile(
        (protein, carbs, fat_locked) in split_strategy(),
        new_percentile in -50.0f64..150.0,
        new_budget in 0.0f64..10_000.0,
    ) {
        let fat = 100.0 - protein - carbs;
        let mut set = CategorySet::new(
            2000.0,
            &[("protein", protein), ("carbs", carbs), ("fat", fat)],
            false,
        );
        if fat_locked {
            Redistributor::toggle_lock(&mut set, "fat");
        }

        Redistributor::apply_percentile_change(&mut set, "carbs", new_percentile);
        Redistributor::apply_budget_change(&mut set, new_budget);

        for category in &set.categories {
            let expected = set.budget * category.percentile / 100.0;
            prop_assert!((category.value - expected).abs() < 1e-7);
        }
    }

    // P4: with exactly one unlocked peer, that peer absorbs the inverse delta.
    #[test]
    fn single_peer_absorbs_the_inverse_delta(
        (protein, carbs, _) in split_strategy(),
        new_percentile in -50.0f64..150.0,
    ) {
        let fat = 100.0 - protein - carbs;
        let mut set = CategorySet::new(
            2000.0,
            &[("protein", protein), ("carbs", carbs), ("fat", fat)],
            false,
        );
        Redistributor::toggle_lock(&mut set, "fat");

        let delta = new_percentile - protein;
        Redistributor::apply_percentile_change(&mut set, "protein", new_percentile);

        prop_assert!((set.find("carbs").unwrap().percentile - (carbs - delta)).abs() < 1e-7);
    }
}
