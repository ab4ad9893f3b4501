use crate::config::constants::{MIN_UNLOCKED_FOR_EDIT, PERCENTILE_STEP};
use crate::structs::category_set::CategorySet;

/// The redistribution core. Every operation is a synchronous in-place
/// mutation of the passed-in set; no I/O, no allocation beyond bookkeeping.
///
/// When one unlocked category's percentile moves, the delta is spread evenly
/// (with inverted sign) across the other unlocked categories so the total
/// stays at ~100. Locked categories never move. Percentiles are deliberately
/// not clamped to 0-100: clamping would break sum preservation.
pub struct Redistributor;

impl Redistributor {
    /// Sets `edited_name` to `new_percentile` and shifts every other unlocked
    /// category by the inverse share of the delta. Unknown names are a no-op.
    pub fn apply_percentile_change(set: &mut CategorySet, edited_name: &str, new_percentile: f64) {
        let old_percentile = match set.find(edited_name) {
            Some(category) => category.percentile,
            None => {
                log::debug!("Ignoring percentile change for unknown category '{}'", edited_name);
                return;
            }
        };

        let delta = new_percentile - old_percentile;

        let peer_count = set
            .categories
            .iter()
            .filter(|c| !c.is_locked && c.name != edited_name)
            .count();

        // Divisor of 1 when no unlocked peer exists: the edited category
        // absorbs the whole delta on its own.
        let share = delta.abs() / peer_count.max(1) as f64;
        let signed_share = if new_percentile > old_percentile { -share } else { share };

        let budget = set.budget;
        for category in &mut set.categories {
            if category.is_locked || category.name == edited_name {
                continue;
            }
            category.percentile += signed_share;
            category.recompute_value(budget);
        }

        if let Some(edited) = set.find_mut(edited_name) {
            edited.percentile = new_percentile;
            edited.recompute_value(budget);
        }
    }

    /// Bumps the named category's percentile up by one step.
    pub fn increment(set: &mut CategorySet, name: &str) {
        if let Some(category) = set.find(name) {
            let target = category.percentile + PERCENTILE_STEP;
            Self::apply_percentile_change(set, name, target);
        }
    }

    /// Bumps the named category's percentile down by one step.
    pub fn decrement(set: &mut CategorySet, name: &str) {
        if let Some(category) = set.find(name) {
            let target = category.percentile - PERCENTILE_STEP;
            Self::apply_percentile_change(set, name, target);
        }
    }

    /// Flips the lock on the named category. No recomputation happens here;
    /// the lock only changes who participates in future redistributions.
    pub fn toggle_lock(set: &mut CategorySet, name: &str) {
        if let Some(category) = set.find_mut(name) {
            category.is_locked = !category.is_locked;
        } else {
            log::debug!("Ignoring lock toggle for unknown category '{}'", name);
        }
    }

    /// Editing is only meaningful with at least two unlocked categories:
    /// one to edit and one to borrow from.
    pub fn can_edit(set: &CategorySet) -> bool {
        set.unlocked_count() >= MIN_UNLOCKED_FOR_EDIT
    }

    /// Rederives every category's value from its unchanged percentile and the
    /// new budget. Also the initialization rule on first load.
    pub fn apply_budget_change(set: &mut CategorySet, budget: f64) {
        set.budget = budget;
        for category in &mut set.categories {
            category.recompute_value(budget);
        }
    }
}
