use serde::{Deserialize, Serialize};
use crate::config::constants::{DEFAULT_BUDGET, DEFAULT_SPLIT};
use crate::structs::category::Category;

/// The whole form state: an ordered list of categories plus the budget they
/// split. Order is display order only; semantics never depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySet {
    pub budget: f64,
    pub categories: Vec<Category>,
}

impl CategorySet {
    pub fn new(budget: f64, split: &[(&str, f64)], locked: bool) -> Self {
        let categories = split
            .iter()
            .map(|(name, percentile)| Category::new(name, *percentile, budget, locked))
            .collect();

        Self { budget, categories }
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.categories.iter().filter(|c| !c.is_locked).count()
    }

    pub fn percentile_sum(&self) -> f64 {
        self.categories.iter().map(|c| c.percentile).sum()
    }
}

impl Default for CategorySet {
    /// Starting configuration of every new form session: budget 2000,
    /// 30/40/30 split, all categories locked.
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET, DEFAULT_SPLIT, true)
    }
}
