use serde::{Deserialize, Serialize};

/// One macro-nutrient slice of the budget. `value` is always derived from
/// `budget * percentile / 100`; `percentile` is intentionally not clamped
/// to 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub percentile: f64,
    pub value: f64,
    pub is_locked: bool,
}

impl Category {
    pub fn new(name: &str, percentile: f64, budget: f64, is_locked: bool) -> Self {
        Self {
            name: name.to_string(),
            percentile,
            value: budget * percentile / 100.0,
            is_locked,
        }
    }

    pub fn recompute_value(&mut self, budget: f64) {
        self.value = budget * self.percentile / 100.0;
    }
}
