use serde::{Deserialize, Serialize};
use crate::services::redistributor::Redistributor;
use crate::structs::calc::calc_session::CalcSession;
use crate::structs::category::Category;

/// Wire payload answered by every form API route. `can_edit` drives the
/// increment/decrement controls and the "unlock at least two categories"
/// warning on the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub budget: f64,
    pub categories: Vec<Category>,
    pub can_edit: bool,
}

impl SessionState {
    pub fn from_session(session: &CalcSession) -> Self {
        Self {
            session_id: session.id.clone(),
            budget: session.set.budget,
            categories: session.set.categories.clone(),
            can_edit: Redistributor::can_edit(&session.set),
        }
    }
}
