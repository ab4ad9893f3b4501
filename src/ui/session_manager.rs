use std::sync::Arc;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;
use crate::config::constants::SESSION_IDLE_TTL_MINUTES;
use crate::enums::session_status::SessionStatus;
use crate::errors::{MacrosplitError, MacrosplitResult};
use crate::services::redistributor::Redistributor;
use crate::structs::calc::calc_session::CalcSession;
use crate::structs::calc::session_state::SessionState;
use crate::structs::category_set::CategorySet;

/// Registry of live form sessions, one per open browser tab. Every mutating
/// operation resolves the session, applies the core operation and answers
/// with the fresh state for rendering.
pub struct SessionManager {
    sessions: Arc<DashMap<String, CalcSession>>,
    initial_budget: f64,
}

impl SessionManager {
    pub fn new(initial_budget: f64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            initial_budget,
        }
    }

    pub fn create_session(&self) -> SessionState {
        let session_id = Uuid::new_v4().to_string();

        let mut set = CategorySet::default();
        Redistributor::apply_budget_change(&mut set, self.initial_budget);

        let session = CalcSession::new(session_id.clone(), set);
        let state = SessionState::from_session(&session);
        self.sessions.insert(session_id.clone(), session);

        log::info!("🆕 Created form session {}", session_id);
        state
    }

    pub fn get_session_state(&self, session_id: &str) -> MacrosplitResult<SessionState> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| MacrosplitError::session_not_found(session_id))?;
        Ok(SessionState::from_session(&session))
    }

    pub fn set_percentile(&self, session_id: &str, category: &str, value: f64) -> MacrosplitResult<SessionState> {
        if !value.is_finite() {
            return Err(MacrosplitError::user_input_error(
                &value.to_string(),
                "a finite percentile",
                "Enter a plain number such as 35",
            ));
        }
        self.mutate(session_id, category, |set, name| {
            Redistributor::apply_percentile_change(set, name, value);
        })
    }

    pub fn increment(&self, session_id: &str, category: &str) -> MacrosplitResult<SessionState> {
        self.mutate(session_id, category, Redistributor::increment)
    }

    pub fn decrement(&self, session_id: &str, category: &str) -> MacrosplitResult<SessionState> {
        self.mutate(session_id, category, Redistributor::decrement)
    }

    pub fn toggle_lock(&self, session_id: &str, category: &str) -> MacrosplitResult<SessionState> {
        self.mutate(session_id, category, Redistributor::toggle_lock)
    }

    pub fn set_budget(&self, session_id: &str, budget: f64) -> MacrosplitResult<SessionState> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(MacrosplitError::validation_error(
                "budget",
                &budget.to_string(),
                "must be a non-negative finite number",
                Some("Try a value like 2000"),
            ));
        }

        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| MacrosplitError::session_not_found(session_id))?;

        Redistributor::apply_budget_change(&mut session.set, budget);
        session.touch();
        Ok(SessionState::from_session(&session))
    }

    pub fn close_session(&self, session_id: &str) -> MacrosplitResult<()> {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| MacrosplitError::session_not_found(session_id))?;

        session.status = SessionStatus::Closed;
        log::info!("👋 Closed form session {}", session_id);
        Ok(())
    }

    pub fn cleanup_expired_sessions(&self) {
        let cutoff = Utc::now() - Duration::minutes(SESSION_IDLE_TTL_MINUTES);
        let before = self.sessions.len();

        self.sessions
            .retain(|_, session| session.status == SessionStatus::Active && session.last_activity > cutoff);

        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            log::info!("🧹 Dropped {} closed or idle sessions", removed);
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn mutate<F>(&self, session_id: &str, category: &str, op: F) -> MacrosplitResult<SessionState>
    where
        F: FnOnce(&mut CategorySet, &str),
    {
        let mut session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| MacrosplitError::session_not_found(session_id))?;

        if session.set.find(category).is_none() {
            return Err(MacrosplitError::category_not_found(
                category,
                session.set.category_names(),
            ));
        }

        op(&mut session.set, category);
        session.touch();
        Ok(SessionState::from_session(&session))
    }
}
