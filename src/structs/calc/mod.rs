pub mod calc_session;
pub mod session_state;
