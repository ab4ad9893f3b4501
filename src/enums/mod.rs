pub mod commands;
pub mod session_status;
