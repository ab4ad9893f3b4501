pub mod form_server;
pub mod session_manager;
