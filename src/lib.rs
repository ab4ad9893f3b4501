pub mod config;
pub mod enums;
pub mod errors;
pub mod logger;
pub mod services;
pub mod structs;
pub mod ui;
pub mod workers;
