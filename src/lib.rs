pub mod commands;
pub mod config;
pub mod global;
pub mod inventory;
pub mod retention;
pub mod ui;
pub mod utils;
