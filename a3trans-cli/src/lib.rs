//! CLI library for testing purposes

pub mod config;
pub mod discover;
pub mod dump;
pub mod export;
pub mod extract;
pub mod import;

pub use config::{CONFIG_FILE, Config};
pub use discover::discover_scripts;
