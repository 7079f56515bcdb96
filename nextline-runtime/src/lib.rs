pub mod backend;
pub mod config_store;
pub mod files;
pub mod settings;
