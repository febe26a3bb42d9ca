pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use dolist_core as core;
pub use dolist_core::model;
pub use dolist_core::seed;
pub use dolist_core::storage;

pub use dolist_core::AppConfig;
