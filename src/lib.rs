pub use dolist_tui::cli;
pub use dolist_tui::commands;
pub use dolist_tui::config;
pub use dolist_tui::logging;
pub use dolist_tui::tui;
pub use dolist_tui::AppConfig;

pub use dolist_core as core;
pub use dolist_core::model;
pub use dolist_core::seed;
pub use dolist_core::storage;
