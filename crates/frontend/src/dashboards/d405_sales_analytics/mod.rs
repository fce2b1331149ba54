pub mod api;
pub mod config;
pub mod insights;
pub mod loader;
pub mod sections;
pub mod state;
pub mod store;
pub mod table;
pub mod ui;
pub mod view_state;
