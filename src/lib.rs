pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod history;
pub mod http_client;
pub mod provider;
pub mod render;
pub mod sanitize;
pub mod sportsdb_fetch;
pub mod state;
pub mod ui;
