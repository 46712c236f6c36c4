pub mod app;
pub mod config;
pub mod error;
pub mod memory_store;
pub mod proxy_store;
pub mod proxy_sweeper;
pub mod setup;
pub mod suppression_list;
