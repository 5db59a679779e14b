pub mod app;
pub mod backend;
pub mod config;
pub mod dedupe;
pub mod models;
