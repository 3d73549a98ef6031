//! Data models

pub mod config;

pub use config::Config;
