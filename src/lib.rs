pub mod app;
pub mod artifacts;
pub mod config;
pub mod consistency;
pub mod domain;
pub mod error;
pub mod join;
pub mod manifest;
pub mod metrics;
pub mod output;
pub mod schema;
pub mod table;
