pub mod ancestry;
pub mod config;
pub mod error;
pub mod graph;
pub mod reports;
pub mod social;
pub mod types;
