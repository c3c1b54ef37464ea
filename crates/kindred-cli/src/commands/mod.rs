//! CLI command implementations

pub mod completions;
pub mod config;
pub mod family;
pub mod io;
pub mod parent;
pub mod person;
pub mod query;
