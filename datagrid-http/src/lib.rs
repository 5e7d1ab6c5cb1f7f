//! HTTP data source for `datagrid`
//!
//! Fetches grid pages from a list endpoint with `reqwest`.

pub mod config;
pub mod error;

mod source;

pub use config::HttpSourceConfig;
pub use error::HttpSourceError;
pub use source::*;
