pub mod classroom;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

pub use config::{AliasVersion, SyncConfig};
pub use error::{Result, SyncError, ValidationError};
