//! Domain layer: severities, configuration, records and errors.
//!
//! Nothing in here touches the filesystem.

pub mod errors;
pub mod models;

pub use errors::{LogError, LogResult};
