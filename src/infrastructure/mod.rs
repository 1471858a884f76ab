//! Infrastructure layer: filesystem, console and configuration adapters.

pub mod config;
pub mod logging;
