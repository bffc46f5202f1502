//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Status Reporter: Logs cache coverage at configured intervals

mod status_reporter;

pub use status_reporter::spawn_status_reporter;
