//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: physically removes expired entries from a `ResourceCache`

mod sweep;

pub use sweep::{spawn_sweep_task, SweepHandle};
