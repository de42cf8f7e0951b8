//! Background Tasks Module
//!
//! Contains background tasks that run while the engine is open.
//!
//! # Tasks
//! - Expiry sweep: proactively removes expired entries at a configured
//!   interval, complementing the lazy check on the read path.

mod sweep;

pub use sweep::spawn_sweep_task;
