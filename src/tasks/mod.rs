//! Background Tasks Module
//!
//! # Tasks
//! - Sweeper: purges expired in-memory entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
