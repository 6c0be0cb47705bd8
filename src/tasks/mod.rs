//! Background Tasks Module
//!
//! Contains background tasks owned by individual stores.
//!
//! # Tasks
//! - TTL Sweep: Removes expired entries from an in-process store at its configured interval

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
