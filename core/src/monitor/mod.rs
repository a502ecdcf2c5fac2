//! Supervision engine: classification, aggregation, transition tracking,
//! and the poll loop.

pub mod aggregate;
pub mod classify;
pub mod supervisor;
pub mod tracker;

pub use supervisor::{PollBatch, Supervisor, SupervisorEvent, SupervisorHandle};
