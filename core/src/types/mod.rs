//! Domain types shared across the supervision engine.

pub mod config;
pub mod health;
pub mod output;
pub mod target;
