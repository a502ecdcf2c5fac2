//! On-disk state.

pub mod settings;
