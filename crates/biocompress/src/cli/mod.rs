//! Command handlers.

pub mod compress;
pub mod config;
