//! File-backed configuration.

pub mod config;
