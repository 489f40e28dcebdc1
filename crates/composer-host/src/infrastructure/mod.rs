//! Infrastructure adapters for the host process.
//!
//! - **`storage`** – TOML configuration and scenario files on disk.
//! - **`sink`**    – An [`OutputSink`](composer_core::OutputSink) that reports
//!   geometry commands through `tracing` instead of a media pipeline.

pub mod sink;
pub mod storage;
