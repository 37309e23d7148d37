//! Backend worker: owns the tokio runtime and the conversion client.

pub mod commands;
pub mod runtime;
