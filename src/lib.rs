//! Doc Triage: classify inbound documents and file them into per-thread cases.

pub mod channels;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;
