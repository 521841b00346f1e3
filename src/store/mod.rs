//! Case store and snapshot export.

pub mod cases;
pub mod export;

pub use cases::{CaseRecord, CaseStore, Envelope, StoreSnapshot};
pub use export::{JsonFileExporter, StoreExporter, load_snapshot};
