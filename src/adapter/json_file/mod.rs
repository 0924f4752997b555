pub mod sink;
pub mod source;

pub use sink::JsonFileSink;
pub use source::{JsonFileSnapshotSource, parse_snapshot, write_snapshot};
