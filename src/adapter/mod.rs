pub mod console;
pub mod convert;
pub mod json_file;
pub mod mongo;

pub use console::ConsoleSink;
pub use json_file::{JsonFileSink, JsonFileSnapshotSource};
pub use mongo::MongoSnapshotSource;
