pub mod ranking_sink;
pub mod snapshot_source;

pub use ranking_sink::RankingSink;
pub use snapshot_source::SnapshotSource;
