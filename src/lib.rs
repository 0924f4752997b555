#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod ranker;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::RankerError;
pub use ranker::ChainRanker;
