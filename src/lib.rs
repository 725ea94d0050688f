pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod keywords;
pub mod learner;
pub mod ranker;
pub mod report;
pub mod scorer;
pub mod selector;

pub use error::{RankError, Result};
pub use ranker::{AssetRanker, RankedResult};
