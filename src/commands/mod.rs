//! Command implementations for assetrank CLI

mod misc;
mod rank;

pub use misc::*;
pub use rank::*;
