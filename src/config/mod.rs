//! Configuration for TravelSplit
//!
//! - Platform-aware path resolution for local data, settings and the audit log
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SplitPaths;
pub use settings::Settings;
