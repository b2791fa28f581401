//! Configuration loading and management for the benefit consolidation engine.
//!
//! This module loads policy values, field-matching rules, source locations and
//! language-model settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use benefit_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Consolidating period {}", config.period());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AiConfig, EngineConfig, ExclusionSourceConfig, MatchingConfig, PolicyConfig, RegionAliases,
    SourcesConfig,
};
