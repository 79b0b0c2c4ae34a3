pub mod cli;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod loader;
pub mod metrics;
pub mod output_formats;
pub mod report;
pub mod search;
pub mod search_algorithms;
pub mod store;
pub mod technique;

pub use crate::config::{Config, EngineConfig};
pub use crate::error::{Result, TechfindError};
pub use crate::loader::{load_corpus, load_or_empty, parse_corpus};
pub use crate::search::{SearchEngine, SearchResult};
pub use crate::search_algorithms::{Algorithm, Matcher, MatcherKind, PatternMatcher};
pub use crate::store::RecordStore;
pub use crate::technique::Technique;
pub use clap::Parser;
pub use cli::{Cli, Commands};
