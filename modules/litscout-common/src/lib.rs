pub mod config;
pub mod error;
pub mod file_config;
pub mod taxonomy;
pub mod types;

pub use config::Config;
pub use error::LitScoutError;
pub use file_config::{ClassifierConfig, ClassifierMode, FileConfig, NotifyConfig, PipelineConfig};
pub use taxonomy::KeywordTaxonomy;
pub use types::*;
