use std::path::Path;

use crate::api::config_dto::AnalysisConfigDto;
use crate::domain::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub use domain::aligner::align;
pub use domain::financial::summarize_financials;
pub use domain::optimizer::optimize;
pub use domain::simulator::simulate;
pub use domain::topology::infer_topology;

/// Loads and validates an analysis configuration. Without a path the
/// defaults are used.
pub fn load_config(file_path: Option<&Path>) -> Result<AnalysisConfig> {
    match file_path {
        Some(path) => {
            let dto: AnalysisConfigDto = parse_json_file(path)?;
            log::info!("Configuration '{}' parsed successfully.", path.display());
            AnalysisConfig::from_dto(dto)
        }
        None => {
            let config = AnalysisConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}
