use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Square,
    Gaussian,
}
/// Raw run parameters as read from a JSON file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverParamParser {
    pub cell_num: usize,
    pub dx: f64,
    pub velocity: f64,
    pub final_time: f64,
    pub dt: f64,
    pub density_floor: f64,
    pub profile: ProfileKind,
    pub amplitude: f64,
    pub pulse_width: usize, // cells
    pub sigma_fraction: f64, // of the domain length
    pub output: PathBuf,
}
impl Default for SolverParamParser {
    fn default() -> Self {
        Self {
            cell_num: 1000,
            dx: 1.0,
            velocity: 10.0,
            final_time: 10.0,
            dt: 0.1,
            density_floor: 1e-6,
            profile: ProfileKind::Square,
            amplitude: 25.0,
            pulse_width: 100,
            sigma_fraction: 0.05,
            output: PathBuf::from("outputs/transport.csv"),
        }
    }
}
impl SolverParamParser {
    pub fn parse(file_path: &Path) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(file_path).map_err(|source| ConfigError::ReadFile {
            path: file_path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&file_content).map_err(|source| ConfigError::ParseFile {
            path: file_path.to_path_buf(),
            source,
        })
    }
}
