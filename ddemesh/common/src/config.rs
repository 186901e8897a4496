use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapter::GazeLayout;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StressConfig {
    /// Frames above this stress are rejected, prior state is kept.
    pub unreliable: f32,
    /// Frames above this stress mean tracking is lost and must restart.
    pub corrupt: f32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            unreliable: 2.0,
            corrupt: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub max_attempts: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub models_dir: PathBuf,
    /// Model whose triangles already have the right winding.
    #[serde(default = "default_reference_model")]
    pub reference_model: String,
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    #[serde(default = "default_calibration_file")]
    pub calibration_file: String,

    pub detection: DetectionConfig,
    pub stress: StressConfig,
    pub gaze: GazeLayout,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_reference_model() -> String {
    "shape_0".to_string()
}

fn default_output_suffix() -> String {
    "-output".to_string()
}

fn default_calibration_file() -> String {
    "calibration.json".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            reference_model: default_reference_model(),
            output_suffix: default_output_suffix(),
            calibration_file: default_calibration_file(),
            detection: DetectionConfig::default(),
            stress: StressConfig::default(),
            gaze: GazeLayout::default(),
        }
    }
}

impl PipelineConfig {
    pub fn database_path(&self, model: &str) -> PathBuf {
        self.models_dir.join(format!("{}.bs", model))
    }

    pub fn mesh_path(&self, model: &str) -> PathBuf {
        self.models_dir.join(format!("{}.obj", model))
    }

    pub fn output_path(&self, model: &str) -> PathBuf {
        self.models_dir
            .join(format!("{}{}.obj", model, self.output_suffix))
    }

    pub fn calibration_dir(&self) -> &Path {
        &self.models_dir
    }
}
