pub mod session;

use anyhow::{Context, Result};
use common::PipelineConfig;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Read the pipeline config, writing a default one first if it is missing.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        info!("No pipeline config at {:?}, writing defaults", path);
        let config = PipelineConfig::default();
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &config)
            .with_context(|| format!("Failed to write default config to {:?}", path))?;
        return Ok(config);
    }

    info!("Loading pipeline config from {:?}", path);
    let file =
        File::open(path).with_context(|| format!("Failed to open config file {:?}", path))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config file {:?}", path))
}
