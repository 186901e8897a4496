use crate::calibration::{CalibrationTable, StaticCalibration};
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub struct CalibrationManager {
    pub table: CalibrationTable,
    storage_path: PathBuf,
}

impl CalibrationManager {
    pub fn new(storage_dir: &Path, file_name: &str) -> Self {
        Self {
            table: CalibrationTable::default(),
            storage_path: storage_dir.join(file_name),
        }
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn sanitized_for_save(&self) -> CalibrationTable {
        let mut table = self.table.clone();

        for calibration in table.models.values_mut() {
            if !calibration.is_finite() {
                *calibration = StaticCalibration::IDENTITY;
            }
        }

        table
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create calibration dir: {:?}", parent))?;
            }
        }
        let file = File::create(&self.storage_path).context("Failed to create calibration file")?;
        let sanitized = self.sanitized_for_save();
        serde_json::to_writer_pretty(file, &sanitized)
            .context("Failed to serialize calibration table")?;
        info!("Saved calibration table to {:?}", self.storage_path);
        Ok(())
    }

    pub fn load(&mut self) -> Result<()> {
        if !self.storage_path.exists() {
            info!(
                "No calibration file found at {:?}, using built-in table",
                self.storage_path
            );
            return Ok(());
        }

        let file = File::open(&self.storage_path).context("Failed to open calibration file")?;
        let reader = BufReader::new(file);
        let table: CalibrationTable =
            serde_json::from_reader(reader).context("Failed to deserialize calibration table")?;

        info!(
            "Loaded {} model calibration(s) from {:?}",
            table.models.len(),
            self.storage_path
        );
        self.table = table;
        Ok(())
    }
}
