use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use api::TrackedFrame;
use glam::Vec3;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::blendshape::BlendshapeDatabase;
use crate::calibration::{CalibrationTable, StaticCalibration};
use crate::config::PipelineConfig;
use crate::error::{MeshError, Result};
use crate::rewriter::{ExportReport, MeshRewriter};
use crate::transform::HeadRotation;
use crate::winding::WindingPolicy;

/// Deformed and rotated blendshape vertices for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PosedFrame {
    pub vertices: Vec<Vec3>,
    pub rotation: HeadRotation,
}

/// One loaded model: its blendshape database, calibration and winding policy.
pub struct FacePipeline {
    config: PipelineConfig,
    model: String,
    database: BlendshapeDatabase,
    calibration: StaticCalibration,
    winding: WindingPolicy,
}

impl FacePipeline {
    pub fn new(
        config: PipelineConfig,
        model: &str,
        database: BlendshapeDatabase,
        table: &CalibrationTable,
    ) -> Self {
        let calibration = table.lookup(model);
        let winding = WindingPolicy::for_model(model, &config.reference_model);
        Self {
            config,
            model: model.to_string(),
            database,
            calibration,
            winding,
        }
    }

    /// Load `<models_dir>/<model>.bs` and check the reference mesh can be opened.
    pub fn open(config: PipelineConfig, model: &str, table: &CalibrationTable) -> Result<Self> {
        let mesh_path = config.mesh_path(model);
        File::open(&mesh_path).map_err(|source| MeshError::ResourceUnavailable {
            path: mesh_path.clone(),
            source,
        })?;

        let database = BlendshapeDatabase::load(config.database_path(model))?;
        info!(
            "Model '{}' ready ({} expressions, static calibration {:?})",
            model,
            database.expression_count(),
            table.lookup(model)
        );
        Ok(Self::new(config, model, database, table))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn database(&self) -> &BlendshapeDatabase {
        &self.database
    }

    pub fn calibration(&self) -> StaticCalibration {
        self.calibration
    }

    /// Validate, adapt, deform and rotate one tracked frame.
    pub fn evaluate(&self, frame: &TrackedFrame) -> Result<PosedFrame> {
        self.config.stress.check(frame.validate_frame())?;

        let out_of_range = frame.out_of_range_count();
        if out_of_range > 0 {
            debug!("{} coefficient(s) outside the nominal range", out_of_range);
        }

        let mut coefficients = frame.coefficients().to_vec();
        self.config
            .gaze
            .apply(&mut coefficients, frame.pupil_position())?;

        let mut vertices = self.database.deform(&coefficients)?;
        let rotation = HeadRotation::from_quat(frame.rotation());
        rotation.apply_all(&mut vertices);

        Ok(PosedFrame { vertices, rotation })
    }

    pub fn rewriter<'a>(&self, posed: &'a PosedFrame) -> MeshRewriter<'a> {
        MeshRewriter::new(&posed.vertices, posed.rotation, self.calibration, self.winding)
    }

    /// Rewrite `mesh_path` into `output_path`.
    ///
    /// The mesh is written to a temporary file next to `output_path` and only
    /// moved into place once the whole document has been rewritten. An output
    /// path that names the source mesh is rejected.
    pub fn export_to(
        &self,
        posed: &PosedFrame,
        mesh_path: &Path,
        output_path: &Path,
    ) -> Result<ExportReport> {
        let input = File::open(mesh_path).map_err(|source| MeshError::ResourceUnavailable {
            path: mesh_path.to_path_buf(),
            source,
        })?;
        if is_same_file(mesh_path, output_path) {
            return Err(MeshError::ResourceUnavailable {
                path: output_path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "output would overwrite the source mesh",
                ),
            });
        }

        let unavailable = |source| MeshError::ResourceUnavailable {
            path: output_path.to_path_buf(),
            source,
        };
        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(unavailable)?;

        let report = self
            .rewriter(posed)
            .rewrite(BufReader::new(input), BufWriter::new(staged.as_file_mut()))?;
        staged
            .persist(output_path)
            .map_err(|e| unavailable(e.error))?;
        info!("Wrote posed mesh to {:?}", output_path);
        Ok(report)
    }

    /// Export using the configured file naming for this model.
    pub fn export(&self, posed: &PosedFrame) -> Result<ExportReport> {
        self.export_to(
            posed,
            &self.config.mesh_path(&self.model),
            &self.config.output_path(&self.model),
        )
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
