use anyhow::{Context, Result};
use api::TrackingEngine;
use clap::Parser;
use common::calibration_manager::CalibrationManager;
use common::{initialize_engine, FacePipeline, PipelineConfig};
use ddemesh::load_config;
use ddemesh::session::{FrameOutcome, TrackingSession};
use log::{debug, error, info, warn};
use replay_module::ReplayModule;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ddemesh")]
#[command(author, version, about = "Pose a blendshape face mesh from tracked expressions", long_about = None)]
struct Args {
    /// Model name, e.g. "shape_0", "Man" or "OldMan"
    #[arg(short, long)]
    model: String,

    /// Recorded tracker frames (JSON)
    #[arg(short, long)]
    frames: PathBuf,

    /// Pipeline config file
    #[arg(short, long, default_value = "ddemesh.json")]
    config: PathBuf,

    /// Output mesh (default: <models_dir>/<model><output_suffix>.obj)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting...");

    let config = load_config(&args.config).unwrap_or_else(|e| {
        error!("{:#}. Using defaults.", e);
        PipelineConfig::default()
    });
    debug!("Loaded Config: {:?}", config);

    let mut calibration = CalibrationManager::new(config.calibration_dir(), &config.calibration_file);
    if let Err(e) = calibration.load() {
        error!("Failed to load calibration: {:#}. Using built-in table.", e);
    }

    let pipeline = FacePipeline::open(config.clone(), &args.model, &calibration.table)
        .with_context(|| format!("Cannot open model files for '{}'", args.model))?;

    let mut engine = ReplayModule::from_path(&args.frames)?;
    initialize_engine(&mut engine, "replay")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received Ctrl-C, stopping after the current frame...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let mut session = TrackingSession::new(&pipeline);
    if let Err(e) = session.start(&mut engine) {
        engine.unload();
        return Err(e).context("Face detection failed");
    }

    let mut updated = 0usize;
    let mut resets = 0usize;
    while running.load(Ordering::SeqCst) && !engine.is_exhausted() {
        match session.step(&mut engine)? {
            FrameOutcome::Updated => updated += 1,
            FrameOutcome::Skipped => {}
            FrameOutcome::Reset => resets += 1,
        }
    }
    engine.unload();
    info!("Tracked {} further frame(s), {} reset(s)", updated, resets);

    if !running.load(Ordering::SeqCst) {
        warn!("Interrupted; no mesh exported");
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| config.output_path(&args.model));
    match session.export_to(&output)? {
        Some(report) => info!(
            "Exported {} lines ({} vertices) to {:?}",
            report.lines,
            report.deformable_vertices + report.static_vertices,
            output
        ),
        None => warn!("Tracking was lost on the last frames; nothing to export"),
    }

    Ok(())
}
