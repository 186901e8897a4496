pub use api::{
    FrameSignal, ModuleLogger, TrackedFrame, TrackingEngine, EXPRESSION_COUNT, EXPR_COEF_MAX,
    EXPR_COEF_MIN,
};

mod adapter;
mod blendshape;
mod calibration;
pub mod calibration_manager;
mod config;
mod deformer;
mod error;
mod pipeline;
mod rewriter;
mod transform;
mod validator;
mod winding;

pub use adapter::GazeLayout;
pub use blendshape::BlendshapeDatabase;
pub use calibration::{CalibrationTable, StaticCalibration};
pub use config::{DetectionConfig, PipelineConfig, StressConfig};
pub use error::{MeshError, Result};
pub use pipeline::{FacePipeline, PosedFrame};
pub use rewriter::{ExportReport, MeshRewriter};
pub use transform::HeadRotation;
pub use validator::{acquire_usable_frame, initialize_engine, FrameStatus};
pub use winding::{FaceWinding, WindingPolicy, WindingRule};
