use std::io::{BufRead, Write};

use glam::Vec3;
use log::{info, warn};

use crate::calibration::StaticCalibration;
use crate::error::{MeshError, Result};
use crate::transform::HeadRotation;
use crate::winding::{FaceWinding, WindingPolicy};

const VERTEX_MARKER: &[u8] = b"v";
const FACE_MARKER: &[u8] = b"f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Vertex,
    Face,
    PassThrough,
}

/// Counters collected while rewriting one mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub lines: usize,
    pub deformable_vertices: usize,
    pub static_vertices: usize,
    pub faces_reversed: usize,
    pub faces_kept: usize,
    pub faces_unhandled: usize,
}

/// Streams a reference mesh into a posed copy, one output line per input line.
///
/// Vertex lines are assigned by ordinal: the first `posed.len()` come from
/// the deformed blendshape mesh, the rest are static and get calibrated and
/// rotated from their own coordinates. Face lines are re-wound per
/// [`WindingPolicy`]. Everything else is copied byte for byte.
pub struct MeshRewriter<'a> {
    posed: &'a [Vec3],
    rotation: HeadRotation,
    calibration: StaticCalibration,
    winding: WindingPolicy,
}

impl<'a> MeshRewriter<'a> {
    pub fn new(
        posed: &'a [Vec3],
        rotation: HeadRotation,
        calibration: StaticCalibration,
        winding: WindingPolicy,
    ) -> Self {
        Self {
            posed,
            rotation,
            calibration,
            winding,
        }
    }

    pub fn rewrite<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<ExportReport> {
        let mut report = ExportReport::default();
        let mut line = Vec::new();
        let mut vertex_index = 0usize;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            report.lines += 1;
            let (body, ending) = split_line_ending(&line);

            match classify(body) {
                LineKind::Vertex => {
                    let point = if vertex_index < self.posed.len() {
                        report.deformable_vertices += 1;
                        self.posed[vertex_index]
                    } else {
                        report.static_vertices += 1;
                        let raw = parse_vertex(body, report.lines)?;
                        self.rotation.apply(self.calibration.apply(raw))
                    };
                    vertex_index += 1;

                    write!(writer, "v {:.6} {:.6} {:.6}", point.x, point.y, point.z)?;
                    writer.write_all(ending)?;
                }
                LineKind::Face => {
                    let text = as_text(body, report.lines)?;
                    let mut refs: Vec<&str> = text.split_whitespace().skip(1).collect();

                    match self.winding.decide(refs.len()) {
                        FaceWinding::Reverse => {
                            refs.reverse();
                            report.faces_reversed += 1;
                        }
                        FaceWinding::Keep => report.faces_kept += 1,
                        FaceWinding::Unhandled => {
                            warn!(
                                "Line {}: no winding rule for a face with {} references, copied as-is",
                                report.lines,
                                refs.len()
                            );
                            report.faces_unhandled += 1;
                            writer.write_all(&line)?;
                            continue;
                        }
                    }

                    writer.write_all(FACE_MARKER)?;
                    for r in &refs {
                        write!(writer, " {}", r)?;
                    }
                    writer.write_all(ending)?;
                }
                LineKind::PassThrough => writer.write_all(&line)?,
            }
        }
        writer.flush()?;

        if vertex_index < self.posed.len() {
            warn!(
                "Mesh has {} vertex lines but the blendshape model deforms {}",
                vertex_index,
                self.posed.len()
            );
        }
        info!(
            "Rewrote {} lines: {} deformed + {} static vertices, {} faces reversed, {} kept, {} unhandled",
            report.lines,
            report.deformable_vertices,
            report.static_vertices,
            report.faces_reversed,
            report.faces_kept,
            report.faces_unhandled
        );
        Ok(report)
    }
}

fn split_line_ending(line: &[u8]) -> (&[u8], &[u8]) {
    let body_len = if line.ends_with(b"\r\n") {
        line.len() - 2
    } else if line.ends_with(b"\n") {
        line.len() - 1
    } else {
        line.len()
    };
    line.split_at(body_len)
}

fn classify(body: &[u8]) -> LineKind {
    let first = body
        .split(|b| b.is_ascii_whitespace())
        .find(|token| !token.is_empty());

    match first {
        Some(VERTEX_MARKER) => LineKind::Vertex,
        Some(FACE_MARKER) => LineKind::Face,
        _ => LineKind::PassThrough,
    }
}

fn as_text(body: &[u8], line_number: usize) -> Result<&str> {
    std::str::from_utf8(body)
        .map_err(|_| MeshError::Format(format!("line {}: not valid UTF-8", line_number)))
}

fn parse_vertex(body: &[u8], line_number: usize) -> Result<Vec3> {
    let text = as_text(body, line_number)?;
    let mut coords = [0.0f32; 3];
    let mut values = text.split_whitespace().skip(1);

    for coord in &mut coords {
        *coord = values
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                MeshError::Format(format!("line {}: malformed vertex {:?}", line_number, text))
            })?;
    }
    Ok(Vec3::from_array(coords))
}
