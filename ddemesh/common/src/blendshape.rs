use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;
use log::info;

use crate::error::{MeshError, Result};

// Counts come from the file; don't trust them for up-front allocation.
const MAX_PREALLOC: usize = 1 << 16;

/// Base mesh plus per-expression vertex offsets, as stored in a `.bs` file.
///
/// Layout (little-endian, no padding):
/// `f32 version`, `i32 shape_count`, `i32 vertex_count`,
/// `vertex_count` xyz triples for the base, then `shape_count - 1`
/// groups of `vertex_count` xyz offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendshapeDatabase {
    pub version: f32,
    pub base_vertices: Vec<Vec3>,
    pub delta_shapes: Vec<Vec<Vec3>>,
}

impl BlendshapeDatabase {
    pub fn new(version: f32, base_vertices: Vec<Vec3>, delta_shapes: Vec<Vec<Vec3>>) -> Self {
        debug_assert!(delta_shapes.iter().all(|d| d.len() == base_vertices.len()));
        Self {
            version,
            base_vertices,
            delta_shapes,
        }
    }

    /// Total shapes including the base.
    pub fn shape_count(&self) -> usize {
        self.delta_shapes.len() + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.base_vertices.len()
    }

    /// Number of coefficients a frame must supply.
    pub fn expression_count(&self) -> usize {
        self.delta_shapes.len()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| MeshError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let database = Self::parse(BufReader::new(file))?;
        info!(
            "Loaded blendshape database {:?}: {} shapes, {} vertices",
            path,
            database.shape_count(),
            database.vertex_count()
        );
        Ok(database)
    }

    pub fn parse<R: Read>(mut reader: R) -> Result<Self> {
        let version = reader
            .read_f32::<LittleEndian>()
            .map_err(|e| section_error(e, "header"))?;
        let shape_count = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| section_error(e, "header"))?;
        let vertex_count = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| section_error(e, "header"))?;

        if shape_count < 1 {
            return Err(MeshError::Format(format!(
                "shape count must be at least 1, got {}",
                shape_count
            )));
        }
        let vertex_count = usize::try_from(vertex_count).map_err(|_| {
            MeshError::Format(format!("negative vertex count {}", vertex_count))
        })?;

        let base_vertices = read_points(&mut reader, vertex_count, "base vertices")?;

        let delta_count = (shape_count - 1) as usize;
        let mut delta_shapes = Vec::with_capacity(delta_count.min(MAX_PREALLOC));
        for k in 0..delta_count {
            let section = format!("delta shape {}", k);
            delta_shapes.push(read_points(&mut reader, vertex_count, &section)?);
        }

        Ok(Self::new(version, base_vertices, delta_shapes))
    }
}

fn read_points<R: Read>(reader: &mut R, count: usize, section: &str) -> Result<Vec<Vec3>> {
    let mut points = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        let mut xyz = [0.0f32; 3];
        reader
            .read_f32_into::<LittleEndian>(&mut xyz)
            .map_err(|e| section_error(e, section))?;
        points.push(Vec3::from_array(xyz));
    }
    Ok(points)
}

fn section_error(err: io::Error, section: &str) -> MeshError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        MeshError::Format(format!("blendshape data truncated in {}", section))
    } else {
        MeshError::Io(err)
    }
}
