use byteorder::{LittleEndian, WriteBytesExt};
use common::{BlendshapeDatabase, MeshError};
use glam::Vec3;
use std::io::Write;

fn encode(version: f32, shape_count: i32, vertex_count: i32, points: &[Vec3]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.write_f32::<LittleEndian>(version).unwrap();
    bytes.write_i32::<LittleEndian>(shape_count).unwrap();
    bytes.write_i32::<LittleEndian>(vertex_count).unwrap();
    for p in points {
        for c in p.to_array() {
            bytes.write_f32::<LittleEndian>(c).unwrap();
        }
    }
    bytes
}

fn sample_points() -> Vec<Vec3> {
    vec![
        // base
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-1.0, 0.5, 4.0),
        // delta 0
        Vec3::new(0.1, 0.0, 0.0),
        Vec3::new(0.0, 0.2, 0.0),
        // delta 1
        Vec3::new(0.0, 0.0, -0.3),
        Vec3::new(0.4, 0.4, 0.4),
    ]
}

#[test]
fn test_parse_three_shapes_two_vertices() {
    let points = sample_points();
    let db = BlendshapeDatabase::parse(&encode(3.0, 3, 2, &points)[..]).unwrap();

    assert_eq!(db.version, 3.0);
    assert_eq!(db.shape_count(), 3);
    assert_eq!(db.vertex_count(), 2);
    assert_eq!(db.expression_count(), 2);
    assert_eq!(db.base_vertices, points[0..2].to_vec());
    assert_eq!(db.delta_shapes.len(), 2);
    assert_eq!(db.delta_shapes[0], points[2..4].to_vec());
    assert_eq!(db.delta_shapes[1], points[4..6].to_vec());
}

#[test]
fn test_base_only_database() {
    let db = BlendshapeDatabase::parse(&encode(1.0, 1, 1, &[Vec3::ONE])[..]).unwrap();
    assert_eq!(db.expression_count(), 0);
    assert_eq!(db.base_vertices, vec![Vec3::ONE]);
}

#[test]
fn test_empty_mesh_is_valid() {
    let db = BlendshapeDatabase::parse(&encode(1.0, 4, 0, &[])[..]).unwrap();
    assert_eq!(db.vertex_count(), 0);
    assert_eq!(db.delta_shapes.len(), 3);
    assert!(db.delta_shapes.iter().all(|d| d.is_empty()));
}

#[test]
fn test_truncated_header() {
    let bytes = encode(3.0, 3, 2, &[]);
    let err = BlendshapeDatabase::parse(&bytes[..6]).unwrap_err();
    assert!(matches!(err, MeshError::Format(msg) if msg.contains("header")));
}

#[test]
fn test_truncated_base_vertices() {
    let points = sample_points();
    let bytes = encode(3.0, 3, 2, &points[..1]);
    let err = BlendshapeDatabase::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, MeshError::Format(msg) if msg.contains("base vertices")));
}

#[test]
fn test_truncated_last_delta_shape() {
    let points = sample_points();
    let mut bytes = encode(3.0, 3, 2, &points);
    bytes.truncate(bytes.len() - 4);
    let err = BlendshapeDatabase::parse(&bytes[..]).unwrap_err();
    assert!(matches!(err, MeshError::Format(msg) if msg.contains("delta shape 1")));
}

#[test]
fn test_invalid_counts() {
    let err = BlendshapeDatabase::parse(&encode(3.0, 0, 2, &[])[..]).unwrap_err();
    assert!(matches!(err, MeshError::Format(_)));

    let err = BlendshapeDatabase::parse(&encode(3.0, 2, -1, &[])[..]).unwrap_err();
    assert!(matches!(err, MeshError::Format(_)));
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let points = sample_points();
    let mut bytes = encode(3.0, 3, 2, &points);
    bytes.extend_from_slice(&[0xde, 0xad]);
    assert!(BlendshapeDatabase::parse(&bytes[..]).is_ok());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&encode(3.0, 3, 2, &sample_points())).unwrap();
    file.flush().unwrap();

    let db = BlendshapeDatabase::load(file.path()).unwrap();
    assert_eq!(db.shape_count(), 3);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = BlendshapeDatabase::load(dir.path().join("missing.bs")).unwrap_err();
    assert!(matches!(err, MeshError::ResourceUnavailable { .. }));
}
