use common::{CalibrationTable, HeadRotation, StaticCalibration};
use glam::{Mat3, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

const EPS: f32 = 1e-5;

#[test]
fn test_identity_quaternion_only_flips_z() {
    let rotation = HeadRotation::from_quat(Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
    for p in [
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-4.5, 0.25, -7.0),
        Vec3::new(0.0, -1.0, 0.5),
    ] {
        assert_eq!(rotation.apply(p), Vec3::new(p.x, p.y, -p.z));
    }
}

#[test]
fn test_matches_conventional_rotation_for_unit_quaternions() {
    for q in [
        Quat::from_rotation_x(0.3),
        Quat::from_rotation_y(-1.1),
        Quat::from_euler(glam::EulerRot::YXZ, 0.4, -0.2, 0.9),
    ] {
        let rotation = HeadRotation::from_quat(q);
        assert!(
            rotation.matrix().abs_diff_eq(Mat3::from_quat(q), EPS),
            "{:?} vs {:?}",
            rotation.matrix(),
            Mat3::from_quat(q)
        );
    }
}

#[test]
fn test_rows_follow_closed_form() {
    let rotation = HeadRotation::from_quat(Quat::from_rotation_z(FRAC_PI_2));
    assert!(rotation.row(0).abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), EPS));
    assert!(rotation.row(1).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    assert!(rotation.row(2).abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPS));

    let p = rotation.apply(Vec3::new(1.0, 0.0, 2.0));
    assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, -2.0), EPS));
}

#[test]
fn test_negates_before_rotating() {
    let rotation = HeadRotation::from_quat(Quat::from_rotation_x(FRAC_PI_2));
    let p = rotation.apply(Vec3::new(0.0, 0.0, 1.0));
    // (0, 0, -1) rotated 90 degrees about x
    assert!(p.abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPS));

    // Rotating first and negating z afterwards lands on (0, -1, 0)
    assert!(!p.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), EPS));
}

#[test]
fn test_non_unit_quaternion_is_not_normalized() {
    let rotation = HeadRotation::from_quat(Quat::from_xyzw(1.0, 0.0, 0.0, 1.0));
    assert!(rotation.row(0).abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    assert!(rotation.row(1).abs_diff_eq(Vec3::new(0.0, -1.0, -2.0), EPS));
    assert!(rotation.row(2).abs_diff_eq(Vec3::new(0.0, 2.0, -1.0), EPS));
    assert!(rotation.row(1).length() > 1.0);
}

#[test]
fn test_apply_all_matches_apply() {
    let rotation = HeadRotation::from_quat(Quat::from_rotation_y(0.7));
    let points = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.5)];
    let mut posed = points.clone();
    rotation.apply_all(&mut posed);
    for (p, q) in points.iter().zip(&posed) {
        assert_eq!(rotation.apply(*p), *q);
    }
}

#[test]
fn test_static_calibration_offsets_then_scales() {
    let calibration = StaticCalibration::new(2.0, Vec3::new(1.0, -1.0, 0.5));
    assert_eq!(
        calibration.apply(Vec3::new(1.0, 2.0, 3.0)),
        Vec3::new(4.0, 2.0, 7.0)
    );
    assert_eq!(StaticCalibration::IDENTITY.apply(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_builtin_model_calibrations() {
    let table = CalibrationTable::default();

    let man = table.lookup("Man");
    let p = man.apply(Vec3::new(10.0, 109.965637, 4.265675));
    assert!(p.abs_diff_eq(Vec3::new(0.69982, 0.0, 0.0), EPS));

    let old_man = table.lookup("OldMan");
    let p = old_man.apply(Vec3::new(1.0, -0.35782, -0.62820));
    assert!(p.abs_diff_eq(Vec3::new(0.167268, 0.0, 0.0), EPS));

    assert_eq!(table.lookup("shape_0"), StaticCalibration::IDENTITY);
    assert_eq!(table.lookup("unknown"), StaticCalibration::IDENTITY);
}
