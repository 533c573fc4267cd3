//! End-to-end scenarios, one per named case in the kernel's testable
//! properties: a multi-feature bracket, torus-via-revolve agreement,
//! extrude-equals-box agreement, the drop-cutter law, a full
//! surfacing-to-G-code pipeline, and the subtract auto-naming law.

use approx::assert_abs_diff_eq;
use glam::DVec3;

use kerf_core::prelude::*;

#[test]
fn bracket_bounds_mesh_and_containment() {
    let bracket = box3(150.0, 80.0, 40.0)
        .unwrap()
        .subtract(box3(120.0, 60.0, 25.0).unwrap().translate(0.0, 0.0, 7.5), None)
        .subtract(cylinder(5.0, 50.0).unwrap().translate(-30.0, 0.0, 0.0), None)
        .subtract(cylinder(5.0, 50.0).unwrap().translate(30.0, 0.0, 0.0), None)
        .round(2.0)
        .unwrap();

    let bounds = bracket.bounds();
    assert_abs_diff_eq!(bounds.min.x, -77.0, epsilon = 0.5);
    assert_abs_diff_eq!(bounds.min.y, -42.0, epsilon = 0.5);
    assert_abs_diff_eq!(bounds.min.z, -22.0, epsilon = 0.5);
    assert_abs_diff_eq!(bounds.max.x, 77.0, epsilon = 0.5);
    assert_abs_diff_eq!(bounds.max.y, 42.0, epsilon = 0.5);
    assert_abs_diff_eq!(bounds.max.z, 22.0, epsilon = 0.5);

    assert!(bracket.contains(DVec3::ZERO));
    assert!(!bracket.contains(DVec3::new(-30.0, 0.0, 0.0)));

    let mesh = marching_cubes(&bracket, &MeshConfig::default().with_resolution(1.0)).unwrap();
    assert!(mesh.triangle_count() >= 1000);
}

#[test]
fn revolved_circle_agrees_with_torus_primitive() {
    let revolved = revolve(circle2d(10.0).unwrap(), 30.0).unwrap();
    let torus_shape = torus(30.0, 10.0).unwrap();

    for p in [
        DVec3::new(30.0, 10.0, 0.0),
        DVec3::new(30.0, 0.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(40.0, 0.0, 0.0),
    ] {
        assert_abs_diff_eq!(revolved.evaluate(p), torus_shape.evaluate(p), epsilon = 1e-2);
    }
}

#[test]
fn extruded_rectangle_agrees_with_box() {
    // extrude's profile reads (X, Z) and sweeps along Y (the kernel's
    // spindle axis), so the equivalent box under this convention is
    // `box3(rect.width, sweep_height, rect.height)`, not a literal
    // positional match of a Z-up source's `box(w, h, d)`.
    let extruded = extrude(rect2d(20.0, 10.0).unwrap(), 30.0).unwrap();
    let box_shape = box3(20.0, 30.0, 10.0).unwrap();

    let sample_points = [
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(5.0, 2.0, 1.0),
        DVec3::new(-8.0, -4.0, -2.0),
        DVec3::new(9.9, 14.9, 4.9),
        DVec3::new(15.0, 0.0, 0.0),
        DVec3::new(0.0, 20.0, 0.0),
        DVec3::new(0.0, 0.0, 8.0),
        DVec3::new(9.0, 10.0, 4.0),
        DVec3::new(-9.0, 10.0, -4.0),
        DVec3::new(3.0, -3.0, 2.0),
    ];

    for p in sample_points {
        assert_abs_diff_eq!(extruded.evaluate(p), box_shape.evaluate(p), epsilon = 1e-3);
    }
}

#[test]
fn drop_cutter_on_rounded_box_hits_top_plane_plus_radius() {
    let flat_top = box3(100.0, 60.0, 30.0).unwrap().bounds().max.y;
    let rounded = box3(100.0, 60.0, 30.0).unwrap().round(5.0).unwrap();

    let hit = rounded.drop_cutter(0.0, 0.0, 100.0, -100.0, None).unwrap();
    assert!(hit.is_some());
    assert_abs_diff_eq!(hit.unwrap(), flat_top + 5.0, epsilon = 1e-4);
}

#[test]
fn surfacing_and_gcode_pipeline_produces_expected_tokens() {
    let shape = box3(100.0, 60.0, 30.0).unwrap();
    let tool = ToolDefinition::ball_nose("ballnose10", 10.0).unwrap();
    let bounds = shape.bounds();
    let params = SurfacingParams::new(
        RasterDirection::X,
        50.0,
        2000.0,
        10000.0,
        50.0,
        20.0,
        bounds.max.y,
        bounds.min.y,
    )
    .unwrap()
    .with_point_spacing(20.0)
    .unwrap();

    let toolpath = generate_raster_surfacing(&shape, "bracket", &tool, &params).unwrap();
    let top = bounds.max.y;
    for p in toolpath.points.iter().filter(|p| p.kind != MotionKind::Rapid) {
        assert_abs_diff_eq!(p.y, top, epsilon = 1.0);
    }

    let gcode = emit_fanuc_gcode(&toolpath, &GCodeConfig::default()).unwrap();
    let lines: Vec<&str> = gcode.lines().collect();
    assert_eq!(lines.first(), Some(&"%"));
    assert_eq!(lines.last(), Some(&"%"));
    assert!(gcode.contains("O1001"));
    assert!(gcode.contains("BALL NOSE SURFACING"));
    assert!(gcode.contains("M03 S10000"));
    assert!(gcode.contains("F2000"));
    assert!(gcode.contains("F667"));
    assert_eq!(gcode.matches("M30").count(), 1);
}

#[test]
fn subtract_without_feature_name_autogenerates_subtract_prefix() {
    let shape = box3(10.0, 10.0, 10.0).unwrap().subtract(sphere(3.0).unwrap(), None);
    assert!(shape.faces().iter().any(|f| f.name.starts_with("subtract_")));
}

#[test]
fn hole_sequence_autogenerates_hole_1_through_n() {
    let mut shape = box3(60.0, 20.0, 60.0).unwrap();
    for offset in [-20.0, 0.0, 20.0] {
        shape = hole(shape, "top", 4.0, HoleDepth::Through, Some((offset, 0.0)), None).unwrap();
    }
    let faces = shape.faces();
    for n in 1..=3 {
        assert!(
            faces.iter().any(|f| f.name.starts_with(&format!("hole_{n}."))),
            "missing hole_{n} in {:?}",
            faces.iter().map(|f| &f.name).collect::<Vec<_>>()
        );
    }
}
