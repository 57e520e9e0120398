//! Integration tests for building, sealing and querying paths.

use vellum_core::{Point, Rect, RoundRect, Transform2D};
use vellum_path::{
    DEFAULT_TOLERANCE, Direction, FillType, Path, PathBuilder, PathError, PathSegment,
    tessellate_fill,
};

fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

#[test]
fn triangle_scenario_seals_four_segments() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(p(0.0, 0.0))
        .line_to(p(10.0, 0.0))
        .unwrap()
        .line_to(p(10.0, 10.0))
        .unwrap()
        .close()
        .unwrap();
    let path = builder.build();

    assert_eq!(
        path.segments(),
        &[
            PathSegment::MoveTo(p(0.0, 0.0)),
            PathSegment::LineTo(p(10.0, 0.0)),
            PathSegment::LineTo(p(10.0, 10.0)),
            PathSegment::Close,
        ]
    );
    assert!(builder.is_empty());
}

#[test]
fn line_to_needs_move_to_in_each_subpath() {
    let mut builder = PathBuilder::new();
    assert!(matches!(
        builder.line_to(p(1.0, 1.0)),
        Err(PathError::InvalidPathState { op: "line_to", .. })
    ));

    builder.move_to(p(0.0, 0.0)).line_to(p(1.0, 0.0)).unwrap();
    builder.close().unwrap();
    assert!(builder.line_to(p(2.0, 2.0)).is_err());

    builder.move_to(p(5.0, 5.0));
    assert!(builder.line_to(p(2.0, 2.0)).is_ok());
}

#[test]
fn failed_calls_leave_builder_untouched() {
    let mut builder = PathBuilder::new();
    builder.move_to(p(0.0, 0.0)).line_to(p(3.0, 0.0)).unwrap();
    builder.close().unwrap();
    let before = builder.len();

    assert!(builder.quad_to(p(1.0, 1.0), p(2.0, 2.0)).is_err());
    assert!(builder.close().is_err());
    assert_eq!(builder.len(), before);
}

#[test]
fn empty_builder_builds_empty_path() {
    let path = PathBuilder::new().build();
    assert!(path.is_empty());
    assert_eq!(path.bounds(), Rect::ZERO);
    assert!(tessellate_fill(&path, DEFAULT_TOLERANCE).is_empty());
}

#[test]
fn shapes_compose_into_one_path() {
    let mut builder = PathBuilder::new();
    builder
        .set_fill_type(FillType::EvenOdd)
        .add_round_rect(
            RoundRect::new(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0),
            Direction::Clockwise,
        )
        .add_circle(p(50.0, 50.0), 20.0, Direction::CounterClockwise)
        .add_poly(&[p(0.0, 120.0), p(50.0, 150.0)], false);
    let path = builder.build();

    assert_eq!(path.subpath_count(), 3);
    assert_eq!(path.fill_type(), FillType::EvenOdd);
    assert!(!path.contains(p(50.0, 50.0)));
    assert!(path.contains(p(20.0, 50.0)));
    assert_eq!(path.last_point(), Some(p(50.0, 150.0)));
}

#[test]
fn svg_round_trip_preserves_builder_output() {
    let mut builder = PathBuilder::new();
    builder
        .move_to(p(1.0, 2.0))
        .quad_to(p(3.0, 4.0), p(5.0, 6.0))
        .unwrap()
        .cubic_to(p(7.0, 8.0), p(9.0, 10.0), p(11.0, 12.0))
        .unwrap()
        .close()
        .unwrap();
    let path = builder.build();

    let parsed: Path = path.to_svg().parse().unwrap();
    assert_eq!(parsed, path);
}

#[test]
fn add_path_maps_into_device_space() {
    let unit: Path = "M0 0 L1 0 L1 1 Z".parse().unwrap();
    let t = Transform2D::translate(10.0, 10.0).then(&Transform2D::scale(5.0));

    let mut builder = PathBuilder::new();
    builder.add_path(&unit, &t);
    let placed = builder.build();

    assert_eq!(placed, unit.transformed(&t));
    assert_eq!(placed.bounds(), Rect::new(10.0, 10.0, 5.0, 5.0));
}
