//! End-to-end tests through the umbrella crate.

use vellum::prelude::*;
use vellum::{canvas, path};

fn square(size: f32) -> Path {
    let mut builder = PathBuilder::new();
    builder.add_rect(Rect::new(0.0, 0.0, size, size), Direction::Clockwise);
    builder.build()
}

#[test]
fn errors_convert_into_umbrella_error() {
    let mut builder = PathBuilder::new();
    let err: Error = builder.line_to(Point::new(1.0, 1.0)).unwrap_err().into();
    assert!(matches!(err, Error::Path(path::PathError::InvalidPathState { .. })));

    let err: Error = DashEffect::new(vec![1.0], 0.0).unwrap_err().into();
    assert!(matches!(err, Error::Paint(_)));

    let err: Error = TransformStack::new().pop().unwrap_err().into();
    assert!(matches!(err, Error::Core(_)));

    let err: Error = ContextConfig::from_toml_str("tolerance = -1.0")
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::Config(canvas::ConfigError::Invalid(_))));

    let err: Error = RenderError::new("lost").into();
    assert!(matches!(err, Error::Draw(canvas::DrawError::Render(_))));
    assert_eq!(err.to_string(), "lost");
}

#[test]
fn svg_path_drawn_at_device_scale_tessellates() -> vellum::Result<()> {
    let config = ContextConfig::from_toml_str("device_scale = 2.0\ntolerance = 0.25")?;
    let mut ctx = DrawContext::with_config(PictureRecorder::new(), config)?;

    let shape: Path = "M0 0 L10 0 L10 10 L0 10 Z".parse()?;
    ctx.draw_path(&shape, &Paint::fill(Color::from_rgb8(10, 20, 30)))?;
    ctx.draw_path(&shape, &Paint::stroke(Color::BLACK, 1.0))?;

    let picture = ctx.finish()?.finish_recording();
    let fill = &picture.instructions()[0];
    assert_eq!(fill.tolerance, 0.25);
    assert_eq!(fill.path.bounds(), Rect::new(0.0, 0.0, 20.0, 20.0));

    let mesh = fill.tessellate_fill().unwrap_or_default();
    assert_eq!(mesh.triangle_count(), 2);

    let stroke = &picture.instructions()[1];
    assert_eq!(stroke.device_paint().stroke_width(), 2.0);
    assert!(stroke.tessellate_stroke().is_some_and(|m| !m.is_empty()));
    assert_eq!(picture.bounds(), Some(Rect::new(-4.0, -4.0, 28.0, 28.0)));
    Ok(())
}

#[test]
fn dashed_stroke_through_context() -> vellum::Result<()> {
    let dash = DashEffect::new(vec![4.0, 2.0], 0.0)?;
    let paint = Paint::stroke(Color::BLUE, 1.0).with_dash(dash);

    let mut ctx = DrawContext::new(PictureRecorder::new());
    ctx.draw_line(Point::new(0.0, 0.0), Point::new(30.0, 0.0), &paint)?;
    let picture = ctx.finish()?.finish_recording();

    let dashed = picture.instructions()[0].tessellate_stroke().unwrap_or_default();
    let solid_paint = Paint::stroke(Color::BLUE, 1.0);
    let solid = path::tessellate_stroke(&picture.instructions()[0].path, &solid_paint, 0.1);
    assert!(dashed.triangle_count() > solid.triangle_count());
    Ok(())
}

#[test]
fn boxed_renderer_sink() -> vellum::Result<()> {
    let sink: Box<dyn Renderer> = Box::new(PictureRecorder::new());
    let mut ctx = DrawContext::new(sink);
    ctx.draw_path(&square(4.0), &Paint::new())?;
    ctx.finish()?;
    Ok(())
}
