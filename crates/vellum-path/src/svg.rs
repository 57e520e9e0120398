//! SVG path data parsing.
//!
//! Supports the moveto, lineto, horizontal/vertical lineto, quadratic and
//! cubic curve (including the smooth shorthand forms) and closepath
//! commands, absolute and relative. Elliptical arc commands are rejected.

use tracing::debug;
use vellum_core::Point;
use vellum_core::logging::targets;

use crate::builder::PathBuilder;
use crate::error::{PathError, PathResult};
use crate::path::Path;

impl Path {
    /// Parse SVG path data such as `"M0 0 L10 0 L10 10 Z"`.
    ///
    /// Drawing commands that follow a closepath start a new subpath at the
    /// closed subpath's start point, as SVG requires.
    ///
    /// ```
    /// use vellum_path::{Path, PathSegment};
    /// use vellum_core::Point;
    ///
    /// let path: Path = "M0,0 h10 v10 z".parse()?;
    /// assert_eq!(path.segments()[2], PathSegment::LineTo(Point::new(10.0, 10.0)));
    /// assert!(Path::from_svg("M0 0 A5 5 0 0 1 10 0").is_err());
    /// # Ok::<(), vellum_path::PathError>(())
    /// ```
    pub fn from_svg(data: &str) -> PathResult<Path> {
        let result = Parser::new(data).parse();
        if let Err(PathError::Svg { position, message }) = &result {
            debug!(target: targets::SVG, position, %message, "rejected SVG path data");
        }
        result
    }
}

struct Parser<'a> {
    data: &'a str,
    pos: usize,
    builder: PathBuilder,
    /// Start of the current subpath.
    start: Point,
    current: Point,
    /// Whether the last subpath was closed, so drawing must restart it.
    closed: bool,
    /// Control point of the previous curve, for the smooth forms.
    last_quad: Option<Point>,
    last_cubic: Option<Point>,
}

impl<'a> Parser<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            data,
            pos: 0,
            builder: PathBuilder::new(),
            start: Point::ZERO,
            current: Point::ZERO,
            closed: false,
            last_quad: None,
            last_cubic: None,
        }
    }

    fn parse(mut self) -> PathResult<Path> {
        let mut previous: Option<u8> = None;

        while let Some(byte) = self.skip_separators() {
            let command = if byte.is_ascii_alphabetic() {
                self.pos += 1;
                byte
            } else {
                match previous {
                    Some(b'M') => b'L',
                    Some(b'm') => b'l',
                    Some(c) if !matches!(c, b'Z' | b'z') => c,
                    _ => return Err(self.error("expected a command")),
                }
            };

            if previous.is_none() && !matches!(command, b'M' | b'm') {
                return Err(self.error("path data must begin with a moveto"));
            }

            self.command(command)?;
            previous = Some(command);
        }

        Ok(self.builder.build())
    }

    fn command(&mut self, command: u8) -> PathResult<()> {
        let relative = command.is_ascii_lowercase();
        let origin = if relative { self.current } else { Point::ZERO };
        let mut quad = None;
        let mut cubic = None;

        match command.to_ascii_uppercase() {
            b'M' => {
                let p = origin + self.point()?;
                self.builder.move_to(p);
                self.start = p;
                self.current = p;
                self.closed = false;
            }
            b'L' => {
                let p = origin + self.point()?;
                self.line_to(p)?;
            }
            b'H' => {
                let x = self.number()?;
                let p = Point::new(origin.x + x, self.current.y);
                self.line_to(p)?;
            }
            b'V' => {
                let y = self.number()?;
                let p = Point::new(self.current.x, origin.y + y);
                self.line_to(p)?;
            }
            b'Q' => {
                let c = origin + self.point()?;
                let p = origin + self.point()?;
                self.reopen();
                self.builder.quad_to(c, p)?;
                self.current = p;
                quad = Some(c);
            }
            b'T' => {
                let p = origin + self.point()?;
                let c = self.reflect(self.last_quad);
                self.reopen();
                self.builder.quad_to(c, p)?;
                self.current = p;
                quad = Some(c);
            }
            b'C' => {
                let c1 = origin + self.point()?;
                let c2 = origin + self.point()?;
                let p = origin + self.point()?;
                self.reopen();
                self.builder.cubic_to(c1, c2, p)?;
                self.current = p;
                cubic = Some(c2);
            }
            b'S' => {
                let c2 = origin + self.point()?;
                let p = origin + self.point()?;
                let c1 = self.reflect(self.last_cubic);
                self.reopen();
                self.builder.cubic_to(c1, c2, p)?;
                self.current = p;
                cubic = Some(c2);
            }
            b'Z' => {
                if !self.closed {
                    self.builder.close()?;
                    self.closed = true;
                }
                self.current = self.start;
            }
            b'A' => return Err(self.error("elliptical arc commands are not supported")),
            _ => return Err(self.error("unknown command")),
        }

        self.last_quad = quad;
        self.last_cubic = cubic;
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> PathResult<()> {
        self.reopen();
        self.builder.line_to(p)?;
        self.current = p;
        Ok(())
    }

    /// Start a new subpath at the last start point after a closepath.
    fn reopen(&mut self) {
        if self.closed {
            self.builder.move_to(self.start);
            self.closed = false;
        }
    }

    /// Mirror the previous control point around the current point.
    fn reflect(&self, control: Option<Point>) -> Point {
        match control {
            Some(c) => self.current * 2.0 - c,
            None => self.current,
        }
    }

    fn point(&mut self) -> PathResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    fn number(&mut self) -> PathResult<f32> {
        self.skip_separators();
        let bytes = self.data.as_bytes();
        let begin = self.pos;
        let mut end = begin;

        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if bytes.get(end) == Some(&b'.') {
            end += 1;
            while bytes.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
        }
        if end == digits_start || (end == digits_start + 1 && bytes[digits_start] == b'.') {
            return Err(self.error("expected a number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                    exp += 1;
                }
                end = exp;
            }
        }

        let value: f32 = self.data[begin..end]
            .parse()
            .map_err(|_| self.error("malformed number"))?;
        if !value.is_finite() {
            return Err(self.error("number out of range"));
        }
        self.pos = end;
        Ok(value)
    }

    /// Skip whitespace and commas, returning the next byte.
    fn skip_separators(&mut self) -> Option<u8> {
        let bytes = self.data.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                return Some(b);
            }
        }
        None
    }

    fn error(&self, message: &str) -> PathError {
        PathError::Svg {
            position: self.pos,
            message: message.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_absolute_commands() {
        let path = Path::from_svg("M 0 0 L 10 0 Q 15 5 10 10 C 5 15 0 15 0 10 Z").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(p(0.0, 0.0)),
                PathSegment::LineTo(p(10.0, 0.0)),
                PathSegment::QuadTo(p(15.0, 5.0), p(10.0, 10.0)),
                PathSegment::CubicTo(p(5.0, 15.0), p(0.0, 15.0), p(0.0, 10.0)),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn test_relative_and_implicit_commands() {
        let path = Path::from_svg("m1,1 2,0 0,2 h-2 z").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(p(1.0, 1.0)),
                PathSegment::LineTo(p(3.0, 1.0)),
                PathSegment::LineTo(p(3.0, 3.0)),
                PathSegment::LineTo(p(1.0, 3.0)),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn test_compact_numbers() {
        let path = Path::from_svg("M-1.5-2.5L.5.5l1e1-1E0").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(p(-1.5, -2.5)),
                PathSegment::LineTo(p(0.5, 0.5)),
                PathSegment::LineTo(p(10.5, -0.5)),
            ]
        );
    }

    #[test]
    fn test_smooth_curves_reflect() {
        let path = Path::from_svg("M0 0 Q5 5 10 0 T20 0 C20 5 25 5 25 0 S30 -5 30 0").unwrap();
        assert_eq!(path.segments()[2], PathSegment::QuadTo(p(15.0, -5.0), p(20.0, 0.0)));
        assert_eq!(
            path.segments()[4],
            PathSegment::CubicTo(p(25.0, -5.0), p(30.0, -5.0), p(30.0, 0.0))
        );

        // Without a previous curve, the control point is the current point.
        let path = Path::from_svg("M1 1 T5 5").unwrap();
        assert_eq!(path.segments()[1], PathSegment::QuadTo(p(1.0, 1.0), p(5.0, 5.0)));
    }

    #[test]
    fn test_drawing_after_close_restarts_subpath() {
        let path = Path::from_svg("M0 0 L10 0 L10 10 Z L5 5").unwrap();
        assert_eq!(path.subpath_count(), 2);
        assert_eq!(path.segments()[4], PathSegment::MoveTo(p(0.0, 0.0)));
        assert_eq!(path.segments()[5], PathSegment::LineTo(p(5.0, 5.0)));
    }

    #[test]
    fn test_errors() {
        let err = Path::from_svg("L10 10").unwrap_err();
        assert!(matches!(err, PathError::Svg { position: 1, .. }));

        let err = Path::from_svg("M0 0 L10").unwrap_err();
        assert!(matches!(err, PathError::Svg { position: 8, .. }));

        assert!(Path::from_svg("M0 0 a1 1 0 0 0 2 2").is_err());
        assert!(Path::from_svg("M0 0 X").is_err());
        assert!(Path::from_svg("M0 0 Z 5").is_err());
        assert!(Path::from_svg("10 10").is_err());

        let err = Path::from_svg("M1e39 0").unwrap_err();
        assert!(matches!(err, PathError::Svg { position: 1, .. }));
        assert!(Path::from_svg("M0 0 L5 -9e99").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(Path::from_svg("").unwrap().is_empty());
        assert!(Path::from_svg("  ,  ").unwrap().is_empty());
    }

    #[test]
    fn test_to_svg_round_trip() {
        let source = "M0 0 L10.5 0 Q15 5 10 10 C5 15 0 15 0 10 Z M20 20 L30 30";
        let path: Path = source.parse().unwrap();
        assert_eq!(path.to_svg(), source);
        assert_eq!(Path::from_svg(&path.to_svg()).unwrap(), path);
    }
}
