//! Display list produced by the engines and rasterized by the front-end.
//!
//! A `DisplayList` is owned by one component and rebuilt every frame.
//! `clear` keeps both buffers' capacity, so after the first few frames a
//! frame costs no allocation. Polylines and point clouds do not carry their
//! own vectors; they reference a range of the shared `points` buffer.

use glam::Vec2;
use smallvec::SmallVec;
use std::ops::Range;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_array(rgb: [u8; 3], a: f32) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a,
        }
    }

    /// Parse `#rrggbb`. Anything else yields opaque black.
    pub fn hex(s: &str) -> Self {
        let h = s.trim_start_matches('#');
        let chan = |i: usize| {
            h.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0)
        };
        if h.len() != 6 {
            return Rgba::rgb(0, 0, 0);
        }
        Rgba::rgb(chan(0), chan(2), chan(4))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string, e.g. `rgba(199,251,56,0.5)`.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    /// Source-over.
    Normal,
    /// Colours add where shapes overlap (canvas `lighter`).
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

pub type Stops = SmallVec<[GradientStop; 3]>;

#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub inner: Vec2,
    pub inner_radius: f32,
    pub outer: Vec2,
    pub outer_radius: f32,
    pub stops: Stops,
}

impl RadialGradient {
    pub fn centered(center: Vec2, radius: f32, stops: &[(f32, Rgba)]) -> Self {
        Self::offset(center, center, radius, stops)
    }

    pub fn offset(inner: Vec2, outer: Vec2, radius: f32, stops: &[(f32, Rgba)]) -> Self {
        Self {
            inner,
            inner_radius: 0.0,
            outer,
            outer_radius: radius.max(0.0),
            stops: stops
                .iter()
                .map(|&(offset, color)| GradientStop { offset, color })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub c1: Vec2,
    pub c2: Vec2,
    pub to: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle {
        center: Vec2,
        radius: f32,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
    },
    /// Closed path of cubic Bézier segments starting at `start`.
    Bezier {
        start: Vec2,
        segments: SmallVec<[CubicSegment; 9]>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub dash: Option<[f32; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    Bold,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub weight: FontWeight,
    pub size_px: f32,
}

impl Font {
    /// CSS font shorthand.
    pub fn css(&self) -> String {
        let w = match self.weight {
            FontWeight::Bold => 700,
            FontWeight::Black => 900,
        };
        format!("{} {}px Inter, sans-serif", w, self.size_px)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Clear,
    SetBlend(Blend),
    Fill {
        shape: Shape,
        paint: Paint,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        stroke: Stroke,
    },
    Polyline {
        points: Range<usize>,
        stroke: Stroke,
    },
    /// Centered text at `pos`.
    Text {
        text: Rc<str>,
        pos: Vec2,
        color: Rgba,
        font: Font,
    },
    /// Axis-aligned squares of side `size` centred on each point.
    Points {
        points: Range<usize>,
        size: f32,
        color: Rgba,
    },
}

#[derive(Debug, Default)]
pub struct DisplayList {
    pub cmds: Vec<DrawCmd>,
    pub points: Vec<Vec2>,
}

impl DisplayList {
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.points.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn fill(&mut self, shape: Shape, paint: Paint) {
        self.cmds.push(DrawCmd::Fill { shape, paint });
    }

    pub fn blend(&mut self, blend: Blend) {
        self.cmds.push(DrawCmd::SetBlend(blend));
    }

    /// Append a polyline whose points are produced by `pts`.
    pub fn polyline(&mut self, pts: impl IntoIterator<Item = Vec2>, stroke: Stroke) {
        let start = self.points.len();
        self.points.extend(pts);
        let end = self.points.len();
        self.cmds.push(DrawCmd::Polyline {
            points: start..end,
            stroke,
        });
    }

    pub fn points_of(&self, range: &Range<usize>) -> &[Vec2] {
        &self.points[range.clone()]
    }
}

/// Closed smooth outline through `pts` using Catmull-Rom tangents.
pub fn catmull_rom_closed(pts: &[Vec2]) -> Option<Shape> {
    let n = pts.len();
    if n < 3 {
        return None;
    }
    let segments = (0..n)
        .map(|i| {
            let p0 = pts[(i + n - 1) % n];
            let p1 = pts[i];
            let p2 = pts[(i + 1) % n];
            let p3 = pts[(i + 2) % n];
            CubicSegment {
                c1: p1 + (p2 - p0) / 6.0,
                c2: p2 - (p3 - p1) / 6.0,
                to: p2,
            }
        })
        .collect();
    Some(Shape::Bezier {
        start: pts[0],
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_and_rejects() {
        assert_eq!(Rgba::hex("#3b82f6"), Rgba::rgb(0x3b, 0x82, 0xf6));
        assert_eq!(Rgba::hex("bogus"), Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn catmull_rom_passes_through_samples() {
        let pts = [
            Vec2::new(0.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        let Some(Shape::Bezier { start, segments }) = catmull_rom_closed(&pts) else {
            panic!("expected a bezier");
        };
        assert_eq!(start, pts[0]);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].to, pts[0]);
        assert!(catmull_rom_closed(&pts[..2]).is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut dl = DisplayList::default();
        dl.polyline(
            [Vec2::ZERO, Vec2::ONE],
            Stroke {
                color: Rgba::WHITE,
                width: 1.0,
                dash: None,
            },
        );
        let cap = dl.points.capacity();
        dl.clear();
        assert!(dl.cmds.is_empty() && dl.points.is_empty());
        assert_eq!(dl.points.capacity(), cap);
    }
}
