//! Text geometry: glyph outlines to an extruded, centred triangle mesh.

pub mod triangulate;
pub mod typeface;

use glam::{Vec2, Vec3};

use crate::constants::{GLYPH_CURVE_SEGMENTS, GLYPH_MAX_SIZE, GLYPH_SIZE_BUDGET};
pub use typeface::{Glyph, OutlineCmd, Typeface};

/// Triangle soup, optionally indexed. Without indices every three consecutive
/// positions form a triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphMesh {
    pub positions: Vec<Vec3>,
    pub indices: Option<Vec<u32>>,
}

impl GlyphMesh {
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(idx) => idx.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        match &self.indices {
            Some(idx) => [
                self.positions[idx[i * 3] as usize],
                self.positions[idx[i * 3 + 1] as usize],
                self.positions[idx[i * 3 + 2] as usize],
            ],
            None => [
                self.positions[i * 3],
                self.positions[i * 3 + 1],
                self.positions[i * 3 + 2],
            ],
        }
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Translate so the bounding box is centred on the origin.
    pub fn center(&mut self) {
        if let Some((lo, hi)) = self.bounds() {
            let mid = (lo + hi) * 0.5;
            for p in &mut self.positions {
                *p -= mid;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMeshOptions {
    /// Em size in world units.
    pub size: f32,
    /// Extrusion depth along +z; 0 gives a flat (double-sided) mesh.
    pub depth: f32,
    pub curve_segments: usize,
}

impl TextMeshOptions {
    /// Options used for the particle symbols: shorter strings render larger.
    pub fn for_symbol(symbol: &str) -> Self {
        Self {
            size: symbol_size(symbol),
            depth: 0.0,
            curve_segments: GLYPH_CURVE_SEGMENTS,
        }
    }
}

pub fn symbol_size(symbol: &str) -> f32 {
    let len = symbol.chars().count().max(2) as f32;
    GLYPH_MAX_SIZE.min(GLYPH_SIZE_BUDGET / len)
}

/// Build the extruded mesh for one line of `text`, centred on its bounds.
pub fn build_text_mesh(font: &Typeface, text: &str, opts: &TextMeshOptions) -> GlyphMesh {
    let scale = opts.size / font.resolution;
    let mut mesh = GlyphMesh {
        positions: Vec::new(),
        indices: Some(Vec::new()),
    };
    let mut pen_x = 0.0;
    for ch in text.chars() {
        let Some(glyph) = font.glyph(ch) else {
            log::warn!("[glyph] no glyph for {:?} and no fallback", ch);
            continue;
        };
        let contours = glyph.contours(scale, Vec2::new(pen_x, 0.0), opts.curve_segments);
        for (outer, holes) in group_contours(contours) {
            extrude_shape(&mut mesh, &outer, &holes, opts.depth);
        }
        pen_x += glyph.advance * scale;
    }
    mesh.center();
    mesh
}

/// Split a glyph's contours into solids with their holes. The contour with
/// the largest area fixes which winding means "solid"; each hole goes to the
/// smallest solid containing it.
pub fn group_contours(contours: Vec<Vec<Vec2>>) -> Vec<(Vec<Vec2>, Vec<Vec<Vec2>>)> {
    use triangulate::{point_in_polygon, signed_area};

    let Some(solid_sign) = contours
        .iter()
        .map(|c| signed_area(c))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .map(f32::signum)
    else {
        return Vec::new();
    };

    let (solids, holes): (Vec<_>, Vec<_>) = contours
        .into_iter()
        .partition(|c| signed_area(c).signum() == solid_sign);
    let mut shapes: Vec<(Vec<Vec2>, Vec<Vec<Vec2>>)> =
        solids.into_iter().map(|s| (s, Vec::new())).collect();

    for hole in holes {
        let inside = hole[0];
        let owner = shapes
            .iter()
            .enumerate()
            .filter(|(_, (outer, _))| point_in_polygon(inside, outer))
            .min_by(|(_, a), (_, b)| signed_area(&a.0).abs().total_cmp(&signed_area(&b.0).abs()))
            .map(|(i, _)| i);
        match owner {
            Some(i) => shapes[i].1.push(hole),
            // orphan hole: odd font data, draw it as a solid
            None => shapes.push((hole, Vec::new())),
        }
    }
    shapes
}

fn extrude_shape(mesh: &mut GlyphMesh, outer: &[Vec2], holes: &[Vec<Vec2>], depth: f32) {
    let (verts, tris) = triangulate::triangulate(outer, holes);
    if tris.is_empty() {
        return;
    }
    let indices = mesh.indices.get_or_insert_with(Vec::new);

    // back cap at z=0 (reversed), front cap at z=depth
    let back = mesh.positions.len() as u32;
    mesh.positions.extend(verts.iter().map(|v| v.extend(0.0)));
    let front = mesh.positions.len() as u32;
    mesh.positions.extend(verts.iter().map(|v| v.extend(depth)));
    for t in &tris {
        indices.extend_from_slice(&[back + t[2], back + t[1], back + t[0]]);
        indices.extend_from_slice(&[front + t[0], front + t[1], front + t[2]]);
    }

    // side walls along every ring edge
    let mut ring_start = 0usize;
    let rings = std::iter::once(outer.len()).chain(holes.iter().map(Vec::len));
    for len in rings {
        for k in 0..len {
            let a = (ring_start + k) as u32;
            let b = (ring_start + (k + 1) % len) as u32;
            indices.extend_from_slice(&[back + a, back + b, front + b]);
            indices.extend_from_slice(&[back + a, front + b, front + a]);
        }
        ring_start += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_size_shrinks_with_length() {
        assert_eq!(symbol_size("A"), 1.5);
        assert_eq!(symbol_size("AI"), 1.5);
        assert!((symbol_size("TRADE") - 0.7).abs() < 1e-6);
    }

    #[test]
    fn center_moves_bounds_to_origin() {
        let mut m = GlyphMesh {
            positions: vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(3.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 0.0)],
            indices: None,
        };
        m.center();
        let (lo, hi) = m.bounds().unwrap();
        assert!((lo + hi).length() < 1e-6);
    }
}
