use glam::Vec2;
use std::f32::consts::{FRAC_PI_4, PI};

use super::layout::{EdgeStyle, NodeKind, SkillLayout, SkillNode};
use super::Palette;
use crate::constants::*;
use crate::draw::{DisplayList, DrawCmd, Font, FontWeight, Paint, RadialGradient, Rgba, Shape, Stroke};

const ROOT_RIM: &str = "#cbd5e1";
const ROOT_TEXT: &str = "#1e3a8a";

/// Sample an energy beam from `a` to `b` into `out`.
///
/// Samples sit every `BEAM_STEP` px along the segment and are displaced
/// perpendicular to it by a time-varying noise term. The envelope is zero at
/// both ends and the final sample is always `b`, so the beam is pinned to
/// both nodes.
pub fn beam_points(a: Vec2, b: Vec2, time_sec: f32, out: &mut Vec<Vec2>) {
    let delta = b - a;
    let dist = delta.length();
    if dist <= f32::EPSILON {
        return;
    }
    let dir = delta / dist;
    let perp = dir.perp();
    let t = time_sec * BEAM_TIME_SCALE;
    let sample = |s: f32| {
        let noise = (s * 0.2 + t).sin() + (s * 0.1 - t).cos();
        let envelope = (s / dist * PI).sin();
        a + dir * s + perp * (noise * envelope * BEAM_AMPLITUDE)
    };
    let mut s = 0.0;
    while s < dist {
        out.push(sample(s));
        s += BEAM_STEP;
    }
    out.push(b);
}

pub fn draw(layout: &SkillLayout, palette: &Palette, time_sec: f32, dl: &mut DisplayList) {
    dl.push(DrawCmd::Clear);

    for edge in &layout.edges {
        let (Some(src), Some(dst)) = (layout.nodes.get(edge.source), layout.nodes.get(edge.target)) else {
            continue;
        };
        match edge.style {
            EdgeStyle::Orbit => dl.polyline(
                [src.pos, dst.pos],
                Stroke {
                    color: Rgba::WHITE.with_alpha(0.2),
                    width: 1.0,
                    dash: Some(ORBIT_DASH),
                },
            ),
            EdgeStyle::Beam => {
                let start = dl.points.len();
                beam_points(src.pos, dst.pos, time_sec, &mut dl.points);
                let range = start..dl.points.len();
                if range.is_empty() {
                    continue;
                }
                // Wide faint pass for the glow, then the thin bright core.
                dl.push(DrawCmd::Polyline {
                    points: range.clone(),
                    stroke: Stroke {
                        color: edge.color.with_alpha(0.2),
                        width: 2.0,
                        dash: None,
                    },
                });
                dl.push(DrawCmd::Polyline {
                    points: range,
                    stroke: Stroke {
                        color: Rgba::WHITE.with_alpha(0.8),
                        width: 0.5,
                        dash: None,
                    },
                });
            }
        }
    }

    for node in &layout.nodes {
        draw_node(node, palette, dl);
    }
}

fn draw_node(node: &SkillNode, palette: &Palette, dl: &mut DisplayList) {
    let style = palette.style(&node.group);
    let (at, r) = (node.pos, node.radius);
    let white = Rgba::WHITE;
    let inner = at - Vec2::splat(r * 0.3);
    let gradient = match node.kind {
        NodeKind::Root => RadialGradient::offset(inner, at, r, &[(0.0, white), (1.0, Rgba::hex(ROOT_RIM))]),
        NodeKind::Category => RadialGradient::offset(inner, at, r, &[(0.0, style.light), (1.0, style.dark)]),
        NodeKind::Skill => RadialGradient::offset(
            inner,
            at,
            r,
            &[(0.0, white), (0.3, white), (1.0, style.light)],
        ),
    };
    dl.fill(Shape::Circle { center: at, radius: r }, Paint::Radial(gradient));

    if node.kind == NodeKind::Category {
        dl.push(DrawCmd::StrokeCircle {
            center: at,
            radius: r + 5.0,
            stroke: Stroke {
                color: style.main.with_alpha(0.3),
                width: 1.0,
                dash: None,
            },
        });
    }

    // specular highlight
    dl.fill(
        Shape::Ellipse {
            center: at - Vec2::splat(r * 0.35),
            radii: Vec2::new(r * 0.2, r * 0.12),
            rotation: FRAC_PI_4,
        },
        Paint::Solid(white.with_alpha(0.85)),
    );

    let (color, font) = match node.kind {
        NodeKind::Category => (white, Font { weight: FontWeight::Bold, size_px: 14.0 }),
        NodeKind::Root => (Rgba::hex(ROOT_TEXT), Font { weight: FontWeight::Black, size_px: 18.0 }),
        NodeKind::Skill => (style.dark, Font { weight: FontWeight::Bold, size_px: 11.0 }),
    };
    let offsets: &[f32] = if node.label_lines.len() == 2 {
        &[-LABEL_LINE_OFFSET, LABEL_LINE_OFFSET]
    } else {
        &[0.0]
    };
    for (line, dy) in node.label_lines.iter().zip(offsets) {
        dl.push(DrawCmd::Text {
            text: line.clone(),
            pos: at + Vec2::new(0.0, *dy),
            color,
            font,
        });
    }
}
