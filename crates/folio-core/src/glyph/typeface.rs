//! three.js typeface JSON (`*.typeface.json`) decoding.
//!
//! Each glyph carries an advance (`ha`) and an outline string of commands in
//! font units: `m x y`, `l x y`, `q x y cx cy` (end point first) and
//! `b x y c1x c1y c2x c2y`.

use fnv::FnvHashMap;
use glam::Vec2;
use serde::Deserialize;

use crate::error::{FolioError, Result};

#[derive(Deserialize)]
struct RawTypeface {
    glyphs: FnvHashMap<String, RawGlyph>,
    resolution: f32,
}

#[derive(Deserialize)]
struct RawGlyph {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutlineCmd {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Glyph {
    pub advance: f32,
    pub outline: Vec<OutlineCmd>,
}

#[derive(Clone, Debug)]
pub struct Typeface {
    pub resolution: f32,
    glyphs: FnvHashMap<char, Glyph>,
}

const FALLBACK_GLYPH: char = '?';

impl Typeface {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTypeface = serde_json::from_str(json)?;
        let mut glyphs = FnvHashMap::default();
        for (key, g) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let outline = match g.o.as_deref() {
                Some(o) => parse_outline(ch, o)?,
                None => Vec::new(),
            };
            glyphs.insert(
                ch,
                Glyph {
                    advance: g.ha,
                    outline,
                },
            );
        }
        log::debug!("[typeface] {} glyphs, resolution {}", glyphs.len(), raw.resolution);
        Ok(Self {
            resolution: raw.resolution.max(1.0),
            glyphs,
        })
    }

    /// Glyph for `ch`, falling back to `?` like the three.js loader does.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&ch)
            .or_else(|| self.glyphs.get(&FALLBACK_GLYPH))
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

fn parse_outline(glyph: char, outline: &str) -> Result<Vec<OutlineCmd>> {
    let tokens: Vec<&str> = outline.split_whitespace().collect();
    let mut cmds = Vec::new();
    let mut i = 0;
    let num = |i: usize| -> Result<f32> {
        tokens
            .get(i)
            .and_then(|t| t.parse::<f32>().ok())
            .ok_or_else(|| FolioError::TypefaceOutline {
                glyph,
                index: i,
                token: tokens.get(i).map(|t| t.to_string()).unwrap_or_default(),
            })
    };
    let pt = |i: usize| -> Result<Vec2> { Ok(Vec2::new(num(i)?, num(i + 1)?)) };
    while i < tokens.len() {
        match tokens[i] {
            "m" => {
                cmds.push(OutlineCmd::MoveTo(pt(i + 1)?));
                i += 3;
            }
            "l" => {
                cmds.push(OutlineCmd::LineTo(pt(i + 1)?));
                i += 3;
            }
            "q" => {
                let to = pt(i + 1)?;
                let ctrl = pt(i + 3)?;
                cmds.push(OutlineCmd::QuadTo { ctrl, to });
                i += 5;
            }
            "b" => {
                let to = pt(i + 1)?;
                let c1 = pt(i + 3)?;
                let c2 = pt(i + 5)?;
                cmds.push(OutlineCmd::CubicTo { c1, c2, to });
                i += 7;
            }
            "z" => i += 1,
            other => {
                return Err(FolioError::TypefaceOutline {
                    glyph,
                    index: i,
                    token: other.to_string(),
                })
            }
        }
    }
    Ok(cmds)
}

impl Glyph {
    /// Flatten the outline into closed contours, scaled and shifted into
    /// text space. Curves are split into `segments` straight pieces.
    pub fn contours(&self, scale: f32, offset: Vec2, segments: usize) -> Vec<Vec<Vec2>> {
        let segments = segments.max(1);
        let map = |p: Vec2| p * scale + offset;
        let mut out: Vec<Vec<Vec2>> = Vec::new();
        let mut cur: Vec<Vec2> = Vec::new();
        let mut last = Vec2::ZERO;
        for cmd in &self.outline {
            match *cmd {
                OutlineCmd::MoveTo(p) => {
                    finish_contour(&mut cur, &mut out);
                    last = map(p);
                    cur.push(last);
                }
                OutlineCmd::LineTo(p) => {
                    last = map(p);
                    push_point(&mut cur, last);
                }
                OutlineCmd::QuadTo { ctrl, to } => {
                    let (p0, c, p1) = (last, map(ctrl), map(to));
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        let u = 1.0 - t;
                        push_point(&mut cur, p0 * (u * u) + c * (2.0 * u * t) + p1 * (t * t));
                    }
                    last = p1;
                }
                OutlineCmd::CubicTo { c1, c2, to } => {
                    let (p0, a, b, p1) = (last, map(c1), map(c2), map(to));
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        let u = 1.0 - t;
                        push_point(
                            &mut cur,
                            p0 * (u * u * u) + a * (3.0 * u * u * t) + b * (3.0 * u * t * t) + p1 * (t * t * t),
                        );
                    }
                    last = p1;
                }
            }
        }
        finish_contour(&mut cur, &mut out);
        out
    }
}

fn push_point(cur: &mut Vec<Vec2>, p: Vec2) {
    if cur.last().map_or(true, |q| q.distance_squared(p) > 1e-12) {
        cur.push(p);
    }
}

fn finish_contour(cur: &mut Vec<Vec2>, out: &mut Vec<Vec<Vec2>>) {
    if cur.len() > 1 && cur[0].distance_squared(cur[cur.len() - 1]) <= 1e-12 {
        cur.pop();
    }
    if cur.len() >= 3 {
        out.push(std::mem::take(cur));
    } else {
        cur.clear();
    }
}
