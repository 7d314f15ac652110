//! Particle text: ~4000 points that swarm into the shape of a short symbol
//! while focused and drift apart into a cube when not.
//!
//! Sample sets depend only on (symbol, font) and are cached behind an `Rc`;
//! per frame only the engine-owned `current` buffer is written.

use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::rc::Rc;

use crate::constants::*;
use crate::draw::{DisplayList, DrawCmd, Rgba};
use crate::glyph::{build_text_mesh, GlyphMesh, TextMeshOptions, Typeface};
use crate::state::Camera;

/// Area-weighted uniform samples over the mesh surface.
///
/// Triangle choice is a linear scan of the running area sum, O(triangles)
/// per sample; fine for a few hundred triangles.
pub fn sample_surface<R: Rng + ?Sized>(mesh: &GlyphMesh, count: usize, rng: &mut R) -> Vec<Vec3> {
    let areas: Vec<f32> = (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle(i);
            0.5 * (b - a).cross(c - a).length()
        })
        .collect();
    let total: f32 = areas.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let r = rng.gen::<f32>() * total;
        let mut acc = 0.0;
        let mut chosen = areas.len() - 1;
        for (j, area) in areas.iter().enumerate() {
            acc += area;
            if acc >= r {
                chosen = j;
                break;
            }
        }
        let [v0, v1, v2] = mesh.triangle(chosen);
        let (mut a, mut b) = (rng.gen::<f32>(), rng.gen::<f32>());
        if a + b > 1.0 {
            a = 1.0 - a;
            b = 1.0 - b;
        }
        let g = 1.0 - a - b;
        out.push(v0 * a + v1 * b + v2 * g);
    }
    out
}

/// Points uniform in an axis-aligned cube of side `extent` around the origin.
pub fn scatter<R: Rng + ?Sized>(count: usize, extent: f32, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
                rng.gen::<f32>() - 0.5,
            ) * extent
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet {
    pub formed: Vec<Vec3>,
    pub dispersed: Vec<Vec3>,
}

#[derive(Clone, Debug)]
pub struct ParticleConfig {
    pub count: usize,
    pub scatter_extent: f32,
    pub extrude_depth: f32,
    pub color: Rgba,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            scatter_extent: PARTICLE_SCATTER_EXTENT,
            extrude_depth: 0.0,
            color: Rgba::from_array(ACCENT_RGB, PARTICLE_OPACITY),
        }
    }
}

/// Identity of the inputs a sample set was built from.
#[derive(Clone, Debug, PartialEq)]
struct SampleKey {
    symbol: String,
    font: *const Typeface,
}

pub struct ParticleText {
    pub config: ParticleConfig,
    symbol: String,
    focused: bool,
    font: Option<Rc<Typeface>>,
    key: Option<SampleKey>,
    samples: Option<Rc<SampleSet>>,
    current: Vec<Vec3>,
    rng: StdRng,
    regenerations: usize,
}

impl ParticleText {
    pub fn new(symbol: impl Into<String>, config: ParticleConfig, seed: u64) -> Self {
        Self {
            config,
            symbol: symbol.into(),
            focused: false,
            font: None,
            key: None,
            samples: None,
            current: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            regenerations: 0,
        }
    }

    pub fn set_font(&mut self, font: Rc<Typeface>) {
        self.font = Some(font);
    }

    pub fn set_symbol(&mut self, symbol: &str) {
        if self.symbol != symbol {
            self.symbol = symbol.to_string();
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// How many times sample sets have been built.
    pub fn regenerations(&self) -> usize {
        self.regenerations
    }

    /// Sample sets for the current symbol, rebuilt only when the symbol or
    /// font changed since the last call. `None` until a font is loaded or
    /// when the symbol has no drawable area.
    pub fn form(&mut self) -> Option<Rc<SampleSet>> {
        let font = self.font.clone()?;
        if self
            .key
            .as_ref()
            .is_some_and(|k| k.symbol == self.symbol && k.font == Rc::as_ptr(&font))
        {
            return self.samples.clone();
        }
        let key = SampleKey {
            symbol: self.symbol.clone(),
            font: Rc::as_ptr(&font),
        };

        let mesh = build_text_mesh(
            &font,
            &self.symbol,
            &TextMeshOptions {
                depth: self.config.extrude_depth,
                ..TextMeshOptions::for_symbol(&self.symbol)
            },
        );
        let formed = sample_surface(&mesh, self.config.count, &mut self.rng);
        self.key = Some(key);
        self.regenerations += 1;
        if formed.is_empty() {
            log::warn!("[particles] symbol {:?} has no surface to sample", self.symbol);
            self.samples = None;
            self.current.clear();
            return None;
        }
        let dispersed = scatter(formed.len(), self.config.scatter_extent, &mut self.rng);
        log::debug!(
            "[particles] sampled {:?}: {} triangles -> {} points",
            self.symbol,
            mesh.triangle_count(),
            formed.len()
        );
        self.current.clear();
        self.current.extend_from_slice(&dispersed);
        let set = Rc::new(SampleSet { formed, dispersed });
        self.samples = Some(set.clone());
        Some(set)
    }

    /// Advance displayed positions toward the active target.
    pub fn step(&mut self, time_sec: f32) {
        let Some(set) = self.form() else {
            return;
        };
        let (target, rate, freq, amp) = if self.focused {
            (
                &set.formed,
                PARTICLE_RATE_FOCUSED,
                PARTICLE_JITTER_FREQ_FOCUSED,
                PARTICLE_JITTER_FOCUSED,
            )
        } else {
            (
                &set.dispersed,
                PARTICLE_RATE_DISPERSED,
                PARTICLE_JITTER_FREQ_DISPERSED,
                PARTICLE_JITTER_DISPERSED,
            )
        };
        let focused = self.focused;
        let cur: &mut [f32] = bytemuck::cast_slice_mut(&mut self.current);
        let tgt: &[f32] = bytemuck::cast_slice(target);
        for (i, (c, t)) in cur.iter_mut().zip(tgt).enumerate() {
            *c += (t - *c) * rate;
            let phase = time_sec * freq + i as f32;
            *c += if focused { phase.sin() } else { phase.cos() } * amp;
        }
    }

    /// Displayed positions, three floats per particle.
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.current)
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.current
    }

    pub fn render(&self, camera: &Camera, viewport: Vec2, dl: &mut DisplayList) {
        dl.push(DrawCmd::Clear);
        if self.current.is_empty() {
            return;
        }
        let vp = camera.view_proj();
        let start = dl.points.len();
        dl.points.extend(
            self.current
                .iter()
                .filter_map(|p| Camera::project(&vp, *p, viewport)),
        );
        let size = PARTICLE_SIZE * camera.pixels_per_unit(0.0, viewport.y);
        dl.push(DrawCmd::Points {
            points: start..dl.points.len(),
            size: size.max(1.0),
            color: self.config.color,
        });
    }
}
