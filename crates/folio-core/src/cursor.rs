//! Metaball cursor: one spring-follower blob, up to six orbiting satellites
//! and short-lived click splats, all drawn with additive blending so
//! overlapping glows merge into a single bright shape.
//!
//! The engine is pure state. The host feeds pointer events (with a
//! `HoverTarget` describing what is under the pointer), calls `step` once per
//! frame and then `render` into a `DisplayList`.

use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};

use crate::constants::*;
use crate::draw::{catmull_rom_closed, Blend, DisplayList, DrawCmd, Font, FontWeight, Paint};
use crate::draw::{RadialGradient, Rgba, Shape, Stroke};
use crate::spring::{ease_in_out, lerp, SpringBody};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorMode {
    #[default]
    Default,
    Link,
    Text,
    View,
}

/// What sits under the pointer, flattened from the element's ancestry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverTarget {
    /// Value of the nearest `data-cursor` attribute, if any.
    pub cursor_attr: Option<String>,
    /// Inside a, button, [role=button], label, nav or [data-interactive].
    pub interactive: bool,
    /// The element itself is an input, textarea or contenteditable.
    pub editable: bool,
    /// Inside img, figure, video or a project card.
    pub media: bool,
    /// Centre of the nearest a/button/[role=button], used for magnetic snap.
    pub magnet_center: Option<Vec2>,
}

pub type Classifier = fn(&HoverTarget) -> CursorMode;

/// Default classifier. An explicit `data-cursor="view"` wins over everything.
pub fn classify(target: &HoverTarget) -> CursorMode {
    if target.cursor_attr.as_deref() == Some("view") {
        return CursorMode::View;
    }
    if target.interactive {
        return CursorMode::Link;
    }
    if target.editable {
        return CursorMode::Text;
    }
    if target.media {
        return CursorMode::View;
    }
    CursorMode::Default
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SatelliteConfig {
    pub orbit_radius: f32,
    pub phase: f32,
    pub size: f32,
    pub stiffness: f32,
    pub damping: f32,
}

const fn sat(orbit_radius: f32, phase: f32, size: f32, stiffness: f32, damping: f32) -> SatelliteConfig {
    SatelliteConfig {
        orbit_radius,
        phase,
        size,
        stiffness,
        damping,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ModeConfig {
    pub main_radius: f32,
    pub satellites: &'static [SatelliteConfig],
}

impl ModeConfig {
    /// Satellite config for slot `i`, wrapping when the mode has fewer.
    pub fn satellite(&self, i: usize) -> SatelliteConfig {
        self.satellites[i % self.satellites.len()]
    }
}

static DEFAULT_MODE: ModeConfig = ModeConfig {
    main_radius: 7.0,
    satellites: &[
        sat(0.0, 0.0, 5.0, 0.14, 0.72),
        sat(18.0, 0.0, 4.0, 0.10, 0.68),
        sat(18.0, PI * 0.66, 3.0, 0.09, 0.66),
        sat(18.0, PI * 1.33, 3.0, 0.08, 0.65),
    ],
};

static LINK_MODE: ModeConfig = ModeConfig {
    main_radius: 18.0,
    satellites: &[
        sat(0.0, 0.0, 12.0, 0.16, 0.70),
        sat(30.0, 0.0, 7.0, 0.09, 0.64),
        sat(30.0, PI * 0.5, 7.0, 0.09, 0.64),
        sat(30.0, PI, 7.0, 0.09, 0.64),
        sat(30.0, PI * 1.5, 7.0, 0.09, 0.64),
    ],
};

static TEXT_MODE: ModeConfig = ModeConfig {
    main_radius: 3.0,
    satellites: &[sat(0.0, 0.0, 3.0, 0.18, 0.75), sat(0.0, 0.0, 3.0, 0.12, 0.70)],
};

static VIEW_MODE: ModeConfig = ModeConfig {
    main_radius: 28.0,
    satellites: &[
        sat(46.0, 0.0, 6.0, 0.07, 0.62),
        sat(46.0, PI * 0.33, 5.0, 0.07, 0.60),
        sat(46.0, PI * 0.66, 6.0, 0.07, 0.62),
        sat(46.0, PI, 5.0, 0.07, 0.60),
        sat(46.0, PI * 1.33, 6.0, 0.07, 0.62),
        sat(46.0, PI * 1.66, 5.0, 0.07, 0.60),
    ],
};

impl CursorMode {
    pub fn config(self) -> &'static ModeConfig {
        match self {
            CursorMode::Default => &DEFAULT_MODE,
            CursorMode::Link => &LINK_MODE,
            CursorMode::Text => &TEXT_MODE,
            CursorMode::View => &VIEW_MODE,
        }
    }
}

/// Timed blend from one mode's configuration to another's.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Morph {
    pub from: CursorMode,
    pub to: CursorMode,
    pub progress: f32,
}

impl Default for Morph {
    fn default() -> Self {
        Self {
            from: CursorMode::Default,
            to: CursorMode::Default,
            progress: 1.0,
        }
    }
}

impl Morph {
    /// Edge-triggered: returns false (and changes nothing) when `mode` is
    /// already the destination.
    pub fn begin(&mut self, mode: CursorMode) -> bool {
        if mode == self.to {
            return false;
        }
        self.from = self.to;
        self.to = mode;
        self.progress = 0.0;
        true
    }

    pub fn advance(&mut self, step: f32) {
        self.progress = (self.progress + step).clamp(0.0, 1.0);
    }

    pub fn eased(&self) -> f32 {
        ease_in_out(self.progress)
    }

    pub fn main_radius(&self) -> f32 {
        lerp(
            self.from.config().main_radius,
            self.to.config().main_radius,
            self.eased(),
        )
    }

    pub fn satellite(&self, i: usize) -> SatelliteConfig {
        let a = self.from.config().satellite(i);
        let b = self.to.config().satellite(i);
        let t = self.eased();
        SatelliteConfig {
            orbit_radius: lerp(a.orbit_radius, b.orbit_radius, t),
            phase: lerp(a.phase, b.phase, t),
            size: lerp(a.size, b.size, t),
            stiffness: lerp(a.stiffness, b.stiffness, t),
            damping: lerp(a.damping, b.damping, t),
        }
    }
}

/// Click-burst particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splat {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

impl Splat {
    fn step(&mut self) {
        self.pos += self.vel;
        self.vel *= SPLAT_DRAG;
        self.alpha *= SPLAT_FADE;
        self.radius *= SPLAT_SHRINK;
    }
}

pub struct CursorEngine {
    pub pointer: Vec2,
    pub main: SpringBody,
    pub satellites: [SpringBody; CURSOR_MAX_SATELLITES],
    pub morph: Morph,
    pub magnet: Option<Vec2>,
    pub down: bool,
    pub visible: bool,
    pub time: f32,
    pub splats: Vec<Splat>,
    classifier: Classifier,
    rng: StdRng,
}

impl CursorEngine {
    pub fn new(seed: u64) -> Self {
        let off = Vec2::splat(CURSOR_OFFSCREEN);
        Self {
            pointer: off,
            main: SpringBody::new(off, CURSOR_MAIN_STIFFNESS, CURSOR_MAIN_DAMPING),
            satellites: [SpringBody::new(off, 0.0, 0.0); CURSOR_MAX_SATELLITES],
            morph: Morph::default(),
            magnet: None,
            down: false,
            visible: false,
            time: 0.0,
            splats: Vec::with_capacity(SPLAT_COUNT * 2),
            classifier: classify,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn mode(&self) -> CursorMode {
        self.morph.to
    }

    pub fn pointer_move(&mut self, pos: Vec2, target: &HoverTarget) {
        self.pointer = pos;
        self.visible = true;
        let mode = (self.classifier)(target);
        if self.morph.begin(mode) {
            log::debug!("[cursor] mode {:?} -> {:?}", self.morph.from, mode);
        }
        self.magnet = match self.mode() {
            CursorMode::Link => target.magnet_center,
            _ => None,
        };
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.down = true;
        for i in 0..SPLAT_COUNT {
            let angle = i as f32 / SPLAT_COUNT as f32 * TAU;
            let speed = SPLAT_SPEED_MIN + self.rng.gen::<f32>() * SPLAT_SPEED_SPAN;
            self.splats.push(Splat {
                pos,
                vel: Vec2::from_angle(angle) * speed,
                radius: SPLAT_RADIUS_MIN + self.rng.gen::<f32>() * SPLAT_RADIUS_SPAN,
                alpha: SPLAT_ALPHA,
            });
        }
    }

    pub fn pointer_up(&mut self) {
        self.down = false;
    }

    pub fn pointer_leave(&mut self) {
        self.visible = false;
    }

    pub fn pointer_enter(&mut self) {
        self.visible = true;
    }

    /// Where the main blob is being pulled this frame.
    pub fn main_target(&self) -> Vec2 {
        match self.magnet {
            Some(m) => self.pointer.lerp(m, CURSOR_MAGNET_BLEND),
            None => self.pointer,
        }
    }

    /// Advance physics by one frame.
    pub fn step(&mut self) {
        self.time += CURSOR_TIME_STEP;
        self.morph.advance(CURSOR_MORPH_STEP);

        self.main.step_toward(self.main_target());

        let center = self.main.pos;
        for (i, body) in self.satellites.iter_mut().enumerate() {
            let cfg = self.morph.satellite(i);
            let spin = if i % 2 == 0 {
                CURSOR_SAT_SPIN_EVEN
            } else {
                CURSOR_SAT_SPIN_ODD
            };
            let angle = cfg.phase + self.time * spin;
            body.stiffness = cfg.stiffness;
            body.damping = cfg.damping;
            body.step_toward(center + Vec2::from_angle(angle) * cfg.orbit_radius);
        }

        // fade first, then cull, so no splat below the alpha floor is drawn
        for s in &mut self.splats {
            s.step();
        }
        self.splats.retain(|s| s.alpha > SPLAT_MIN_ALPHA);
    }

    /// Squish/stretch scale derived from the main blob's speed.
    pub fn squish(&self) -> Vec2 {
        let squish = (self.main.speed() * CURSOR_SQUISH_PER_SPEED).clamp(0.0, CURSOR_SQUISH_MAX);
        Vec2::new(1.0 + squish, 1.0 - squish * CURSOR_SQUISH_Y_RATIO)
    }

    /// Silhouette radii of the main blob with the two-sine wobble applied.
    pub fn blob_radii(&self, main_radius: f32) -> [f32; CURSOR_BLOB_SAMPLES] {
        let t = self.time;
        std::array::from_fn(|i| {
            let i = i as f32;
            main_radius
                + (t * 2.2 + i * 0.9).sin() * main_radius * 0.14
                + (t * 1.1 + i * 1.7).sin() * main_radius * 0.07
        })
    }

    pub fn render(&self, dl: &mut DisplayList) {
        dl.push(DrawCmd::Clear);
        if !self.visible {
            return;
        }
        let accent = |a: f32| Rgba::from_array(ACCENT_RGB, a);
        let active_sats = self.morph.to.config().satellites.len();

        dl.blend(Blend::Additive);
        for (i, body) in self.satellites.iter().enumerate() {
            let size = self.morph.satellite(i).size;
            if size < 0.5 || i >= active_sats {
                continue;
            }
            let glow_r = size * 2.8;
            dl.fill(
                Shape::Circle {
                    center: body.pos,
                    radius: glow_r,
                },
                Paint::Radial(RadialGradient::centered(
                    body.pos,
                    glow_r,
                    &[(0.0, accent(0.28)), (0.5, accent(0.28 * 0.6)), (1.0, accent(0.0))],
                )),
            );
            dl.fill(
                Shape::Circle {
                    center: body.pos,
                    radius: size,
                },
                Paint::Radial(RadialGradient::centered(
                    body.pos,
                    size,
                    &[(0.0, accent(0.75)), (0.5, accent(0.75 * 0.6)), (1.0, accent(0.05))],
                )),
            );
        }

        self.render_main_blob(dl, &accent);

        let eased = self.morph.eased();
        if self.mode() == CursorMode::View && eased > 0.5 {
            dl.blend(Blend::Normal);
            dl.push(DrawCmd::Text {
                text: "VIEW".into(),
                pos: self.main.pos,
                color: accent((eased - 0.5) * 2.0),
                font: Font {
                    weight: FontWeight::Bold,
                    size_px: 11.0,
                },
            });
        }

        // Exact pointer indicator, never blended.
        dl.blend(Blend::Normal);
        let p = self.pointer;
        if self.mode() != CursorMode::Text {
            dl.fill(
                Shape::Circle {
                    center: p,
                    radius: CURSOR_DOT_RADIUS,
                },
                Paint::Solid(accent(1.0)),
            );
        } else {
            let h = CURSOR_IBEAM_HEIGHT / 2.0;
            let sw = CURSOR_IBEAM_SERIF / 2.0;
            let stroke = Stroke {
                color: accent(1.0),
                width: 1.5,
                dash: None,
            };
            dl.polyline([p - Vec2::Y * h, p + Vec2::Y * h], stroke.clone());
            dl.polyline(
                [p + Vec2::new(-sw, -h), p + Vec2::new(sw, -h)],
                stroke.clone(),
            );
            dl.polyline([p + Vec2::new(-sw, h), p + Vec2::new(sw, h)], stroke);
        }

        dl.blend(Blend::Additive);
        for s in &self.splats {
            dl.fill(
                Shape::Circle {
                    center: s.pos,
                    radius: s.radius,
                },
                Paint::Radial(RadialGradient::centered(
                    s.pos,
                    s.radius,
                    &[(0.0, accent(s.alpha)), (1.0, accent(0.0))],
                )),
            );
        }
        dl.blend(Blend::Normal);
    }

    fn render_main_blob(&self, dl: &mut DisplayList, accent: &dyn Fn(f32) -> Rgba) {
        let main_r = self.morph.main_radius();
        let radii = self.blob_radii(main_r);
        let scale = self.squish();
        let center = self.main.pos;
        let rot = Vec2::from_angle(self.main.heading());
        let to_world = |local: Vec2| center + rot.rotate(local);

        let outline = |mul: f32| -> SmallVec<[Vec2; CURSOR_BLOB_SAMPLES]> {
            radii
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let a = i as f32 / CURSOR_BLOB_SAMPLES as f32 * TAU - PI / 2.0;
                    let local = Vec2::new(a.cos() * r * mul * scale.x, a.sin() * r * mul * scale.y);
                    to_world(local)
                })
                .collect()
        };

        let core_top = if self.down { 1.0 } else { 0.95 };
        let layers = [
            (
                2.6,
                RadialGradient::centered(center, main_r * 2.6, &[(0.0, accent(0.15)), (1.0, accent(0.0))]),
            ),
            (
                1.5,
                RadialGradient::centered(center, main_r * 1.55, &[(0.0, accent(0.35)), (1.0, accent(0.02))]),
            ),
            (
                1.0,
                RadialGradient::offset(
                    to_world(Vec2::splat(-main_r * 0.2)),
                    center,
                    main_r * 1.1,
                    &[(0.0, accent(core_top)), (0.55, accent(0.7)), (1.0, accent(0.25))],
                ),
            ),
        ];
        for (mul, gradient) in layers {
            if let Some(shape) = catmull_rom_closed(&outline(mul)) {
                dl.fill(shape, Paint::Radial(gradient));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morph_is_edge_triggered() {
        let mut m = Morph::default();
        assert!(!m.begin(CursorMode::Default));
        assert!(m.begin(CursorMode::Link));
        m.advance(0.3);
        assert!(!m.begin(CursorMode::Link));
        assert!((m.progress - 0.3).abs() < 1e-6);
    }

    #[test]
    fn morph_endpoints_match_mode_configs() {
        let mut m = Morph::default();
        m.begin(CursorMode::View);
        assert_eq!(m.main_radius(), DEFAULT_MODE.main_radius);
        for _ in 0..40 {
            m.advance(CURSOR_MORPH_STEP);
        }
        assert_eq!(m.progress, 1.0);
        assert_eq!(m.main_radius(), VIEW_MODE.main_radius);
    }

    #[test]
    fn satellite_slots_wrap() {
        assert_eq!(TEXT_MODE.satellite(5), TEXT_MODE.satellites[1]);
    }
}
