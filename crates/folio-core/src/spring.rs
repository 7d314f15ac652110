//! Damped spring followers.
//!
//! Every moving thing in the cursor (main blob, satellites) is a `SpringBody`.
//! The update rule is fixed; callers only change `target` (and, for
//! satellites whose mode is morphing, the gains) between steps.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringBody {
    pub fn new(pos: Vec2, stiffness: f32, damping: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            target: pos,
            stiffness,
            damping,
        }
    }

    /// Advance one frame: `v = (v + (target - pos) * k) * d; pos += v`.
    #[inline]
    pub fn step(&mut self) {
        self.vel = (self.vel + (self.target - self.pos) * self.stiffness) * self.damping;
        self.pos += self.vel;
    }

    /// Retarget and advance in one go.
    #[inline]
    pub fn step_toward(&mut self, target: Vec2) {
        self.target = target;
        self.step();
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Heading of the current velocity in radians (0 when at rest).
    #[inline]
    pub fn heading(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Ease-in-out used for mode morphs: quadratic in, mirrored quadratic out.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_matches_the_update_rule() {
        let mut s = SpringBody::new(Vec2::ZERO, 0.5, 0.5);
        s.target = Vec2::new(10.0, 0.0);
        s.step();
        // v = (0 + 10*0.5)*0.5 = 2.5
        assert!((s.vel.x - 2.5).abs() < 1e-6);
        assert!((s.pos.x - 2.5).abs() < 1e-6);
    }

    #[test]
    fn ease_is_symmetric_and_clamped() {
        assert_eq!(ease_in_out(-1.0), 0.0);
        assert_eq!(ease_in_out(2.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((ease_in_out(t) + ease_in_out(1.0 - t) - 1.0).abs() < 1e-5);
        }
    }
}
