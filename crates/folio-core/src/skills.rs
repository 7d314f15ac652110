//! Skill universe: a root "sun", category "planets" on a ring around it and
//! skill "moons" fanned outward from each category, closer the higher the
//! mastery level.
//!
//! Resting positions come from `layout::compute`, a pure function of the
//! skill data and the viewport size. Each frame only the displayed position
//! (`SkillNode::pos`) moves, by an idle float and a pointer push.

pub mod layout;
pub mod render;

use fnv::FnvHashMap;
use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;

use crate::constants::*;
use crate::draw::{DisplayList, Rgba};
use crate::error::{FolioError, Result};

pub use layout::{Edge, EdgeStyle, LayoutConfig, NodeKind, SkillLayout, SkillNode};

#[derive(Clone, Debug, PartialEq)]
pub struct SkillEntry {
    pub name: String,
    /// Mastery 0..=100.
    pub level: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSkill {
    Full {
        name: String,
        #[serde(default)]
        level: f32,
    },
    Bare(String),
}

impl From<RawSkill> for SkillEntry {
    fn from(raw: RawSkill) -> Self {
        match raw {
            RawSkill::Full { name, level } => SkillEntry {
                name,
                level: level.clamp(0.0, 100.0),
            },
            RawSkill::Bare(name) => SkillEntry { name, level: 0.0 },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillCategory {
    pub key: String,
    pub skills: Vec<SkillEntry>,
}

/// Ordered category -> skills mapping. Source order is layout order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillCategories(pub Vec<SkillCategory>);

/// Resume-data key that holds the scrolling marquee, not a category.
const MARQUEE_KEY: &str = "marquee";

impl SkillCategories {
    /// Parse `{ "category": [ {"name": .., "level": ..} | "name", .. ], .. }`.
    ///
    /// Non-list categories and unreadable entries are skipped with a warning;
    /// only a non-object document is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(json)?;
        let Value::Object(map) = doc else {
            return Err(FolioError::SkillData(kind_of(&doc).to_string()));
        };
        let mut out = Vec::with_capacity(map.len());
        for (key, value) in map {
            if key == MARQUEE_KEY {
                continue;
            }
            let Value::Array(items) = value else {
                log::warn!("[skills] category {:?} is not a list; skipped", key);
                continue;
            };
            let skills = items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<RawSkill>(item) {
                    Ok(raw) => Some(SkillEntry::from(raw)),
                    Err(e) => {
                        log::warn!("[skills] bad entry in {:?}: {}", key, e);
                        None
                    }
                })
                .collect();
            out.push(SkillCategory { key, skills });
        }
        Ok(SkillCategories(out))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStyle {
    pub main: Rgba,
    pub light: Rgba,
    pub dark: Rgba,
}

impl CategoryStyle {
    fn hex(main: &str, light: &str, dark: &str) -> Self {
        Self {
            main: Rgba::hex(main),
            light: Rgba::hex(light),
            dark: Rgba::hex(dark),
        }
    }
}

/// Colour scheme per category key, slate for anything unknown.
#[derive(Clone, Debug)]
pub struct Palette {
    styles: FnvHashMap<String, CategoryStyle>,
    fallback: CategoryStyle,
}

impl Default for Palette {
    fn default() -> Self {
        let mut styles = FnvHashMap::default();
        for (key, main, light, dark) in [
            ("languages", "#3b82f6", "#60a5fa", "#1e3a8a"),
            ("frameworks", "#06b6d4", "#22d3ee", "#0e7490"),
            ("databases", "#10b981", "#34d399", "#047857"),
            ("tools", "#8b5cf6", "#a78bfa", "#5b21b6"),
            ("platforms", "#f97316", "#fb923c", "#c2410c"),
            ("trading", "#ef4444", "#f87171", "#b91c1c"),
        ] {
            styles.insert(key.to_string(), CategoryStyle::hex(main, light, dark));
        }
        Self {
            styles,
            fallback: CategoryStyle::hex("#64748b", "#94a3b8", "#334155"),
        }
    }
}

impl Palette {
    pub fn style(&self, group: &str) -> CategoryStyle {
        self.styles.get(group).copied().unwrap_or(self.fallback)
    }
}

/// Per-instance skill universe state.
pub struct SkillGraph {
    pub data: SkillCategories,
    pub config: LayoutConfig,
    pub palette: Palette,
    pub layout: SkillLayout,
    pub pointer: Vec2,
}

impl SkillGraph {
    pub fn new(data: SkillCategories, config: LayoutConfig) -> Self {
        Self {
            data,
            config,
            palette: Palette::default(),
            layout: SkillLayout::default(),
            pointer: Vec2::splat(SKILL_POINTER_OFFSCREEN),
        }
    }

    /// Recompute resting positions for a new viewport. Displayed positions
    /// restart at rest.
    pub fn resize(&mut self, viewport: Vec2) {
        self.layout = layout::compute(&self.data, viewport, &self.config, &self.palette);
        log::debug!(
            "[skills] layout {}x{} nodes={} scale={:.3}",
            viewport.x,
            viewport.y,
            self.layout.nodes.len(),
            self.layout.scale
        );
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = Vec2::splat(SKILL_POINTER_OFFSCREEN);
    }

    /// Apply idle float and pointer push for time `time_sec`.
    pub fn step(&mut self, time_sec: f32) {
        let pointer = self.pointer;
        for node in &mut self.layout.nodes {
            node.pos = node.base + idle_float(node.base, time_sec) + pointer_push(node.base, pointer);
        }
    }

    pub fn render(&self, time_sec: f32, dl: &mut DisplayList) {
        render::draw(&self.layout, &self.palette, time_sec, dl);
    }
}

/// Vertical bob, phase-shifted by the node's resting x.
#[inline]
pub fn idle_float(base: Vec2, time_sec: f32) -> Vec2 {
    Vec2::new(
        0.0,
        (time_sec + base.x * SKILL_FLOAT_X_FREQ).sin() * SKILL_FLOAT_AMPLITUDE,
    )
}

/// Push away from the pointer, linear falloff to zero at the influence radius.
#[inline]
pub fn pointer_push(base: Vec2, pointer: Vec2) -> Vec2 {
    let delta = pointer - base;
    let dist = delta.length();
    if dist >= SKILL_REPEL_RADIUS {
        return Vec2::ZERO;
    }
    let factor = ((SKILL_REPEL_RADIUS - dist) / SKILL_REPEL_RADIUS).clamp(0.0, 1.0);
    -delta * factor * SKILL_REPEL_STRENGTH
}
