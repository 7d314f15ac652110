use glam::Vec2;
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use super::{Palette, SkillCategories};
use crate::constants::*;
use crate::draw::Rgba;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub category_radius: f32,
    /// Resting distance of a level-100 skill from its category.
    pub min_skill_distance: f32,
    /// Resting distance of a level-0 skill from its category.
    pub max_skill_distance: f32,
    pub root_size: f32,
    pub category_size: f32,
    pub skill_size: f32,
    pub root_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            category_radius: 220.0,
            min_skill_distance: 120.0,
            max_skill_distance: 600.0,
            root_size: 65.0,
            category_size: 45.0,
            skill_size: 35.0,
            root_label: "Skill Set".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Category,
    Skill,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkillNode {
    pub id: Rc<str>,
    pub label: Rc<str>,
    /// One or two lines, split once at layout time.
    pub label_lines: SmallVec<[Rc<str>; 2]>,
    pub kind: NodeKind,
    pub group: Rc<str>,
    pub base: Vec2,
    pub pos: Vec2,
    pub radius: f32,
    pub level: Option<f32>,
    /// Distance from the parent node at rest (0 for the root).
    pub distance: f32,
    pub angle: f32,
    pub color: Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeStyle {
    /// Root to category: static dashed line.
    Orbit,
    /// Category to skill: animated energy beam.
    Beam,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub style: EdgeStyle,
    pub color: Rgba,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkillLayout {
    pub nodes: Vec<SkillNode>,
    pub edges: Vec<Edge>,
    pub viewport: Vec2,
    pub scale: f32,
}

impl SkillLayout {
    pub fn node(&self, id: &str) -> Option<&SkillNode> {
        self.nodes.iter().find(|n| &*n.id == id)
    }
}

/// Shrink factor keeping the graph on screen for small viewports.
pub fn scale_factor(viewport: Vec2) -> f32 {
    let min_dim = viewport.x.min(viewport.y);
    if min_dim < SKILL_SCALE_THRESHOLD {
        (min_dim / SKILL_SCALE_REFERENCE).max(0.0)
    } else {
        1.0
    }
}

/// Resting distance from the category: level 100 at the minimum, level 0 at
/// the maximum, linear in between.
pub fn skill_distance(level: f32, cfg: &LayoutConfig, scale: f32) -> f32 {
    let novice = (100.0 - level.clamp(0.0, 100.0)) / 100.0;
    (cfg.min_skill_distance + novice * (cfg.max_skill_distance - cfg.min_skill_distance)) * scale
}

/// Total fan arc for a category with `count` skills.
pub fn fan_angle(count: usize) -> f32 {
    SKILL_FAN_MAX.min(count as f32 * SKILL_FAN_PER_SKILL)
}

/// Angle of skill `i` of `count` fanned around `category_angle`.
pub fn fan_slot(category_angle: f32, i: usize, count: usize) -> f32 {
    if count == 0 {
        return category_angle;
    }
    let fan = fan_angle(count);
    category_angle + (i as f32 - (count as f32 - 1.0) / 2.0) * (fan / count as f32)
}

pub fn split_label(label: &str) -> SmallVec<[Rc<str>; 2]> {
    let mut lines = SmallVec::new();
    match label.split_once(' ') {
        Some((first, rest)) if label.chars().count() > LABEL_WRAP_LEN => {
            lines.push(Rc::from(first));
            lines.push(Rc::from(rest));
        }
        _ => lines.push(Rc::from(label)),
    }
    lines
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Compute nodes and edges for `viewport`. Pure: identical inputs give
/// identical output.
pub fn compute(
    data: &SkillCategories,
    viewport: Vec2,
    cfg: &LayoutConfig,
    palette: &Palette,
) -> SkillLayout {
    let center = viewport / 2.0;
    let scale = scale_factor(viewport);
    let skill_total: usize = data.0.iter().map(|c| c.skills.len()).sum();
    let mut nodes = Vec::with_capacity(1 + data.len() + skill_total);
    let mut edges = Vec::with_capacity(data.len() + skill_total);

    let root_label: Rc<str> = Rc::from(cfg.root_label.as_str());
    nodes.push(SkillNode {
        id: Rc::from("root"),
        label_lines: split_label(&root_label),
        label: root_label,
        kind: NodeKind::Root,
        group: Rc::from("root"),
        base: center,
        pos: center,
        radius: cfg.root_size * scale,
        level: None,
        distance: 0.0,
        angle: 0.0,
        color: Rgba::WHITE,
    });

    if data.is_empty() {
        return SkillLayout {
            nodes,
            edges,
            viewport,
            scale,
        };
    }

    let angle_step = TAU / data.len() as f32;
    let ring = cfg.category_radius * scale;

    for (ci, category) in data.0.iter().enumerate() {
        let cat_angle = ci as f32 * angle_step - FRAC_PI_2;
        let cat_pos = center + Vec2::from_angle(cat_angle) * ring;
        let style = palette.style(&category.key);
        let group: Rc<str> = Rc::from(category.key.as_str());
        let label: Rc<str> = Rc::from(capitalize(&category.key));

        let cat_index = nodes.len();
        nodes.push(SkillNode {
            id: group.clone(),
            label_lines: split_label(&label),
            label,
            kind: NodeKind::Category,
            group: group.clone(),
            base: cat_pos,
            pos: cat_pos,
            radius: cfg.category_size * scale,
            level: None,
            distance: ring,
            angle: cat_angle,
            color: style.main,
        });
        edges.push(Edge {
            source: 0,
            target: cat_index,
            style: EdgeStyle::Orbit,
            color: style.light,
        });

        let count = category.skills.len();
        for (i, skill) in category.skills.iter().enumerate() {
            let angle = fan_slot(cat_angle, i, count);
            let distance = skill_distance(skill.level, cfg, scale);
            let pos = cat_pos + Vec2::from_angle(angle) * distance;
            let label: Rc<str> = Rc::from(skill.name.as_str());
            let skill_index = nodes.len();
            nodes.push(SkillNode {
                id: Rc::from(format!("{}-{}", category.key, skill.name)),
                label_lines: split_label(&label),
                label,
                kind: NodeKind::Skill,
                group: group.clone(),
                base: pos,
                pos,
                radius: cfg.skill_size * scale,
                level: Some(skill.level),
                distance,
                angle,
                color: style.light,
            });
            edges.push(Edge {
                source: cat_index,
                target: skill_index,
                style: EdgeStyle::Beam,
                color: style.dark,
            });
        }
    }

    SkillLayout {
        nodes,
        edges,
        viewport,
        scale,
    }
}
