// Host-side tests for typeface decoding, glyph meshing and particle text.

use folio_core::glyph::{build_text_mesh, symbol_size, OutlineCmd, TextMeshOptions, Typeface};
use folio_core::particles::{ParticleConfig, ParticleText};
use folio_core::draw::{DisplayList, DrawCmd};
use folio_core::{Camera, FolioError};
use glam::Vec2;
use std::rc::Rc;

// A square "O" (100x100 with a 50x50 hole), an "L" and the '?' fallback,
// in a font with 100 units per em.
const FONT: &str = r#"{
    "resolution": 100,
    "familyName": "Test",
    "glyphs": {
        "O": { "ha": 110, "o": "m 0 0 l 100 0 l 100 100 l 0 100 z m 25 25 l 25 75 l 75 75 l 75 25 z" },
        "L": { "ha": 80, "o": "m 0 0 l 60 0 l 60 20 l 20 20 l 20 100 l 0 100 z" },
        "C": { "ha": 80, "o": "m 0 0 q 50 50 50 0 b 0 100 50 100 0 100 z" },
        "?": { "ha": 50, "o": "m 0 0 l 40 0 l 40 40 z" },
        " ": { "ha": 40 }
    }
}"#;

fn font() -> Rc<Typeface> {
    Rc::new(Typeface::from_json(FONT).expect("test font parses"))
}

fn mesh_area(text: &str) -> f32 {
    let mesh = build_text_mesh(&font(), text, &TextMeshOptions::for_symbol(text));
    (0..mesh.triangle_count())
        .map(|i| {
            let [a, b, c] = mesh.triangle(i);
            (b - a).cross(c - a).length() * 0.5
        })
        .sum()
}

#[test]
fn decodes_outline_commands() {
    let f = font();
    assert_eq!(f.len(), 5);
    assert_eq!(f.resolution, 100.0);
    let c = f.glyph('C').unwrap();
    assert_eq!(c.outline.len(), 3);
    // quadratic and cubic commands list the end point first
    assert_eq!(
        c.outline[1],
        OutlineCmd::QuadTo {
            ctrl: Vec2::new(50.0, 0.0),
            to: Vec2::new(50.0, 50.0)
        }
    );
    assert_eq!(
        c.outline[2],
        OutlineCmd::CubicTo {
            c1: Vec2::new(50.0, 100.0),
            c2: Vec2::new(0.0, 100.0),
            to: Vec2::new(0.0, 100.0)
        }
    );
    assert!(f.glyph(' ').unwrap().outline.is_empty());
    // missing glyphs fall back to '?'
    assert_eq!(f.glyph('Z').unwrap().advance, 50.0);
}

#[test]
fn rejects_malformed_outlines() {
    let bad = r#"{"resolution": 100, "glyphs": {"X": {"ha": 10, "o": "m 0 zero"}}}"#;
    match Typeface::from_json(bad) {
        Err(FolioError::TypefaceOutline { glyph, .. }) => assert_eq!(glyph, 'X'),
        other => panic!("expected outline error, got {:?}", other.map(|t| t.len())),
    }
    assert!(matches!(Typeface::from_json("{"), Err(FolioError::TypefaceJson(_))));
}

#[test]
fn curves_flatten_into_segments() {
    let f = font();
    let contours = f.glyph('C').unwrap().contours(1.0, Vec2::ZERO, 12);
    assert_eq!(contours.len(), 1);
    // move + 12 quad points + 12 cubic points
    assert_eq!(contours[0].len(), 1 + 12 + 12);
    assert_eq!(contours[0][12], Vec2::new(50.0, 50.0));
}

#[test]
fn holes_are_cut_out_of_the_mesh() {
    // "O" at size 1.5 (len 1 -> max size): (1.5^2 - 0.75^2) per cap, two caps
    let expected = 2.0 * (1.5f32 * 1.5 - 0.75 * 0.75);
    let area = mesh_area("O");
    assert!((area - expected).abs() < 1e-3, "area {area}, expected {expected}");
}

#[test]
fn concave_glyph_area_is_exact() {
    // L: 60x20 + 20x80 = 2800 units^2 at scale 1.5/100, two caps
    let s = 1.5f32 / 100.0;
    let expected = 2.0 * 2800.0 * s * s;
    let area = mesh_area("L");
    assert!((area - expected).abs() < 1e-3, "area {area}, expected {expected}");
}

#[test]
fn text_mesh_is_centred() {
    let mesh = build_text_mesh(&font(), "OL", &TextMeshOptions::for_symbol("OL"));
    let (min, max) = mesh.bounds().unwrap();
    assert!(((min + max) * 0.5).length() < 1e-4);
    assert!((symbol_size("OL") - 1.5).abs() < 1e-6);
    assert!((symbol_size("SOLID") - 0.7).abs() < 1e-6);
}

#[test]
fn no_font_means_nothing_to_form() {
    let mut p = ParticleText::new("O", ParticleConfig::default(), 7);
    assert!(p.form().is_none());
    p.step(0.5);
    assert!(p.particles().is_empty());
    let mut dl = DisplayList::default();
    p.render(&Camera::particle_default(1.0), Vec2::new(300.0, 300.0), &mut dl);
    assert_eq!(dl.cmds, vec![DrawCmd::Clear]);
}

#[test]
fn forming_twice_reuses_the_sample_set() {
    let mut p = ParticleText::new("O", ParticleConfig::default(), 7);
    p.set_font(font());
    let a = p.form().unwrap();
    let b = p.form().unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(p.regenerations(), 1);
    assert_eq!(a.formed.len(), 4000);
    assert_eq!(a.dispersed.len(), 4000);

    p.set_symbol("O");
    p.step(0.1);
    assert!(Rc::ptr_eq(&a, &p.form().unwrap()));

    p.set_symbol("L");
    let c = p.form().unwrap();
    assert!(!Rc::ptr_eq(&a, &c));
    assert_eq!(p.regenerations(), 2);
}

#[test]
fn steady_frames_never_rebuild_samples() {
    let mut p = ParticleText::new("OL", ParticleConfig::default(), 5);
    p.set_font(font());
    for frame in 0..240 {
        p.set_focused(frame % 60 < 30);
        p.set_symbol("OL");
        p.step(frame as f32 / 60.0);
    }
    assert_eq!(p.regenerations(), 1);
}

#[test]
fn a_new_font_rebuilds_samples() {
    let mut p = ParticleText::new("L", ParticleConfig::default(), 9);
    p.set_font(font());
    let a = p.form().unwrap();
    p.set_font(font());
    let b = p.form().unwrap();
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn focused_particles_gather_on_the_glyph() {
    let mut p = ParticleText::new("O", ParticleConfig::default(), 11);
    p.set_font(font());
    let set = p.form().unwrap();
    assert_eq!(p.particles(), &set.dispersed[..]);
    let half = 12.0 / 2.0;
    assert!(set.dispersed.iter().all(|v| v.abs().max_element() <= half));

    let mean_err = |p: &ParticleText| {
        p.particles()
            .iter()
            .zip(&set.formed)
            .map(|(a, b)| a.distance(*b))
            .sum::<f32>()
            / set.formed.len() as f32
    };
    let start = mean_err(&p);
    p.set_focused(true);
    for frame in 0..200 {
        p.step(frame as f32 / 60.0);
    }
    let end = mean_err(&p);
    assert!(end < start * 0.05, "start {start}, end {end}");
    assert_eq!(p.positions().len(), 3 * 4000);

    // formed points lie on the flat glyph
    assert!(set.formed.iter().all(|v| v.z.abs() < 1e-4));
    assert!(set.formed.iter().all(|v| v.x.abs() <= 0.75 + 1e-3 && v.y.abs() <= 0.75 + 1e-3));
}

#[test]
fn render_projects_every_visible_particle() {
    let mut p = ParticleText::new("O", ParticleConfig::default(), 13);
    p.set_font(font());
    p.set_focused(true);
    for frame in 0..120 {
        p.step(frame as f32 / 60.0);
    }
    let viewport = Vec2::new(400.0, 300.0);
    let mut dl = DisplayList::default();
    p.render(&Camera::particle_default(viewport.x / viewport.y), viewport, &mut dl);
    let Some(DrawCmd::Points { points, size, .. }) = dl.cmds.last() else {
        panic!("expected a point batch");
    };
    assert_eq!(points.len(), 4000);
    assert!(*size >= 1.0);
    assert!(dl
        .points_of(points)
        .iter()
        .all(|q| q.x > 0.0 && q.x < viewport.x && q.y > 0.0 && q.y < viewport.y));
}
