// Host-side tests for the cursor engine: classification, spring follow,
// magnetic snap and click bursts.

use folio_core::cursor::{classify, CursorEngine, CursorMode, HoverTarget};
use folio_core::draw::{Blend, DisplayList, DrawCmd, Paint, Shape};
use folio_core::{SpringBody, CURSOR_DOT_RADIUS, SPLAT_MIN_ALPHA};
use glam::Vec2;
use std::f32::consts::TAU;

fn idle() -> HoverTarget {
    HoverTarget::default()
}

#[test]
fn spring_converges_without_sustained_oscillation() {
    for &target in &[Vec2::new(500.0, 500.0), Vec2::new(-40.0, 12.0), Vec2::new(3.0, -900.0)] {
        let start = Vec2::ZERO;
        let mut body = SpringBody::new(start, 0.13, 0.74);
        body.target = target;
        let dist = start.distance(target);

        let mut peaks = Vec::new();
        let mut peak = 0.0f32;
        for frame in 1..=100 {
            body.step();
            let err = body.pos.distance(target);
            // bounded overshoot
            assert!(err <= dist * 1.0001, "frame {frame}: err {err} > {dist}");
            peak = peak.max(err);
            if frame % 20 == 0 {
                peaks.push(peak);
                peak = 0.0;
            }
        }
        for w in peaks.windows(2) {
            assert!(w[1] < w[0] || w[1] < 1e-3, "peaks {:?}", peaks);
        }
        assert!(body.pos.distance(target) < 0.05);
    }
}

#[test]
fn classification_prefers_explicit_view_over_link() {
    // <div data-cursor="view"><a href=..>..</a></div>
    let anchor_in_view = HoverTarget {
        cursor_attr: Some("view".into()),
        interactive: true,
        magnet_center: Some(Vec2::new(10.0, 10.0)),
        ..idle()
    };
    assert_eq!(classify(&anchor_in_view), CursorMode::View);
}

#[test]
fn classification_is_total_over_flag_combinations() {
    let attrs = [None, Some("view".to_string()), Some("other".to_string())];
    for attr in &attrs {
        for bits in 0..8u8 {
            let target = HoverTarget {
                cursor_attr: attr.clone(),
                interactive: bits & 1 != 0,
                editable: bits & 2 != 0,
                media: bits & 4 != 0,
                magnet_center: None,
            };
            let expected = if attr.as_deref() == Some("view") {
                CursorMode::View
            } else if target.interactive {
                CursorMode::Link
            } else if target.editable {
                CursorMode::Text
            } else if target.media {
                CursorMode::View
            } else {
                CursorMode::Default
            };
            assert_eq!(classify(&target), expected, "{:?}", target);
            // pure: same input, same answer
            assert_eq!(classify(&target), classify(&target.clone()));
        }
    }
}

#[test]
fn scenario_pointer_glide_to_500_500() {
    let mut cursor = CursorEngine::new(1);
    for i in 0..=10 {
        let p = Vec2::splat(i as f32 * 50.0);
        cursor.pointer_move(p, &idle());
        for _ in 0..3 {
            cursor.step();
        }
    }
    let goal = Vec2::new(500.0, 500.0);
    let before = cursor.main.pos.distance(goal);
    for _ in 0..120 {
        cursor.step();
    }
    let now = cursor.main.pos.distance(goal);
    assert!(now < 0.5, "still {now}px away");
    assert!(now <= before);
    assert_eq!(cursor.mode(), CursorMode::Default);
}

#[test]
fn scenario_button_hover_snaps_toward_center() {
    let mut cursor = CursorEngine::new(2);
    let button = HoverTarget {
        interactive: true,
        magnet_center: Some(Vec2::new(600.0, 300.0)),
        ..idle()
    };
    cursor.pointer_move(Vec2::new(500.0, 300.0), &button);
    assert_eq!(cursor.mode(), CursorMode::Link);
    let t = cursor.main_target();
    assert!((t.x - 540.0).abs() < 1e-3, "{t:?}");
    assert!((t.y - 300.0).abs() < 1e-3);

    // leaving the button drops the magnet
    cursor.pointer_move(Vec2::new(100.0, 100.0), &idle());
    assert_eq!(cursor.mode(), CursorMode::Default);
    assert_eq!(cursor.main_target(), Vec2::new(100.0, 100.0));
}

#[test]
fn morph_finishes_within_twenty_frames() {
    let mut cursor = CursorEngine::new(3);
    cursor.pointer_move(Vec2::ZERO, &HoverTarget { editable: true, ..idle() });
    assert_eq!(cursor.mode(), CursorMode::Text);
    for _ in 0..17 {
        cursor.step();
    }
    assert!(cursor.morph.progress < 1.0);
    for _ in 0..3 {
        cursor.step();
    }
    assert_eq!(cursor.morph.progress, 1.0);
    assert_eq!(cursor.morph.eased(), 1.0);
}

#[test]
fn scenario_click_burst() {
    let mut cursor = CursorEngine::new(4);
    let at = Vec2::new(200.0, 200.0);
    cursor.pointer_move(at, &idle());
    cursor.pointer_down(at);
    assert_eq!(cursor.splats.len(), 8);

    let mut angles: Vec<f32> = cursor
        .splats
        .iter()
        .map(|s| {
            assert_eq!(s.pos, at);
            s.vel.y.atan2(s.vel.x).rem_euclid(TAU)
        })
        .collect();
    angles.sort_by(|a, b| a.total_cmp(b));
    for w in angles.windows(2) {
        assert!((w[1] - w[0] - TAU / 8.0).abs() < 1e-3, "{angles:?}");
    }

    cursor.pointer_up();
    for _ in 0..30 {
        cursor.step();
    }
    assert!(cursor.splats.is_empty());
}

#[test]
fn hidden_cursor_keeps_integrating_but_draws_nothing() {
    let mut cursor = CursorEngine::new(5);
    cursor.pointer_move(Vec2::new(300.0, 300.0), &idle());
    cursor.pointer_leave();
    let before = cursor.main.pos;
    cursor.step();
    assert_ne!(cursor.main.pos, before);

    let mut dl = DisplayList::default();
    cursor.render(&mut dl);
    assert_eq!(dl.cmds, vec![DrawCmd::Clear]);

    cursor.pointer_enter();
    dl.clear();
    cursor.render(&mut dl);
    assert!(dl.cmds.len() > 3);
}

#[test]
fn custom_classifier_is_used() {
    fn always_text(_: &HoverTarget) -> CursorMode {
        CursorMode::Text
    }
    let mut cursor = CursorEngine::new(6).with_classifier(always_text);
    cursor.pointer_move(Vec2::ZERO, &idle());
    assert_eq!(cursor.mode(), CursorMode::Text);
}

/// Split a display list into runs of commands under each blend mode.
fn blend_runs(dl: &DisplayList) -> Vec<(Blend, Vec<&DrawCmd>)> {
    let mut runs: Vec<(Blend, Vec<&DrawCmd>)> = Vec::new();
    for cmd in &dl.cmds {
        match cmd {
            DrawCmd::SetBlend(b) => runs.push((*b, Vec::new())),
            DrawCmd::Clear => {}
            other => runs
                .last_mut()
                .expect("drawing before any blend mode")
                .1
                .push(other),
        }
    }
    runs
}

fn settled_in(target: HoverTarget) -> CursorEngine {
    let mut cursor = CursorEngine::new(8);
    cursor.pointer_move(Vec2::new(400.0, 300.0), &target);
    for _ in 0..40 {
        cursor.step();
    }
    cursor
}

#[test]
fn text_mode_draws_two_satellites_and_an_i_beam() {
    let cursor = settled_in(HoverTarget { editable: true, ..idle() });
    assert_eq!(cursor.mode(), CursorMode::Text);
    let mut dl = DisplayList::default();
    cursor.render(&mut dl);
    assert_eq!(dl.cmds[0], DrawCmd::Clear);

    let runs = blend_runs(&dl);
    // glow layer: 2 satellites x (glow + core) + 3 blob layers, all additive
    assert_eq!(runs[0].0, Blend::Additive);
    assert_eq!(runs[0].1.len(), 2 * 2 + 3);
    assert!(runs[0].1.iter().all(|c| matches!(c, DrawCmd::Fill { .. })));

    // indicator on top in normal blending: three I-beam strokes, no dot
    assert_eq!(runs[1].0, Blend::Normal);
    assert_eq!(runs[1].1.len(), 3);
    assert!(runs[1].1.iter().all(|c| matches!(c, DrawCmd::Polyline { .. })));
    assert!(!dl.cmds.iter().any(|c| matches!(
        c,
        DrawCmd::Fill { shape: Shape::Circle { radius, .. }, paint: Paint::Solid(_) } if *radius == CURSOR_DOT_RADIUS
    )));

    assert_eq!(runs.last().unwrap().0, Blend::Normal);
}

#[test]
fn view_mode_draws_six_satellites_label_and_dot() {
    let cursor = settled_in(HoverTarget { media: true, ..idle() });
    assert_eq!(cursor.mode(), CursorMode::View);
    let mut dl = DisplayList::default();
    cursor.render(&mut dl);

    let runs = blend_runs(&dl);
    assert_eq!(runs[0].0, Blend::Additive);
    assert_eq!(runs[0].1.len(), 6 * 2 + 3);

    // label, then the precise dot, both in normal blending
    assert_eq!(runs[1].0, Blend::Normal);
    assert!(matches!(runs[1].1[..], [DrawCmd::Text { .. }]));
    assert_eq!(runs[2].0, Blend::Normal);
    match runs[2].1[..] {
        [DrawCmd::Fill {
            shape: Shape::Circle { center, radius },
            paint: Paint::Solid(_),
        }] => {
            assert_eq!(*radius, CURSOR_DOT_RADIUS);
            assert_eq!(*center, cursor.pointer);
        }
        ref other => panic!("expected the dot, got {other:?}"),
    }
}

#[test]
fn inactive_satellite_slots_move_but_are_not_drawn() {
    let mut cursor = settled_in(idle());
    let default_fills = {
        let mut dl = DisplayList::default();
        cursor.render(&mut dl);
        blend_runs(&dl)[0].1.len()
    };
    assert_eq!(default_fills, 4 * 2 + 3);

    cursor.pointer_move(Vec2::new(420.0, 300.0), &HoverTarget { editable: true, ..idle() });
    let spare = cursor.satellites[5].pos;
    for _ in 0..40 {
        cursor.step();
    }
    assert_ne!(cursor.satellites[5].pos, spare);
    let mut dl = DisplayList::default();
    cursor.render(&mut dl);
    assert_eq!(blend_runs(&dl)[0].1.len(), 2 * 2 + 3);
}

#[test]
fn splats_draw_additively_after_the_indicator() {
    let mut cursor = settled_in(idle());
    cursor.pointer_down(cursor.pointer);
    let mut dl = DisplayList::default();
    cursor.render(&mut dl);
    let runs = blend_runs(&dl);
    let n = runs.len();
    assert_eq!(runs[n - 2].0, Blend::Additive);
    assert_eq!(runs[n - 2].1.len(), 8);
    assert_eq!(runs[n - 1].0, Blend::Normal);
    assert!(runs[n - 1].1.is_empty());
}

#[test]
fn surviving_splats_stay_above_the_alpha_floor() {
    let mut cursor = CursorEngine::new(9);
    cursor.pointer_down(Vec2::new(50.0, 50.0));
    while !cursor.splats.is_empty() {
        cursor.step();
        assert!(cursor.splats.iter().all(|s| s.alpha > SPLAT_MIN_ALPHA));
    }
}
