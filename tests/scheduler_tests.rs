// Host-side tests for the frame scheduler and loop lifecycle gate.

use folio_core::skills::layout::LayoutConfig;
use folio_core::skills::{SkillCategories, SkillGraph};
use folio_core::{
    frame_callback, AnimationLoop, FrameClock, LoopControl, ManualScheduler, PointerQueue, Scheduler,
    FRAME_DT_MAX_MS, SKILL_FLOAT_AMPLITUDE,
};
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

fn counting_loop() -> (AnimationLoop<ManualScheduler>, Rc<Cell<u32>>) {
    let frames = Rc::new(Cell::new(0));
    let f = frames.clone();
    let mut anim = AnimationLoop::new(ManualScheduler::new(16.0));
    anim.mount(frame_callback(move |_| {
        f.set(f.get() + 1);
        LoopControl::Continue
    }));
    (anim, frames)
}

#[test]
fn start_while_running_is_a_no_op() {
    let mut s = ManualScheduler::new(16.0);
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let cb = frame_callback(move |_| {
        h.set(h.get() + 1);
        LoopControl::Continue
    });
    s.start(cb.clone());
    s.start(cb);
    assert_eq!(s.start_count(), 1);
    assert_eq!(s.advance(5), 5);
    assert_eq!(hits.get(), 5);
}

#[test]
fn visibility_flicker_never_duplicates_the_loop() {
    let (mut anim, frames) = counting_loop();
    for i in 0..50 {
        anim.set_visible(i % 3 != 0);
        anim.set_visible(true);
    }
    assert!(anim.is_running());
    let ran = anim.scheduler_mut().advance(10);
    assert_eq!(ran, 10);
    assert_eq!(frames.get(), 10);
}

#[test]
fn hidden_loop_runs_no_frames_and_resumes() {
    let (mut anim, frames) = counting_loop();
    anim.scheduler_mut().advance(3);
    anim.set_visible(false);
    assert!(!anim.is_running());
    assert_eq!(anim.scheduler_mut().advance(10), 0);
    assert_eq!(frames.get(), 3);

    anim.set_visible(true);
    assert_eq!(anim.scheduler().start_count(), 2);
    anim.scheduler_mut().advance(2);
    assert_eq!(frames.get(), 5);
}

#[test]
fn notifications_after_unmount_are_ignored() {
    let (mut anim, frames) = counting_loop();
    anim.unmount();
    assert!(anim.is_torn_down());
    anim.set_visible(false);
    anim.set_visible(true);
    anim.mount(frame_callback(|_| LoopControl::Continue));
    assert!(!anim.is_running());
    assert_eq!(anim.scheduler_mut().advance(5), 0);
    assert_eq!(frames.get(), 0);
}

#[test]
fn mounting_while_hidden_waits_for_visibility() {
    let mut anim = AnimationLoop::new(ManualScheduler::new(16.0));
    anim.set_visible(false);
    anim.mount(frame_callback(|_| LoopControl::Continue));
    assert!(!anim.is_running());
    anim.set_visible(true);
    assert!(anim.is_running());
}

#[test]
fn callback_can_stop_its_own_loop() {
    let mut s = ManualScheduler::new(16.0);
    let n = Rc::new(Cell::new(0));
    let c = n.clone();
    s.start(frame_callback(move |_| {
        c.set(c.get() + 1);
        if c.get() == 3 {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }));
    assert_eq!(s.advance(10), 3);
    assert!(!s.is_running());
}

#[test]
fn pointer_queue_keeps_only_the_latest_move() {
    let q = PointerQueue::default();
    assert!(q.take().is_none());
    for i in 0..100 {
        q.push(Vec2::splat(i as f32));
    }
    assert!(q.is_pending());
    assert_eq!(q.take(), Some(Vec2::splat(99.0)));
    assert!(q.take().is_none());
}

#[test]
fn frame_clock_counts_from_first_frame() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.elapsed_sec(5000.0), 0.0);
    let mut t = 0.0;
    for i in 1..=60 {
        t = clock.elapsed_sec(5000.0 + i as f64 * 25.0);
    }
    assert!((t - 1.5).abs() < 1e-4, "{t}");
}

#[test]
fn frame_clock_skips_paused_stretches() {
    let mut clock = FrameClock::default();
    let mut now = 0.0;
    for _ in 0..=30 {
        clock.elapsed_sec(now);
        now += 16.0;
    }
    let before = clock.elapsed_sec(now);
    // hidden for ten minutes
    now += 600_000.0;
    let after = clock.elapsed_sec(now);
    assert!((after - before) as f64 <= FRAME_DT_MAX_MS / 1000.0 + 1e-6);
    // clocks going backwards never rewind animation time
    assert!(clock.elapsed_sec(now - 5000.0) >= after);
}

#[test]
fn skill_graph_resumes_without_a_jump() {
    let data = SkillCategories::from_json(
        r#"{"languages": [{"name": "Rust", "level": 90}, {"name": "Go", "level": 10}],
            "tools": [{"name": "Git", "level": 70}]}"#,
    )
    .unwrap();
    let mut graph = SkillGraph::new(data, LayoutConfig::default());
    graph.resize(Vec2::new(1200.0, 900.0));

    let mut clock = FrameClock::default();
    let mut now = 0.0;
    for _ in 0..600 {
        graph.step(clock.elapsed_sec(now));
        now += 16.0;
    }
    let before: Vec<Vec2> = graph.layout.nodes.iter().map(|n| n.pos).collect();

    // scrolled out of view for 1.6 s, then the next frame arrives
    now += 1600.0;
    graph.step(clock.elapsed_sec(now));
    let jump = graph
        .layout
        .nodes
        .iter()
        .zip(&before)
        .map(|(n, b)| n.pos.distance(*b))
        .fold(0.0f32, f32::max);

    // the float moves at most amplitude * 1 rad/s, for one clamped frame
    let bound = SKILL_FLOAT_AMPLITUDE * (FRAME_DT_MAX_MS / 1000.0) as f32 + 1e-3;
    assert!(jump <= bound, "resume moved a node {jump}px (bound {bound}px)");
}
