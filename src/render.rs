//! Canvas2D rasterizer for `folio_core::draw::DisplayList`.

use folio_core::draw::{Blend, DisplayList, DrawCmd, Paint, RadialGradient, Shape, Stroke};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()
}

/// Draw `dl` onto `ctx`. Coordinates in the list are CSS pixels; `dpr` maps
/// them onto the backing store.
pub fn rasterize(ctx: &web::CanvasRenderingContext2d, dl: &DisplayList, css_size: Vec2, dpr: f64) {
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    ctx.set_global_alpha(1.0);
    set_blend(ctx, Blend::Normal);
    for cmd in &dl.cmds {
        match cmd {
            DrawCmd::Clear => {
                ctx.clear_rect(0.0, 0.0, css_size.x as f64, css_size.y as f64);
            }
            DrawCmd::SetBlend(blend) => set_blend(ctx, *blend),
            DrawCmd::Fill { shape, paint } => {
                trace_shape(ctx, shape);
                match paint {
                    Paint::Solid(c) => ctx.set_fill_style_str(&c.css()),
                    Paint::Radial(g) => match radial(ctx, g) {
                        Some(grad) => ctx.set_fill_style_canvas_gradient(&grad),
                        None => continue,
                    },
                }
                ctx.fill();
            }
            DrawCmd::StrokeCircle {
                center,
                radius,
                stroke,
            } => {
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                apply_stroke(ctx, stroke);
                ctx.stroke();
            }
            DrawCmd::Polyline { points, stroke } => {
                let pts = dl.points_of(points);
                let Some((first, rest)) = pts.split_first() else {
                    continue;
                };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                apply_stroke(ctx, stroke);
                ctx.stroke();
            }
            DrawCmd::Text {
                text,
                pos,
                color,
                font,
            } => {
                ctx.set_font(&font.css());
                ctx.set_text_align("center");
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&color.css());
                let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
            }
            DrawCmd::Points {
                points,
                size,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                let s = *size as f64;
                let half = s * 0.5;
                for p in dl.points_of(points) {
                    ctx.fill_rect(p.x as f64 - half, p.y as f64 - half, s, s);
                }
            }
        }
    }
    set_blend(ctx, Blend::Normal);
}

fn set_blend(ctx: &web::CanvasRenderingContext2d, blend: Blend) {
    let op = match blend {
        Blend::Normal => "source-over",
        Blend::Additive => "lighter",
    };
    let _ = ctx.set_global_composite_operation(op);
}

fn trace_shape(ctx: &web::CanvasRenderingContext2d, shape: &Shape) {
    ctx.begin_path();
    match shape {
        Shape::Circle { center, radius } => {
            let _ = ctx.arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
        }
        Shape::Ellipse {
            center,
            radii,
            rotation,
        } => {
            let _ = ctx.ellipse(
                center.x as f64,
                center.y as f64,
                radii.x.max(0.0) as f64,
                radii.y.max(0.0) as f64,
                *rotation as f64,
                0.0,
                TAU,
            );
        }
        Shape::Bezier { start, segments } => {
            ctx.move_to(start.x as f64, start.y as f64);
            for s in segments {
                ctx.bezier_curve_to(
                    s.c1.x as f64,
                    s.c1.y as f64,
                    s.c2.x as f64,
                    s.c2.y as f64,
                    s.to.x as f64,
                    s.to.y as f64,
                );
            }
            ctx.close_path();
        }
    }
}

fn radial(ctx: &web::CanvasRenderingContext2d, g: &RadialGradient) -> Option<web::CanvasGradient> {
    let grad = ctx
        .create_radial_gradient(
            g.inner.x as f64,
            g.inner.y as f64,
            g.inner_radius as f64,
            g.outer.x as f64,
            g.outer.y as f64,
            g.outer_radius as f64,
        )
        .ok()?;
    for stop in &g.stops {
        let _ = grad.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.css());
    }
    Some(grad)
}

fn apply_stroke(ctx: &web::CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.set_stroke_style_str(&stroke.color.css());
    ctx.set_line_width(stroke.width as f64);
    let dash = js_sys::Array::new();
    if let Some([on, off]) = stroke.dash {
        dash.push(&JsValue::from_f64(on as f64));
        dash.push(&JsValue::from_f64(off as f64));
    }
    let _ = ctx.set_line_dash(&dash);
}
