use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, TouchEvent, WheelEvent};

use warden_shared::render::MARKER_HIGHLIGHT_RADIUS_PX;
use warden_shared::{DrawCommand, LabelRole, MapEvent, Scene};

use crate::background::ImageStore;
use crate::debug::warn_once;
use crate::live::EventBinding;
use crate::render_loop::RenderScheduler;
use crate::session::MapSession;

const MAP_BACKDROP: &str = "#0c0e17";
const LABEL_HALO: &str = "rgba(8, 10, 18, 0.85)";
const ICON_FILL: &str = "rgba(255, 255, 255, 0.95)";
const MARKER_OUTLINE_PX: f64 = 1.5;
const SELECTION_RING_PX: f64 = 2.5;
const LABEL_HALO_PX: f64 = 3.0;
const LABEL_FONT: &str = "system-ui, -apple-system, 'Segoe UI', sans-serif";

static CONTEXT_WARNED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static RESIZE_BINDING: RefCell<Option<EventBinding>> = const { RefCell::new(None) };
}

/// Canvas element box in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CssRect {
    fn of(el: &web_sys::Element) -> Self {
        let rect = el.get_bounding_client_rect();
        Self {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        }
    }
}

/// Map a client (CSS px) position onto the drawing surface, the space all
/// hit testing and zoom anchors use. The element box and the last reported
/// surface size can briefly disagree while a resize is in flight.
pub fn client_to_canvas(client: (f64, f64), rect: CssRect, surface: (f64, f64)) -> (f64, f64) {
    let local_x = client.0 - rect.left;
    let local_y = client.1 - rect.top;
    let ratio = |surface: f64, css: f64| {
        if surface > 0.0 && css > 0.0 {
            surface / css
        } else {
            1.0
        }
    };
    (
        local_x * ratio(surface.0, rect.width),
        local_y * ratio(surface.1, rect.height),
    )
}

/// Zoom factor between two finger spreads.
pub fn pinch_factor(previous: f64, current: f64) -> Option<f64> {
    (previous > 0.0 && current > 0.0).then(|| current / previous)
}

/// Integer backing size for a surface of CSS size `surface` on a display
/// with `ratio` device pixels per CSS pixel, or `None` when there is nothing
/// to draw.
pub fn backing_pixels(surface: (f64, f64), ratio: f64) -> Option<(u32, u32)> {
    let (w, h) = (surface.0 * ratio, surface.1 * ratio);
    if !(w.is_finite() && h.is_finite()) || w < 1.0 || h < 1.0 {
        return None;
    }
    Some((w.round() as u32, h.round() as u32))
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0)
}

fn touch_pair(e: &TouchEvent) -> Option<((f64, f64), (f64, f64))> {
    let touches = e.touches();
    if touches.length() != 2 {
        return None;
    }
    let (t0, t1) = (touches.get(0)?, touches.get(1)?);
    Some((
        (t0.client_x() as f64, t0.client_y() as f64),
        (t1.client_x() as f64, t1.client_y() as f64),
    ))
}

fn report_container_size(session: &MapSession, canvas: &HtmlCanvasElement) {
    let Some(parent) = canvas.parent_element() else {
        return;
    };
    let width = parent.client_width() as f64;
    let height = parent.client_height() as f64;
    if width > 0.0 && height > 0.0 {
        session.dispatch(MapEvent::CanvasResized { width, height });
    }
}

fn stop_resize_watch() {
    RESIZE_BINDING.with(|slot| {
        slot.borrow_mut().take();
    });
}

/// The map surface. Paints the session's scene and feeds pointer, wheel and
/// pinch input back to it.
#[component]
pub fn MapCanvas(session: MapSession) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
    let pinch_dist = Rc::new(Cell::new(0.0f64));

    let scheduler = {
        let session = session.clone();
        RenderScheduler::new(move || {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let scene = session.scene();
            let ratio = device_pixel_ratio();
            let Some((w, h)) = backing_pixels(scene.surface, ratio) else {
                return;
            };
            if canvas.width() != w || canvas.height() != h {
                canvas.set_width(w);
                canvas.set_height(h);
            }

            let mut ctx_cache = cached_ctx.borrow_mut();
            if ctx_cache.is_none() {
                *ctx_cache = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
            }
            let Some(ctx) = ctx_cache.as_ref() else {
                warn_once(&CONTEXT_WARNED, "Canvas 2D context unavailable; map not drawn.");
                return;
            };
            paint_scene(ctx, &scene, session.images(), ratio);
        })
    };

    let frame = session.frame();
    Effect::new(move || {
        frame.track();
        scheduler.mark_dirty();
    });

    // The drawing surface follows its container.
    Effect::new({
        let session = session.clone();
        move || {
            let Some(canvas_el) = canvas_ref.get() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas_el;
            let canvas: HtmlCanvasElement = canvas.clone();
            report_container_size(&session, &canvas);

            let Some(window) = web_sys::window() else {
                return;
            };
            let session = session.clone();
            let binding = EventBinding::listen(window.into(), "resize", move |_| {
                report_container_size(&session, &canvas);
            });
            RESIZE_BINDING.with(|slot| *slot.borrow_mut() = binding);
        }
    });
    on_cleanup(stop_resize_watch);

    let to_canvas = {
        let session = session.clone();
        move |client_x: f64, client_y: f64| -> Option<(f64, f64)> {
            let canvas = canvas_ref.get_untracked()?;
            Some(client_to_canvas(
                (client_x, client_y),
                CssRect::of(&canvas),
                session.surface_size(),
            ))
        }
    };

    let on_pointer_down = {
        let session = session.clone();
        let to_canvas = to_canvas.clone();
        move |e: PointerEvent| {
            let Some((x, y)) = to_canvas(e.client_x() as f64, e.client_y() as f64) else {
                return;
            };
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
            session.dispatch(MapEvent::PointerDown { x, y });
        }
    };

    let on_pointer_move = {
        let session = session.clone();
        let to_canvas = to_canvas.clone();
        move |e: PointerEvent| {
            if !session.is_dragging() {
                return;
            }
            if let Some((x, y)) = to_canvas(e.client_x() as f64, e.client_y() as f64) {
                session.dispatch(MapEvent::PointerMove { x, y });
            }
        }
    };

    let on_pointer_up = {
        let session = session.clone();
        let to_canvas = to_canvas.clone();
        move |e: PointerEvent| {
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
            match to_canvas(e.client_x() as f64, e.client_y() as f64) {
                Some((x, y)) => session.dispatch(MapEvent::PointerUp { x, y }),
                None => session.dispatch(MapEvent::PointerLeave),
            }
        }
    };

    let on_pointer_leave = {
        let session = session.clone();
        move |_: PointerEvent| {
            if session.is_dragging() {
                session.dispatch(MapEvent::PointerLeave);
            }
        }
    };

    let on_wheel = {
        let session = session.clone();
        let to_canvas = to_canvas.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            if let Some((x, y)) = to_canvas(e.client_x() as f64, e.client_y() as f64) {
                session.dispatch(MapEvent::Wheel {
                    x,
                    y,
                    delta_y: e.delta_y(),
                });
            }
        }
    };

    let on_touch_start = {
        let session = session.clone();
        let pinch_dist = pinch_dist.clone();
        move |e: TouchEvent| {
            let Some((a, b)) = touch_pair(&e) else {
                return;
            };
            e.prevent_default();
            // Two fingers mean zoom, not pan.
            session.dispatch(MapEvent::PointerLeave);
            pinch_dist.set((b.0 - a.0).hypot(b.1 - a.1));
        }
    };

    let on_touch_move = {
        let session = session.clone();
        let pinch_dist = pinch_dist.clone();
        move |e: TouchEvent| {
            let Some((a, b)) = touch_pair(&e) else {
                return;
            };
            e.prevent_default();
            let spread = (b.0 - a.0).hypot(b.1 - a.1);
            let factor = pinch_factor(pinch_dist.get(), spread);
            pinch_dist.set(spread);
            let mid = to_canvas((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
            if let (Some(factor), Some((x, y))) = (factor, mid) {
                session.dispatch(MapEvent::Pinch { x, y, factor });
            }
        }
    };

    let on_touch_end = {
        move |e: TouchEvent| {
            if e.touches().length() < 2 {
                pinch_dist.set(0.0);
            }
        }
    };

    view! {
        <div style="position: relative; width: 100%; height: 100%; overflow: hidden;">
            <canvas
                node_ref=canvas_ref
                style="display: block; width: 100%; height: 100%; touch-action: none; cursor: grab;"
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
                on:touchstart=on_touch_start
                on:touchmove=on_touch_move
                on:touchend=on_touch_end
            />
        </div>
    }
}

/// Execute a draw list, in order, onto a full-canvas pass. Commands are in
/// CSS pixels; `ratio` scales them onto the device-pixel backing store.
pub(crate) fn paint_scene(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    images: &ImageStore,
    ratio: f64,
) {
    let (w, h) = scene.surface;
    ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0).ok();
    ctx.set_fill_style_str(MAP_BACKDROP);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_line_join("round");

    for cmd in &scene.commands {
        match cmd {
            DrawCommand::Background {
                url,
                x,
                y,
                width,
                height,
            } => {
                // A missing element only happens mid-swap; the next frame has it.
                if let Some(image) = images.get(url) {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &image, *x, *y, *width, *height,
                    )
                    .ok();
                }
            }
            DrawCommand::SelectionRing {
                x,
                y,
                radius,
                color,
            } => {
                ctx.begin_path();
                ctx.arc(*x, *y, *radius, 0.0, TAU).ok();
                ctx.set_line_width(SELECTION_RING_PX);
                ctx.set_stroke_style_str(color);
                ctx.stroke();
            }
            DrawCommand::Marker {
                x,
                y,
                radius,
                fill,
                outline,
                highlight,
                ..
            } => {
                ctx.begin_path();
                ctx.arc(*x, *y, *radius, 0.0, TAU).ok();
                ctx.set_fill_style_str(fill);
                ctx.fill();
                ctx.set_line_width(MARKER_OUTLINE_PX);
                ctx.set_stroke_style_str(outline);
                ctx.stroke();

                ctx.begin_path();
                ctx.arc(
                    x - radius * 0.3,
                    y - radius * 0.3,
                    MARKER_HIGHLIGHT_RADIUS_PX,
                    0.0,
                    TAU,
                )
                .ok();
                ctx.set_fill_style_str(highlight);
                ctx.fill();
            }
            DrawCommand::Icon { glyph, x, y, size } => {
                ctx.set_font(&format!("{size}px {LABEL_FONT}"));
                ctx.set_fill_style_str(ICON_FILL);
                ctx.fill_text(glyph, *x, *y).ok();
            }
            DrawCommand::Label {
                text,
                x,
                y,
                size,
                color,
                role,
            } => {
                let weight = match role {
                    LabelRole::Entity => "600",
                    LabelRole::Monument => "italic 500",
                };
                ctx.set_font(&format!("{weight} {size}px {LABEL_FONT}"));
                ctx.set_line_width(LABEL_HALO_PX);
                ctx.set_stroke_style_str(LABEL_HALO);
                ctx.stroke_text(text, *x, *y).ok();
                ctx.set_fill_style_str(color);
                ctx.fill_text(text, *x, *y).ok();
            }
        }
    }
}
