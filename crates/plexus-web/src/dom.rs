use plexus_core::Viewport;
use web_sys as web;

/// CSS size of `canvas` and the current device pixel ratio.
pub fn css_size(canvas: &web::HtmlCanvasElement) -> (f32, f32, f32) {
    let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
    let rect = canvas.get_bounding_client_rect();
    (rect.width() as f32, rect.height() as f32, dpr as f32)
}

/// Keep the canvas backing store at CSS size × devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (f32, f32, f32) {
    let (w, h, dpr) = css_size(canvas);
    set_backing_size(canvas, w, h, dpr);
    (w, h, dpr)
}

/// Size the backing store exactly as the scene sizes its surface.
pub fn set_backing_size(canvas: &web::HtmlCanvasElement, width: f32, height: f32, dpr: f32) {
    let (w, h) = Viewport::new(width, height, dpr).physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
}

/// Coarse primary pointer with no hover, i.e. a phone or tablet.
pub fn is_touch_only() -> bool {
    web::window()
        .and_then(|w| w.match_media("(hover: none) and (pointer: coarse)").ok().flatten())
        .is_some_and(|mq| mq.matches())
}

pub fn page_hidden() -> bool {
    web::window()
        .and_then(|w| w.document())
        .is_some_and(|d| d.hidden())
}

/// Pointer position relative to `canvas`, normalized to 0..1 on both axes.
pub fn pointer_uv(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Option<(f32, f32)> {
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = (rect.width() as f32, rect.height() as f32);
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let x = (ev.client_x() as f32 - rect.left() as f32) / w;
    let y = (ev.client_y() as f32 - rect.top() as f32) / h;
    Some((x, y))
}
