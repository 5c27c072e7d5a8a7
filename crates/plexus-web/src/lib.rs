#![cfg(target_arch = "wasm32")]
//! Browser host for plexus scenes.
//!
//! ```js
//! const scene = await createScene(canvas, "hero");
//! scene.on_mount();
//! // ...
//! scene.on_unmount();
//! ```

mod dom;
mod events;
mod frame;

use anyhow::Context;
use plexus_core::gpu::GpuRenderer;
use plexus_core::{ColorSet, HostInfo, Preset, Scene, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("plexus-web loaded");
    Ok(())
}

/// Handle returned to JavaScript for one canvas.
#[wasm_bindgen]
pub struct PlexusScene {
    scene: Rc<RefCell<Scene>>,
    canvas: web::HtmlCanvasElement,
    touch_only: bool,
    initialized: bool,
    wiring: Option<events::Wiring>,
    frame_loop: Option<frame::FrameLoop>,
}

/// Build a scene on `canvas` from a named preset. Without a seed a random one
/// is drawn. Rejects only on an unknown preset; a canvas that cannot host
/// WebGPU yields a scene with `initialized() == false` that renders nothing.
#[wasm_bindgen(js_name = createScene)]
pub async fn create_scene(
    canvas: web::HtmlCanvasElement,
    preset: String,
    seed: Option<u32>,
) -> Result<PlexusScene, JsValue> {
    let palette = Preset::from_name(&preset)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .config();
    let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u32);
    let (w, h, dpr) = dom::sync_canvas_backing_size(&canvas);
    let touch_only = dom::is_touch_only();
    let host = HostInfo {
        viewport: Viewport {
            visible: !dom::page_hidden(),
            ..Viewport::new(w, h, dpr)
        },
        touch_only,
    };
    let mut scene = Scene::with_host(palette, seed as u64, host)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let initialized = match init_backend(&canvas).await {
        Ok(backend) => scene.attach(Box::new(backend)),
        Err(e) => {
            log::warn!("WebGPU unavailable, scene will not draw: {e:#}");
            false
        }
    };
    log::info!("createScene preset={preset} seed={seed} initialized={initialized}");

    Ok(PlexusScene {
        scene: Rc::new(RefCell::new(scene)),
        canvas,
        touch_only,
        initialized,
        wiring: None,
        frame_loop: None,
    })
}

async fn init_backend(canvas: &web::HtmlCanvasElement) -> anyhow::Result<GpuRenderer> {
    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    GpuRenderer::new(target, canvas.width(), canvas.height())
        .await
        .context("WebGPU renderer init")
}

#[wasm_bindgen]
impl PlexusScene {
    /// False when the GPU surface could not be set up.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Wire DOM observers and start the frame loop.
    pub fn on_mount(&mut self) {
        if !self.scene.borrow_mut().on_mount() {
            log::debug!("on_mount ignored");
            return;
        }
        match events::wire(&self.scene, &self.canvas, self.touch_only) {
            Ok(wiring) => self.wiring = Some(wiring),
            Err(e) => log::warn!("event wiring failed: {e:?}"),
        }
        self.frame_loop = Some(frame::FrameLoop::start(self.scene.clone()));
    }

    /// Explicit resize for hosts that manage layout themselves.
    pub fn on_resize(&self, width: f32, height: f32, dpr: f32) {
        dom::set_backing_size(&self.canvas, width, height, dpr);
        self.scene.borrow_mut().on_resize(width, height, dpr);
    }

    pub fn on_visibility_change(&self, visible: bool) {
        self.scene.borrow_mut().on_visibility_change(visible);
    }

    /// Pointer in canvas-normalized coordinates (0..1, y down).
    pub fn on_pointer_move(&self, x: f32, y: f32) {
        self.scene.borrow_mut().on_pointer_move(x, y);
    }

    /// Re-tint from hex color lists. Returns false on an invalid color.
    pub fn on_palette_change(&self, base: Vec<String>, accents: Vec<String>, background: String) -> bool {
        let base: Vec<&str> = base.iter().map(String::as_str).collect();
        let accents: Vec<&str> = accents.iter().map(String::as_str).collect();
        let colors = match ColorSet::from_hex(&base, &accents, &background) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("palette change rejected: {e}");
                return false;
            }
        };
        let mut scene = self.scene.borrow_mut();
        let palette = scene.palette().with_colors(colors);
        scene.on_palette_change(&palette)
    }

    /// Rebuild nodes, links and pulses from a new seed.
    pub fn reset(&self, seed: u32) {
        self.scene.borrow_mut().reset(seed as u64);
    }

    /// Stop the loop, remove every listener and release GPU resources.
    pub fn on_unmount(&mut self) {
        self.frame_loop = None;
        self.wiring = None;
        self.scene.borrow_mut().on_unmount();
    }
}

impl Drop for PlexusScene {
    fn drop(&mut self) {
        self.on_unmount();
    }
}
