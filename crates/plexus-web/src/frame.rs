use instant::Instant;
use plexus_core::{FrameDecision, Scene};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// requestAnimationFrame loop driving one scene. Cancelled on drop.
pub struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start(scene: Rc<RefCell<Scene>>) -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let next = callback.clone();
        let next_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
            let started = Instant::now();
            let decision = scene.borrow_mut().frame(now_ms);
            match decision {
                FrameDecision::Halt => {
                    log::debug!("frame loop halted");
                    next_handle.set(None);
                    return;
                }
                FrameDecision::Run { .. } => {
                    let cost_ms = started.elapsed().as_secs_f64() * 1000.0;
                    scene.borrow_mut().record_frame_cost(cost_ms);
                }
                FrameDecision::Skip => {}
            }
            next_handle.set(request_frame(&next));
        }) as Box<dyn FnMut(f64)>));
        handle.set(request_frame(&callback));
        Self { callback, handle }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(w)) = (self.handle.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let window = web::window()?;
    let callback = callback.borrow();
    let f = callback.as_ref()?;
    window.request_animation_frame(f.as_ref().unchecked_ref()).ok()
}
