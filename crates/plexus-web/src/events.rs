use crate::dom;
use plexus_core::Scene;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// DOM event listener that is removed again when dropped.
pub struct ListenerGuard {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl ListenerGuard {
    pub fn listen(
        target: &web::EventTarget,
        kind: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

enum Observer {
    Resize(web::ResizeObserver),
    Intersection(web::IntersectionObserver),
}

/// Resize or intersection observer, disconnected when dropped.
pub struct ObserverGuard {
    observer: Observer,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        match &self.observer {
            Observer::Resize(o) => o.disconnect(),
            Observer::Intersection(o) => o.disconnect(),
        }
    }
}

/// Everything wired to the DOM for one mounted scene.
#[derive(Default)]
pub struct Wiring {
    listeners: Vec<ListenerGuard>,
    observers: Vec<ObserverGuard>,
}

#[derive(Clone)]
struct Visibility {
    in_view: Rc<Cell<bool>>,
    page_visible: Rc<Cell<bool>>,
    scene: Rc<RefCell<Scene>>,
}

impl Visibility {
    fn publish(&self) {
        let visible = self.in_view.get() && self.page_visible.get();
        self.scene.borrow_mut().on_visibility_change(visible);
    }
}

pub fn wire(
    scene: &Rc<RefCell<Scene>>,
    canvas: &web::HtmlCanvasElement,
    touch_only: bool,
) -> Result<Wiring, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let mut wiring = Wiring::default();

    // resize
    {
        let scene = scene.clone();
        let canvas_resize = canvas.clone();
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let (w, h, dpr) = dom::sync_canvas_backing_size(&canvas_resize);
            scene.borrow_mut().on_resize(w, h, dpr);
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = web::ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(canvas);
        wiring.observers.push(ObserverGuard {
            observer: Observer::Resize(observer),
            _closure: closure,
        });
    }

    let visibility = Visibility {
        in_view: Rc::new(Cell::new(true)),
        page_visible: Rc::new(Cell::new(!dom::page_hidden())),
        scene: scene.clone(),
    };

    // offscreen
    {
        let vis = visibility.clone();
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            let Some(entry) = entries
                .iter()
                .last()
                .and_then(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
            else {
                return;
            };
            vis.in_view.set(entry.is_intersecting());
            vis.publish();
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = web::IntersectionObserver::new(closure.as_ref().unchecked_ref())?;
        observer.observe(canvas);
        wiring.observers.push(ObserverGuard {
            observer: Observer::Intersection(observer),
            _closure: closure,
        });
    }

    // tab hidden
    {
        let vis = visibility.clone();
        wiring.listeners.push(ListenerGuard::listen(
            &document,
            "visibilitychange",
            move |_| {
                vis.page_visible.set(!dom::page_hidden());
                vis.publish();
            },
        )?);
    }

    if touch_only {
        log::debug!("touch-only device, pointer listeners skipped");
        return Ok(wiring);
    }

    {
        let scene = scene.clone();
        let canvas_pointer = canvas.clone();
        wiring
            .listeners
            .push(ListenerGuard::listen(&window, "pointermove", move |ev| {
                let Some(ev) = ev.dyn_ref::<web::MouseEvent>() else {
                    return;
                };
                if let Some((x, y)) = dom::pointer_uv(ev, &canvas_pointer) {
                    scene.borrow_mut().on_pointer_move(x, y);
                }
            })?);
    }
    // pointerleave does not bubble, so it has to sit on an element
    if let Some(root) = document.document_element() {
        let scene = scene.clone();
        wiring
            .listeners
            .push(ListenerGuard::listen(&root, "pointerleave", move |_| {
                scene.borrow_mut().on_pointer_leave();
            })?);
    }

    Ok(wiring)
}
