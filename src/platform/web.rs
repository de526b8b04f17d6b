//! Browser implementations of the host capabilities

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent,
    Window,
};

use super::{RhythmTimer, TargetProvider, TriggerControl};
use crate::consts::MIN_TARGET_SIZE;
use crate::input::{InputEvent, Key};
use crate::persistence::{KeyValueStore, StorageError};
use crate::sim::{PageTarget, Rect, TargetHandle, Viewport};

/// Page elements that can be shot
pub const TARGET_SELECTOR: &str = "h1, h2, h3, p, img:not([src*=\"data:\"]), a, \
     button:not(#startInvaders):not(#backToTop), .bento-card";

/// Id of the game canvas
pub const CANVAS_ID: &str = "invaders-canvas";
/// Id of the start button
pub const TRIGGER_ID: &str = "startInvaders";
/// Class carrying the trigger's entrance animation
pub const TRIGGER_CLASS: &str = "invader-trigger";
/// Body class while a session owns the page
pub const RETRO_CLASS: &str = "retro-mode";

/// Current window size in CSS pixels
pub fn viewport(window: &Window) -> Viewport {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    Viewport::new(w as f32, h as f32)
}

/// Touch-capable device
pub fn is_touch_device(window: &Window) -> bool {
    js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
        || window.navigator().max_touch_points() > 0
}

/// `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{e:?}")))
    }
}

/// Queries the document for visible content elements
#[derive(Default)]
pub struct DomTargets {
    /// Indexed by handle; replaced on every scan
    elements: Vec<HtmlElement>,
}

impl DomTargets {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_game_element(el: &HtmlElement) -> bool {
        let inside = |selector: &str| el.closest(selector).ok().flatten().is_some();
        inside(&format!("#{CANVAS_ID}")) || inside(&format!(".{TRIGGER_CLASS}"))
    }
}

impl TargetProvider for DomTargets {
    fn scan(&mut self, viewport: Viewport) -> Vec<PageTarget> {
        self.elements.clear();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return Vec::new();
        };
        let Ok(nodes) = document.query_selector_all(TARGET_SELECTOR) else {
            log::warn!("Target query failed");
            return Vec::new();
        };

        let bounds = viewport.rect();
        let mut targets = Vec::new();
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            if Self::is_game_element(&el) {
                continue;
            }
            let r = el.get_bounding_client_rect();
            let rect = Rect::new(
                r.left() as f32,
                r.top() as f32,
                r.width() as f32,
                r.height() as f32,
            );
            if rect.w > MIN_TARGET_SIZE && rect.h > MIN_TARGET_SIZE && rect.inside(&bounds) {
                targets.push(PageTarget {
                    handle: TargetHandle(self.elements.len() as u32),
                    rect,
                    alive: true,
                });
                self.elements.push(el);
            }
        }
        targets
    }

    fn set_visible(&mut self, handle: TargetHandle, visible: bool) {
        if let Some(el) = self.elements.get(handle.0 as usize) {
            let value = if visible { "visible" } else { "hidden" };
            let _ = el.style().set_property("visibility", value);
        }
    }
}

/// The `#startInvaders` button
#[derive(Debug, Default, Clone, Copy)]
pub struct TriggerButton;

impl TriggerButton {
    pub fn element() -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(TRIGGER_ID)?
            .dyn_into()
            .ok()
    }
}

impl TriggerControl for TriggerButton {
    fn hide(&mut self) {
        if let Some(el) = Self::element() {
            let _ = el.style().set_property("display", "none");
        }
    }

    fn restore(&mut self) {
        let Some(el) = Self::element() else {
            log::warn!("Trigger #{TRIGGER_ID} not found");
            return;
        };
        let style = el.style();
        for prop in ["display", "visibility", "opacity"] {
            let _ = style.remove_property(prop);
        }
        let classes = el.class_list();
        let _ = classes.remove_1(TRIGGER_CLASS);
        // Force a reflow so re-adding the class replays the animation
        let _ = el.offset_width();
        let _ = classes.add_1(TRIGGER_CLASS);
    }
}

/// `setTimeout`-backed rhythm timer
pub struct WebRhythmTimer {
    callback: Closure<dyn FnMut()>,
    handle: Rc<Cell<Option<i32>>>,
}

impl WebRhythmTimer {
    /// `on_fire` runs each time a scheduled beat comes due
    pub fn new(mut on_fire: impl FnMut() + 'static) -> Self {
        let handle = Rc::new(Cell::new(None));
        let pending = handle.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            pending.set(None);
            on_fire();
        });
        Self { callback, handle }
    }
}

impl RhythmTimer for WebRhythmTimer {
    fn schedule(&mut self, delay_ms: f64) {
        self.cancel();
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            delay_ms.round() as i32,
        ) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::warn!("Rhythm timer failed: {e:?}"),
        }
    }

    fn cancel(&mut self) {
        if let Some(id) = self.handle.take()
            && let Some(window) = web_sys::window()
        {
            window.clear_timeout_with_handle(id);
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl Drop for WebRhythmTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Full-window canvas overlay; removed (and the page restyled back) on drop
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    body: Option<HtmlElement>,
}

impl CanvasSurface {
    pub fn acquire(document: &Document, viewport: Viewport) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_id(CANVAS_ID);
        let style = canvas.style();
        for (prop, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100vw"),
            ("height", "100vh"),
            ("z-index", "99999"),
            ("pointer-events", "none"),
        ] {
            style.set_property(prop, value)?;
        }

        let body = document.body();
        if let Some(body) = &body {
            body.append_child(&canvas)?;
            body.class_list().add_1(RETRO_CLASS)?;
        }

        let surface = Self { canvas, body };
        surface.resize(viewport);
        Ok(surface)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn resize(&self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        self.canvas.remove();
        if let Some(body) = &self.body {
            let _ = body.class_list().remove_1(RETRO_CLASS);
        }
    }
}

type Listener = (&'static str, Closure<dyn FnMut(web_sys::Event)>);

/// Window listeners for one session; detached on drop
pub struct InputSubscription {
    window: Window,
    listeners: Vec<Listener>,
}

impl InputSubscription {
    /// `on_input` returns true when the event was consumed
    pub fn attach(
        window: &Window,
        on_input: Rc<dyn Fn(InputEvent) -> bool>,
        on_resize: Rc<dyn Fn()>,
    ) -> Result<Self, JsValue> {
        let mut sub = Self {
            window: window.clone(),
            listeners: Vec::new(),
        };

        let handler = on_input.clone();
        sub.listen("keydown", false, move |event| {
            let Some(e) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = Key::from_event(&e.code(), &e.key());
            if handler(InputEvent::KeyDown {
                key,
                repeat: e.repeat(),
            }) {
                e.prevent_default();
            }
        })?;

        let handler = on_input.clone();
        sub.listen("keyup", false, move |event| {
            if let Some(e) = event.dyn_ref::<KeyboardEvent>() {
                handler(InputEvent::KeyUp {
                    key: Key::from_event(&e.code(), &e.key()),
                });
            }
        })?;

        sub.listen("resize", false, move |_| on_resize())?;

        let handler = on_input.clone();
        sub.listen("touchstart", true, move |event| {
            let Some((x, y)) = first_touch(&event) else {
                return;
            };
            let time_ms = js_sys::Date::now();
            if handler(InputEvent::TouchStart { x, y, time_ms }) {
                event.prevent_default();
            }
        })?;

        let handler = on_input.clone();
        sub.listen("touchmove", true, move |event| {
            if let Some((x, _)) = first_touch(&event)
                && handler(InputEvent::TouchMove { x })
            {
                event.prevent_default();
            }
        })?;

        let handler = on_input;
        sub.listen("touchend", false, move |_| {
            handler(InputEvent::TouchEnd);
        })?;

        Ok(sub)
    }

    /// `active` listeners may call `preventDefault` (non-passive)
    fn listen(
        &mut self,
        name: &'static str,
        active: bool,
        f: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(f);
        let callback = closure.as_ref().unchecked_ref();
        if active {
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    name, callback, &options,
                )?;
        } else {
            self.window.add_event_listener_with_callback(name, callback)?;
        }
        self.listeners.push((name, closure));
        Ok(())
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        for (name, closure) in self.listeners.drain(..) {
            let _ = self
                .window
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        }
    }
}

/// Client position of the first finger
fn first_touch(event: &web_sys::Event) -> Option<(f32, f32)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((touch.client_x() as f32, touch.client_y() as f32))
}
