//! Browser bridge
//!
//! Exposes [`TargetRange`] to the host page. Pointer coordinates arrive as
//! window client pixels and are unprojected here; events leave as a JSON
//! array so the page can update its scene.

use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{BallId, TargetRange, Transition, Viewport};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(msg: &str);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        // No logger to report through
        console_error(&format!("Failed to init logger: {}", e));
    }
    log::info!("Target Range initialized");
}

#[wasm_bindgen]
pub struct WebRange {
    range: TargetRange,
}

#[wasm_bindgen]
impl WebRange {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebRange {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
        log::info!("Starting range {}x{} with seed {}", width, height, seed);
        WebRange {
            range: TargetRange::new(Settings::default(), Viewport::new(width, height), seed),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.range.resize(width, height);
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let p = self.range.viewport().client_to_world(x, y);
        self.range.pointer_down(p);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let p = self.range.viewport().client_to_world(x, y);
        self.range.pointer_move(p);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        let p = self.range.viewport().client_to_world(x, y);
        self.range.pointer_up(p);
    }

    /// Click in client pixels; returns the popped ball id
    pub fn click(&mut self, x: f32, y: f32) -> Option<u32> {
        self.range.click_client(x, y).map(|id| id.0)
    }

    /// Pop a ball found by the page's own raycaster
    pub fn pop(&mut self, id: u32) -> bool {
        self.range.pop(BallId(id)).is_some()
    }

    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&mut self) -> bool {
        self.range.toggle_mode()
    }

    pub fn refresh(&mut self) -> bool {
        self.range.refresh()
    }

    /// Returns false when a confirm was rejected (nothing drawn yet)
    #[wasm_bindgen(js_name = pressAreaButton)]
    pub fn press_area_button(&mut self) -> bool {
        self.range.press_area_button() != Transition::Rejected
    }

    /// Wallpaper Engine `applyUserProperties` payload, as JSON
    #[wasm_bindgen(js_name = applyUserProperties)]
    pub fn apply_user_properties(&mut self, json: &str) -> Result<(), JsValue> {
        self.range
            .apply_properties_json(json)
            .map(|_| ())
            .map_err(|e| {
                log::warn!("Rejected properties: {}", e);
                JsValue::from_str(&e.to_string())
            })
    }

    #[wasm_bindgen(js_name = isInputSuppressed)]
    pub fn is_input_suppressed(&self) -> bool {
        self.range.is_input_suppressed()
    }

    #[wasm_bindgen(js_name = modeLabel)]
    pub fn mode_label(&self) -> String {
        self.range.mode().button_label().to_string()
    }

    #[wasm_bindgen(js_name = areaLabel)]
    pub fn area_label(&self) -> String {
        self.range.region_state().button_label().to_string()
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        let events = self.range.drain_events();
        match serde_json::to_string(&events) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode events: {}", e);
                "[]".to_string()
            }
        }
    }
}
