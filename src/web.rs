//! Browser binding
//!
//! The page owns the canvas, the file input and the fetch call; this side
//! owns the game. JS drives it with `frame()` from `requestAnimationFrame`
//! and draws the triangles returned by `vertices()`.

use wasm_bindgen::prelude::*;

use crate::renderer::{Frame, as_floats, build_frame};
use crate::settings::Settings;
use crate::sim::{Command, GameState, GridChange, GridSize, TickInput, UploadTicket, tick};
use crate::upload::parse_response;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Pixel Breaker starting...");
}

/// Game instance handed to JS
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: TickInput,
    frame: Frame,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a game from optional settings JSON
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<WebGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json_str(&json).map_err(js_err)?,
            None => Settings::with_seed(js_sys::Date::now() as u64),
        };
        let state = GameState::new(settings).map_err(js_err)?;
        let frame = build_frame(&state);
        Ok(Self {
            state,
            input: TickInput::default(),
            frame,
        })
    }

    /// Pointer/touch x in canvas pixels
    pub fn pointer_move(&mut self, x: f32) {
        self.input.target_x = Some(x);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Space/click. Returns the new phase name.
    pub fn primary_action(&mut self) -> Result<String, JsValue> {
        let phase = self.state.primary_action().map_err(js_err)?;
        self.frame = build_frame(&self.state);
        Ok(format!("{phase:?}"))
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.state.apply_command(Command::Reset).map_err(js_err)?;
        self.frame = build_frame(&self.state);
        Ok(())
    }

    /// Advance one tick and rebuild the frame. Returns the tick events as JSON.
    pub fn frame(&mut self) -> Result<String, JsValue> {
        let events = tick(&mut self.state, &self.input);
        self.frame = build_frame(&self.state);
        serde_json::to_string(&events).map_err(js_err)
    }

    /// Interleaved `x, y, r, g, b, a` triangle list of the current frame
    pub fn vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(as_floats(&self.frame.vertices))
    }

    pub fn hud(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.frame.hud).map_err(js_err)
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.state.phase)
    }

    /// Register an upload; pass the returned ticket JSON back to `complete_upload`
    pub fn begin_upload(&mut self, grid_size: u32) -> Result<String, JsValue> {
        let grid_size = GridSize::new(grid_size).map_err(js_err)?;
        let ticket = self.state.begin_upload(grid_size);
        serde_json::to_string(&ticket).map_err(js_err)
    }

    /// Apply a `/upload_image` response body. Returns the outcome as JSON;
    /// errors (failed or malformed uploads) leave the layout unchanged.
    pub fn complete_upload(&mut self, ticket_json: &str, response_json: &str) -> Result<String, JsValue> {
        let ticket: UploadTicket = serde_json::from_str(ticket_json).map_err(js_err)?;
        let outcome = self
            .state
            .complete_upload(ticket, parse_response(response_json))
            .map_err(js_err)?;
        self.frame = build_frame(&self.state);
        serde_json::to_string(&outcome).map_err(js_err)
    }

    /// Change the grid size. Returns a ticket JSON when the image must be
    /// pixelized again, `undefined` when the default pattern was rescaled.
    pub fn set_grid_size(&mut self, grid_size: u32) -> Result<Option<String>, JsValue> {
        let grid_size = GridSize::new(grid_size).map_err(js_err)?;
        let change = self.state.set_grid_size(grid_size);
        self.frame = build_frame(&self.state);
        match change {
            GridChange::Rescaled { .. } => Ok(None),
            GridChange::ReuploadRequired(ticket) => serde_json::to_string(&ticket).map(Some).map_err(js_err),
        }
    }

    pub fn reset_to_default_pattern(&mut self) {
        self.state.reset_to_default_pattern();
        self.frame = build_frame(&self.state);
    }
}
