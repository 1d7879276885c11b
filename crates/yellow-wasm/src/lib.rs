//! Yellow engine as a WASM module for browser environments.
//!
//! This crate exposes a long-lived [`YellowEngine`] via `wasm-bindgen`,
//! suitable for a terminal-style page or a Web Worker. Each instance keeps
//! its bindings, fragments and stability between runs.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { YellowEngine } from 'yellow-wasm';
//!
//! await init();
//!
//! const engine = new YellowEngine();
//! console.log(engine.run("mask truth -> 42; echo(truth);"));
//! // 42
//! console.log(engine.stability());
//! // 99.84
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;
use yellow_eval::Engine;

/// A reusable interpreter instance.
#[wasm_bindgen]
pub struct YellowEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl YellowEngine {
    /// Create an engine seeded from the host clock.
    #[wasm_bindgen(constructor)]
    pub fn new() -> YellowEngine {
        Self::with_seed(host_time_seed())
    }

    /// Create an engine with a fixed seed. Same seed, same runs, same output.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> YellowEngine {
        YellowEngine {
            engine: Engine::with_seed(seed),
        }
    }

    /// Run source text and return everything it printed, followed by an
    /// `error[E…]: …` line if it failed. Never throws.
    pub fn run(&mut self, source: &str) -> String {
        self.engine.run_text(source)
    }

    /// Run source text and return the outcome as a JSON string:
    ///
    /// ```json
    /// {
    ///   "output": "42",
    ///   "error": null,
    ///   "stability": 99.84,
    ///   "steps": 4,
    ///   "logical_time": 2,
    ///   "truncated": false
    /// }
    /// ```
    ///
    /// On failure `error` holds `{ "phase", "code", "message" }`. Parse
    /// failures add `source_line: { "text", "caret" }`.
    #[wasm_bindgen(js_name = runJson)]
    pub fn run_json(&mut self, source: &str) -> String {
        self.engine.run(source).to_json()
    }

    /// Run source text and return the outcome as a plain JS object with
    /// the same shape as [`YellowEngine::run_json`].
    #[wasm_bindgen(js_name = runReport)]
    pub fn run_report(&mut self, source: &str) -> Result<JsValue, JsValue> {
        let outcome = self.engine.run(source);
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        outcome
            .serialize(&serializer)
            .map_err(|e| JsValue::from_str(&format!("serialization error: {e}")))
    }

    /// Current stability, within `[0, 100]`.
    pub fn stability(&self) -> f64 {
        self.engine.stability()
    }

    /// Discard all state and start over with the construction seed.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Apply a JSON configuration document. Returns `undefined` on success,
    /// or an error message; the previous configuration stays in place on
    /// error.
    pub fn configure(&mut self, json: &str) -> Option<String> {
        self.engine
            .configure_json(json)
            .err()
            .map(|e| format!("error[{}]: {e}", e.code()))
    }

    /// The active configuration as JSON.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> String {
        self.engine.config().to_json()
    }
}

impl Default for YellowEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    yellow_eval::VERSION.to_string()
}

/// Seed taken once per engine from the host clock. All randomness after
/// this point comes from the engine's own generator.
#[cfg(target_arch = "wasm32")]
fn host_time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn host_time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
