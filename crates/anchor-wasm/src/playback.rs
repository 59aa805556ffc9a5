//! Adapter for the page's waveform/playback widget.

use anchor_editor::{MarkerHandle, Playback};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Any JS object with `playPause`, `getCurrentTime` (ms),
    /// `addMarker(time, label) -> number` and `removeMarker(handle)`.
    pub type AudioWidget;

    #[wasm_bindgen(method, js_name = playPause)]
    fn play_pause(this: &AudioWidget);

    #[wasm_bindgen(method, js_name = getCurrentTime)]
    fn get_current_time(this: &AudioWidget) -> f64;

    #[wasm_bindgen(method, js_name = addMarker)]
    fn add_marker(this: &AudioWidget, time: f64, label: &str) -> u32;

    #[wasm_bindgen(method, js_name = removeMarker)]
    fn remove_marker(this: &AudioWidget, handle: u32);
}

pub struct JsPlayback {
    widget: AudioWidget,
}

impl JsPlayback {
    pub fn new(widget: AudioWidget) -> Self {
        Self { widget }
    }
}

impl Playback for JsPlayback {
    fn play_pause(&mut self) {
        self.widget.play_pause();
    }

    fn current_time_ms(&self) -> u64 {
        ms_from_js(self.widget.get_current_time())
    }

    fn add_marker(&mut self, time_ms: u64, label: &str) -> MarkerHandle {
        MarkerHandle(self.widget.add_marker(time_ms as f64, label))
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.widget.remove_marker(handle.0);
    }
}

/// JS numbers can be negative, fractional or NaN; times are whole ms.
pub fn ms_from_js(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_times_are_clamped() {
        assert_eq!(ms_from_js(1499.6), 1500);
        assert_eq!(ms_from_js(-3.0), 0);
        assert_eq!(ms_from_js(f64::NAN), 0);
    }
}
