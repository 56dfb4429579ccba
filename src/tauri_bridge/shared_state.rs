//! Shared state structures for communication between Tauri and Bevy
//!
//! This module defines thread-safe data structures that allow bidirectional
//! communication between the Tauri frontend and the Bevy render backend.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::solar::EarthView;

// =============================================================================
// Frame Buffer
// =============================================================================

/// Thread-safe RGBA frame buffer shared between Bevy and Tauri
/// Stores raw RGBA8 pixel data (4 bytes per pixel)
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<Vec<u8>>>>);

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Pointer Input
// =============================================================================

/// Pointer state received from frontend, in render-target pixels
#[derive(Serialize, Deserialize, Clone, Default, Debug)]
pub struct PointerInput {
    /// Accumulated X drag delta
    pub delta_x: f32,
    /// Accumulated Y drag delta
    pub delta_y: f32,
    /// Accumulated scroll wheel delta
    pub scroll_delta: f32,
    /// Left mouse button is pressed
    pub left_button: bool,
    /// Latest pointer position; `None` once the pointer leaves the view
    pub position: Option<[f32; 2]>,
    /// Set when `position` changed since Bevy last looked
    pub moved: bool,
    /// Clicks not yet handled, oldest first
    pub clicks: Vec<[f32; 2]>,
}

impl PointerInput {
    /// Take accumulated deltas and clicks, leaving button and position state
    pub fn drain(&mut self) -> PointerInput {
        let drained = PointerInput {
            delta_x: self.delta_x,
            delta_y: self.delta_y,
            scroll_delta: self.scroll_delta,
            left_button: self.left_button,
            position: self.position,
            moved: self.moved,
            clicks: std::mem::take(&mut self.clicks),
        };
        self.delta_x = 0.0;
        self.delta_y = 0.0;
        self.scroll_delta = 0.0;
        self.moved = false;
        drained
    }
}

/// Thread-safe pointer input shared between Tauri and Bevy
#[derive(Clone, Default)]
pub struct SharedPointerInput(pub Arc<Mutex<PointerInput>>);

// =============================================================================
// Tour Commands
// =============================================================================

/// Requests from the frontend that are not pointer input
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TourCommand {
    TeleportNext,
    TeleportPrevious,
    TeleportTo { index: usize },
    ResetView,
    ClearSelection,
    SetEarthView { view: EarthView },
}

/// Commands queued for the next Bevy frame
#[derive(Clone, Default)]
pub struct SharedCommandQueue(pub Arc<Mutex<Vec<TourCommand>>>);

impl SharedCommandQueue {
    pub fn push(&self, command: TourCommand) -> Result<(), String> {
        let mut guard = self.0.lock().map_err(|e| e.to_string())?;
        guard.push(command);
        Ok(())
    }
}

// =============================================================================
// Published Snapshots
// =============================================================================

/// What the camera and selection look like right now
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SessionSnapshot {
    /// "free", "zoomed" or "teleporting"
    pub mode: String,
    pub selected: Option<String>,
    pub selected_description: Option<String>,
    pub zoom_target: Option<String>,
    pub hovered: Option<String>,
    pub teleport_index: usize,
    pub viewpoint: String,
    pub transitioning: bool,
    pub earth_view: EarthView,
}

#[derive(Clone, Default)]
pub struct SharedSession(pub Arc<Mutex<SessionSnapshot>>);

/// Screen-space placement of one label, for the text overlay
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabelSnapshot {
    pub text: String,
    /// CSS hex color, e.g. `#6b93d6`
    pub color: String,
    pub x: f32,
    pub y: f32,
    /// Plate width in pixels
    pub width: f32,
    pub opacity: f32,
    pub visible: bool,
}

#[derive(Clone, Default)]
pub struct SharedLabels(pub Arc<Mutex<Vec<LabelSnapshot>>>);

/// A teleport destination as listed to the frontend
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ViewpointInfo {
    pub index: usize,
    pub name: String,
    pub position: [f32; 3],
}

// =============================================================================
// Performance Statistics
// =============================================================================

/// Performance statistics for debugging and monitoring
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct PerformanceStats {
    // Backend (Bevy/Rust) timings
    pub gpu_transfer_ms: f64,
    pub data_processing_ms: f64,
    pub frame_encoding_ms: f64,
    pub bevy_fps: f64,
    pub frame_count: u32,
    pub data_size_kb: f64,
    // Tauri command timings
    pub tauri_get_frame_ms: f64,
    pub tauri_serialize_ms: f64,
}

/// Thread-safe performance statistics
#[derive(Clone, Default)]
pub struct SharedPerfStats(pub Arc<Mutex<PerformanceStats>>);

// =============================================================================
// Bundle
// =============================================================================

/// Every handle the Bevy side needs
#[derive(Clone, Default)]
pub struct SharedBridge {
    pub frame_buffer: SharedFrameBuffer,
    pub perf_stats: SharedPerfStats,
    pub pointer: SharedPointerInput,
    pub commands: SharedCommandQueue,
    pub session: SharedSession,
    pub labels: SharedLabels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_resets_deltas_but_keeps_buttons() {
        let mut input = PointerInput {
            delta_x: 3.0,
            scroll_delta: -1.0,
            left_button: true,
            position: Some([10.0, 20.0]),
            moved: true,
            clicks: vec![[1.0, 2.0]],
            ..Default::default()
        };
        let drained = input.drain();
        assert_eq!(drained.delta_x, 3.0);
        assert_eq!(drained.clicks, vec![[1.0, 2.0]]);
        assert!(drained.moved);

        assert_eq!(input.delta_x, 0.0);
        assert_eq!(input.scroll_delta, 0.0);
        assert!(input.clicks.is_empty());
        assert!(!input.moved);
        assert!(input.left_button);
        assert_eq!(input.position, Some([10.0, 20.0]));
    }

    #[test]
    fn commands_use_tagged_json() {
        let command: TourCommand =
            serde_json::from_str(r#"{"type": "set_earth_view", "view": "anomaly"}"#).unwrap();
        assert_eq!(
            command,
            TourCommand::SetEarthView {
                view: EarthView::Anomaly
            }
        );
        let command: TourCommand = serde_json::from_str(r#"{"type": "teleport_to", "index": 2}"#).unwrap();
        assert_eq!(command, TourCommand::TeleportTo { index: 2 });
    }
}
