//! Tauri command handlers
//!
//! This module contains all the Tauri command functions that can be invoked
//! from the frontend JavaScript/TypeScript code. Pointer input and tour
//! commands are queued for the Bevy thread; snapshots are read back from it.

use base64::{engine::general_purpose::STANDARD, Engine};
use tauri::State;

use super::shared_state::{
    FrameResponse, PerformanceStats, SessionSnapshot, SharedCommandQueue, SharedFrameBuffer,
    SharedPerfStats, SharedPointerInput, SharedSession, TourCommand, ViewpointInfo,
};
use crate::chat::{ChatExchange, SharedChatClient};
use crate::config::{RENDER_HEIGHT, RENDER_WIDTH};
use crate::solar::catalog::VIEWPOINTS;
use crate::solar::EarthView;

/// Get the current rendered frame as Base64-encoded RGBA data
#[tauri::command]
pub fn get_frame(
    state: State<SharedFrameBuffer>,
    perf_state: State<SharedPerfStats>,
) -> Result<FrameResponse, String> {
    let cmd_start = std::time::Instant::now();

    let guard = state.0.lock().map_err(|e| e.to_string())?;
    let Some(rgba_data) = &*guard else {
        return Err("No frame yet (scene still loading)".into());
    };
    let data_fetch_time = cmd_start.elapsed().as_secs_f64() * 1000.0;

    // Measure Base64 encoding time
    let encode_start = std::time::Instant::now();
    let base64_data = STANDARD.encode(rgba_data);
    let encode_time = encode_start.elapsed().as_secs_f64() * 1000.0;

    if let Ok(mut stats) = perf_state.0.lock() {
        stats.tauri_get_frame_ms = data_fetch_time;
        stats.tauri_serialize_ms = encode_time;
    }

    Ok(FrameResponse {
        data: base64_data,
        width: RENDER_WIDTH,
        height: RENDER_HEIGHT,
    })
}

/// Get the render resolution
#[tauri::command]
pub fn get_render_size() -> (u32, u32) {
    (RENDER_WIDTH, RENDER_HEIGHT)
}

/// Get performance statistics
#[tauri::command]
pub fn get_performance_stats(state: State<SharedPerfStats>) -> Result<PerformanceStats, String> {
    let guard = state.0.lock().map_err(|e| e.to_string())?;
    Ok(guard.clone())
}

// =============================================================================
// Pointer input
// =============================================================================

/// Receive drag and scroll input for camera control
/// Input deltas are accumulated until consumed by Bevy
#[tauri::command]
pub fn send_mouse_input(
    state: State<SharedPointerInput>,
    delta_x: f32,
    delta_y: f32,
    scroll_delta: f32,
    left_button: bool,
) -> Result<(), String> {
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    // Accumulate deltas (will be cleared when Bevy reads them)
    guard.delta_x += delta_x;
    guard.delta_y += delta_y;
    guard.scroll_delta += scroll_delta;
    // Button state is just the current state
    guard.left_button = left_button;
    Ok(())
}

/// Latest pointer position in render-target pixels, or `None` when the
/// pointer left the view
#[tauri::command]
pub fn send_pointer_move(
    state: State<SharedPointerInput>,
    position: Option<[f32; 2]>,
) -> Result<(), String> {
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    guard.position = position;
    guard.moved = true;
    Ok(())
}

/// Queue a click at a position in render-target pixels
#[tauri::command]
pub fn send_pointer_click(state: State<SharedPointerInput>, x: f32, y: f32) -> Result<(), String> {
    let mut guard = state.0.lock().map_err(|e| e.to_string())?;
    guard.clicks.push([x, y]);
    Ok(())
}

// =============================================================================
// Tour
// =============================================================================

#[tauri::command]
pub fn teleport_next(queue: State<SharedCommandQueue>) -> Result<(), String> {
    queue.push(TourCommand::TeleportNext)
}

#[tauri::command]
pub fn teleport_previous(queue: State<SharedCommandQueue>) -> Result<(), String> {
    queue.push(TourCommand::TeleportPrevious)
}

#[tauri::command]
pub fn teleport_to(queue: State<SharedCommandQueue>, index: usize) -> Result<(), String> {
    if index >= VIEWPOINTS.len() {
        return Err(format!("Unknown viewpoint {index}"));
    }
    queue.push(TourCommand::TeleportTo { index })
}

/// Teleport destinations in cycling order
#[tauri::command]
pub fn list_viewpoints() -> Vec<ViewpointInfo> {
    viewpoint_infos()
}

fn viewpoint_infos() -> Vec<ViewpointInfo> {
    VIEWPOINTS
        .iter()
        .enumerate()
        .map(|(index, viewpoint)| ViewpointInfo {
            index,
            name: viewpoint.name.to_string(),
            position: viewpoint.position.to_array(),
        })
        .collect()
}

/// Cancel any camera transition and return to the overview
#[tauri::command]
pub fn reset_view(queue: State<SharedCommandQueue>) -> Result<(), String> {
    queue.push(TourCommand::ResetView)
}

#[tauri::command]
pub fn clear_selection(queue: State<SharedCommandQueue>) -> Result<(), String> {
    queue.push(TourCommand::ClearSelection)
}

/// Current camera mode, selection and hover
#[tauri::command]
pub fn get_session(state: State<SharedSession>) -> Result<SessionSnapshot, String> {
    let guard = state.0.lock().map_err(|e| e.to_string())?;
    Ok(guard.clone())
}

/// Switch Earth's surface; returns the description of the new view
#[tauri::command]
pub fn set_earth_view(queue: State<SharedCommandQueue>, view: EarthView) -> Result<String, String> {
    queue.push(TourCommand::SetEarthView { view })?;
    Ok(view.description().to_string())
}

// =============================================================================
// Chat
// =============================================================================

/// Ask the chatbot about an object. Defaults to the current selection.
#[tauri::command]
pub async fn ask_chatbot(
    chat: State<'_, SharedChatClient>,
    session: State<'_, SharedSession>,
    question: String,
    object: Option<String>,
) -> Result<ChatExchange, String> {
    let object = match object {
        Some(object) => object,
        None => session
            .0
            .lock()
            .map_err(|e| e.to_string())?
            .selected
            .clone()
            .unwrap_or_default(),
    };

    let chat = chat.inner().clone();
    tauri::async_runtime::spawn_blocking(move || chat.ask(&object, &question))
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| {
        log::warn!("[Chat] {}", e);
        e.to_string()
    })
}
