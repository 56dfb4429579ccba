//! Solar Tour: an interactive solar system rendered headless by Bevy and
//! shown in a Tauri window.
//!
//! Architecture:
//! - Bevy runs in a background thread with NO window (true headless mode)
//! - Uses proper RenderGraph pipeline with ImageCopyDriver node
//! - GPU texture -> Buffer -> CPU channel -> Tauri frontend
//! - Pointer input and tour commands flow back through Tauri commands into
//!   shared state that Bevy drains once per frame
//! - The chatbot panel calls a remote completion API from a worker thread
//!
//! # Module Structure
//!
//! - `config`: Configuration constants and settings
//! - `solar`: Engine-independent tour logic
//!   - `catalog`: Bodies, viewpoints and Earth views
//!   - `camera_session`: Free / Zoomed / Teleporting state machine
//!   - `picking`, `hover`, `interaction`: Pointer handling
//!   - `labels`, `surface`: Label layout and texture fallbacks
//! - `chat`: Completion API client
//! - `tauri_bridge`: Bridge layer between Tauri and Bevy
//!   - `shared_state`: Thread-safe data structures
//!   - `commands`: Tauri command handlers
//!   - `protocol`: Custom protocol handlers
//! - `bevy`: Bevy engine integration
//!   - `components`: ECS components
//!   - `resources`: Global resources
//!   - `plugins`: Custom plugins
//!   - `systems`: Scene, camera, picking, labels and frame systems
//!   - `app`: Application setup

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Module declarations
mod bevy;
pub mod chat;
pub mod config;
pub mod solar;
mod tauri_bridge;

use std::{thread, time::Duration};
use tauri_bridge::{ProtocolState, SharedBridge};

/// Main entry point for the Tauri application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("[Tauri] Starting...");

    // Create shared state
    let bridge = SharedBridge::default();

    // Start Bevy in background thread
    bevy::start_bevy(bridge.clone());

    // Wait for Bevy to initialize
    thread::sleep(Duration::from_millis(1000));

    // Clone for the custom protocol handler
    let protocol_state = ProtocolState {
        frame_buffer: bridge.frame_buffer.clone(),
        perf_stats: bridge.perf_stats.clone(),
        session: bridge.session.clone(),
        labels: bridge.labels.clone(),
    };

    // Build and run Tauri application
    let result = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .manage(bridge.frame_buffer)
        .manage(bridge.perf_stats)
        .manage(bridge.pointer)
        .manage(bridge.commands)
        .manage(bridge.session)
        .manage(bridge.labels)
        .manage(chat::SharedChatClient::from_env())
        // Register custom protocol "frame://" for direct binary transfer
        // This bypasses Tauri IPC JSON serialization completely!
        .register_asynchronous_uri_scheme_protocol("frame", move |_ctx, request, responder| {
            let state = protocol_state.clone();

            // Handle the request in a separate thread to avoid blocking
            std::thread::spawn(move || {
                let uri = request.uri();
                let path = uri.path();

                log::trace!("[Protocol] Request URI: {}, path: {}", uri, path);

                // For Tauri v2, URL format is: http://frame.localhost/path
                let response = tauri_bridge::protocol::handle_frame_protocol(path, &state);
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            tauri_bridge::commands::get_frame,
            tauri_bridge::commands::get_render_size,
            tauri_bridge::commands::get_performance_stats,
            tauri_bridge::commands::send_mouse_input,
            tauri_bridge::commands::send_pointer_move,
            tauri_bridge::commands::send_pointer_click,
            tauri_bridge::commands::teleport_next,
            tauri_bridge::commands::teleport_previous,
            tauri_bridge::commands::teleport_to,
            tauri_bridge::commands::list_viewpoints,
            tauri_bridge::commands::reset_view,
            tauri_bridge::commands::clear_selection,
            tauri_bridge::commands::get_session,
            tauri_bridge::commands::set_earth_view,
            tauri_bridge::commands::ask_chatbot
        ])
        .run(tauri::generate_context!());

    if let Err(err) = result {
        log::error!("[Tauri] Application error: {}", err);
    }
}
