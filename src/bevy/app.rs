//! Bevy application setup and execution
//!
//! This module handles the creation and configuration of the Bevy app,
//! including plugin registration and system scheduling.

use bevy::{
    app::{App, ScheduleRunnerPlugin},
    prelude::*,
    window::ExitCondition,
};
use std::thread;
use std::time::Duration;

use crate::bevy::plugins::ImageCopyPlugin;
use crate::bevy::resources::*;
use crate::bevy::systems::*;
use crate::config::{ASSET_ROOT, PRE_ROLL_FRAMES, TARGET_FPS};
use crate::tauri_bridge::shared_state::SharedBridge;

/// Create and configure the Bevy application
pub fn create_app(bridge: SharedBridge) -> App {
    let mut app = App::new();

    // Use DefaultPlugins but configure for headless operation
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(AssetPlugin {
                file_path: ASSET_ROOT.to_string(),
                ..default()
            }),
    );

    // Add schedule runner for controlled frame rate
    app.add_plugins(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
        1.0 / TARGET_FPS,
    )));

    // Add custom plugins
    app.add_plugins(ImageCopyPlugin);
    app.add_message::<EarthViewRequest>();

    // Register systems
    app.add_systems(Startup, setup_scene);
    app.add_systems(
        Update,
        (
            read_pointer_input,
            process_tour_commands,
            update_camera_from_input,
            handle_pointer,
            drive_camera_transition,
            apply_camera_transform,
            rotate_bodies,
            advance_orbits,
            apply_earth_view,
            resolve_pending_textures,
            resolve_pending_models,
            update_labels,
            publish_session,
        )
            .chain(),
    );
    app.add_systems(Last, extract_and_process_frame);

    // Insert resources
    app.insert_resource(FrameBufferRes(bridge.frame_buffer));
    app.insert_resource(PerfStatsRes(bridge.perf_stats));
    app.insert_resource(PointerInputRes(bridge.pointer));
    app.insert_resource(CommandQueueRes(bridge.commands));
    app.insert_resource(SessionRes(bridge.session));
    app.insert_resource(LabelsRes(bridge.labels));
    app.insert_resource(OrbitCameraState::default());
    app.insert_resource(PointerFrame::default());
    app.insert_resource(InteractionState::default());
    app.insert_resource(ObjectRegistry::default());
    app.insert_resource(HoveredBody::default());
    app.insert_resource(EarthViewState::default());
    app.insert_resource(FrameCount::default());
    app.insert_resource(PreRollFrames(PRE_ROLL_FRAMES));
    app.insert_resource(FrameTimings::default());
    app.insert_resource(FrameRateLimiter::default());

    log::info!("[Bevy] App configured (headless mode with proper GPU-CPU pipeline)");
    app
}

/// Start Bevy in a background thread
pub fn start_bevy(bridge: SharedBridge) {
    thread::spawn(move || {
        log::info!("[Bevy] Thread started");
        let mut app = create_app(bridge);
        log::info!("[Bevy] Running render loop...");
        app.run();
    });
}
