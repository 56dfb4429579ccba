//! Camera control systems
//!
//! Orbit input from the frontend rotates and zooms the camera while it is
//! idle. While a transition runs, input is ignored and the camera session
//! drives the pose instead.

use bevy::{math::Vec3, prelude::*};

use crate::bevy::components::CameraController;
use crate::bevy::resources::{InteractionState, OrbitCameraState, PointerFrame, PointerInputRes};
use crate::config::camera::*;

/// Pull this frame's pointer input out of the shared state
pub fn read_pointer_input(
    pointer_input_res: Option<Res<PointerInputRes>>,
    mut frame: ResMut<PointerFrame>,
) {
    let Some(pointer_res) = pointer_input_res else {
        return;
    };

    // Read and clear accumulated input
    let Ok(mut guard) = pointer_res.0 .0.lock() else {
        return;
    };
    frame.0 = guard.drain();
}

/// Update orbit state from drag and scroll input
/// - Left button drag: rotate camera (yaw/pitch)
/// - Scroll wheel: zoom (distance, clamped to the current bounds)
pub fn update_camera_from_input(
    pointer: Res<PointerFrame>,
    interaction: Res<InteractionState>,
    mut orbit_state: ResMut<OrbitCameraState>,
) {
    if !interaction.session.controls_enabled() {
        return;
    }
    let input = &pointer.0;

    // Apply rotation when left button is held
    if input.left_button && (input.delta_x != 0.0 || input.delta_y != 0.0) {
        orbit_state.yaw -= input.delta_x * ROTATION_SPEED;
        orbit_state.pitch -= input.delta_y * ROTATION_SPEED;

        // Clamp pitch to prevent camera flipping
        orbit_state.pitch = orbit_state.pitch.clamp(MIN_PITCH, MAX_PITCH);
    }

    // Apply zoom from scroll wheel
    if input.scroll_delta != 0.0 {
        let distance = orbit_state.distance - input.scroll_delta * ZOOM_SPEED;
        orbit_state.distance = orbit_state.bounds.clamp(distance);
    }
}

/// Advance the running camera transition, if any
pub fn drive_camera_transition(
    time: Res<Time>,
    mut interaction: ResMut<InteractionState>,
    mut orbit_state: ResMut<OrbitCameraState>,
) {
    let Some(handle) = interaction.session.active_handle() else {
        return;
    };
    let Some(step) = interaction.session.advance(handle, time.delta_secs()) else {
        return;
    };

    *orbit_state = OrbitCameraState::from_pose(&step.pose);
    if step.finished {
        log::info!(
            "[Bevy] Camera transition complete, mode: {:?}",
            interaction.session.mode()
        );
    }
}

/// Place the camera according to the orbit state
pub fn apply_camera_transform(
    orbit_state: Res<OrbitCameraState>,
    mut camera_query: Query<&mut Transform, With<CameraController>>,
) {
    let camera_position = orbit_state.position();
    for mut transform in camera_query.iter_mut() {
        *transform =
            Transform::from_translation(camera_position).looking_at(orbit_state.center, Vec3::Y);
    }
}
