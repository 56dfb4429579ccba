//! Frontend command handling and session publishing
//!
//! Commands queued by Tauri are applied at the start of a frame; the camera
//! and selection state is published at the end of it.

use bevy::prelude::*;

use crate::bevy::components::CelestialBody;
use crate::bevy::resources::{
    CommandQueueRes, EarthViewState, HoveredBody, InteractionState, OrbitCameraState, SessionRes,
};
use crate::bevy::systems::surfaces::EarthViewRequest;
use crate::solar::catalog::{description, VIEWPOINTS};
use crate::solar::{CameraMode, TransitionError};
use crate::tauri_bridge::shared_state::{SessionSnapshot, TourCommand};

/// Apply queued frontend commands
pub fn process_tour_commands(
    queue: Option<Res<CommandQueueRes>>,
    orbit_state: Res<OrbitCameraState>,
    mut interaction: ResMut<InteractionState>,
    mut earth_view: MessageWriter<EarthViewRequest>,
) {
    let Some(queue) = queue else {
        return;
    };
    let commands = match queue.0 .0.lock() {
        Ok(mut guard) => std::mem::take(&mut *guard),
        Err(_) => return,
    };

    for command in commands {
        let current = orbit_state.pose();
        let result: Result<(), TransitionError> = match command {
            TourCommand::TeleportNext => interaction.session.teleport_next(current).map(drop),
            TourCommand::TeleportPrevious => {
                interaction.session.teleport_previous(current).map(drop)
            }
            TourCommand::TeleportTo { index } => {
                interaction.session.teleport_to(current, index).map(drop)
            }
            TourCommand::ResetView => {
                interaction.session.cancel();
                interaction.session.teleport_to(current, 0).map(drop)
            }
            TourCommand::ClearSelection => {
                interaction.clear_selection();
                Ok(())
            }
            TourCommand::SetEarthView { view } => {
                earth_view.write(EarthViewRequest(view));
                Ok(())
            }
        };

        match result {
            Ok(()) => log::debug!("[Bevy] Applied {:?}", command),
            Err(err) => log::info!("[Bevy] Ignored {:?}: {}", command, err),
        }
    }
}

/// Publish the current camera and selection state
pub fn publish_session(
    session_res: Option<Res<SessionRes>>,
    interaction: Res<InteractionState>,
    hovered: Res<HoveredBody>,
    earth_view: Res<EarthViewState>,
    bodies: Query<&CelestialBody>,
) {
    let Some(session_res) = session_res else {
        return;
    };

    let session = &interaction.session;
    let mode = match session.mode() {
        CameraMode::Free => "free",
        CameraMode::Zoomed(_) => "zoomed",
        CameraMode::Teleporting(_) => "teleporting",
    };
    let selected = interaction.selected();
    let teleport_index = session.teleport_index();

    let snapshot = SessionSnapshot {
        mode: mode.to_string(),
        selected: selected.map(|s| s.kind.name().to_string()),
        selected_description: selected.map(|s| description(s.kind).to_string()),
        zoom_target: session
            .zoom_target()
            .and_then(|entity| bodies.get(entity).ok())
            .map(|body| body.kind.name().to_string()),
        hovered: hovered.0.map(|kind| kind.name().to_string()),
        teleport_index,
        viewpoint: VIEWPOINTS
            .get(teleport_index)
            .map(|v| v.name.to_string())
            .unwrap_or_default(),
        transitioning: session.is_transitioning(),
        earth_view: earth_view.0,
    };

    if let Ok(mut guard) = session_res.0 .0.lock() {
        *guard = snapshot;
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::{message::Messages, system::RunSystemOnce};

    use crate::solar::{CameraPose, CameraSession, EarthView, OrbitBounds};
    use crate::tauri_bridge::shared_state::SharedCommandQueue;

    fn tour_world() -> (World, SharedCommandQueue) {
        let mut world = World::new();
        let queue = SharedCommandQueue::default();
        world.insert_resource(CommandQueueRes(queue.clone()));
        world.insert_resource(OrbitCameraState::default());
        world.init_resource::<InteractionState>();
        world.init_resource::<Messages<EarthViewRequest>>();
        (world, queue)
    }

    fn run_commands(world: &mut World) {
        world.run_system_once(process_tour_commands).unwrap();
    }

    /// Advance the running transition by up to `seconds`, returning the last pose
    fn drive(session: &mut CameraSession<Entity>, seconds: f32) -> Option<CameraPose> {
        let mut pose = None;
        let mut elapsed = 0.0;
        while let Some(handle) = session.active_handle() {
            if elapsed >= seconds {
                break;
            }
            pose = session.advance(handle, 1.0 / 60.0).map(|step| step.pose);
            elapsed += 1.0 / 60.0;
        }
        pose
    }

    /// Zoom on Earth, then start leaving and stop partway
    fn interrupted_zoom_out(world: &mut World) -> CameraPose {
        let earth = world.spawn_empty().id();
        let mut interaction = world.resource_mut::<InteractionState>();
        let session = &mut interaction.session;
        session
            .zoom_in(CameraPose::default(), earth, Vec3::new(0.0, 0.0, 55.0), 5.0)
            .unwrap();
        let zoomed = drive(session, f32::MAX).unwrap();
        session.zoom_out(zoomed).unwrap();
        drive(session, 0.1).unwrap()
    }

    #[test]
    fn reset_view_mid_transition_returns_to_free_orbit() {
        let (mut world, queue) = tour_world();
        let midway = interrupted_zoom_out(&mut world);
        world.insert_resource(OrbitCameraState::from_pose(&midway));

        queue.push(TourCommand::ResetView).unwrap();
        run_commands(&mut world);

        let mut interaction = world.resource_mut::<InteractionState>();
        assert_eq!(interaction.session.mode(), CameraMode::Teleporting(0));
        let end = drive(&mut interaction.session, f32::MAX).unwrap();
        assert_eq!(end.bounds, OrbitBounds::default());
        assert_eq!(end.position, VIEWPOINTS[0].position);
        assert_eq!(interaction.session.mode(), CameraMode::Free);
    }

    #[test]
    fn queue_is_drained_in_order() {
        let (mut world, queue) = tour_world();
        queue.push(TourCommand::TeleportTo { index: 99 }).unwrap();
        queue.push(TourCommand::SetEarthView { view: EarthView::Anomaly }).unwrap();
        queue.push(TourCommand::TeleportNext).unwrap();
        run_commands(&mut world);

        assert!(queue.0.lock().unwrap().is_empty());
        assert_eq!(world.resource::<Messages<EarthViewRequest>>().len(), 1);
        let interaction = world.resource::<InteractionState>();
        assert_eq!(interaction.session.mode(), CameraMode::Teleporting(1));
    }

    #[test]
    fn busy_camera_ignores_teleports() {
        let (mut world, queue) = tour_world();
        queue.push(TourCommand::TeleportTo { index: 2 }).unwrap();
        queue.push(TourCommand::TeleportTo { index: 4 }).unwrap();
        run_commands(&mut world);
        let interaction = world.resource::<InteractionState>();
        assert_eq!(interaction.session.mode(), CameraMode::Teleporting(2));
    }
}
