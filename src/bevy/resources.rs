//! Bevy resource definitions
//!
//! This module contains all global resources used by Bevy systems.
//! Resources are singleton data that can be accessed by any system.

use bevy::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::config::camera::{MAX_PITCH, MIN_PITCH};
use crate::solar::{CameraPose, EarthView, InteractionContext, ObjectKind, OrbitBounds};
use crate::tauri_bridge::shared_state::{
    PointerInput, SharedCommandQueue, SharedFrameBuffer, SharedLabels, SharedPerfStats,
    SharedPointerInput, SharedSession,
};

// =============================================================================
// Camera Control
// =============================================================================

/// Orbit camera state for spherical coordinate camera control
#[derive(Resource, Debug, Clone, Copy)]
pub struct OrbitCameraState {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians), clamped to avoid gimbal lock
    pub pitch: f32,
    /// Distance from the camera to the center point
    pub distance: f32,
    /// The point the camera orbits around
    pub center: Vec3,
    /// Zoom limits for `distance`
    pub bounds: OrbitBounds,
}

impl OrbitCameraState {
    /// Orbit state that reproduces `pose`
    pub fn from_pose(pose: &CameraPose) -> Self {
        let offset = pose.position - pose.target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(MIN_PITCH, MAX_PITCH),
            distance,
            center: pose.target,
            bounds: pose.bounds,
        }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.center + Vec3::new(x, y, z)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position(), self.center, self.bounds)
    }
}

impl Default for OrbitCameraState {
    fn default() -> Self {
        Self::from_pose(&CameraPose::default())
    }
}

/// Resource to hold shared pointer input in Bevy
#[derive(Resource)]
pub struct PointerInputRes(pub SharedPointerInput);

/// Pointer input drained for the current frame
#[derive(Resource, Default, Debug)]
pub struct PointerFrame(pub PointerInput);

// =============================================================================
// Interaction
// =============================================================================

/// Camera session, hover and selection for the scene
#[derive(Resource, Default, Deref, DerefMut)]
pub struct InteractionState(pub InteractionContext<Entity>);

/// Registered bodies by kind
#[derive(Resource, Default, Debug)]
pub struct ObjectRegistry {
    by_kind: HashMap<ObjectKind, Entity>,
}

impl ObjectRegistry {
    pub fn register(&mut self, kind: ObjectKind, entity: Entity) {
        self.by_kind.insert(kind, entity);
    }

    pub fn get(&self, kind: ObjectKind) -> Option<Entity> {
        self.by_kind.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }
}

/// Body under the pointer, if any
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct HoveredBody(pub Option<ObjectKind>);

/// Which surface Earth currently shows
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarthViewState(pub EarthView);

/// Frontend commands waiting for the next frame
#[derive(Resource)]
pub struct CommandQueueRes(pub SharedCommandQueue);

/// Published camera/selection snapshot
#[derive(Resource)]
pub struct SessionRes(pub SharedSession);

/// Published label placements
#[derive(Resource)]
pub struct LabelsRes(pub SharedLabels);

// =============================================================================
// Rendering
// =============================================================================

/// Shared frame buffer resource for Bevy
#[derive(Resource, Clone)]
pub struct FrameBufferRes(pub SharedFrameBuffer);

// =============================================================================
// Frame Management
// =============================================================================

/// Counter for total frames rendered
#[derive(Resource, Default)]
pub struct FrameCount(pub u32);

/// Number of pre-roll frames to skip before starting output
#[derive(Resource, Default)]
pub struct PreRollFrames(pub u32);

/// Frame rate limiter to control output FPS
#[derive(Resource)]
pub struct FrameRateLimiter {
    pub last_frame_time: std::time::Instant,
    pub min_frame_interval: Duration,
}

impl FrameRateLimiter {
    pub fn new(target_fps: f64) -> Self {
        Self {
            last_frame_time: std::time::Instant::now(),
            min_frame_interval: Duration::from_secs_f64(1.0 / target_fps),
        }
    }
}

impl Default for FrameRateLimiter {
    fn default() -> Self {
        Self::new(crate::config::TARGET_FPS)
    }
}

// =============================================================================
// Performance Monitoring
// =============================================================================

/// Rolling window of frame processing times
#[derive(Resource, Default)]
pub struct FrameTimings {
    pub last_print_time: f64,
    pub frame_times: VecDeque<f64>,
}

impl FrameTimings {
    /// Add a sample, keeping at most `capacity`
    pub fn record(&mut self, frame_ms: f64, capacity: usize) {
        self.frame_times.push_back(frame_ms);
        while self.frame_times.len() > capacity {
            self.frame_times.pop_front();
        }
    }

    pub fn average_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    pub fn fps(&self) -> f64 {
        let average = self.average_ms();
        if average > 0.0 {
            1000.0 / average
        } else {
            0.0
        }
    }

    /// `(min, max)` over the window
    pub fn range_ms(&self) -> (f64, f64) {
        self.frame_times
            .iter()
            .fold((f64::MAX, 0.0f64), |(lo, hi), &t| (lo.min(t), hi.max(t)))
    }
}

/// Shared performance statistics resource
#[derive(Resource)]
pub struct PerfStatsRes(pub SharedPerfStats);

// =============================================================================
// Channel Communication (Main World <-> Render World)
// =============================================================================

use crossbeam_channel::{Receiver, Sender};

/// Receives data from render world
#[derive(Resource, Deref)]
pub struct MainWorldReceiver(pub Receiver<Vec<u8>>);

/// Sends data to main world
#[derive(Resource, Deref)]
pub struct RenderWorldSender(pub Sender<Vec<u8>>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_state_reproduces_pose() {
        let pose = CameraPose::new(
            Vec3::new(-70.0, 1.0, -70.0),
            Vec3::new(5.0, 0.0, 0.0),
            OrbitBounds::default(),
        );
        let orbit = OrbitCameraState::from_pose(&pose);
        assert!(orbit.position().distance(pose.position) < 1e-3);
        assert_eq!(orbit.center, pose.target);
    }

    #[test]
    fn frame_timings_keep_a_bounded_window() {
        let mut timings = FrameTimings::default();
        for ms in [10.0, 20.0, 30.0, 40.0] {
            timings.record(ms, 3);
        }
        assert_eq!(timings.frame_times.len(), 3);
        assert_eq!(timings.average_ms(), 30.0);
        assert_eq!(timings.range_ms(), (20.0, 40.0));
        assert!((timings.fps() - 1000.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn empty_timings_report_zero_fps() {
        assert_eq!(FrameTimings::default().fps(), 0.0);
    }

    #[test]
    fn default_orbit_starts_at_overview() {
        let orbit = OrbitCameraState::default();
        assert!(orbit.position().distance(Vec3::new(0.0, 1.0, 150.0)) < 1e-3);
    }
}
