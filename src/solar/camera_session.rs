//! Camera state machine
//!
//! The camera is either orbiting freely, zoomed onto an object, or flying to a
//! preset viewpoint. Every move between poses is a time-boxed transition with
//! cubic ease-out. Only one transition exists at a time and it is identified by
//! a [`TransitionHandle`]; a driver holding a stale handle cannot advance it.

use bevy::math::Vec3;
use thiserror::Error;

use crate::config::{camera, transition};
use crate::solar::catalog::VIEWPOINTS;

/// Orbit zoom limits. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitBounds {
    min: f32,
    max: f32,
}

impl OrbitBounds {
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min, self.max)
    }

    /// Interpolating both ends with the same factor keeps them ordered
    pub fn lerp(&self, other: &OrbitBounds, t: f32) -> OrbitBounds {
        OrbitBounds {
            min: self.min * (1.0 - t) + other.min * t,
            max: self.max * (1.0 - t) + other.max * t,
        }
    }
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self::new(camera::MIN_DISTANCE, camera::MAX_DISTANCE)
    }
}

/// Camera position, look-at target and zoom limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    pub bounds: OrbitBounds,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3, bounds: OrbitBounds) -> Self {
        Self {
            position,
            target,
            bounds,
        }
    }

    pub fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
            bounds: self.bounds.lerp(&other.bounds, t),
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(camera::INITIAL_POSITION, Vec3::ZERO, OrbitBounds::default())
    }
}

/// Cubic ease-out: `1 - (1 - t)^3`, with `t` clamped to `[0, 1]`
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Pose that frames an object of the given size
pub fn zoom_pose(object_position: Vec3, object_size: f32) -> CameraPose {
    let distance = (object_size * transition::ZOOM_SIZE_FACTOR).max(transition::MIN_ZOOM_DISTANCE);
    CameraPose::new(
        object_position + Vec3::new(0.0, 0.0, distance),
        object_position,
        OrbitBounds::new(
            distance * transition::ZOOMED_MIN_FACTOR,
            distance * transition::ZOOMED_MAX_FACTOR,
        ),
    )
}

// =============================================================================
// Transitions
// =============================================================================

/// Identifies one transition; handles are never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind<K> {
    ZoomIn(K),
    ZoomOut,
    Teleport(usize),
}

#[derive(Debug, Clone)]
struct Transition<K> {
    handle: TransitionHandle,
    kind: TransitionKind<K>,
    from: CameraPose,
    to: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl<K> Transition<K> {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }
}

/// Result of advancing the current transition by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub pose: CameraPose,
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode<K> {
    Free,
    Zoomed(K),
    Teleporting(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a camera transition is already running")]
    Busy,
    #[error("camera is not zoomed on an object")]
    NotZoomed,
    #[error("no viewpoint at index {0}")]
    UnknownViewpoint(usize),
}

// =============================================================================
// Session
// =============================================================================

/// Camera state for one scene
#[derive(Debug, Clone)]
pub struct CameraSession<K> {
    mode: CameraMode<K>,
    /// Free pose to return to when leaving zoom
    saved: Option<CameraPose>,
    /// Free orbit limits an interrupted exit from zoom never reached
    restore_bounds: Option<OrbitBounds>,
    active: Option<Transition<K>>,
    next_handle: u64,
    teleport_index: usize,
    viewpoints: Vec<Vec3>,
}

impl<K> Default for CameraSession<K> {
    fn default() -> Self {
        Self::with_viewpoints(VIEWPOINTS.iter().map(|v| v.position).collect())
    }
}

impl<K> CameraSession<K> {
    pub fn with_viewpoints(viewpoints: Vec<Vec3>) -> Self {
        Self {
            mode: CameraMode::Free,
            saved: None,
            restore_bounds: None,
            active: None,
            next_handle: 0,
            teleport_index: 0,
            viewpoints,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// Orbit input is only honoured while no transition runs
    pub fn controls_enabled(&self) -> bool {
        !self.is_transitioning()
    }

    pub fn active_handle(&self) -> Option<TransitionHandle> {
        self.active.as_ref().map(|t| t.handle)
    }

    pub fn teleport_index(&self) -> usize {
        self.teleport_index
    }

    fn ensure_idle(&self) -> Result<(), TransitionError> {
        if self.is_transitioning() {
            Err(TransitionError::Busy)
        } else {
            Ok(())
        }
    }

    fn start(
        &mut self,
        kind: TransitionKind<K>,
        from: CameraPose,
        to: CameraPose,
        duration: f32,
    ) -> TransitionHandle {
        let handle = TransitionHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(Transition {
            handle,
            kind,
            from,
            to,
            duration,
            elapsed: 0.0,
        });
        handle
    }

    /// Fly to viewpoint `index`, looking at the origin
    pub fn teleport_to(
        &mut self,
        current: CameraPose,
        index: usize,
    ) -> Result<TransitionHandle, TransitionError> {
        self.ensure_idle()?;
        let position = *self
            .viewpoints
            .get(index)
            .ok_or(TransitionError::UnknownViewpoint(index))?;

        // Leaving zoom: go back to the free orbit limits
        let bounds = self.free_bounds(&current);
        self.saved = None;
        let to = CameraPose::new(position, Vec3::ZERO, bounds);

        self.mode = CameraMode::Teleporting(index);
        Ok(self.start(
            TransitionKind::Teleport(index),
            current,
            to,
            transition::TELEPORT_DURATION,
        ))
    }

    pub fn teleport_next(&mut self, current: CameraPose) -> Result<TransitionHandle, TransitionError> {
        let count = self.viewpoints.len().max(1);
        self.teleport_to(current, (self.teleport_index + 1) % count)
    }

    pub fn teleport_previous(
        &mut self,
        current: CameraPose,
    ) -> Result<TransitionHandle, TransitionError> {
        let count = self.viewpoints.len().max(1);
        self.teleport_to(current, (self.teleport_index + count - 1) % count)
    }

    /// Return to the saved free pose
    pub fn zoom_out(&mut self, current: CameraPose) -> Result<TransitionHandle, TransitionError> {
        self.ensure_idle()?;
        if !matches!(self.mode, CameraMode::Zoomed(_)) {
            return Err(TransitionError::NotZoomed);
        }
        let to = self.saved.unwrap_or_default();
        Ok(self.start(
            TransitionKind::ZoomOut,
            current,
            to,
            transition::ZOOM_DURATION,
        ))
    }

    /// Orbit limits of the free camera: the saved ones while zoomed, the
    /// target of an interrupted exit from zoom, otherwise the current ones
    fn free_bounds(&self, current: &CameraPose) -> OrbitBounds {
        self.saved
            .map(|saved| saved.bounds)
            .or(self.restore_bounds)
            .unwrap_or(current.bounds)
    }

    /// Drop the current transition, leaving the camera where it is.
    /// Returns the invalidated handle.
    ///
    /// The camera keeps its half-interpolated bounds; the free limits the
    /// cancelled transition was heading to are restored by the next
    /// teleport or zoom.
    pub fn cancel(&mut self) -> Option<TransitionHandle> {
        let cancelled = self.active.take()?;
        match cancelled.kind {
            // Still zoomed; the saved pose stays so the user can leave
            TransitionKind::ZoomIn(_) => {}
            TransitionKind::ZoomOut | TransitionKind::Teleport(_) => {
                self.mode = CameraMode::Free;
                self.saved = None;
                self.restore_bounds = Some(cancelled.to.bounds);
            }
        }
        Some(cancelled.handle)
    }
}

impl<K: Copy + Eq> CameraSession<K> {
    pub fn mode(&self) -> CameraMode<K> {
        self.mode
    }

    pub fn zoom_target(&self) -> Option<K> {
        match self.mode {
            CameraMode::Zoomed(target) => Some(target),
            _ => None,
        }
    }

    /// Frame `target`. From free orbit the current pose is saved first; when
    /// already zoomed on another object the original saved pose is kept.
    pub fn zoom_in(
        &mut self,
        current: CameraPose,
        target: K,
        object_position: Vec3,
        object_size: f32,
    ) -> Result<TransitionHandle, TransitionError> {
        self.ensure_idle()?;
        if self.saved.is_none() {
            let bounds = self.free_bounds(&current);
            self.saved = Some(CameraPose { bounds, ..current });
            self.restore_bounds = None;
        }
        self.mode = CameraMode::Zoomed(target);
        Ok(self.start(
            TransitionKind::ZoomIn(target),
            current,
            zoom_pose(object_position, object_size),
            transition::ZOOM_DURATION,
        ))
    }

    /// Advance the transition identified by `handle` by `dt` seconds.
    ///
    /// Returns `None` if `handle` is not the current transition.
    pub fn advance(&mut self, handle: TransitionHandle, dt: f32) -> Option<TransitionStep> {
        let active = self.active.as_mut().filter(|t| t.handle == handle)?;
        active.elapsed += dt.max(0.0);
        let progress = active.progress();
        let finished = progress >= 1.0;
        let pose = if finished {
            active.to
        } else {
            active.from.lerp(&active.to, ease_out_cubic(progress))
        };

        if finished {
            let kind = active.kind;
            self.active = None;
            match kind {
                TransitionKind::ZoomIn(target) => self.mode = CameraMode::Zoomed(target),
                TransitionKind::ZoomOut => {
                    self.mode = CameraMode::Free;
                    self.saved = None;
                    self.restore_bounds = None;
                }
                TransitionKind::Teleport(index) => {
                    self.mode = CameraMode::Free;
                    self.teleport_index = index;
                    self.restore_bounds = None;
                }
            }
        }

        Some(TransitionStep { pose, finished })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_pose() -> CameraPose {
        CameraPose::default()
    }

    impl<K: Copy> CameraSession<K> {
        fn saved_pose(&self) -> Option<&CameraPose> {
            self.saved.as_ref()
        }

        fn active_kind(&self) -> Option<TransitionKind<K>> {
            self.active.as_ref().map(|t| t.kind)
        }
    }

    fn run_to_end(session: &mut CameraSession<u32>) -> Vec<TransitionStep> {
        let mut steps = Vec::new();
        while let Some(handle) = session.active_handle() {
            steps.push(session.advance(handle, 1.0 / 60.0).unwrap());
        }
        steps
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn bounds_are_ordered_on_construction() {
        let bounds = OrbitBounds::new(30.0, 3.0);
        assert_eq!(bounds.min(), 3.0);
        assert_eq!(bounds.max(), 30.0);
    }

    #[test]
    fn zoom_in_and_out_restores_free_pose() {
        let mut session = CameraSession::<u32>::default();
        let start = free_pose();
        session
            .zoom_in(start, 7, Vec3::new(0.0, 0.0, 55.0), 5.0)
            .unwrap();
        assert_eq!(session.mode(), CameraMode::Zoomed(7));

        let steps = run_to_end(&mut session);
        let last = steps.last().unwrap();
        assert!(last.finished);
        assert_eq!(last.pose.target, Vec3::new(0.0, 0.0, 55.0));
        assert_eq!(last.pose.position, Vec3::new(0.0, 0.0, 67.5));
        assert!((last.pose.bounds.min() - 3.75).abs() < 1e-5);
        assert!((last.pose.bounds.max() - 37.5).abs() < 1e-5);
        assert_eq!(session.mode(), CameraMode::Zoomed(7));

        session.zoom_out(last.pose).unwrap();
        let steps = run_to_end(&mut session);
        assert_eq!(steps.last().unwrap().pose, start);
        assert_eq!(session.mode(), CameraMode::Free);
        assert!(session.saved_pose().is_none());
    }

    #[test]
    fn small_objects_use_minimum_zoom_distance() {
        let pose = zoom_pose(Vec3::ZERO, 1.0);
        assert_eq!(pose.position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn min_never_exceeds_max_during_transitions() {
        let mut session = CameraSession::<u32>::default();
        session.zoom_in(free_pose(), 1, Vec3::ZERO, 24.0).unwrap();
        let mut pose = free_pose();
        for step in run_to_end(&mut session) {
            assert!(step.pose.bounds.min() <= step.pose.bounds.max());
            pose = step.pose;
        }
        session.teleport_to(pose, 3).unwrap();
        for step in run_to_end(&mut session) {
            assert!(step.pose.bounds.min() <= step.pose.bounds.max());
        }
    }

    #[test]
    fn requests_are_rejected_while_transitioning() {
        let mut session = CameraSession::<u32>::default();
        session.teleport_next(free_pose()).unwrap();
        assert_eq!(
            session.zoom_in(free_pose(), 1, Vec3::ZERO, 5.0),
            Err(TransitionError::Busy)
        );
        assert_eq!(session.teleport_next(free_pose()), Err(TransitionError::Busy));
        assert!(!session.controls_enabled());
    }

    #[test]
    fn exit_zoom_happens_once() {
        let mut session = CameraSession::<u32>::default();
        session.zoom_in(free_pose(), 1, Vec3::ZERO, 5.0).unwrap();
        run_to_end(&mut session);

        assert!(session.zoom_out(free_pose()).is_ok());
        assert_eq!(session.zoom_out(free_pose()), Err(TransitionError::Busy));
        assert_eq!(session.active_kind(), Some(TransitionKind::ZoomOut));
        run_to_end(&mut session);
        assert_eq!(session.zoom_out(free_pose()), Err(TransitionError::NotZoomed));
    }

    #[test]
    fn teleport_cycles_wrap_both_ways() {
        let mut session = CameraSession::<u32>::default();
        let count = VIEWPOINTS.len();

        session.teleport_previous(free_pose()).unwrap();
        run_to_end(&mut session);
        assert_eq!(session.teleport_index(), count - 1);

        session.teleport_next(free_pose()).unwrap();
        run_to_end(&mut session);
        assert_eq!(session.teleport_index(), 0);
        assert_eq!(session.mode(), CameraMode::Free);
    }

    #[test]
    fn teleport_index_updates_on_completion_only() {
        let mut session = CameraSession::<u32>::default();
        let handle = session.teleport_to(free_pose(), 4).unwrap();
        assert_eq!(session.mode(), CameraMode::Teleporting(4));
        assert_eq!(session.teleport_index(), 0);
        session.advance(handle, 0.5).unwrap();
        assert_eq!(session.teleport_index(), 0);
        let step = session.advance(handle, 0.5).unwrap();
        assert!(step.finished);
        assert_eq!(step.pose.position, VIEWPOINTS[4].position);
        assert_eq!(session.teleport_index(), 4);
    }

    #[test]
    fn unknown_viewpoint_is_rejected() {
        let mut session = CameraSession::<u32>::default();
        assert_eq!(
            session.teleport_to(free_pose(), 99),
            Err(TransitionError::UnknownViewpoint(99))
        );
        assert_eq!(session.mode(), CameraMode::Free);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut session = CameraSession::<u32>::default();
        let first = session.teleport_to(free_pose(), 1).unwrap();
        assert_eq!(session.cancel(), Some(first));
        assert_eq!(session.mode(), CameraMode::Free);

        let second = session.teleport_to(free_pose(), 2).unwrap();
        assert_ne!(first, second);
        assert!(session.advance(first, 1.0).is_none());
        assert!(session.advance(second, 1.0).unwrap().finished);
    }

    #[test]
    fn teleport_from_zoom_restores_free_bounds() {
        let mut session = CameraSession::<u32>::default();
        session.zoom_in(free_pose(), 1, Vec3::ZERO, 5.0).unwrap();
        let zoomed = run_to_end(&mut session).last().unwrap().pose;

        session.teleport_to(zoomed, 0).unwrap();
        let end = run_to_end(&mut session).last().unwrap().pose;
        assert_eq!(end.bounds, OrbitBounds::default());
        assert_eq!(session.mode(), CameraMode::Free);
        assert!(session.saved_pose().is_none());
    }

    #[test]
    fn retarget_keeps_original_free_pose() {
        let mut session = CameraSession::<u32>::default();
        let start = free_pose();
        session.zoom_in(start, 1, Vec3::ZERO, 5.0).unwrap();
        let zoomed = run_to_end(&mut session).last().unwrap().pose;

        session.zoom_in(zoomed, 2, Vec3::new(35.0, 0.0, 0.0), 3.0).unwrap();
        run_to_end(&mut session);
        assert_eq!(session.zoom_target(), Some(2));
        assert_eq!(session.saved_pose(), Some(&start));
    }

    fn zoomed_session() -> (CameraSession<u32>, CameraPose) {
        let mut session = CameraSession::<u32>::default();
        session
            .zoom_in(free_pose(), 1, Vec3::new(0.0, 0.0, 55.0), 5.0)
            .unwrap();
        let zoomed = run_to_end(&mut session).last().unwrap().pose;
        (session, zoomed)
    }

    #[test]
    fn reset_during_zoom_out_restores_free_bounds() {
        let (mut session, zoomed) = zoomed_session();
        let handle = session.zoom_out(zoomed).unwrap();
        let midway = session.advance(handle, 0.1).unwrap().pose;
        assert_ne!(midway.bounds, OrbitBounds::default());

        session.cancel();
        session.teleport_to(midway, 0).unwrap();
        let end = run_to_end(&mut session).last().unwrap().pose;
        assert_eq!(end.bounds, OrbitBounds::default());
        assert_eq!(session.mode(), CameraMode::Free);
    }

    #[test]
    fn reset_during_teleport_from_zoom_restores_free_bounds() {
        let (mut session, zoomed) = zoomed_session();
        let handle = session.teleport_to(zoomed, 3).unwrap();
        let midway = session.advance(handle, 0.1).unwrap().pose;

        session.cancel();
        session.teleport_to(midway, 0).unwrap();
        let end = run_to_end(&mut session).last().unwrap().pose;
        assert_eq!(end.bounds, OrbitBounds::default());
    }

    #[test]
    fn zoom_after_cancelled_exit_saves_free_bounds() {
        let (mut session, zoomed) = zoomed_session();
        let handle = session.zoom_out(zoomed).unwrap();
        let midway = session.advance(handle, 0.1).unwrap().pose;
        session.cancel();

        session.zoom_in(midway, 2, Vec3::ZERO, 24.0).unwrap();
        assert_eq!(session.saved_pose().unwrap().bounds, OrbitBounds::default());
        assert_eq!(session.saved_pose().unwrap().position, midway.position);
    }
}
