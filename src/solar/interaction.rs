//! Per-scene interaction state
//!
//! [`InteractionContext`] owns everything the pointer can change: the camera
//! session, the hover bookkeeping and the current selection. Controller code
//! receives it explicitly instead of reaching for ambient state.

use bevy::math::Vec3;

use crate::solar::camera_session::{CameraPose, CameraSession, TransitionError, TransitionHandle};
use crate::solar::catalog::ObjectKind;
use crate::solar::hover::HoverController;

/// A registered object under the pointer at click time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickTarget<K> {
    pub node: K,
    pub kind: ObjectKind,
    pub position: Vec3,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<K> {
    pub node: K,
    pub kind: ObjectKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    ZoomIn(TransitionHandle),
    ZoomOut(TransitionHandle),
    /// The camera refused the request; selection may still have changed
    Rejected(TransitionError),
    /// Empty-space click while not zoomed
    Nothing,
}

#[derive(Debug, Clone)]
pub struct InteractionContext<K> {
    pub session: CameraSession<K>,
    pub hover: HoverController<K>,
    selected: Option<Selection<K>>,
}

impl<K> Default for InteractionContext<K> {
    fn default() -> Self {
        Self {
            session: CameraSession::default(),
            hover: HoverController::default(),
            selected: None,
        }
    }
}

impl<K: Copy + Eq> InteractionContext<K> {
    pub fn selected(&self) -> Option<Selection<K>> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Handle a click. `hit` is the registered object under the pointer, if any.
    ///
    /// Clicking an object selects it and zooms in; clicking the object already
    /// zoomed on zooms back out. Clicking empty space leaves zoom and clears
    /// the selection.
    pub fn click(&mut self, hit: Option<ClickTarget<K>>, current: CameraPose) -> ClickOutcome {
        match hit {
            Some(target) => {
                self.selected = Some(Selection {
                    node: target.node,
                    kind: target.kind,
                });
                let result = if self.session.zoom_target() == Some(target.node) {
                    self.session.zoom_out(current).map(ClickOutcome::ZoomOut)
                } else {
                    self.session
                        .zoom_in(current, target.node, target.position, target.size)
                        .map(ClickOutcome::ZoomIn)
                };
                result.unwrap_or_else(ClickOutcome::Rejected)
            }
            None => {
                self.selected = None;
                if self.session.zoom_target().is_none() {
                    return ClickOutcome::Nothing;
                }
                match self.session.zoom_out(current) {
                    Ok(handle) => ClickOutcome::ZoomOut(handle),
                    Err(err) => ClickOutcome::Rejected(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::camera_session::CameraMode;
    use crate::solar::catalog::Planet;

    const EARTH: ObjectKind = ObjectKind::Planet(Planet::Earth);

    fn earth() -> ClickTarget<u32> {
        ClickTarget {
            node: 3,
            kind: EARTH,
            position: Vec3::new(0.0, 0.0, 55.0),
            size: 5.0,
        }
    }

    fn finish(ctx: &mut InteractionContext<u32>) -> CameraPose {
        let mut pose = CameraPose::default();
        while let Some(handle) = ctx.session.active_handle() {
            pose = ctx.session.advance(handle, 0.1).unwrap().pose;
        }
        pose
    }

    #[test]
    fn clicking_earth_selects_and_zooms() {
        let mut ctx = InteractionContext::<u32>::default();
        let outcome = ctx.click(Some(earth()), CameraPose::default());
        assert!(matches!(outcome, ClickOutcome::ZoomIn(_)));
        assert_eq!(ctx.selected().map(|s| s.kind.name()), Some("Earth"));
        assert_eq!(ctx.session.mode(), CameraMode::Zoomed(3));
    }

    #[test]
    fn reclicking_zoomed_object_exits_once() {
        let mut ctx = InteractionContext::<u32>::default();
        ctx.click(Some(earth()), CameraPose::default());
        let pose = finish(&mut ctx);

        assert!(matches!(ctx.click(Some(earth()), pose), ClickOutcome::ZoomOut(_)));
        assert_eq!(
            ctx.click(Some(earth()), pose),
            ClickOutcome::Rejected(TransitionError::Busy)
        );
        finish(&mut ctx);
        assert_eq!(ctx.session.mode(), CameraMode::Free);
    }

    #[test]
    fn empty_click_leaves_zoom_and_clears_selection() {
        let mut ctx = InteractionContext::<u32>::default();
        ctx.click(Some(earth()), CameraPose::default());
        let pose = finish(&mut ctx);

        assert!(matches!(ctx.click(None, pose), ClickOutcome::ZoomOut(_)));
        assert_eq!(ctx.selected(), None);
        finish(&mut ctx);
        assert_eq!(ctx.click(None, pose), ClickOutcome::Nothing);
    }

    #[test]
    fn clicks_during_teleport_still_select() {
        let mut ctx = InteractionContext::<u32>::default();
        ctx.session.teleport_next(CameraPose::default()).unwrap();
        let outcome = ctx.click(Some(earth()), CameraPose::default());
        assert_eq!(outcome, ClickOutcome::Rejected(TransitionError::Busy));
        assert_eq!(ctx.selected().map(|s| s.kind.name()), Some("Earth"));
        assert!(matches!(ctx.session.mode(), CameraMode::Teleporting(_)));
    }
}
