//! Hover highlight bookkeeping
//!
//! The controller decides *which* meshes to revert and highlight; the caller
//! applies the changes to materials and transforms. Originals are captured once
//! per mesh and every revert or re-highlight is computed from that capture, so
//! repeated hovers never drift.

use bevy::color::LinearRgba;
use bevy::math::Vec3;
use std::collections::HashMap;

use crate::config::hover;

/// Appearance of a mesh before it was ever highlighted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSnapshot {
    pub emissive: LinearRgba,
    pub scale: Vec3,
}

impl HighlightSnapshot {
    pub fn highlighted_scale(&self) -> Vec3 {
        self.scale * hover::SCALE_FACTOR
    }

    pub fn highlighted_emissive() -> LinearRgba {
        let (r, g, b) = hover::EMISSIVE_RGB;
        let tint = LinearRgba::from(bevy::color::Color::srgb_u8(r, g, b));
        LinearRgba::rgb(
            tint.red * hover::EMISSIVE_INTENSITY,
            tint.green * hover::EMISSIVE_INTENSITY,
            tint.blue * hover::EMISSIVE_INTENSITY,
        )
    }
}

/// Changes to apply, in order: revert first, then highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverUpdate<K> {
    pub revert: Option<K>,
    pub apply: Option<K>,
}

#[derive(Debug, Clone)]
pub struct HoverController<K> {
    hovered: Option<K>,
    originals: HashMap<K, HighlightSnapshot>,
}

impl<K> Default for HoverController<K> {
    fn default() -> Self {
        Self {
            hovered: None,
            originals: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + std::hash::Hash> HoverController<K> {
    /// New closest hit (or none). Nothing changes while the hit stays the same.
    pub fn hover(&mut self, hit: Option<K>) -> HoverUpdate<K> {
        if hit == self.hovered {
            return HoverUpdate {
                revert: None,
                apply: None,
            };
        }
        let revert = self.hovered.take();
        self.hovered = hit;
        HoverUpdate { revert, apply: hit }
    }

    /// Capture the original appearance of `mesh` unless it was captured before
    pub fn remember(&mut self, mesh: K, capture: impl FnOnce() -> HighlightSnapshot) -> HighlightSnapshot {
        *self.originals.entry(mesh).or_insert_with(capture)
    }

    pub fn original(&self, mesh: K) -> Option<&HighlightSnapshot> {
        self.originals.get(&mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<K> HoverUpdate<K> {
        fn is_empty(&self) -> bool {
            self.revert.is_none() && self.apply.is_none()
        }
    }

    fn snapshot(scale: f32) -> HighlightSnapshot {
        HighlightSnapshot {
            emissive: LinearRgba::BLACK,
            scale: Vec3::splat(scale),
        }
    }

    #[test]
    fn switching_targets_reverts_before_applying() {
        let mut hover = HoverController::<u32>::default();
        assert_eq!(hover.hover(Some(1)), HoverUpdate { revert: None, apply: Some(1) });
        assert_eq!(hover.hover(Some(2)), HoverUpdate { revert: Some(1), apply: Some(2) });
        assert_eq!(hover.hover(None), HoverUpdate { revert: Some(2), apply: None });
        assert!(hover.hover(None).is_empty());
    }

    #[test]
    fn same_target_is_a_no_op() {
        let mut hover = HoverController::<u32>::default();
        hover.hover(Some(1));
        assert!(hover.hover(Some(1)).is_empty());
        assert_eq!(hover.hovered, Some(1));
    }

    #[test]
    fn originals_are_captured_once() {
        let mut hover = HoverController::<u32>::default();
        let first = hover.remember(1, || snapshot(1.0));
        // A second capture would see the bumped scale; it must be ignored
        let second = hover.remember(1, || snapshot(first.highlighted_scale().x));
        assert_eq!(first, second);
        assert_eq!(hover.original(1).unwrap().scale, Vec3::ONE);
    }

    #[test]
    fn repeated_hovers_do_not_compound_scale() {
        let mut hover = HoverController::<u32>::default();
        let mut current_scale = Vec3::ONE;
        for _ in 0..10 {
            hover.hover(Some(1));
            let original = hover.remember(1, || snapshot(current_scale.x));
            assert_eq!(original.highlighted_scale(), Vec3::splat(hover::SCALE_FACTOR));
            hover.hover(None);
            current_scale = hover.original(1).unwrap().scale;
        }
        assert_eq!(current_scale, Vec3::ONE);
    }

    #[test]
    fn highlight_emissive_is_dim_grey() {
        let emissive = HighlightSnapshot::highlighted_emissive();
        assert!(emissive.red > 0.0 && emissive.red < 0.1);
        assert_eq!(emissive.red, emissive.green);
    }
}
