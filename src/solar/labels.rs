//! Billboard label layout
//!
//! Labels sit above their object, grow with camera distance so they stay
//! readable, fade when the camera closes in and disappear entirely when the
//! camera is practically on top of the object.

use crate::config::labels::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    /// Height above the anchor
    pub offset: f32,
    /// Width of the plate; height is `width * ASPECT`
    pub width: f32,
    pub opacity: f32,
    pub visible: bool,
}

impl LabelLayout {
    pub fn height(&self) -> f32 {
        self.width * ASPECT
    }
}

/// Layout for a label whose anchor is `distance` away from the camera
pub fn layout_for_distance(distance: f32) -> LabelLayout {
    let offset = (distance * OFFSET_PER_DISTANCE).max(MIN_OFFSET);
    let width = (distance * SCALE_PER_DISTANCE).max(MIN_SCALE);
    LabelLayout {
        offset,
        width,
        opacity: opacity_for_distance(distance),
        visible: distance >= HIDE_DISTANCE,
    }
}

fn opacity_for_distance(distance: f32) -> f32 {
    if distance >= FADE_FAR {
        return 1.0;
    }
    let faded = (distance.max(FADE_NEAR) - FADE_NEAR) / (FADE_FAR - FADE_NEAR);
    faded.clamp(MIN_OPACITY, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_labels_are_opaque_and_large() {
        let layout = layout_for_distance(150.0);
        assert_eq!(layout.opacity, 1.0);
        assert!(layout.visible);
        assert!((layout.offset - 15.0).abs() < 1e-4);
        assert!((layout.width - 12.0).abs() < 1e-4);
        assert!((layout.height() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn near_labels_clamp_to_minimums() {
        let layout = layout_for_distance(10.0);
        assert_eq!(layout.offset, MIN_OFFSET);
        assert_eq!(layout.width, MIN_SCALE);
        assert_eq!(layout.opacity, MIN_OPACITY);
        assert!(layout.visible);
    }

    #[test]
    fn labels_hide_when_very_close() {
        assert!(!layout_for_distance(4.9).visible);
        assert!(layout_for_distance(5.0).visible);
    }

    #[test]
    fn opacity_fades_linearly_in_band() {
        let mid = (FADE_NEAR + FADE_FAR) / 2.0;
        assert!((layout_for_distance(mid).opacity - 0.5).abs() < 1e-4);
        let mut last = 0.0;
        for d in (0..120).map(|d| d as f32) {
            let opacity = layout_for_distance(d).opacity;
            assert!(opacity >= last);
            last = opacity;
        }
    }
}
