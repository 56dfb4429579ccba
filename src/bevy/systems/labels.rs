//! Label systems
//!
//! Keeps each billboard plate above its body, facing the camera and sized by
//! camera distance, and publishes the screen position of every label so the
//! frontend can draw the text on top of the frame.

use bevy::{
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
};
use std::f32::consts::PI;

use crate::bevy::components::{Label, OffscreenCamera};
use crate::bevy::resources::{LabelsRes, OrbitCameraState};
use crate::config::labels::PLATE_ALPHA;
use crate::solar::labels::layout_for_distance;
use crate::tauri_bridge::shared_state::LabelSnapshot;

/// Place, scale and fade the label plates, then publish them
#[allow(clippy::type_complexity)]
pub fn update_labels(
    orbit_state: Res<OrbitCameraState>,
    labels_res: Option<Res<LabelsRes>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<OffscreenCamera>>,
    anchors: Query<&GlobalTransform, Without<Label>>,
    mut plates: Query<(
        &Label,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let camera_position = orbit_state.position();
    let camera = camera_query.single().ok();
    let mut snapshots = Vec::new();

    for (label, mut transform, mut visibility, material_handle) in plates.iter_mut() {
        let Ok(anchor) = anchors.get(label.anchor) else {
            *visibility = Visibility::Hidden;
            continue;
        };

        let distance = camera_position.distance(anchor.translation());
        let layout = layout_for_distance(distance);
        let position = anchor.translation() + Vec3::Y * layout.offset;

        // Plate front (+Z) toward the camera
        transform.translation = position;
        transform.look_at(camera_position, Vec3::Y);
        transform.rotate_local_y(PI);
        transform.scale = Vec3::new(layout.width, layout.height(), 1.0);

        *visibility = if layout.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };

        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.base_color = Color::srgba(0.0, 0.0, 0.0, PLATE_ALPHA * layout.opacity);
        }

        let [r, g, b] = label.color;
        let mut snapshot = LabelSnapshot {
            text: label.text.clone(),
            color: format!("#{r:02x}{g:02x}{b:02x}"),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            opacity: layout.opacity,
            visible: false,
        };

        if let (true, Some((camera, camera_transform))) = (layout.visible, camera) {
            let right = position + *camera_transform.right() * layout.width * 0.5;
            if let (Ok(center), Ok(edge)) = (
                camera.world_to_viewport(camera_transform, position),
                camera.world_to_viewport(camera_transform, right),
            ) {
                snapshot.x = center.x;
                snapshot.y = center.y;
                snapshot.width = (edge.x - center.x).abs() * 2.0;
                snapshot.visible = true;
            }
        }
        snapshots.push(snapshot);
    }

    if let Some(res) = labels_res {
        if let Ok(mut guard) = res.0 .0.lock() {
            *guard = snapshots;
        }
    }
}
