//! Pointer picking systems
//!
//! Casts a ray from the pointer through the offscreen camera, finds the closest
//! mesh, resolves it to its registered body and drives hover and click
//! handling from there.

use bevy::{
    camera::primitives::Aabb,
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
};

use crate::bevy::components::{CelestialBody, Label, OffscreenCamera};
use crate::bevy::resources::{HoveredBody, InteractionState, OrbitCameraState, PointerFrame};
use crate::bevy::systems::surfaces::EarthViewRequest;
use crate::config::{RENDER_HEIGHT, RENDER_WIDTH};
use crate::solar::hover::HighlightSnapshot;
use crate::solar::picking::{
    closest_hit, first_mesh, merge_bounds, object_size, pointer_to_ndc, registered_ancestor,
    PickRay, PickTarget,
};
use crate::solar::{ClickOutcome, ClickTarget, EarthView, ObjectKind};

/// Meshes whose transform and material the hover highlight changes
type Highlightable<'w, 's> =
    Query<'w, 's, (&'static mut Transform, &'static mut MeshMaterial3d<StandardMaterial>)>;

/// A mesh the ray can hit, already resolved to its body
struct Pickable {
    root: Entity,
    target: PickTarget<Entity>,
    /// World-space box of the mesh, when its bounds are usable
    bounds: Option<(Vec3, Vec3)>,
}

/// Ray from a pointer position in render-target pixels
fn pointer_ray(camera: &Camera, camera_transform: &GlobalTransform, pointer: Vec2) -> Option<PickRay> {
    let size = Vec2::new(RENDER_WIDTH as f32, RENDER_HEIGHT as f32);
    let ndc = pointer_to_ndc(pointer, size);
    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    PickRay::through(near, far)
}

/// Hover highlight and click handling
#[allow(clippy::too_many_arguments)]
pub fn handle_pointer(
    pointer: Res<PointerFrame>,
    orbit_state: Res<OrbitCameraState>,
    mut interaction: ResMut<InteractionState>,
    mut hovered_body: ResMut<HoveredBody>,
    mut earth_view: MessageWriter<EarthViewRequest>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<OffscreenCamera>>,
    meshes: Query<(Entity, &GlobalTransform, Option<&Aabb>), (With<Mesh3d>, Without<Label>)>,
    roots: Query<(&CelestialBody, &GlobalTransform)>,
    parents: Query<&ChildOf>,
    children: Query<&Children>,
    mut highlightable: Highlightable,
) {
    let input = &pointer.0;
    if !input.moved && input.clicks.is_empty() {
        return;
    }
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let pickables: Vec<Pickable> = meshes
        .iter()
        .filter_map(|(entity, transform, aabb)| {
            let root = registered_ancestor(
                entity,
                |e| parents.get(e).ok().map(|c| c.parent()),
                |e| roots.contains(e),
            )?;
            let (body, root_transform) = roots.get(root).ok()?;
            Some(pick_sphere(entity, root, body.kind, root_transform, transform, aabb))
        })
        .collect();

    let pick = |position: [f32; 2]| {
        let ray = pointer_ray(camera, camera_transform, Vec2::from(position))?;
        let (mesh, _) = closest_hit(&ray, pickables.iter().map(|p| p.target))?;
        pickables.iter().find(|p| p.target.mesh == mesh)
    };

    if input.moved {
        let hit = input.position.and_then(pick);
        hovered_body.0 = hit.and_then(|p| roots.get(p.root).ok()).map(|(b, _)| b.kind);

        let highlight_mesh = hit.and_then(|p| {
            first_mesh(
                p.root,
                |e| children.get(e).map(|c| c.to_vec()).unwrap_or_default(),
                |e| highlightable.contains(e),
            )
        });
        apply_hover(highlight_mesh, &mut interaction, &mut highlightable, &mut materials);
    }

    for click in input.clicks.iter() {
        let target = pick(*click).and_then(|p| {
            let (body, root_transform) = roots.get(p.root).ok()?;
            // Every part of the object counts, not just the mesh under the pointer
            let extent = merge_bounds(
                pickables
                    .iter()
                    .filter(|other| other.root == p.root)
                    .filter_map(|other| other.bounds),
            )
            .map(|(min, max)| max - min);
            Some(ClickTarget {
                node: p.root,
                kind: body.kind,
                position: root_transform.translation(),
                size: object_size(body.kind, extent),
            })
        });

        if let Some(target) = target {
            log::info!("[Bevy] Clicked {}", target.kind);
            if target.kind.is_earth() {
                earth_view.write(EarthViewRequest(EarthView::Standard));
            }
        }

        match interaction.click(target, orbit_state.pose()) {
            ClickOutcome::Rejected(err) => log::debug!("[Bevy] Camera busy: {}", err),
            ClickOutcome::Nothing => {}
            outcome => log::debug!("[Bevy] Click started {:?}", outcome),
        }
    }
}

/// Bounding sphere of a mesh, or the nominal size of its body when the
/// mesh has no usable bounds
fn pick_sphere(
    mesh: Entity,
    root: Entity,
    kind: ObjectKind,
    root_transform: &GlobalTransform,
    transform: &GlobalTransform,
    aabb: Option<&Aabb>,
) -> Pickable {
    let usable = aabb.map(|aabb| (Vec3::from(aabb.center), Vec3::from(aabb.half_extents)));
    let usable = usable.filter(|(center, half)| {
        center.is_finite() && half.is_finite() && half.max_element() > f32::EPSILON
    });

    let Some((center, half)) = usable else {
        return Pickable {
            root,
            target: PickTarget {
                mesh,
                center: root_transform.translation(),
                radius: object_size(kind, None) * 0.5,
            },
            bounds: None,
        };
    };

    let (scale, _, _) = transform.to_scale_rotation_translation();
    Pickable {
        root,
        target: PickTarget {
            mesh,
            center: transform.transform_point(center),
            // Inscribed in the box, so a sphere of radius r picks at exactly r
            radius: half.max_element() * scale.abs().max_element(),
        },
        bounds: Some(world_bounds(transform, center, half)),
    }
}

/// World-space box around the eight transformed corners of a local box
fn world_bounds(transform: &GlobalTransform, center: Vec3, half: Vec3) -> (Vec3, Vec3) {
    let corners = (0..8).map(|i| {
        let sign = |bit: i32| if i & bit == 0 { -1.0 } else { 1.0 };
        let corner = transform.transform_point(center + half * Vec3::new(sign(1), sign(2), sign(4)));
        (corner, corner)
    });
    let origin = transform.transform_point(center);
    merge_bounds(corners).unwrap_or((origin, origin))
}

/// Move the highlight to `next`: the previous mesh is restored first
fn apply_hover(
    next: Option<Entity>,
    interaction: &mut InteractionState,
    highlightable: &mut Highlightable,
    materials: &mut Assets<StandardMaterial>,
) {
    let update = interaction.hover.hover(next);
    if let Some(previous) = update.revert {
        if let Some(original) = interaction.hover.original(previous).copied() {
            restore(previous, &original, highlightable, materials);
        }
    }
    if let Some(next) = update.apply {
        highlight(next, interaction, highlightable, materials);
    }
}

fn highlight(
    mesh: Entity,
    interaction: &mut InteractionState,
    highlightable: &mut Highlightable,
    materials: &mut Assets<StandardMaterial>,
) {
    let Ok((mut transform, mut material_handle)) = highlightable.get_mut(mesh) else {
        return;
    };

    if interaction.hover.original(mesh).is_none() {
        // Give the mesh its own material so the highlight stays on this mesh
        if let Some(own) = materials.get(&material_handle.0).cloned() {
            material_handle.0 = materials.add(own);
        }
    }

    let emissive = materials
        .get(&material_handle.0)
        .map(|m| m.emissive)
        .unwrap_or(LinearRgba::BLACK);
    let scale = transform.scale;
    let original = interaction
        .hover
        .remember(mesh, || HighlightSnapshot { emissive, scale });

    transform.scale = original.highlighted_scale();
    if let Some(material) = materials.get_mut(&material_handle.0) {
        material.emissive = HighlightSnapshot::highlighted_emissive();
    }
}

fn restore(
    mesh: Entity,
    original: &HighlightSnapshot,
    highlightable: &mut Highlightable,
    materials: &mut Assets<StandardMaterial>,
) {
    // The mesh may be gone, e.g. a model that was swapped for a fallback
    let Ok((mut transform, material_handle)) = highlightable.get_mut(mesh) else {
        return;
    };
    transform.scale = original.scale;
    if let Some(material) = materials.get_mut(&material_handle.0) {
        material.emissive = original.emissive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use crate::config::hover::SCALE_FACTOR;
    use crate::solar::Planet;

    const EARTH: ObjectKind = ObjectKind::Planet(Planet::Earth);
    const UNLIT: LinearRgba = LinearRgba::rgb(0.1, 0.0, 0.0);

    fn earth_at(translation: Vec3) -> GlobalTransform {
        GlobalTransform::from(Transform::from_translation(translation))
    }

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    fn ray_past_earth(offset: f32) -> PickRay {
        PickRay::through(Vec3::new(offset, 0.0, 100.0), Vec3::new(offset, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn pick_radius_matches_a_sphere_mesh() {
        let transform = earth_at(Vec3::new(0.0, 0.0, 55.0));
        let aabb = Aabb::from_min_max(Vec3::splat(-2.5), Vec3::splat(2.5));
        let (mesh, _) = entities();
        let pickable = pick_sphere(mesh, mesh, EARTH, &transform, &transform, Some(&aabb));

        assert!((pickable.target.radius - 2.5).abs() < 1e-5);
        assert!(ray_past_earth(2.0).intersect_sphere(pickable.target.center, pickable.target.radius).is_some());
        // Empty space next to the planet
        assert!(closest_hit(&ray_past_earth(4.0), [pickable.target]).is_none());
    }

    #[test]
    fn pick_radius_follows_scale() {
        let transform = GlobalTransform::from(Transform::from_scale(Vec3::splat(2.0)));
        let aabb = Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0));
        let (mesh, _) = entities();
        let pickable = pick_sphere(mesh, mesh, ObjectKind::Satellite, &transform, &transform, Some(&aabb));

        assert!((pickable.target.radius - 2.0).abs() < 1e-5);
        let (min, max) = pickable.bounds.unwrap();
        assert!((max - min - Vec3::splat(4.0)).length() < 1e-4);
    }

    #[test]
    fn missing_or_degenerate_bounds_use_the_size_table() {
        let root_transform = earth_at(Vec3::new(0.0, 0.0, 55.0));
        let leaf_transform = earth_at(Vec3::new(3.0, 0.0, 55.0));
        let (root, mesh) = entities();
        let flat = Aabb::from_min_max(Vec3::ZERO, Vec3::ZERO);

        for aabb in [None, Some(&flat)] {
            let pickable = pick_sphere(mesh, root, EARTH, &root_transform, &leaf_transform, aabb);
            assert_eq!(pickable.target.center, Vec3::new(0.0, 0.0, 55.0));
            assert_eq!(pickable.target.radius, 2.5);
            assert!(pickable.bounds.is_none());
        }
    }

    fn hover_world() -> (World, Entity, Entity, Handle<StandardMaterial>) {
        let mut world = World::new();
        let mut materials = Assets::<StandardMaterial>::default();
        let shared = materials.add(StandardMaterial {
            emissive: UNLIT,
            ..default()
        });
        world.insert_resource(materials);
        world.init_resource::<InteractionState>();

        let a = world
            .spawn((
                Transform::from_scale(Vec3::splat(2.0)),
                MeshMaterial3d(shared.clone()),
            ))
            .id();
        let b = world
            .spawn((Transform::default(), MeshMaterial3d(shared.clone())))
            .id();
        (world, a, b, shared)
    }

    fn hover_to(world: &mut World, next: Option<Entity>) {
        world
            .run_system_once(
                move |mut interaction: ResMut<InteractionState>,
                      mut highlightable: Highlightable,
                      mut materials: ResMut<Assets<StandardMaterial>>| {
                    apply_hover(next, &mut interaction, &mut highlightable, &mut materials);
                },
            )
            .unwrap();
    }

    fn appearance(world: &World, mesh: Entity) -> (Vec3, LinearRgba) {
        let handle = &world.get::<MeshMaterial3d<StandardMaterial>>(mesh).unwrap().0;
        let emissive = world
            .resource::<Assets<StandardMaterial>>()
            .get(handle)
            .unwrap()
            .emissive;
        (world.get::<Transform>(mesh).unwrap().scale, emissive)
    }

    #[test]
    fn highlight_uses_its_own_material() {
        let (mut world, a, b, shared) = hover_world();
        hover_to(&mut world, Some(a));

        let (scale, emissive) = appearance(&world, a);
        assert_eq!(scale, Vec3::splat(2.0 * SCALE_FACTOR));
        assert_eq!(emissive, HighlightSnapshot::highlighted_emissive());
        assert_ne!(world.get::<MeshMaterial3d<StandardMaterial>>(a).unwrap().0, shared);
        // The sibling still shares the untouched material
        assert_eq!(appearance(&world, b), (Vec3::ONE, UNLIT));
    }

    #[test]
    fn moving_the_hover_reverts_the_previous_mesh_first() {
        let (mut world, a, b, _) = hover_world();
        hover_to(&mut world, Some(a));
        hover_to(&mut world, Some(b));

        assert_eq!(appearance(&world, a), (Vec3::splat(2.0), UNLIT));
        let (scale, emissive) = appearance(&world, b);
        assert_eq!(scale, Vec3::splat(SCALE_FACTOR));
        assert_eq!(emissive, HighlightSnapshot::highlighted_emissive());
    }

    #[test]
    fn repeated_hovers_restore_the_original_scale() {
        let (mut world, a, b, _) = hover_world();
        for _ in 0..5 {
            hover_to(&mut world, Some(a));
            hover_to(&mut world, None);
        }
        hover_to(&mut world, Some(a));
        assert_eq!(appearance(&world, a).0, Vec3::splat(2.0 * SCALE_FACTOR));

        hover_to(&mut world, None);
        assert_eq!(appearance(&world, a), (Vec3::splat(2.0), UNLIT));
        assert_eq!(appearance(&world, b), (Vec3::ONE, UNLIT));
    }
}
