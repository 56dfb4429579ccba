//! Scene setup system
//!
//! This module handles the initial setup of the tour: the offscreen camera,
//! lights, every body from the catalog, the satellite model and the billboard
//! labels. Each clickable root is recorded in the [`ObjectRegistry`].

use bevy::{
    asset::Assets,
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    image::Image,
    math::{
        primitives::{Annulus, Rectangle, Sphere},
        Quat, Vec3,
    },
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureFormat, TextureUsages},
        renderer::RenderDevice,
    },
};
use std::f32::consts::FRAC_PI_2;

use crate::bevy::components::{
    CameraController, CelestialBody, Label, OffscreenCamera, Orbit, PendingModel, PendingTexture,
};
use crate::bevy::plugins::image_copy::ImageCopier;
use crate::bevy::resources::{ObjectRegistry, OrbitCameraState};
use crate::config::{animation::REFERENCE_TICK_RATE, camera, labels, RENDER_HEIGHT, RENDER_WIDTH};
use crate::solar::catalog::{satellite_position, BodySpec, BODIES, SATELLITE};
use crate::solar::surface::{initial_surface, Surface};
use crate::solar::ObjectKind;

/// Setup the 3D scene with camera, bodies, labels, and lights
#[allow(clippy::too_many_arguments)]
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut registry: ResMut<ObjectRegistry>,
    asset_server: Res<AssetServer>,
    orbit_state: Res<OrbitCameraState>,
    render_device: Res<RenderDevice>,
) {
    log::info!("[Bevy] Setting up scene...");

    let size = Extent3d {
        width: RENDER_WIDTH,
        height: RENDER_HEIGHT,
        depth_or_array_layers: 1,
    };

    // Create render target texture
    let mut render_target_image =
        Image::new_target_texture(size.width, size.height, TextureFormat::bevy_default());
    render_target_image.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    let render_target_image_handle = images.add(render_target_image);

    // Spawn image copier for GPU-to-CPU transfer
    commands.spawn(ImageCopier::new(
        render_target_image_handle.clone(),
        size,
        &render_device,
    ));

    // Spawn camera with orbit controller
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(render_target_image_handle.into()),
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            near: 0.1,
            far: camera::FAR_PLANE,
            ..default()
        }),
        Tonemapping::None,
        Transform::from_translation(orbit_state.position()).looking_at(orbit_state.center, Vec3::Y),
        OffscreenCamera,
        CameraController,
    ));

    // Sunlight from the center of the system
    commands.spawn((
        PointLight {
            intensity: 4.0e8,
            range: camera::FAR_PLANE,
            color: Color::srgb(1.0, 0.95, 0.85),
            ..default()
        },
        Transform::from_translation(Vec3::ZERO),
    ));

    // Fill light so night sides are not pitch black
    commands.spawn((
        DirectionalLight {
            illuminance: 1500.0,
            ..default()
        },
        Transform::from_xyz(100.0, 100.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let plate_mesh = meshes.add(Rectangle::new(1.0, 1.0));

    for spec in BODIES.iter() {
        let entity = spawn_body(&mut commands, &mut meshes, &mut materials, &asset_server, spec);
        registry.register(spec.kind, entity);
        spawn_label(
            &mut commands,
            &mut materials,
            plate_mesh.clone(),
            spec.kind,
            entity,
            spec.label_color,
        );
    }

    // Satellite model; replaced by a sphere if the model fails to load
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(SATELLITE.model));
    let satellite = commands
        .spawn((
            SceneRoot(scene.clone()),
            Transform::from_translation(satellite_position())
                .with_scale(Vec3::splat(SATELLITE.scale)),
            CelestialBody {
                kind: ObjectKind::Satellite,
                rotation_speed: SATELLITE.rotation_speed * REFERENCE_TICK_RATE,
            },
            PendingModel {
                scene,
                fallback_radius: SATELLITE.fallback_radius,
                fallback_color: SATELLITE.fallback_color,
            },
        ))
        .id();
    registry.register(ObjectKind::Satellite, satellite);
    spawn_label(
        &mut commands,
        &mut materials,
        plate_mesh,
        ObjectKind::Satellite,
        satellite,
        SATELLITE.label_color,
    );

    log::info!("[Bevy] Scene setup complete, {} objects registered", registry.len());
}

fn spawn_body(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    spec: &BodySpec,
) -> Entity {
    let mut material = surface_material(initial_surface(spec.color));
    if spec.emissive {
        material.unlit = true;
    }

    let transform = Transform::from_translation(spec.position)
        .with_rotation(Quat::from_rotation_z(spec.tilt));

    let mut body = commands.spawn((
        Mesh3d(meshes.add(Sphere::new(spec.radius).mesh().uv(64, 32))),
        MeshMaterial3d(materials.add(material)),
        transform,
        CelestialBody {
            kind: spec.kind,
            rotation_speed: spec.rotation_speed * REFERENCE_TICK_RATE,
        },
        PendingTexture {
            texture: asset_server.load(spec.texture),
            fallback: spec.color,
        },
    ));

    if let Some(orbit) = spec.orbit {
        body.insert(Orbit {
            around: orbit.around,
            radius: orbit.radius,
            speed: orbit.speed * REFERENCE_TICK_RATE,
            angle: 0.0,
        });
    }
    let entity = body.id();

    if let Some(rings) = spec.rings {
        let mut ring_material = surface_material(initial_surface(rings.color));
        ring_material.unlit = true;
        ring_material.double_sided = true;
        ring_material.cull_mode = None;
        ring_material.alpha_mode = AlphaMode::Blend;

        commands.spawn((
            Mesh3d(meshes.add(Annulus::new(rings.inner_radius, rings.outer_radius))),
            MeshMaterial3d(materials.add(ring_material)),
            Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            PendingTexture {
                texture: asset_server.load(rings.texture),
                fallback: rings.color,
            },
            ChildOf(entity),
        ));
    }

    entity
}

fn spawn_label(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    plate_mesh: Handle<Mesh>,
    kind: ObjectKind,
    anchor: Entity,
    color: [u8; 3],
) {
    commands.spawn((
        Mesh3d(plate_mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.0, 0.0, 0.0, labels::PLATE_ALPHA),
            unlit: true,
            double_sided: true,
            cull_mode: None,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        Label {
            text: kind.label().to_string(),
            anchor,
            color,
        },
    ));
}

/// Material for a surface, keeping everything else at defaults
pub fn surface_material(surface: Surface) -> StandardMaterial {
    let mut material = StandardMaterial {
        perceptual_roughness: 0.9,
        ..default()
    };
    apply_surface(&mut material, surface, None);
    material
}

/// Point a material at its texture or back to a flat color
pub fn apply_surface(
    material: &mut StandardMaterial,
    surface: Surface,
    texture: Option<Handle<Image>>,
) {
    match surface {
        Surface::Flat([r, g, b]) => {
            material.base_color = Color::srgb_u8(r, g, b);
            material.base_color_texture = None;
        }
        Surface::Textured => {
            material.base_color = Color::WHITE;
            material.base_color_texture = texture;
        }
    }
}
