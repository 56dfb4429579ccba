//! Asset fallback and Earth view systems
//!
//! Textures and the satellite model load in the background. Until they
//! settle, bodies show flat colors; failed loads keep the fallback.

use bevy::{
    asset::{AssetServer, Assets, LoadState},
    math::primitives::Sphere,
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
};

use crate::bevy::components::{PendingModel, PendingTexture};
use crate::bevy::resources::{EarthViewState, ObjectRegistry};
use crate::bevy::systems::scene::{apply_surface, surface_material};
use crate::solar::surface::{initial_surface, resolve_surface, Surface, TextureLoad};
use crate::solar::{EarthView, ObjectKind, Planet};

/// Request to show a different Earth surface
#[derive(Message, Debug, Clone, Copy)]
pub struct EarthViewRequest(pub EarthView);

fn load_status(asset_server: &AssetServer, id: impl Into<bevy::asset::UntypedAssetId>) -> TextureLoad {
    match asset_server.get_load_state(id) {
        Some(LoadState::Loaded) => TextureLoad::Loaded,
        Some(LoadState::Failed(_)) => TextureLoad::Failed,
        _ => TextureLoad::Pending,
    }
}

/// Swap flat colors for textures once they load
pub fn resolve_pending_textures(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pending: Query<(Entity, &PendingTexture, &MeshMaterial3d<StandardMaterial>)>,
) {
    for (entity, texture, material_handle) in pending.iter() {
        let load = load_status(&asset_server, texture.texture.id());
        let Some(surface) = resolve_surface(load, texture.fallback) else {
            continue;
        };

        if let Some(material) = materials.get_mut(&material_handle.0) {
            apply_surface(material, surface, Some(texture.texture.clone()));
        }
        if surface != Surface::Textured {
            log::warn!(
                "[Bevy] Texture {:?} failed to load, keeping flat color",
                texture.texture.path()
            );
        }
        commands.entity(entity).remove::<PendingTexture>();
    }
}

/// Give a failed model a primitive stand-in
pub fn resolve_pending_models(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    pending: Query<(Entity, &PendingModel)>,
) {
    for (entity, model) in pending.iter() {
        match load_status(&asset_server, model.scene.id()) {
            TextureLoad::Pending => {}
            TextureLoad::Loaded => {
                log::info!("[Bevy] Model loaded for {:?}", entity);
                commands.entity(entity).remove::<PendingModel>();
            }
            TextureLoad::Failed => {
                log::warn!(
                    "[Bevy] Model {:?} failed to load, using a sphere",
                    model.scene.path()
                );
                commands
                    .entity(entity)
                    .remove::<(SceneRoot, PendingModel)>()
                    .insert((
                        Mesh3d(meshes.add(Sphere::new(model.fallback_radius).mesh().uv(32, 16))),
                        MeshMaterial3d(
                            materials.add(surface_material(initial_surface(model.fallback_color))),
                        ),
                    ));
            }
        }
    }
}

/// Switch Earth's surface. The flat color of the new view shows until its
/// texture loads.
pub fn apply_earth_view(
    mut commands: Commands,
    mut requests: MessageReader<EarthViewRequest>,
    mut state: ResMut<EarthViewState>,
    registry: Res<ObjectRegistry>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    bodies: Query<&MeshMaterial3d<StandardMaterial>>,
) {
    let Some(EarthViewRequest(view)) = requests.read().last().copied() else {
        return;
    };
    if state.0 == view {
        return;
    }

    let Some(earth) = registry.get(ObjectKind::Planet(Planet::Earth)) else {
        return;
    };
    let Ok(material_handle) = bodies.get(earth) else {
        return;
    };

    if let Some(material) = materials.get_mut(&material_handle.0) {
        apply_surface(material, initial_surface(view.fallback_color()), None);
    }
    commands.entity(earth).insert(PendingTexture {
        texture: asset_server.load(view.texture()),
        fallback: view.fallback_color(),
    });

    state.0 = view;
    log::info!("[Bevy] Earth view: {}", view.description());
}
