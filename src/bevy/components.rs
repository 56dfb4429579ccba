//! Bevy component definitions
//!
//! This module contains all component markers and data structures used
//! to tag and identify entities in the Bevy ECS (Entity Component System).

use bevy::prelude::*;

use crate::solar::ObjectKind;

/// Marker component for the offscreen rendering camera
///
/// Entities with this component are cameras that render to an offscreen
/// texture instead of a window.
#[derive(Component)]
pub struct OffscreenCamera;

/// Marker component for cameras that can be controlled by user input
///
/// Entities with this component follow the orbit state and camera
/// transitions.
#[derive(Component)]
pub struct CameraController;

/// A clickable object of the tour
///
/// The entity carrying this component is the registered node; picking
/// resolves hits on any descendant mesh up to it.
#[derive(Component, Debug, Clone, Copy)]
pub struct CelestialBody {
    pub kind: ObjectKind,
    /// Radians per second around the local Y axis
    pub rotation_speed: f32,
}

/// Circular orbit around another registered body
#[derive(Component, Debug, Clone, Copy)]
pub struct Orbit {
    pub around: ObjectKind,
    pub radius: f32,
    /// Radians per second
    pub speed: f32,
    pub angle: f32,
}

/// A texture that should replace the flat color once it loads
#[derive(Component)]
pub struct PendingTexture {
    pub texture: Handle<Image>,
    pub fallback: [u8; 3],
}

/// A model whose load has not settled yet
///
/// If the load fails the entity gets a primitive sphere instead.
#[derive(Component)]
pub struct PendingModel {
    pub scene: Handle<Scene>,
    pub fallback_radius: f32,
    pub fallback_color: [u8; 3],
}

/// Billboard label above a registered body
#[derive(Component, Debug, Clone)]
pub struct Label {
    pub text: String,
    pub anchor: Entity,
    pub color: [u8; 3],
}
