//! Animation systems
//!
//! Bodies spin around their local Y axis; the Moon circles Earth.

use bevy::{prelude::*, time::Time};

use crate::bevy::components::{CelestialBody, Orbit};
use crate::bevy::resources::ObjectRegistry;

/// Spin every body at its own rate
pub fn rotate_bodies(time: Res<Time>, mut query: Query<(&mut Transform, &CelestialBody)>) {
    let dt = time.delta_secs();
    for (mut transform, body) in query.iter_mut() {
        transform.rotate_local_y(body.rotation_speed * dt);
    }
}

/// Move orbiting bodies along their circle around the body they follow
pub fn advance_orbits(
    time: Res<Time>,
    registry: Res<ObjectRegistry>,
    centers: Query<&Transform, Without<Orbit>>,
    mut orbiters: Query<(&mut Transform, &mut Orbit)>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut orbit) in orbiters.iter_mut() {
        let Some(center) = registry
            .get(orbit.around)
            .and_then(|entity| centers.get(entity).ok())
        else {
            continue;
        };

        orbit.angle = (orbit.angle + orbit.speed * dt) % std::f32::consts::TAU;
        transform.translation = orbit_position(center.translation, orbit.radius, orbit.angle);
    }
}

fn orbit_position(center: Vec3, radius: f32, angle: f32) -> Vec3 {
    center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_starts_on_the_x_axis() {
        let center = Vec3::new(0.0, 0.0, 55.0);
        let position = orbit_position(center, 5.0, 0.0);
        assert!(position.distance(Vec3::new(5.0, 0.0, 55.0)) < 1e-5);
    }

    #[test]
    fn orbit_keeps_its_radius() {
        let center = Vec3::new(3.0, -2.0, 1.0);
        for step in 0..16 {
            let angle = step as f32 * 0.4;
            let position = orbit_position(center, 5.0, angle);
            assert!((position.distance(center) - 5.0).abs() < 1e-4);
            assert_eq!(position.y, center.y);
        }
    }
}
