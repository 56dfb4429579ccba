//! Static description of the tour: bodies, viewpoints and Earth views
//!
//! Every clickable object is identified by an [`ObjectKind`]. The body table
//! holds the placement and appearance of each one; the scene setup system
//! spawns entities from it.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight planets, in order from the Sun
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Planet {
    pub const ALL: [Planet; 8] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
        }
    }
}

/// What a clickable scene node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Sun,
    Planet(Planet),
    Moon,
    Satellite,
}

impl ObjectKind {
    /// Name used for selection and as chat context
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Sun => "Sun",
            ObjectKind::Planet(planet) => planet.name(),
            ObjectKind::Moon => "Moon",
            ObjectKind::Satellite => "AquaSat",
        }
    }

    /// Text shown on the billboard label
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Satellite => "Aqua Satellite",
            other => other.name(),
        }
    }

    /// Nominal size (diameter) used when measured bounds are unusable
    pub fn fallback_size(self) -> f32 {
        match self {
            ObjectKind::Satellite => 4.0,
            other => body(other).map(|b| b.radius * 2.0).unwrap_or(5.0),
        }
    }

    pub fn is_earth(self) -> bool {
        self == ObjectKind::Planet(Planet::Earth)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ring geometry for ringed planets
#[derive(Debug, Clone, Copy)]
pub struct Rings {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub texture: &'static str,
    pub color: [u8; 3],
}

/// Circular orbit around another body, advanced every tick
#[derive(Debug, Clone, Copy)]
pub struct OrbitSpec {
    pub around: ObjectKind,
    pub radius: f32,
    /// Radians per reference tick
    pub speed: f32,
}

/// Placement and appearance of a sphere body
#[derive(Debug, Clone, Copy)]
pub struct BodySpec {
    pub kind: ObjectKind,
    pub radius: f32,
    pub position: Vec3,
    pub texture: &'static str,
    /// Flat color used until (or instead of) the texture
    pub color: [u8; 3],
    pub label_color: [u8; 3],
    /// Radians per reference tick around the local Y axis
    pub rotation_speed: f32,
    /// Axial tilt around Z (radians)
    pub tilt: f32,
    pub emissive: bool,
    pub rings: Option<Rings>,
    pub orbit: Option<OrbitSpec>,
    pub description: &'static str,
}

const EARTH_POSITION: Vec3 = Vec3::new(0.0, 0.0, 55.0);

/// All sphere bodies. The satellite is a model and lives in [`SATELLITE`].
pub const BODIES: [BodySpec; 10] = [
    BodySpec {
        kind: ObjectKind::Sun,
        radius: 12.0,
        position: Vec3::ZERO,
        texture: "imgs/sun.jpg",
        color: [0xFF, 0xD7, 0x00],
        label_color: [0xFF, 0xD7, 0x00],
        rotation_speed: 0.001,
        tilt: 0.0,
        emissive: true,
        rings: None,
        orbit: None,
        description: "Our star • Holds 99.8% of the solar system's mass",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Mercury),
        radius: 1.5,
        position: Vec3::new(35.0, 0.0, 0.0),
        texture: "imgs/mercury.jpg",
        color: [0x8C, 0x78, 0x53],
        label_color: [0x8C, 0x78, 0x53],
        rotation_speed: 0.004,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Smallest planet • Closest to Sun • No atmosphere • Extreme temperatures",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Venus),
        radius: 2.3,
        position: Vec3::new(-45.0, 10.0, 15.0),
        texture: "imgs/venus.jpg",
        color: [0xFF, 0xC6, 0x49],
        label_color: [0xFF, 0xC6, 0x49],
        rotation_speed: 0.003,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Hottest planet • Thick atmosphere • Retrograde rotation • Similar size to Earth",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Earth),
        radius: 2.5,
        position: EARTH_POSITION,
        texture: "imgs/earth.jpg",
        color: [0x6B, 0x93, 0xD6],
        label_color: [0x6B, 0x93, 0xD6],
        rotation_speed: 0.005,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Third planet • Only known planet with life • 71% water coverage",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Mars),
        radius: 2.0,
        position: Vec3::new(50.0, -15.0, -50.0),
        texture: "imgs/mars.jpg",
        color: [0xCD, 0x5C, 0x5C],
        label_color: [0xCD, 0x5C, 0x5C],
        rotation_speed: 0.005,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Red planet • Iron oxide surface • Two moons • Possible past water",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Jupiter),
        radius: 8.0,
        position: Vec3::new(-70.0, 20.0, -70.0),
        texture: "imgs/jupiter.jpg",
        color: [0xD8, 0xCA, 0x9D],
        label_color: [0xD8, 0xCA, 0x9D],
        rotation_speed: 0.008,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Largest planet • Gas giant • Great Red Spot storm • 79 known moons",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Saturn),
        radius: 7.0,
        position: Vec3::new(100.0, -10.0, 90.0),
        texture: "imgs/saturn.jpg",
        color: [0xFA, 0xD5, 0xA5],
        label_color: [0xFA, 0xD5, 0xA5],
        rotation_speed: 0.009,
        tilt: 0.0,
        emissive: false,
        rings: Some(Rings {
            inner_radius: 8.0,
            outer_radius: 10.0,
            texture: "imgs/saturn_rings.png",
            color: [0xC2, 0xB2, 0x80],
        }),
        orbit: None,
        description: "Gas giant • Famous rings • 83 known moons • Second largest planet",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Uranus),
        radius: 4.0,
        position: Vec3::new(-120.0, 25.0, 100.0),
        texture: "imgs/uranus.jpg",
        color: [0x4F, 0xD0, 0xE7],
        label_color: [0x4F, 0xD0, 0xE7],
        rotation_speed: 0.006,
        tilt: std::f32::consts::FRAC_PI_2,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Ice giant • Tilted on its side • Coldest atmosphere • 27 known moons",
    },
    BodySpec {
        kind: ObjectKind::Planet(Planet::Neptune),
        radius: 4.0,
        position: Vec3::new(140.0, -20.0, -140.0),
        texture: "imgs/neptune.jpg",
        color: [0x4B, 0x70, 0xDD],
        label_color: [0x4B, 0x70, 0xDD],
        rotation_speed: 0.007,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: None,
        description: "Farthest planet • Ice giant • Fastest winds • 14 known moons",
    },
    BodySpec {
        kind: ObjectKind::Moon,
        radius: 0.7,
        position: Vec3::new(EARTH_POSITION.x + 5.0, EARTH_POSITION.y, EARTH_POSITION.z),
        texture: "imgs/moon.jpg",
        color: [0xAA, 0xAA, 0xAA],
        label_color: [0xCC, 0xCC, 0xCC],
        rotation_speed: 0.002,
        tilt: 0.0,
        emissive: false,
        rings: None,
        orbit: Some(OrbitSpec {
            around: ObjectKind::Planet(Planet::Earth),
            radius: 5.0,
            speed: 0.001,
        }),
        description: "Earth's only natural satellite • Affects tides • No atmosphere",
    },
];

/// The Aqua satellite model
#[derive(Debug, Clone, Copy)]
pub struct SatelliteSpec {
    pub model: &'static str,
    pub scale: f32,
    /// Placed relative to Earth
    pub offset: Vec3,
    pub rotation_speed: f32,
    /// Primitive stand-in when the model fails to load
    pub fallback_radius: f32,
    pub fallback_color: [u8; 3],
    pub label_color: [u8; 3],
    pub description: &'static str,
}

pub const SATELLITE: SatelliteSpec = SatelliteSpec {
    model: "3Dmodels/nasa_aqua_eos_pm-1_satellite.glb",
    scale: 2.0,
    offset: Vec3::new(8.0, 3.0, 5.0),
    rotation_speed: 0.002,
    fallback_radius: 1.0,
    fallback_color: [0x00, 0xAA, 0xFF],
    label_color: [0x00, 0xAA, 0xFF],
    description: "Monitors Earth's water cycle • Launched 2002 • Studies ocean temperature",
};

/// Look up the sphere body of a kind
pub fn body(kind: ObjectKind) -> Option<&'static BodySpec> {
    BODIES.iter().find(|b| b.kind == kind)
}

/// Short blurb shown for a selected object
pub fn description(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Satellite => SATELLITE.description,
        other => body(other).map(|b| b.description).unwrap_or_default(),
    }
}

/// Where the satellite sits in world space
pub fn satellite_position() -> Vec3 {
    EARTH_POSITION + SATELLITE.offset
}

// =============================================================================
// Viewpoints
// =============================================================================

/// A named teleport destination; the camera always looks at the origin
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub name: &'static str,
    pub position: Vec3,
}

pub const VIEWPOINTS: [Viewpoint; 6] = [
    Viewpoint {
        name: "Solar System Overview",
        position: Vec3::new(0.0, 1.0, 150.0),
    },
    Viewpoint {
        name: "Near Earth",
        position: Vec3::new(0.0, 1.0, 60.0),
    },
    Viewpoint {
        name: "Near Sun",
        position: Vec3::new(0.0, 1.0, 20.0),
    },
    Viewpoint {
        name: "Jupiter View",
        position: Vec3::new(-70.0, 1.0, -70.0),
    },
    Viewpoint {
        name: "Saturn View",
        position: Vec3::new(100.0, 1.0, 90.0),
    },
    Viewpoint {
        name: "Mars View",
        position: Vec3::new(50.0, 1.0, -50.0),
    },
];

// =============================================================================
// Earth views
// =============================================================================

/// Alternative surfaces for Earth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EarthView {
    #[default]
    Standard,
    Temperature,
    Anomaly,
    DayNight,
}

impl EarthView {
    pub fn texture(self) -> &'static str {
        match self {
            EarthView::Standard => "imgs/earth.jpg",
            EarthView::Temperature => "imgs/ocean_temp_map.jpg",
            EarthView::Anomaly => "imgs/ocean_temp_anomaly.jpg",
            EarthView::DayNight => "imgs/earth_day_night.jpg",
        }
    }

    pub fn fallback_color(self) -> [u8; 3] {
        match self {
            EarthView::Temperature => [0x41, 0x69, 0xE1],
            EarthView::Anomaly => [0xFF, 0x63, 0x47],
            EarthView::Standard | EarthView::DayNight => [0x6B, 0x93, 0xD6],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EarthView::Standard => "Standard Earth visualization",
            EarthView::Temperature => {
                "Sea Surface Temperature (SST) showing absolute ocean temperatures"
            }
            EarthView::Anomaly => {
                "Temperature anomalies showing deviations from historical averages"
            }
            EarthView::DayNight => {
                "Day/night visualization of Earth with city lights visible on night side"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_body_or_is_the_satellite() {
        for planet in Planet::ALL {
            assert!(body(ObjectKind::Planet(planet)).is_some(), "{planet:?}");
        }
        assert!(body(ObjectKind::Sun).is_some());
        assert!(body(ObjectKind::Moon).is_some());
        assert!(body(ObjectKind::Satellite).is_none());
    }

    #[test]
    fn fallback_sizes_are_diameters() {
        assert_eq!(ObjectKind::Sun.fallback_size(), 24.0);
        assert_eq!(ObjectKind::Planet(Planet::Jupiter).fallback_size(), 16.0);
        assert_eq!(ObjectKind::Satellite.fallback_size(), 4.0);
    }

    #[test]
    fn moon_starts_on_its_orbit() {
        let moon = body(ObjectKind::Moon).unwrap();
        let orbit = moon.orbit.unwrap();
        let earth = body(orbit.around).unwrap();
        assert!((moon.position.distance(earth.position) - orbit.radius).abs() < 1e-5);
    }

    #[test]
    fn names_and_labels() {
        assert_eq!(ObjectKind::Planet(Planet::Earth).to_string(), "Earth");
        assert_eq!(ObjectKind::Satellite.name(), "AquaSat");
        assert_eq!(ObjectKind::Satellite.label(), "Aqua Satellite");
    }

    #[test]
    fn earth_view_wire_names() {
        let view: EarthView = serde_json::from_str("\"day-night\"").unwrap();
        assert_eq!(view, EarthView::DayNight);
    }
}
