//! Engine-independent tour logic
//!
//! Everything here is plain data and math over `bevy::math` types, so it can
//! be exercised without a renderer. The systems in `crate::bevy` feed it
//! entities and apply its decisions to the scene.

pub mod camera_session;
pub mod catalog;
pub mod hover;
pub mod interaction;
pub mod labels;
pub mod picking;
pub mod surface;

pub use camera_session::{CameraMode, CameraPose, CameraSession, OrbitBounds, TransitionError};
pub use catalog::{EarthView, ObjectKind, Planet};
pub use interaction::{ClickOutcome, ClickTarget, InteractionContext};
