//! Bevy systems
//!
//! This module contains all the systems that operate on entities
//! and resources in the Bevy ECS.

pub mod animation;
pub mod camera;
pub mod frame_extraction;
pub mod labels;
pub mod picking;
pub mod scene;
pub mod session;
pub mod surfaces;

pub use animation::{advance_orbits, rotate_bodies};
pub use camera::{
    apply_camera_transform, drive_camera_transition, read_pointer_input, update_camera_from_input,
};
pub use frame_extraction::extract_and_process_frame;
pub use labels::update_labels;
pub use picking::handle_pointer;
pub use scene::setup_scene;
pub use session::{process_tour_commands, publish_session};
pub use surfaces::{
    apply_earth_view, resolve_pending_models, resolve_pending_textures, EarthViewRequest,
};
