//! Bevy side of the tour
//!
//! Scene entities, the resources that connect them to the shared state,
//! the GPU readback plugin and the per-frame systems. Everything runs on the
//! thread spawned by [`start_bevy`].

pub mod app;
pub mod components;
pub mod plugins;
pub mod resources;
pub mod systems;

pub use app::start_bevy;
