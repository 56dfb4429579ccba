//! Configuration constants and settings for the solar tour
//!
//! This module contains all configurable parameters such as render resolution,
//! camera behaviour, transition timing, label layout and the chat endpoint.

/// Width of the offscreen render target in pixels
pub const RENDER_WIDTH: u32 = 1280;

/// Height of the offscreen render target in pixels
pub const RENDER_HEIGHT: u32 = 720;

/// Target frames per second for the Bevy render loop
pub const TARGET_FPS: f64 = 60.0;

/// Number of pre-roll frames to skip before starting output
/// This allows the scene to fully load and stabilize
pub const PRE_ROLL_FRAMES: u32 = 30;

/// Root directory for textures and models, relative to the working directory
pub const ASSET_ROOT: &str = "assets";

/// Camera control settings
pub mod camera {
    use bevy::math::Vec3;

    /// Rotation speed multiplier for mouse drag
    pub const ROTATION_SPEED: f32 = 0.005;

    /// Zoom speed multiplier for scroll wheel
    pub const ZOOM_SPEED: f32 = 2.0;

    /// Minimum camera distance in free orbit
    pub const MIN_DISTANCE: f32 = 0.1;

    /// Maximum camera distance in free orbit
    pub const MAX_DISTANCE: f32 = 200.0;

    /// Maximum pitch angle (radians) to prevent camera flipping
    pub const MAX_PITCH: f32 = 1.5;

    /// Minimum pitch angle (radians) to prevent camera flipping
    pub const MIN_PITCH: f32 = -1.5;

    /// Where the camera starts: the solar system overview
    pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 1.0, 150.0);

    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 75.0;

    /// Far clipping plane
    pub const FAR_PLANE: f32 = 1000.0;
}

/// Camera transition timing and zoom geometry
pub mod transition {
    /// Duration of a zoom in/out animation (seconds)
    pub const ZOOM_DURATION: f32 = 0.8;

    /// Duration of a teleport animation (seconds)
    pub const TELEPORT_DURATION: f32 = 1.0;

    /// Zoom distance is the object size times this factor...
    pub const ZOOM_SIZE_FACTOR: f32 = 2.5;

    /// ...but never closer than this
    pub const MIN_ZOOM_DISTANCE: f32 = 10.0;

    /// Tightened orbit bounds while zoomed, as fractions of the zoom distance
    pub const ZOOMED_MIN_FACTOR: f32 = 0.3;
    pub const ZOOMED_MAX_FACTOR: f32 = 3.0;
}

/// Hover highlight appearance
pub mod hover {
    /// Emissive tint applied to a hovered mesh (sRGB bytes)
    pub const EMISSIVE_RGB: (u8, u8, u8) = (0x44, 0x44, 0x44);

    /// Multiplier on the emissive tint
    pub const EMISSIVE_INTENSITY: f32 = 0.5;

    /// Scale bump on hover
    pub const SCALE_FACTOR: f32 = 1.05;
}

/// Label layout by camera distance
pub mod labels {
    pub const MIN_OFFSET: f32 = 3.0;
    pub const OFFSET_PER_DISTANCE: f32 = 0.1;

    pub const MIN_SCALE: f32 = 8.0;
    pub const SCALE_PER_DISTANCE: f32 = 0.08;

    /// Label height as a fraction of its width
    pub const ASPECT: f32 = 0.25;

    /// Labels closer than this are hidden
    pub const HIDE_DISTANCE: f32 = 5.0;

    /// Opacity fades linearly between these distances
    pub const FADE_NEAR: f32 = 15.0;
    pub const FADE_FAR: f32 = 100.0;

    /// Opacity floor inside the fade band
    pub const MIN_OPACITY: f32 = 0.3;

    /// Plate opacity at full label opacity
    pub const PLATE_ALPHA: f32 = 0.85;
}

/// Animation tick conversion
pub mod animation {
    /// Per-tick speeds in the body table assume this tick rate
    pub const REFERENCE_TICK_RATE: f32 = 60.0;
}

/// Remote chat completion settings
pub mod chat {
    /// Environment variable holding the completion endpoint URL
    pub const ENDPOINT_ENV: &str = "SOLAR_TOUR_CHAT_ENDPOINT";

    /// Environment variable holding the API key
    pub const API_KEY_ENV: &str = "SOLAR_TOUR_CHAT_API_KEY";

    pub const MAX_TOKENS: u32 = 800;
    pub const TEMPERATURE: f32 = 1.0;
    pub const TOP_P: f32 = 1.0;
    pub const FREQUENCY_PENALTY: f32 = 0.0;
    pub const PRESENCE_PENALTY: f32 = 0.0;

    /// HTTP client timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    pub const SYSTEM_PROMPT: &str = "\
1. You are a space explorer on a mission to gather information about the solar system and the satellite Aqua.
2. Ask the user insightful questions about celestial bodies, the solar system and Aqua, including the environment, scientific phenomena and discoveries related to Aqua.
3. Always include at least one element of curiosity or exploration, such as the nature of distant planets, the technology used for space exploration or the mysteries surrounding Aqua.
4. Keep responses scientifically accurate and grounded in space exploration and satellite data collection.
5. Engage the user in further discussion about space, the solar system and Aqua's role in Earth's climate and ocean monitoring.
6. If no valid continuation or question is possible, respond with: \"I'm currently analyzing more data; let's return to the wonders of space exploration soon.\"
7. Always cite the NASA web page the information was gathered from.";
}

/// Performance monitoring settings
pub mod performance {
    /// Interval for printing performance stats (seconds)
    pub const STATS_PRINT_INTERVAL: f64 = 2.0;

    /// Number of frame timing samples to keep for averaging
    pub const FRAME_TIMING_SAMPLES: usize = 60;
}

/// Image compression settings
pub mod compression {
    /// JPEG quality level (0-100, higher = better quality but larger size)
    pub const JPEG_QUALITY: u8 = 85;
}
