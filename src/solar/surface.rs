//! Surface selection for textured bodies
//!
//! A body is spawned with its flat fallback color so it is visible from the
//! first frame. When the texture finishes loading it replaces the color; when
//! the load fails the flat color stays.

/// Where a texture load currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureLoad {
    Pending,
    Loaded,
    Failed,
}

/// What the material should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Flat color, no texture
    Flat([u8; 3]),
    /// Texture over a white base
    Textured,
}

/// Decide the surface for a body; `None` means keep waiting
pub fn resolve_surface(load: TextureLoad, fallback: [u8; 3]) -> Option<Surface> {
    match load {
        TextureLoad::Pending => None,
        TextureLoad::Loaded => Some(Surface::Textured),
        TextureLoad::Failed => Some(Surface::Flat(fallback)),
    }
}

/// Surface shown before any load settles
pub fn initial_surface(fallback: [u8; 3]) -> Surface {
    Surface::Flat(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: [u8; 3] = [0x6B, 0x93, 0xD6];

    #[test]
    fn pending_keeps_the_initial_flat_color() {
        assert_eq!(initial_surface(BLUE), Surface::Flat(BLUE));
        assert_eq!(resolve_surface(TextureLoad::Pending, BLUE), None);
    }

    #[test]
    fn failed_loads_never_leave_a_body_bare() {
        for load in [TextureLoad::Loaded, TextureLoad::Failed] {
            assert!(resolve_surface(load, BLUE).is_some());
        }
        assert_eq!(
            resolve_surface(TextureLoad::Failed, BLUE),
            Some(Surface::Flat(BLUE))
        );
    }
}
