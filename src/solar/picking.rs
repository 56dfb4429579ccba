//! Ray picking against the object registry
//!
//! Pointer position → normalized device coordinates → world ray → closest hit
//! among bounding spheres. Scene hierarchy lookups are expressed over plain
//! closures so they work on ECS entities and on test fixtures alike.

use bevy::math::{Vec2, Vec3};

use crate::solar::catalog::ObjectKind;

/// Pointer position in render-target pixels to NDC (`x` right, `y` up, both in `[-1, 1]`)
pub fn pointer_to_ndc(pointer: Vec2, size: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (pointer.x / size.x) * 2.0 - 1.0,
        -(pointer.y / size.y) * 2.0 + 1.0,
    )
}

/// A world-space ray with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PickRay {
    /// Ray through two points; `None` if they coincide
    pub fn through(near: Vec3, far: Vec3) -> Option<Self> {
        let direction = (far - near).try_normalize()?;
        Some(Self {
            origin: near,
            direction,
        })
    }

    /// Distance along the ray to the first intersection with a sphere,
    /// or `None` if the sphere is missed or entirely behind the origin
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        // Origin inside the sphere
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

/// Object size from measured bounds, falling back to the per-kind table when
/// the bounds are degenerate or not finite (e.g. a model still loading)
pub fn object_size(kind: ObjectKind, measured_extent: Option<Vec3>) -> f32 {
    measured_extent
        .filter(|extent| extent.is_finite())
        .map(|extent| extent.max_element())
        .filter(|size| *size > f32::EPSILON)
        .unwrap_or_else(|| kind.fallback_size())
}

/// Smallest box enclosing every `(min, max)` pair; `None` when there are none
pub fn merge_bounds(bounds: impl IntoIterator<Item = (Vec3, Vec3)>) -> Option<(Vec3, Vec3)> {
    bounds
        .into_iter()
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
}

/// One pickable sphere, tied to the mesh it was built from
#[derive(Debug, Clone, Copy)]
pub struct PickTarget<K> {
    pub mesh: K,
    pub center: Vec3,
    pub radius: f32,
}

/// Closest hit along the ray, as `(mesh, distance)`
pub fn closest_hit<K: Copy>(
    ray: &PickRay,
    targets: impl IntoIterator<Item = PickTarget<K>>,
) -> Option<(K, f32)> {
    targets
        .into_iter()
        .filter_map(|t| ray.intersect_sphere(t.center, t.radius).map(|d| (t.mesh, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Walk up from `node` until a registered node is found (the node itself counts)
pub fn registered_ancestor<K: Copy>(
    node: K,
    parent_of: impl Fn(K) -> Option<K>,
    is_registered: impl Fn(K) -> bool,
) -> Option<K> {
    let mut current = Some(node);
    while let Some(candidate) = current {
        if is_registered(candidate) {
            return Some(candidate);
        }
        current = parent_of(candidate);
    }
    None
}

/// Depth-first, pre-order search for the first node matching `is_mesh`
pub fn first_mesh<K: Copy>(
    root: K,
    children_of: impl Fn(K) -> Vec<K>,
    is_mesh: impl Fn(K) -> bool,
) -> Option<K> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if is_mesh(node) {
            return Some(node);
        }
        // Reverse so the first child is visited first
        stack.extend(children_of(node).into_iter().rev());
    }
    None
}
