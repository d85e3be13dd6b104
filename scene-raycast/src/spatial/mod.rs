//! Bounding volumes for fast rejection of ray queries.
//!
//! Every raycastable geometry first tests the ray against a cheap bounding volume before running
//! the exact per-primitive tests.

use crate::math::{aabb_ray, Ray, Sphere, AABB};

/// A trait to enable intersection tests with rays.
pub trait RayIntersectionTest {
    /// Tests the intersection of the ray with the object.
    /// Returns the ray parameter of the entry point if the ray intersects with the object, zero
    /// if the ray starts inside, otherwise None.
    ///
    /// # Arguments
    /// * `ray` - The ray to test the intersection with.
    /// * `max_depth` - Optionally, a value can be provided to limit the intersection. Entry
    ///                 points further away than the value are treated as misses.
    fn intersects_ray(&self, ray: &Ray, max_depth: Option<f32>) -> Option<f32>;
}

impl RayIntersectionTest for AABB {
    #[inline]
    fn intersects_ray(&self, ray: &Ray, max_depth: Option<f32>) -> Option<f32> {
        if self.is_empty() {
            return None;
        }

        aabb_ray(self, ray, max_depth)
    }
}

impl RayIntersectionTest for Sphere {
    fn intersects_ray(&self, ray: &Ray, max_depth: Option<f32>) -> Option<f32> {
        if !ray.intersects_sphere(self) {
            return None;
        }

        let t = if self.contains_point(&ray.origin) {
            0f32
        } else {
            let tc = ray.project(&self.center);
            let d = ray.distance_to_point(&self.center);
            let half_chord = (self.radius * self.radius - d * d).max(0f32).sqrt();
            (tc - half_chord).max(0f32)
        };

        match max_depth {
            Some(max_depth) if t > max_depth => None,
            _ => Some(t),
        }
    }
}
