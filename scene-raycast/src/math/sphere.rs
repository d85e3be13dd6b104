use nalgebra_glm::{Mat4, Vec3};

use super::{max_scale_on_axis, transform_vec3, AABB};

/// A bounding sphere used for coarse rejection tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Computes a bounding sphere for the given positions. The center is the center of the
    /// bounding box of the positions and the radius the largest distance to any position.
    /// An empty set of positions results in a sphere of radius zero at the origin.
    ///
    /// # Arguments
    /// * `positions` - The positions to enclose.
    pub fn from_points(positions: &[Vec3]) -> Self {
        if positions.is_empty() {
            return Self::default();
        }

        let center = AABB::from_iter(positions.iter().copied()).get_center();
        let radius = positions
            .iter()
            .map(|p| (p - center).norm_squared())
            .fold(0f32, f32::max)
            .sqrt();

        Self { center, radius }
    }

    /// Returns a copy of the sphere transformed by the given matrix. The radius grows with the
    /// largest axis scale, so the result still encloses the transformed content.
    ///
    /// # Arguments
    /// * `m` - The homogenous transformation matrix.
    pub fn apply_matrix(&self, m: &Mat4) -> Self {
        Self {
            center: transform_vec3(m, &self.center),
            radius: self.radius * max_scale_on_axis(m),
        }
    }

    /// Returns true if the given point lies inside or on the sphere.
    #[inline]
    pub fn contains_point(&self, p: &Vec3) -> bool {
        (p - self.center).norm_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod test {
    use nalgebra_glm::{scale, translate};

    use super::*;

    #[test]
    fn test_from_points() {
        let sphere = Sphere::from_points(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ]);

        assert_eq!(sphere.center, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(sphere.radius, 1.0);

        assert_eq!(Sphere::from_points(&[]), Sphere::default());
    }

    #[test]
    fn test_apply_matrix() {
        let source = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let m = scale(
            &translate(&Mat4::identity(), &Vec3::new(0.0, 0.0, -3.0)),
            &Vec3::new(1.0, 4.0, 2.0),
        );

        let sphere = source.apply_matrix(&m);
        assert_eq!(sphere.center, Vec3::new(1.0, 0.0, -3.0));
        assert_eq!(sphere.radius, 4.0);

        // the source is left untouched
        assert_eq!(source.radius, 1.0);
        assert!(sphere.contains_point(&Vec3::new(1.0, 4.0, -3.0)));
        assert!(!sphere.contains_point(&Vec3::new(1.0, 4.1, -3.0)));
    }
}
