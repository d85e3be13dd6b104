use nalgebra_glm::{Mat4, Vec3};

use super::{clamp, normalize_or_zero, transform_vec3, Sphere};

/// Determinants below this value treat the ray and a segment as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A single ray that starts at origin and goes into infinity along direction.
///
/// The direction is expected to be normalized by the caller, all distances reported by the ray
/// are measured in multiples of the direction's length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The start position of the ray
    pub origin: Vec3,

    /// The direction of the ray.
    pub direction: Vec3,
}

/// The closest approach between a ray and a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentApproach {
    /// The squared distance between the two closest points.
    pub distance_sq: f32,

    /// The closest point on the ray.
    pub point_on_ray: Vec3,

    /// The closest point on the segment.
    pub point_on_segment: Vec3,
}

impl Ray {
    /// Creates a new ray. The direction is taken as is.
    ///
    /// # Arguments
    /// * `origin` - The start position of the ray.
    /// * `direction` - The (unit-length) direction of the ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Creates a new ray spanned by the two positions x0 and x1.
    ///
    /// # Arguments
    /// * `x0` - The start position of the ray
    /// * `x1` - The next position along the line of the ray.
    pub fn from_pos(x0: &Vec3, x1: &Vec3) -> Self {
        Self {
            direction: normalize_or_zero(&(x1 - x0)),
            origin: *x0,
        }
    }

    /// Returns the point origin + t * direction.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns the ray parameter of the orthogonal projection of the point onto the line of the
    /// ray. Negative values are behind the origin.
    #[inline]
    pub fn project(&self, p: &Vec3) -> f32 {
        (p - self.origin).dot(&self.direction)
    }

    /// Returns the point on the ray (t >= 0) that is closest to the given point.
    pub fn closest_point_to_point(&self, p: &Vec3) -> Vec3 {
        let t = self.project(p);
        if t < 0f32 {
            self.origin
        } else {
            self.at(t)
        }
    }

    /// Returns the minimal distance between the infinite line through the origin along the
    /// direction and the given point.
    ///
    /// # Arguments
    /// * `p` - The point to compute the distance to.
    pub fn distance_to_point(&self, p: &Vec3) -> f32 {
        let t = self.project(p);
        (self.at(t) - p).norm()
    }

    /// Returns the squared distance between the ray (t >= 0) and the given point.
    pub fn distance_sq_to_point(&self, p: &Vec3) -> f32 {
        (self.closest_point_to_point(p) - p).norm_squared()
    }

    /// Computes the closest approach between the ray and the segment [v0, v1] and returns the
    /// squared distance together with both closest points.
    ///
    /// A parallel segment falls back to the segment endpoint facing the ray and a collapsed
    /// segment is treated as a single point, so the computation never divides by zero.
    ///
    /// # Arguments
    /// * `v0` - The start of the segment.
    /// * `v1` - The end of the segment.
    pub fn distance_sq_to_segment(&self, v0: &Vec3, v1: &Vec3) -> SegmentApproach {
        let seg_center: Vec3 = (v0 + v1) * 0.5;
        let seg_vector: Vec3 = v1 - v0;
        let seg_extent = seg_vector.norm() * 0.5;

        if seg_extent <= 0f32 {
            let point_on_ray = self.closest_point_to_point(&seg_center);
            return SegmentApproach {
                distance_sq: (point_on_ray - seg_center).norm_squared(),
                point_on_ray,
                point_on_segment: seg_center,
            };
        }

        // see: Eberly, "Distance between a ray and a segment", Geometric Tools
        let seg_dir: Vec3 = seg_vector / (seg_extent * 2f32);
        let diff: Vec3 = self.origin - seg_center;
        let a01 = -self.direction.dot(&seg_dir);
        let b0 = diff.dot(&self.direction);
        let b1 = -diff.dot(&seg_dir);
        let c = diff.norm_squared();
        let det = (1f32 - a01 * a01).abs();

        let (s0, s1, distance_sq) = if det > PARALLEL_EPSILON {
            let mut s0 = a01 * b1 - b0;
            let mut s1 = a01 * b0 - b1;
            let ext_det = seg_extent * det;

            if s0 >= 0f32 {
                if s1 >= -ext_det {
                    if s1 <= ext_det {
                        // both closest points are interior
                        let inv_det = 1f32 / det;
                        s0 *= inv_det;
                        s1 *= inv_det;
                        let d = s0 * (s0 + a01 * s1 + 2f32 * b0)
                            + s1 * (a01 * s0 + s1 + 2f32 * b1)
                            + c;
                        (s0, s1, d)
                    } else {
                        Self::clamped_to_endpoint(seg_extent, a01, b0, b1, c)
                    }
                } else {
                    Self::clamped_to_endpoint(-seg_extent, a01, b0, b1, c)
                }
            } else if s1 <= -ext_det {
                let s0 = (-(-a01 * seg_extent + b0)).max(0f32);
                let s1 = if s0 > 0f32 {
                    -seg_extent
                } else {
                    clamp_extent(-b1, seg_extent)
                };
                (s0, s1, -s0 * s0 + s1 * (s1 + 2f32 * b1) + c)
            } else if s1 <= ext_det {
                let s1 = clamp_extent(-b1, seg_extent);
                (0f32, s1, s1 * (s1 + 2f32 * b1) + c)
            } else {
                let s0 = (-(a01 * seg_extent + b0)).max(0f32);
                let s1 = if s0 > 0f32 {
                    seg_extent
                } else {
                    clamp_extent(-b1, seg_extent)
                };
                (s0, s1, -s0 * s0 + s1 * (s1 + 2f32 * b1) + c)
            }
        } else {
            // parallel, take the endpoint pointing against the ray direction
            let s1 = if a01 > 0f32 { -seg_extent } else { seg_extent };
            Self::clamped_to_endpoint(s1, a01, b0, b1, c)
        };

        SegmentApproach {
            distance_sq: distance_sq.max(0f32),
            point_on_ray: self.at(s0),
            point_on_segment: seg_center + seg_dir * s1,
        }
    }

    /// Closest approach with the segment parameter fixed to the given endpoint parameter.
    #[inline]
    fn clamped_to_endpoint(s1: f32, a01: f32, b0: f32, b1: f32, c: f32) -> (f32, f32, f32) {
        let s0 = (-(a01 * s1 + b0)).max(0f32);
        (s0, s1, -s0 * s0 + s1 * (s1 + 2f32 * b1) + c)
    }

    /// Returns true if the ray hits the given sphere, i.e., the line of the ray passes the
    /// center within the radius in front of the origin, or the origin lies inside the sphere.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let t = self.project(&sphere.center);
        if t < 0f32 {
            (sphere.center - self.origin).norm() <= sphere.radius
        } else {
            self.distance_to_point(&sphere.center) <= sphere.radius
        }
    }

    /// Returns the ray transformed by the given matrix. The transformed direction is normalized
    /// unless it collapsed to zero.
    ///
    /// # Arguments
    /// * `m` - The homogenous transformation matrix.
    pub fn apply_matrix(&self, m: &Mat4) -> Self {
        let origin = transform_vec3(m, &self.origin);
        let target = transform_vec3(m, &(self.origin + self.direction));

        Self {
            origin,
            direction: normalize_or_zero(&(target - origin)),
        }
    }
}

#[inline]
fn clamp_extent(x: f32, extent: f32) -> f32 {
    clamp(x, -extent, extent)
}
