use nalgebra_glm::Vec3;

use super::{Ray, AABB};

/// A plane given by its unit normal n and offset d, i.e., all points p with n.p + d = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub d: f32,
    pub n: Vec3,
}

impl Plane {
    /// Creates the plane spanned by the given triangle. The normal follows the winding order of
    /// the vertices. Returns `None` for a collapsed triangle.
    ///
    /// # Argument
    /// * `p0` - The first vertex of the triangle.
    /// * `p1` - The second vertex of the triangle.
    /// * `p2` - The third vertex of the triangle.
    pub fn from_triangle(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> Option<Self> {
        let n = (p1 - p0).cross(&(p2 - p0));
        let l = n.norm();
        if l <= 0f32 || !l.is_finite() {
            return None;
        }

        let n = n / l;
        Some(Self { d: -n.dot(p0), n })
    }

    /// Returns the signed distance between the plane and the point.
    #[inline]
    pub fn signed_distance(&self, p: &Vec3) -> f32 {
        self.n.dot(p) + self.d
    }
}

/// A hit of a ray with a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// The ray parameter of the hit, i.e., ray.origin + t * ray.direction is the hit point.
    pub t: f32,

    /// The unit normal of the triangle following its winding order.
    pub normal: Vec3,
}

/// Determines the intersection between the given triangle and ray. Both sides of the triangle
/// are hit.
///
/// # Arguments
/// * `p0` - The first vertex of the triangle.
/// * `p1` - The second vertex of the triangle.
/// * `p2` - The third vertex of the triangle.
/// * `ray` - The ray to compute the intersection with.
/// * `max_t` - Optionally, the maximum ray parameter. Hits further away are discarded.
pub fn triangle_ray(
    p0: &Vec3,
    p1: &Vec3,
    p2: &Vec3,
    ray: &Ray,
    max_t: Option<f32>,
) -> Option<TriangleHit> {
    let plane = Plane::from_triangle(p0, p1, p2)?;
    let t = plane_ray(&plane, ray)?;

    if max_t.is_some_and(|max_t| t > max_t) {
        return None;
    }

    // check if the intersection point is inside the triangle
    // see: https://www.scratchapixel.com/lessons/3d-basic-rendering/ray-tracing-rendering-a-triangle/ray-triangle-intersection-geometric-solution.html
    let pos: Vec3 = ray.at(t);
    let inside = [(p0, p1), (p1, p2), (p2, p0)]
        .iter()
        .all(|(a, b)| plane.n.dot(&(*b - *a).cross(&(pos - *a))) >= 0f32);

    if inside {
        Some(TriangleHit {
            t,
            normal: plane.n,
        })
    } else {
        None
    }
}

/// Determines the ray parameter at which the ray crosses the plane. Rays running parallel to the
/// plane or crossing it behind their origin return `None`.
///
/// # Arguments
/// * `plane` - The plane to compute the intersection with.
/// * `ray` - The ray to compute the intersection with.
pub fn plane_ray(plane: &Plane, ray: &Ray) -> Option<f32> {
    let a = plane.n.dot(&ray.direction);
    if a == 0f32 {
        return None;
    }

    let t = -plane.signed_distance(&ray.origin) / a;
    if t < 0f32 {
        None
    } else {
        Some(t)
    }
}

/// Determines the ray parameter where the ray enters the given box, zero if the origin is inside.
///
/// # Arguments
/// * `aabb` - The AABB to compute the intersection with.
/// * `ray` - The ray to compute the intersection with.
/// * `max_t` - Optionally, the maximum ray parameter.
pub fn aabb_ray(aabb: &AABB, ray: &Ray, max_t: Option<f32>) -> Option<f32> {
    let mut t_min = 0f32;
    let mut t_max = max_t.unwrap_or(f32::MAX);

    for axis in 0..3 {
        // a ray running parallel to the slab only hits if it starts inside of it
        if ray.direction[axis] == 0f32 {
            if ray.origin[axis] < aabb.min[axis] || ray.origin[axis] > aabb.max[axis] {
                return None;
            }

            continue;
        }

        let t0 = (aabb.min[axis] - ray.origin[axis]) / ray.direction[axis];
        let t1 = (aabb.max[axis] - ray.origin[axis]) / ray.direction[axis];

        t_min = t_min.max(t0.min(t1));
        t_max = t_max.min(t0.max(t1));

        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

#[cfg(test)]
mod test {
    use std::ops::Range;

    use super::*;

    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    /// Tessellates the AABB into 12 triangles and tests the ray against each of them.
    fn aabb_intersection_test_using_triangles(aabb: &AABB, ray: &Ray) -> Option<f32> {
        if aabb.contains_point(&ray.origin) {
            return Some(0f32);
        }

        let mut depth: Option<f32> = None;

        for axis in 0..3 {
            for value in [aabb.min[axis], aabb.max[axis]] {
                let axis0 = (axis + 1) % 3;
                let axis1 = (axis + 2) % 3;

                let mut quad = [Vec3::zeros(); 4];
                for (i, p) in quad.iter_mut().enumerate() {
                    p[axis] = value;
                    p[axis0] = if i == 1 || i == 2 {
                        aabb.max[axis0]
                    } else {
                        aabb.min[axis0]
                    };
                    p[axis1] = if i >= 2 {
                        aabb.max[axis1]
                    } else {
                        aabb.min[axis1]
                    };
                }

                for (a, b, c) in [(0, 1, 2), (0, 2, 3)] {
                    if let Some(hit) = triangle_ray(&quad[a], &quad[b], &quad[c], ray, depth) {
                        depth = Some(depth.map_or(hit.t, |d| d.min(hit.t)));
                    }
                }
            }
        }

        depth
    }

    fn gen_random_aabb(rng: &mut ChaCha8Rng, r: Range<f32>, n: usize) -> AABB {
        AABB::from_iter((0..n).map(|_| {
            Vec3::new(
                rng.random_range(r.clone()),
                rng.random_range(r.clone()),
                rng.random_range(r.clone()),
            )
        }))
    }

    #[test]
    fn test_triangle_ray() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(1.0, 0.0, 0.0);
        let p2 = Vec3::new(0.0, 1.0, 0.0);

        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = triangle_ray(&p0, &p1, &p2, &ray, None).unwrap();
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.normal, Vec3::new(0.0, 0.0, 1.0));

        // back side is hit as well
        let hit = triangle_ray(&p0, &p2, &p1, &ray, None).unwrap();
        assert_eq!(hit.t, 2.0);
        assert_eq!(hit.normal, Vec3::new(0.0, 0.0, -1.0));

        assert!(triangle_ray(&p0, &p1, &p2, &ray, Some(1.0)).is_none());

        // outside
        let ray = Ray::new(Vec3::new(0.75, 0.75, 2.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle_ray(&p0, &p1, &p2, &ray, None).is_none());

        // collapsed
        assert!(triangle_ray(&p0, &p1, &p1, &ray, None).is_none());
    }

    #[test]
    fn test_aabb_ray() {
        let mut r = ChaCha8Rng::seed_from_u64(2);

        let float_min = -10.0;
        let float_max = 10.0;

        for _ in 0..1000 {
            let aabb = gen_random_aabb(&mut r, float_min..float_max, 10);

            for _ in 0..10 {
                let mut random_pos = || {
                    Vec3::new(
                        r.random_range((float_min * 2f32)..(float_max * 2f32)),
                        r.random_range((float_min * 2f32)..(float_max * 2f32)),
                        r.random_range((float_min * 2f32)..(float_max * 2f32)),
                    )
                };
                let ray = Ray::from_pos(&random_pos(), &random_pos());

                let f1 = aabb_ray(&aabb, &ray, None);
                let f2 = aabb_intersection_test_using_triangles(&aabb, &ray);

                match (f1, f2) {
                    (Some(a), Some(b)) => assert!(
                        (a - b).abs() < 1e-3,
                        "AABB {}, Ray {:?}: {} vs {}",
                        aabb,
                        ray,
                        a,
                        b
                    ),
                    (a, b) => assert_eq!(a, b, "AABB {}, Ray {:?}", aabb, ray),
                }
            }
        }
    }
}
