mod aabb;
mod intersection;
mod ray;
mod sphere;

pub use aabb::*;
pub use intersection::*;
pub use ray::*;
pub use sphere::*;

use nalgebra_glm::{vec4_to_vec3, Mat4, Vec3, Vec4};

/// Constraint a value to lie between two further values
///
/// # Arguments
/// * `x` - The value to constraint.
/// * `min_value` - The lower bound for the value constraint.
/// * `max_value` - The upper bound for the value constraint.
#[inline]
pub fn clamp<T>(x: T, min_value: T, max_value: T) -> T
where
    T: PartialOrd,
{
    if x < min_value {
        min_value
    } else if x > max_value {
        max_value
    } else {
        x
    }
}

/// Transforms the given position with the given homogenous transformation matrix and returns the
/// transformed position.
///
/// # Arguments
/// * `t` - The 4x4 homogenous transformation matrix.
/// * `p` - The 3D position to transform.
#[inline]
pub fn transform_vec3(t: &Mat4, p: &Vec3) -> Vec3 {
    let p = t * Vec4::new(p[0], p[1], p[2], 1f32);

    if p[3] != 0f32 {
        vec4_to_vec3(&p) / p[3]
    } else {
        vec4_to_vec3(&p)
    }
}

/// Returns the translational part of the given transformation, i.e., the world position of
/// whatever the matrix places.
#[inline]
pub fn matrix_position(t: &Mat4) -> Vec3 {
    Vec3::new(t[(0, 3)], t[(1, 3)], t[(2, 3)])
}

/// Returns the length of the i-th basis column of the upper 3x3 part of the matrix, i.e., the
/// scale along the i-th local axis.
///
/// # Arguments
/// * `t` - The transformation matrix.
/// * `axis` - The local axis, 0, 1 or 2.
#[inline]
pub fn scale_on_axis(t: &Mat4, axis: usize) -> f32 {
    assert!(axis < 3);

    (t[(0, axis)] * t[(0, axis)] + t[(1, axis)] * t[(1, axis)] + t[(2, axis)] * t[(2, axis)])
        .sqrt()
}

/// Returns the largest scale along any of the three local axes of the given matrix.
#[inline]
pub fn max_scale_on_axis(t: &Mat4) -> f32 {
    scale_on_axis(t, 0)
        .max(scale_on_axis(t, 1))
        .max(scale_on_axis(t, 2))
}

/// Normalizes the given vector. A zero-length vector is returned unchanged instead of producing
/// NaN components.
#[inline]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let l = v.norm();
    if l > 0f32 {
        v / l
    } else {
        *v
    }
}
