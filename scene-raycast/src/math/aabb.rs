use std::fmt;
use std::fmt::Display;

use nalgebra_glm as glm;

/// An axis aligned bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct AABB {
    /// the corner with the lower coordinates
    pub min: glm::Vec3,
    /// the corner with the upper coordinates
    pub max: glm::Vec3,
}

impl AABB {
    /// Creates a new empty bounding volume
    pub fn new() -> Self {
        let min = glm::vec3(f32::MAX, f32::MAX, f32::MAX);
        let max = glm::vec3(f32::MIN, f32::MIN, f32::MIN);

        AABB { min, max }
    }

    /// Creates a new bounding volume enclosing the given positions.
    ///
    /// # Arguments
    /// * `positions` - The iterator of vec3 positions to enclose.
    pub fn from_iter<I>(positions: I) -> Self
    where
        I: Iterator<Item = glm::Vec3>,
    {
        let mut result = AABB::new();
        positions.for_each(|p| result.extend_pos(&p));

        result
    }

    /// Returns true if the box encloses nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extends the bounding volume with the given position
    ///
    ///* `p` - The position about which the volume is extended
    pub fn extend_pos(&mut self, p: &glm::Vec3) {
        self.min = glm::min2(&self.min, p);
        self.max = glm::max2(&self.max, p);
    }

    /// Computes and returns the bounding box center
    #[inline]
    pub fn get_center(&self) -> glm::Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn contains_point(&self, p: &glm::Vec3) -> bool {
        (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
    }
}

impl Default for AABB {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AABB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})-({}, {}, {})",
            self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_iter() {
        let aabb = AABB::from_iter(
            [
                glm::vec3(0.0, -1.0, 2.0),
                glm::vec3(1.0, 1.0, 1.0),
                glm::vec3(-3.0, 0.0, 0.0),
            ]
            .into_iter(),
        );

        assert_eq!(aabb.min, glm::vec3(-3.0, -1.0, 0.0));
        assert_eq!(aabb.max, glm::vec3(1.0, 1.0, 2.0));
        assert_eq!(aabb.get_center(), glm::vec3(-1.0, 0.0, 1.0));
        assert!(aabb.contains_point(&glm::vec3(0.0, 0.0, 1.0)));
        assert!(!aabb.contains_point(&glm::vec3(0.0, 0.0, 3.0)));
        assert_eq!(format!("{}", aabb), "(-3, -1, 0)-(1, 1, 2)");
    }

    #[test]
    fn test_empty() {
        assert!(AABB::new().is_empty());
        assert!(AABB::from_iter(std::iter::empty()).is_empty());
        assert!(!AABB::from_iter(std::iter::once(glm::Vec3::zeros())).is_empty());
    }
}
