use log::warn;
use nalgebra_glm::{distance, Vec3};
use serde::{Deserialize, Serialize};

use super::{local_ray, Geometry};
use crate::{
    math::{max_scale_on_axis, transform_vec3},
    Intersection, Intersections, Node, Raycast, RaycastContext,
};

/// Defines how the vertices of a line are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    /// Each vertex is connected with its successor.
    #[default]
    Strip,

    /// Each pair of vertices forms a separate segment.
    Pieces,
}

impl LineMode {
    /// Returns the number of vertices to advance from one segment to the next.
    #[inline]
    pub fn step(self) -> usize {
        match self {
            LineMode::Strip => 1,
            LineMode::Pieces => 2,
        }
    }
}

/// A polyline made up of straight segments.
#[derive(Debug, Clone, Default)]
pub struct Line {
    geometry: Geometry,
    indices: Option<Vec<u32>>,
    mode: LineMode,
}

impl Line {
    /// Creates a new line connecting the vertices in their given order.
    pub fn new(vertices: Vec<Vec3>, mode: LineMode) -> Self {
        Self {
            geometry: Geometry::new(vertices),
            indices: None,
            mode,
        }
    }

    /// Creates a new line connecting the vertices in the order of the given indices.
    pub fn with_indices(vertices: Vec<Vec3>, indices: Vec<u32>, mode: LineMode) -> Self {
        Self {
            geometry: Geometry::new(vertices),
            indices: Some(indices),
            mode,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn mode(&self) -> LineMode {
        self.mode
    }

    /// Returns the i-th position of the line, resolving the index buffer if there is one.
    fn position(&self, i: usize) -> Option<&Vec3> {
        match &self.indices {
            Some(indices) => indices
                .get(i)
                .and_then(|index| self.geometry.vertices().get(*index as usize)),
            None => self.geometry.vertices().get(i),
        }
    }

    fn num_positions(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.geometry.vertices().len(),
        }
    }

    /// Returns the segments of the line as the index of their first position and both end
    /// points. Segments referencing missing vertices are skipped.
    pub fn segments(&self) -> impl Iterator<Item = (usize, Vec3, Vec3)> + '_ {
        (0..self.num_positions().saturating_sub(1))
            .step_by(self.mode.step())
            .filter_map(|i| match (self.position(i), self.position(i + 1)) {
                (Some(v0), Some(v1)) => Some((i, *v0, *v1)),
                _ => {
                    warn!("Line segment {} references a missing vertex", i);
                    None
                }
            })
    }
}

impl Raycast for Line {
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        let raycaster = ctx.raycaster;
        let world = node.transform().world();

        // the precision applies in the local space of the line
        let precision = raycaster.params.line.precision;
        let precision_sq = precision * precision;
        let margin = precision * max_scale_on_axis(world);

        let ray = match local_ray(&self.geometry, node, raycaster, margin) {
            Some(ray) => ray,
            None => return,
        };

        for (i, v0, v1) in self.segments() {
            let approach = ray.distance_sq_to_segment(&v0, &v1);
            if approach.distance_sq > precision_sq {
                continue;
            }

            let point_on_ray = transform_vec3(world, &approach.point_on_ray);
            let d = distance(&raycaster.ray.origin, &point_on_ray);
            if !raycaster.accepts(d) {
                continue;
            }

            let point = transform_vec3(world, &approach.point_on_segment);
            intersections.push(Intersection {
                distance: d,
                distance_to_ray: Some(distance(&point_on_ray, &point)),
                point,
                face: None,
                index: Some(i),
                object: node.id(),
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{NodeKind, Ray, Raycaster, Scene, Transform};

    fn x_axis_line(mode: LineMode) -> Line {
        Line::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
            ],
            mode,
        )
    }

    fn cast(line: Line, transform: Transform, raycaster: &Raycaster) -> Intersections {
        let mut scene = Scene::new();
        let id = scene.add_node("line", NodeKind::Line(line), transform);

        let node = scene.node(id).unwrap();
        let ctx = RaycastContext::new(&scene, raycaster);

        let mut intersections = Intersections::new();
        node.kind.raycast(node, &ctx, &mut intersections);

        intersections
    }

    fn perpendicular_raycaster() -> Raycaster {
        let mut raycaster = Raycaster::new(Ray::new(
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        ));
        raycaster.params.line.precision = 0.0001;

        raycaster
    }

    #[test]
    fn test_segments() {
        let line = x_axis_line(LineMode::Strip);
        let segments: Vec<usize> = line.segments().map(|(i, _, _)| i).collect();
        assert_eq!(segments, vec![0, 1]);

        let line = x_axis_line(LineMode::Pieces);
        let segments: Vec<usize> = line.segments().map(|(i, _, _)| i).collect();
        assert_eq!(segments, vec![0]);

        let line = Line::with_indices(
            vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)],
            vec![1, 0, 7],
            LineMode::Strip,
        );
        let segments: Vec<(usize, Vec3, Vec3)> = line.segments().collect();
        assert_eq!(
            segments,
            vec![(0, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0))]
        );

        assert_eq!(Line::new(Vec::new(), LineMode::Strip).segments().count(), 0);
    }

    #[test]
    fn test_strip_raycast() {
        let hits = cast(
            x_axis_line(LineMode::Strip),
            Transform::default(),
            &perpendicular_raycaster(),
        );

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, Some(0));
        assert_eq!(hits[1].index, Some(1));

        for hit in hits.iter() {
            assert!((hit.distance - 5.0).abs() < 1e-4);
            assert!((hit.point - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-4);
            assert!(hit.distance_to_ray.unwrap() < 1e-4);
            assert!(hit.face.is_none());
        }
    }

    #[test]
    fn test_pieces_raycast() {
        let hits = cast(
            x_axis_line(LineMode::Pieces),
            Transform::default(),
            &perpendicular_raycaster(),
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, Some(0));
    }

    #[test]
    fn test_precision() {
        // passes the line at a distance of 0.5
        let mut raycaster = Raycaster::new(Ray::new(
            Vec3::new(0.5, 5.0, 0.5),
            Vec3::new(0.0, -1.0, 0.0),
        ));

        let hits = cast(x_axis_line(LineMode::Pieces), Transform::default(), &raycaster);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance_to_ray.unwrap() - 0.5).abs() < 1e-4);
        assert!((hits[0].point - Vec3::new(0.5, 0.0, 0.0)).norm() < 1e-4);

        raycaster.params.line.precision = 0.25;
        let hits = cast(x_axis_line(LineMode::Pieces), Transform::default(), &raycaster);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_transformed_raycast() {
        // the line is moved to y = 3 and scaled by 2, so its middle vertex sits at (2, 3, 0)
        let transform =
            Transform::from_position_scale(&Vec3::new(0.0, 3.0, 0.0), &Vec3::new(2.0, 2.0, 2.0));

        let mut raycaster = Raycaster::new(Ray::new(
            Vec3::new(2.0, 3.0, 10.0),
            Vec3::new(0.0, 0.0, -1.0),
        ));
        raycaster.params.line.precision = 0.0001;

        let hits = cast(x_axis_line(LineMode::Pieces), transform, &raycaster);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Vec3::new(2.0, 3.0, 0.0)).norm() < 1e-4);
        assert!((hits[0].distance - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_near_far() {
        let mut raycaster = perpendicular_raycaster();

        raycaster.far = 4.0;
        let hits = cast(x_axis_line(LineMode::Strip), Transform::default(), &raycaster);
        assert!(hits.is_empty());

        raycaster.far = f32::INFINITY;
        raycaster.near = 6.0;
        let hits = cast(x_axis_line(LineMode::Strip), Transform::default(), &raycaster);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_bounding_sphere_rejection() {
        let line = x_axis_line(LineMode::Strip);
        assert!(!line.geometry().has_bounding_sphere());

        // pointing away from the line
        let raycaster = Raycaster::new(Ray::new(
            Vec3::new(1.0, 5.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ));

        let mut scene = Scene::new();
        let id = scene.add_node("line", NodeKind::Line(line), Transform::default());
        let node = scene.node(id).unwrap();
        let ctx = RaycastContext::new(&scene, &raycaster);

        let mut intersections = Intersections::new();
        node.kind.raycast(node, &ctx, &mut intersections);
        assert!(intersections.is_empty());

        // the sphere has been computed once and stays cached on the node
        let NodeKind::Line(line) = &node.kind else {
            panic!("expected a line");
        };
        assert!(line.geometry().has_bounding_sphere());
        assert_eq!(line.geometry().bounding_sphere().radius, 1.0);
    }
}
