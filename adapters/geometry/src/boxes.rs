//! Axis-aligned box scene answering ray, sweep and projection queries.

use glam::Vec3;
use spawn_director_core::{
    EnvironmentQuery, GeometryId, Hit, HitTarget, Observer, ViewportPoint,
};

/// Solid axis-aligned box taking part in queries.
#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    /// Identifier reported in hits.
    pub id: GeometryId,
    /// Designer-facing name.
    pub name: String,
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

/// Scene made of solid axis-aligned boxes.
///
/// Sweeps are answered by inflating every box by the swept shape's extent
/// and casting the shape's centre as a ray. Boxes already overlapping the
/// shape at the start of a query are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoxLevel {
    solids: Vec<Solid>,
}

impl BoxLevel {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a solid box and returns its identifier.
    pub fn push(&mut self, name: impl Into<String>, min: Vec3, max: Vec3) -> GeometryId {
        let id = GeometryId::new(u32::try_from(self.solids.len()).unwrap_or(u32::MAX));
        self.solids.push(Solid {
            id,
            name: name.into(),
            min: min.min(max),
            max: min.max(max),
        });
        id
    }

    /// Builder-style variant of [`BoxLevel::push`].
    #[must_use]
    pub fn with_solid(mut self, name: impl Into<String>, min: Vec3, max: Vec3) -> Self {
        let _ = self.push(name, min, max);
        self
    }

    /// Solid boxes in insertion order.
    #[must_use]
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        inflate: Vec3,
        radius: f32,
    ) -> Option<Hit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !(max_distance >= 0.0) {
            return None;
        }

        let mut nearest: Option<(f32, &Solid)> = None;
        for solid in &self.solids {
            let Some(distance) =
                entry_distance(origin, direction, solid.min - inflate, solid.max + inflate)
            else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if nearest.map_or(true, |(best, _)| distance < best) {
                nearest = Some((distance, solid));
            }
        }

        nearest.map(|(distance, solid)| {
            let centre = origin + direction * distance;
            Hit {
                point: (centre + direction * radius).clamp(solid.min, solid.max),
                target: HitTarget::Geometry(solid.id),
            }
        })
    }
}

impl EnvironmentQuery for BoxLevel {
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Hit> {
        self.cast(origin, direction, max_distance, Vec3::ZERO, 0.0)
    }

    fn capsule_sweep(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit> {
        let centre = bottom.lerp(top, 0.5);
        let half_segment = ((top - bottom) * 0.5).abs();
        self.cast(
            centre,
            direction,
            max_distance,
            half_segment + Vec3::splat(radius),
            radius,
        )
    }

    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit> {
        self.cast(origin, direction, max_distance, Vec3::splat(radius), radius)
    }

    fn viewport_project(&self, observer: &Observer, point: Vec3) -> ViewportPoint {
        let local = observer.pose.rotation.inverse() * (point - observer.position());
        let depth = local.z;
        if observer.frustum.clips_depth(depth) {
            return ViewportPoint::clipped(depth);
        }

        let half_height = depth * (observer.frustum.vertical_fov * 0.5).tan();
        let half_width = half_height * observer.frustum.aspect_ratio;
        ViewportPoint {
            x: 0.5 + local.x / (2.0 * half_width),
            y: 0.5 + local.y / (2.0 * half_height),
            depth,
        }
    }
}

/// Distance along `direction` at which a ray starting outside the box enters it.
fn entry_distance(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut near = f32::NEG_INFINITY;
    let mut far = f32::INFINITY;

    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d.abs() <= f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inverse = d.recip();
        let a = (min[axis] - o) * inverse;
        let b = (max[axis] - o) * inverse;
        near = near.max(a.min(b));
        far = far.min(a.max(b));
        if near > far {
            return None;
        }
    }

    (near >= 0.0).then_some(near)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use spawn_director_core::{Frustum, ObserverId, Pose};

    fn slab() -> BoxLevel {
        BoxLevel::new().with_solid("wall", Vec3::new(4.0, -1.0, -1.0), Vec3::new(5.0, 1.0, 1.0))
    }

    #[test]
    fn ray_reports_the_entry_face() {
        let hit = slab().ray_cast(Vec3::ZERO, Vec3::X, 10.0).expect("hit");
        assert_eq!(hit.point, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(hit.target, HitTarget::Geometry(GeometryId::new(0)));
    }

    #[test]
    fn ray_respects_its_range_and_direction() {
        assert!(slab().ray_cast(Vec3::ZERO, Vec3::X, 3.5).is_none());
        assert!(slab().ray_cast(Vec3::ZERO, Vec3::NEG_X, 10.0).is_none());
        assert!(slab().ray_cast(Vec3::ZERO, Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn boxes_containing_the_origin_are_ignored() {
        let level = slab().with_solid("far", Vec3::new(8.0, -1.0, -1.0), Vec3::new(9.0, 1.0, 1.0));
        let hit = level
            .ray_cast(Vec3::new(4.5, 0.0, 0.0), Vec3::X, 10.0)
            .expect("hit");
        assert_eq!(hit.target, HitTarget::Geometry(GeometryId::new(1)));
    }

    #[test]
    fn sphere_sweep_stops_one_radius_early_but_reports_the_surface() {
        let hit = slab()
            .sphere_sweep(Vec3::ZERO, 0.5, Vec3::X, 10.0)
            .expect("hit");
        assert!(hit.point.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
        assert!(slab().sphere_sweep(Vec3::ZERO, 0.5, Vec3::X, 3.4).is_none());
    }

    #[test]
    fn capsule_sweep_catches_boxes_beside_its_ends() {
        let level = BoxLevel::new().with_solid(
            "ledge",
            Vec3::new(4.0, 1.2, -1.0),
            Vec3::new(5.0, 3.0, 1.0),
        );
        let bottom = Vec3::new(0.0, -1.0, 0.0);
        let top = Vec3::new(0.0, 1.0, 0.0);

        assert!(level.ray_cast(Vec3::ZERO, Vec3::X, 10.0).is_none());
        let hit = level
            .capsule_sweep(bottom, top, 0.5, Vec3::X, 10.0)
            .expect("capsule reaches the ledge");
        assert!(hit.point.abs_diff_eq(Vec3::new(4.0, 1.2, 0.0), 1e-5));
    }

    #[test]
    fn projection_centres_points_on_the_view_axis() {
        let observer = Observer::new(
            ObserverId::new(0),
            Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            Frustum::default(),
        );
        let level = BoxLevel::new();

        let ahead = level.viewport_project(&observer, Vec3::new(10.0, 0.0, 0.0));
        assert!((ahead.x - 0.5).abs() < 1e-5);
        assert!((ahead.y - 0.5).abs() < 1e-5);
        assert!((ahead.depth - 10.0).abs() < 1e-4);
        assert!(ahead.is_inside_view_volume());

        let behind = level.viewport_project(&observer, Vec3::new(-10.0, 0.0, 0.0));
        assert!(!behind.is_inside_view_volume());

        let above = level.viewport_project(&observer, Vec3::new(10.0, 20.0, 0.0));
        assert!(above.y > 1.0);
        assert!(!above.is_inside_view_volume());
    }

    #[test]
    fn projection_drops_points_outside_the_clipping_planes() {
        let observer = Observer::new(
            ObserverId::new(0),
            Pose::at(Vec3::ZERO),
            Frustum {
                near: 1.0,
                far: 20.0,
                ..Frustum::default()
            },
        );
        let level = BoxLevel::new();

        let beyond = level.viewport_project(&observer, Vec3::new(0.0, 0.0, 500.0));
        assert!((beyond.depth - 500.0).abs() < 1e-3);
        assert!(!beyond.is_inside_view_volume());

        let grazing = level.viewport_project(&observer, Vec3::new(0.0, 0.0, 0.5));
        assert!(!grazing.is_inside_view_volume());

        let within = level.viewport_project(&observer, Vec3::new(0.0, 0.0, 10.0));
        assert!(within.is_inside_view_volume());
    }
}
