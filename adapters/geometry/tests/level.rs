use glam::Vec3;
use proptest::prelude::*;
use spawn_director_core::{EnvironmentQuery, GeometryId, HitTarget};
use spawn_director_geometry::{BoxLevel, Level, LevelError};

const ROOM: &str = r#"
[observer]
position = [0.0, 1.0, -20.0]
yaw_degrees = 0.0

[[geometry]]
name = "floor"
min = [-1.5, -0.5, -1.5]
max = [1.5, 0.0, 1.5]

[[geometry]]
name = "roof"
min = [-1.5, 2.0, -1.5]
max = [1.5, 2.5, 1.5]
collider = true

[[geometry]]
name = "wall_west"
min = [-1.5, 0.0, -1.5]
max = [-1.0, 2.0, 1.5]

[[geometry]]
name = "Wall_East"
min = [1.0, 0.0, -1.5]
max = [1.5, 2.0, 1.5]

[[geometry]]
name = "wall_north"
min = [-1.0, 0.0, 1.0]
max = [1.0, 2.0, 1.5]

[[geometry]]
name = "wall_south"
min = [-1.0, 0.0, -1.5]
max = [1.0, 2.0, -1.0]

[[geometry]]
name = "cobweb"
min = [-0.2, 1.0, -0.2]
max = [0.2, 1.9, 0.2]

[[spawn]]
name = "corner"
position = [0.5, 0.3, 0.4]
yaw_degrees = 90.0

[[waypoint]]
name = "doorway"
position = [0.0, 0.5, 0.0]
"#;

#[test]
fn structural_pieces_get_colliders_and_decorations_are_skipped() {
    let level = Level::from_toml_str(ROOM).expect("room parses");

    let names: Vec<&str> = level
        .geometry
        .solids()
        .iter()
        .map(|solid| solid.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["floor", "roof", "wall_west", "Wall_East", "wall_north", "wall_south"]
    );

    let hit = level
        .geometry
        .ray_cast(Vec3::new(0.0, 0.5, 0.0), Vec3::Y, 10.0)
        .expect("roof above");
    assert_eq!(hit.target, HitTarget::Geometry(GeometryId::new(1)));
    assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn markers_and_observer_are_read() {
    let level = Level::from_toml_str(ROOM).expect("room parses");

    assert_eq!(level.spawn_markers.len(), 1);
    assert_eq!(level.spawn_markers[0].name, "corner");
    assert!(level.spawn_markers[0]
        .pose
        .right()
        .abs_diff_eq(Vec3::NEG_Z, 1e-5));
    assert_eq!(level.waypoint_markers[0].name, "doorway");
    assert_eq!(level.observer.position(), Vec3::new(0.0, 1.0, -20.0));
}

#[test]
fn unknown_keys_are_rejected() {
    let error = Level::from_toml_str("[[geometry]]\nname = \"floor\"\nmin = [0.0, 0.0, 0.0]\nmax = [1.0, 1.0, 1.0]\nmesh = \"floor.obj\"\n")
        .expect_err("unknown key");
    assert!(matches!(error, LevelError::Parse(_)));
}

#[test]
fn missing_files_report_their_path() {
    let error = Level::load("/definitely/not/here.toml").expect_err("missing file");
    assert!(matches!(error, LevelError::Io { ref path, .. } if path.ends_with("here.toml")));
}

proptest! {
    #[test]
    fn rays_from_outside_land_on_the_box_surface(
        x in -20.0f32..20.0,
        y in -20.0f32..20.0,
        z in -20.0f32..20.0,
    ) {
        let origin = Vec3::new(x, y, z);
        let min = Vec3::splat(-2.0);
        let max = Vec3::splat(2.0);
        prop_assume!(origin.abs().max_element() > 2.5);

        let level = BoxLevel::new().with_solid("crate", min, max);
        let direction = (Vec3::ZERO - origin).normalize();
        let hit = level
            .ray_cast(origin, direction, 100.0)
            .expect("rays toward the centre hit");

        let on_face = (0..3).any(|axis| {
            (hit.point[axis] - min[axis]).abs() < 1e-3 || (hit.point[axis] - max[axis]).abs() < 1e-3
        });
        prop_assert!(on_face, "hit {:?} is not on a face", hit.point);
        prop_assert!(hit.point.distance(origin) <= origin.length());
    }
}
