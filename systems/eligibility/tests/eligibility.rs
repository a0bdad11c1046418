use glam::{Quat, Vec3};
use spawn_director_core::{
    Command, DistanceBand, EnvironmentQuery, Event, Frustum, GeometryId, Hit, HitTarget,
    Observer, ObserverId, Pose, ProbeDirection, SpawnMarker, SpawnPointId, ViewportPoint,
};
use spawn_director_system_eligibility::{is_seen, Config, Eligibility};
use spawn_director_world::{self as world, query, World};

/// Observer-centric stub: the camera sees a 90 degree cone along its forward
/// axis, and rays toward `walled` positions stop on geometry first.
#[derive(Default)]
struct Sightlines {
    walled: Vec<Vec3>,
    marker_colliders: Vec<(Vec3, SpawnPointId)>,
}

impl Sightlines {
    fn ray_target(origin: Vec3, direction: Vec3, max_distance: f32) -> Vec3 {
        origin + direction * max_distance
    }
}

impl EnvironmentQuery for Sightlines {
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Hit> {
        let target = Self::ray_target(origin, direction, max_distance);
        if let Some((point, id)) = self
            .marker_colliders
            .iter()
            .find(|(point, _)| point.abs_diff_eq(target, 1e-3))
        {
            return Some(Hit {
                point: *point,
                target: HitTarget::SpawnPoint(*id),
            });
        }
        self.walled
            .iter()
            .any(|point| point.abs_diff_eq(target, 1e-3))
            .then(|| Hit {
                point: origin + direction * (max_distance * 0.5),
                target: HitTarget::Geometry(GeometryId::new(1)),
            })
    }

    fn capsule_sweep(&self, _: Vec3, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<Hit> {
        None
    }

    fn sphere_sweep(&self, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<Hit> {
        None
    }

    fn viewport_project(&self, observer: &Observer, point: Vec3) -> ViewportPoint {
        let local = observer.pose.rotation.inverse() * (point - observer.position());
        if local.z <= 0.0 {
            return ViewportPoint {
                x: 0.5,
                y: 0.5,
                depth: local.z,
            };
        }
        ViewportPoint {
            x: 0.5 + local.x / (2.0 * local.z),
            y: 0.5 + local.y / (2.0 * local.z),
            depth: local.z,
        }
    }
}

fn observer_at(position: Vec3, rotation: Quat) -> Observer {
    Observer::new(
        ObserverId::new(7),
        Pose::new(position, rotation),
        Frustum::default(),
    )
}

fn eligibility() -> Eligibility {
    Eligibility::new(Config::new(DistanceBand::new(10.0, 50.0)))
}

fn placed_world(positions: &[Vec3]) -> (World, Vec<SpawnPointId>) {
    let mut world = World::new(observer_at(Vec3::ZERO, Quat::IDENTITY));
    let mut ids = Vec::new();
    for (index, position) in positions.iter().enumerate() {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::RegisterSpawnPoint {
                marker: SpawnMarker {
                    name: format!("spawn_{index}"),
                    pose: Pose::at(*position),
                },
            },
            &mut events,
        );
        let Some(Event::SpawnPointRegistered { spawn_point }) = events.pop() else {
            panic!("registration failed");
        };
        world::apply(
            &mut world,
            Command::RelocateSpawnPoint {
                spawn_point,
                position: *position,
            },
            &mut events,
        );
        ids.push(spawn_point);
    }
    (world, ids)
}

fn run(
    eligibility: &mut Eligibility,
    world: &mut World,
    allowed: i64,
    environment: &Sightlines,
) -> Vec<Command> {
    let observer = *query::observer(world);
    let mut commands = Vec::new();
    eligibility.handle(
        &query::spawn_point_view(world),
        &observer,
        allowed,
        environment,
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands.clone() {
        world::apply(world, command, &mut events);
    }
    assert!(
        events
            .iter()
            .all(|event| !matches!(event, Event::CommandRejected { .. })),
        "world rejected eligibility output: {events:?}"
    );
    commands
}

#[test]
fn points_behind_the_observer_inside_the_band_are_eligible() {
    let (mut world, ids) = placed_world(&[Vec3::new(0.0, 0.0, -20.0)]);
    let mut eligibility = eligibility();

    let _ = run(&mut eligibility, &mut world, 3, &Sightlines::default());

    assert_eq!(eligibility.eligible(), ids.as_slice());
    assert_eq!(query::active_spawn_points(&world), ids);
}

#[test]
fn distance_band_is_strict_on_both_ends() {
    let (mut world, ids) = placed_world(&[
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::new(0.0, 0.0, -50.0),
        Vec3::new(0.0, 0.0, -5.0),
        Vec3::new(0.0, 0.0, -80.0),
        Vec3::new(0.0, 0.0, -30.0),
    ]);
    let mut eligibility = eligibility();

    let _ = run(&mut eligibility, &mut world, 1, &Sightlines::default());

    assert_eq!(eligibility.eligible(), &[ids[4]]);
}

#[test]
fn visible_points_are_excluded_and_occluded_points_kept() {
    let visible = Vec3::new(0.0, 0.0, 20.0);
    let occluded = Vec3::new(1.0, 0.0, 25.0);
    let (mut world, ids) = placed_world(&[visible, occluded]);
    let environment = Sightlines {
        walled: vec![occluded],
        ..Sightlines::default()
    };
    let mut eligibility = eligibility();

    let _ = run(&mut eligibility, &mut world, 2, &environment);

    assert_eq!(eligibility.eligible(), &[ids[1]]);
    let observer = *query::observer(&world);
    assert!(is_seen(&environment, &observer, ids[0], visible));
    assert!(!is_seen(&environment, &observer, ids[1], occluded));
}

#[test]
fn first_hit_on_the_point_itself_counts_as_seen() {
    let point = Vec3::new(0.0, 0.0, 15.0);
    let (mut world, ids) = placed_world(&[point]);
    let environment = Sightlines {
        marker_colliders: vec![(point, ids[0])],
        ..Sightlines::default()
    };
    let mut eligibility = eligibility();

    let _ = run(&mut eligibility, &mut world, 2, &environment);

    assert!(eligibility.eligible().is_empty());
}

#[test]
fn eligible_points_are_ordered_closest_first() {
    let (mut world, ids) = placed_world(&[
        Vec3::new(0.0, 0.0, -40.0),
        Vec3::new(0.0, 0.0, -12.0),
        Vec3::new(0.0, 0.0, -25.0),
    ]);
    let mut eligibility = eligibility();

    let _ = run(&mut eligibility, &mut world, 4, &Sightlines::default());

    assert_eq!(eligibility.eligible(), &[ids[1], ids[2], ids[0]]);
}

#[test]
fn no_headroom_deactivates_everything() {
    let (mut world, _) = placed_world(&[Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, -30.0)]);
    let mut eligibility = eligibility();
    let _ = run(&mut eligibility, &mut world, 2, &Sightlines::default());
    assert_eq!(query::active_spawn_points(&world).len(), 2);

    let commands = run(&mut eligibility, &mut world, 0, &Sightlines::default());

    assert_eq!(commands.len(), 2);
    assert!(eligibility.eligible().is_empty());
    assert!(query::active_spawn_points(&world).is_empty());
}

#[test]
fn unchanged_state_emits_no_commands() {
    let (mut world, _) = placed_world(&[Vec3::new(0.0, 0.0, -20.0)]);
    let mut eligibility = eligibility();

    let first = run(&mut eligibility, &mut world, 1, &Sightlines::default());
    let second = run(&mut eligibility, &mut world, 1, &Sightlines::default());

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(eligibility.eligible().len(), 1);
}

#[test]
fn rejected_points_are_never_eligible_from_any_viewpoint() {
    let mut world = World::new(observer_at(Vec3::ZERO, Quat::IDENTITY));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::RegisterSpawnPoint {
            marker: SpawnMarker {
                name: "outside".to_owned(),
                pose: Pose::at(Vec3::new(0.0, 0.0, -20.0)),
            },
        },
        &mut events,
    );
    let Some(Event::SpawnPointRegistered { spawn_point }) = events.pop() else {
        panic!("registration failed");
    };
    world::apply(
        &mut world,
        Command::RejectSpawnPoint {
            spawn_point,
            missed: vec![ProbeDirection::Down],
        },
        &mut events,
    );

    let mut eligibility = eligibility();
    for step in 0..16 {
        let yaw = step as f32 * std::f32::consts::FRAC_PI_8;
        let position = Vec3::new(step as f32 - 8.0, 0.0, step as f32 * 2.0);
        world::apply(
            &mut world,
            Command::SetObserverPose {
                pose: Pose::new(position, Quat::from_rotation_y(yaw)),
            },
            &mut events,
        );
        let commands = run(&mut eligibility, &mut world, 5, &Sightlines::default());
        assert!(commands.is_empty());
        assert!(eligibility.eligible().is_empty());
    }
}
