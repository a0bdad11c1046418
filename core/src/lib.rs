#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the spawn director.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The director submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.
//!
//! The engine that owns collision geometry and the live actors is reached
//! through the [`EnvironmentQuery`] and [`ActorHost`] traits.

use std::{fmt, time::Duration};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Categories of actor the director can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    /// Ground-bound actor that follows the walkable floor.
    Walker,
    /// Airborne actor that drifts between waypoints.
    Floater,
}

impl Archetype {
    /// Every archetype in declaration order.
    pub const ALL: [Archetype; 2] = [Archetype::Walker, Archetype::Floater];

    /// Stable lowercase name used in logs and configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walker => "walker",
            Self::Floater => "floater",
        }
    }

    /// Dense position of the archetype within [`Archetype::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Walker => 0,
            Self::Floater => 1,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the prefab the host instantiates for an archetype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrototypeRef(String);

impl PrototypeRef {
    /// Wraps the provided prototype name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Prototype name as registered with the host.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier assigned to a spawn point by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnPointId(u32);

impl SpawnPointId {
    /// Creates a new spawn point identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a waypoint by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaypointId(u32);

impl WaypointId {
    /// Creates a new waypoint identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a piece of static geometry owned by the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryId(u32);

impl GeometryId {
    /// Creates a new geometry identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Handle spawned actors use to look up the observer they track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(u32);

impl ObserverId {
    /// Creates a new observer handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position and orientation of an object in world space.
///
/// Local axes follow the convention `X = right`, `Y = up`, `Z = forward`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    #[serde(default = "identity_rotation")]
    pub rotation: Quat,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

impl Pose {
    /// Creates a pose from a position and rotation.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Creates an axis-aligned pose located at `position`.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Returns a copy of the pose moved to `position`, keeping the orientation.
    #[must_use]
    pub const fn with_position(self, position: Vec3) -> Self {
        Self {
            position,
            rotation: self.rotation,
        }
    }

    /// Local right axis expressed in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local up axis expressed in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local forward axis expressed in world space.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Perspective parameters of the observer's camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    /// Full vertical field of view in radians.
    pub vertical_fov: f32,
    /// Width divided by height of the viewport.
    pub aspect_ratio: f32,
    /// Distance to the near clipping plane.
    pub near: f32,
    /// Distance to the far clipping plane.
    pub far: f32,
}

impl Frustum {
    /// Reports whether `depth` lies strictly between the clipping planes.
    #[must_use]
    pub fn clips_depth(&self, depth: f32) -> bool {
        !(depth > self.near && depth < self.far)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            vertical_fov: 60_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.3,
            far: 1_000.0,
        }
    }
}

/// Reference viewpoint used for distance and visibility tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Handle given to spawned actors.
    pub id: ObserverId,
    /// Camera pose; the camera looks along the pose's forward axis.
    pub pose: Pose,
    /// Projection parameters of the camera.
    pub frustum: Frustum,
}

impl Observer {
    /// Creates an observer with the provided handle, pose and frustum.
    #[must_use]
    pub const fn new(id: ObserverId, pose: Pose, frustum: Frustum) -> Self {
        Self { id, pose, frustum }
    }

    /// World-space position of the observer.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.pose.position
    }

    /// Euclidean distance between the observer and `point`.
    #[must_use]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.pose.position.distance(point)
    }
}

/// Point expressed in the observer's normalised viewport space.
///
/// `x` and `y` span `0.0..1.0` across the visible screen and `depth` is the
/// distance along the view direction, positive in front of the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPoint {
    /// Horizontal coordinate, `0.0` at the left edge.
    pub x: f32,
    /// Vertical coordinate, `0.0` at the bottom edge.
    pub y: f32,
    /// Distance in front of the camera.
    pub depth: f32,
}

impl ViewportPoint {
    /// Off-screen point reported for positions cut by a clipping plane.
    #[must_use]
    pub const fn clipped(depth: f32) -> Self {
        Self {
            x: -1.0,
            y: -1.0,
            depth,
        }
    }

    /// Reports whether the point lies strictly inside the view volume.
    #[must_use]
    pub fn is_inside_view_volume(&self) -> bool {
        self.depth > 0.0 && self.x > 0.0 && self.x < 1.0 && self.y > 0.0 && self.y < 1.0
    }
}

/// Entity reported by a successful environment query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// Static level geometry.
    Geometry(GeometryId),
    /// A spawn point marker that the environment exposes to queries.
    SpawnPoint(SpawnPointId),
}

/// First surface touched by a ray or sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// World-space contact point.
    pub point: Vec3,
    /// Entity that owns the touched surface.
    pub target: HitTarget,
}

/// Collision and visibility queries answered by the host engine.
///
/// Every query is synchronous. A query that touches nothing within
/// `max_distance` returns `None`; misses are never errors.
pub trait EnvironmentQuery {
    /// Casts an infinitely thin ray from `origin` along `direction`.
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Hit>;

    /// Sweeps a capsule spanning `bottom..top` with `radius` along `direction`.
    fn capsule_sweep(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit>;

    /// Sweeps a sphere centred on `origin` with `radius` along `direction`.
    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit>;

    /// Projects `point` into the observer's normalised viewport.
    fn viewport_project(&self, observer: &Observer, point: Vec3) -> ViewportPoint;
}

impl<T: EnvironmentQuery + ?Sized> EnvironmentQuery for &T {
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Hit> {
        (**self).ray_cast(origin, direction, max_distance)
    }

    fn capsule_sweep(
        &self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit> {
        (**self).capsule_sweep(bottom, top, radius, direction, max_distance)
    }

    fn sphere_sweep(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<Hit> {
        (**self).sphere_sweep(origin, radius, direction, max_distance)
    }

    fn viewport_project(&self, observer: &Observer, point: Vec3) -> ViewportPoint {
        (**self).viewport_project(observer, point)
    }
}

/// Engine-side owner of live actors.
pub trait ActorHost {
    /// Controller handed back for each instantiated actor.
    type Actor: ActorController;

    /// Number of live actors tagged with `archetype`.
    fn count_by_archetype(&self, archetype: Archetype) -> u32;

    /// Creates a new actor of `archetype` from `prototype` at `pose`.
    fn instantiate(&mut self, archetype: Archetype, prototype: &PrototypeRef, pose: Pose)
        -> Self::Actor;
}

/// Behaviour controller attached to a spawned actor.
pub trait ActorController {
    /// Hands the actor its patrol route. Ownership of the route moves to the actor.
    fn set_route(&mut self, route: PatrolRoute);

    /// Tells the actor which observer to track.
    fn set_observer(&mut self, observer: ObserverId);
}

/// Live population broken down by archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Census {
    counts: [u32; 2],
}

impl Census {
    /// Creates an empty census.
    #[must_use]
    pub const fn new() -> Self {
        Self { counts: [0; 2] }
    }

    /// Returns a copy of the census with `archetype` set to `count`.
    #[must_use]
    pub fn with(mut self, archetype: Archetype, count: u32) -> Self {
        self.counts[archetype.index()] = count;
        self
    }

    /// Captures the census reported by an actor host.
    #[must_use]
    pub fn from_host<H: ActorHost + ?Sized>(host: &H) -> Self {
        Archetype::ALL
            .into_iter()
            .fold(Self::new(), |census, archetype| {
                census.with(archetype, host.count_by_archetype(archetype))
            })
    }

    /// Number of live actors of `archetype`.
    #[must_use]
    pub const fn count(&self, archetype: Archetype) -> u32 {
        self.counts[archetype.index()]
    }

    /// Total number of live actors across every archetype.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().fold(0u32, |sum, count| sum.saturating_add(*count))
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "walkers={} floaters={}",
            self.count(Archetype::Walker),
            self.count(Archetype::Floater)
        )
    }
}

/// Open interval of acceptable observer distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceBand {
    min: f32,
    max: f32,
}

impl DistanceBand {
    /// Creates a band accepting distances strictly between `min` and `max`.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Reports whether `distance` lies strictly inside the band.
    #[must_use]
    pub fn contains(&self, distance: f32) -> bool {
        distance > self.min && distance < self.max
    }
}

/// Direction of a placement query relative to the queried pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeDirection {
    /// Along the negative local X axis.
    Left,
    /// Along the positive local X axis.
    Right,
    /// Along the positive local Z axis.
    Front,
    /// Along the negative local Z axis.
    Back,
    /// Along the positive local Y axis.
    Up,
    /// Along the negative local Y axis.
    Down,
}

impl ProbeDirection {
    /// Lowercase label used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Front => "front",
            Self::Back => "back",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// World-space unit vector for this direction relative to `pose`.
    #[must_use]
    pub fn resolve(self, pose: &Pose) -> Vec3 {
        match self {
            Self::Left => -pose.right(),
            Self::Right => pose.right(),
            Self::Front => pose.forward(),
            Self::Back => -pose.forward(),
            Self::Up => pose.up(),
            Self::Down => -pose.up(),
        }
    }
}

impl fmt::Display for ProbeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw spawn location read from the scene before correction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnMarker {
    /// Designer-facing name used in diagnostics.
    pub name: String,
    /// Uncorrected pose.
    pub pose: Pose,
}

/// Raw waypoint read from the scene before correction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaypointMarker {
    /// Designer-facing name used in diagnostics.
    pub name: String,
    /// Uncorrected pose.
    pub pose: Pose,
}

/// Single stop on a patrol route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Waypoint the stop refers to.
    pub waypoint: WaypointId,
    /// Corrected position of the waypoint.
    pub position: Vec3,
}

/// Ordered patrol route handed to a spawned actor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    stops: Vec<RouteStop>,
    bidirectional: bool,
}

impl PatrolRoute {
    /// Creates a route from its stops and walking mode.
    #[must_use]
    pub fn new(stops: Vec<RouteStop>, bidirectional: bool) -> Self {
        Self {
            stops,
            bidirectional,
        }
    }

    /// Stops in patrol order.
    #[must_use]
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Number of stops on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Reports whether the route contains no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Whether the actor walks back and forth instead of looping.
    #[must_use]
    pub const fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Waypoint identifiers in patrol order.
    pub fn waypoints(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.stops.iter().map(|stop| stop.waypoint)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers a raw spawn marker awaiting correction.
    RegisterSpawnPoint {
        /// Marker read from the scene.
        marker: SpawnMarker,
    },
    /// Registers a raw waypoint marker awaiting correction.
    RegisterWaypoint {
        /// Marker read from the scene.
        marker: WaypointMarker,
    },
    /// Moves a pending spawn point to its corrected position and marks it valid.
    RelocateSpawnPoint {
        /// Spawn point being corrected.
        spawn_point: SpawnPointId,
        /// Corrected world-space position.
        position: Vec3,
    },
    /// Marks a pending spawn point as permanently invalid.
    RejectSpawnPoint {
        /// Spawn point that failed correction.
        spawn_point: SpawnPointId,
        /// Probe directions that touched no geometry.
        missed: Vec<ProbeDirection>,
    },
    /// Moves a pending waypoint to its corrected position and marks it valid.
    RelocateWaypoint {
        /// Waypoint being corrected.
        waypoint: WaypointId,
        /// Corrected world-space position.
        position: Vec3,
    },
    /// Marks a pending waypoint as unusable for routes.
    RejectWaypoint {
        /// Waypoint that failed correction.
        waypoint: WaypointId,
        /// Probe directions that touched no geometry.
        missed: Vec<ProbeDirection>,
    },
    /// Replaces the observer's pose.
    SetObserverPose {
        /// New observer pose.
        pose: Pose,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Sets the eligibility flag of a spawn point.
    SetSpawnPointActive {
        /// Spawn point being toggled.
        spawn_point: SpawnPointId,
        /// Desired state.
        active: bool,
    },
    /// Requests an actor to be spawned at an active spawn point.
    SpawnActor {
        /// Archetype to instantiate.
        archetype: Archetype,
        /// Active spawn point hosting the new actor.
        spawn_point: SpawnPointId,
        /// Patrol route moved into the new actor.
        route: PatrolRoute,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a spawn marker was registered.
    SpawnPointRegistered {
        /// Identifier allocated by the world.
        spawn_point: SpawnPointId,
    },
    /// Confirms that a waypoint marker was registered.
    WaypointRegistered {
        /// Identifier allocated by the world.
        waypoint: WaypointId,
    },
    /// Confirms that a spawn point passed correction.
    SpawnPointRelocated {
        /// Corrected spawn point.
        spawn_point: SpawnPointId,
        /// Position before correction.
        from: Vec3,
        /// Position after correction.
        to: Vec3,
    },
    /// Reports that a spawn point failed correction.
    SpawnPointRejected {
        /// Rejected spawn point.
        spawn_point: SpawnPointId,
        /// Probe directions that touched no geometry.
        missed: Vec<ProbeDirection>,
    },
    /// Confirms that a waypoint passed correction.
    WaypointRelocated {
        /// Corrected waypoint.
        waypoint: WaypointId,
        /// Position before correction.
        from: Vec3,
        /// Position after correction.
        to: Vec3,
    },
    /// Reports that a waypoint failed correction.
    WaypointRejected {
        /// Rejected waypoint.
        waypoint: WaypointId,
        /// Probe directions that touched no geometry.
        missed: Vec<ProbeDirection>,
    },
    /// Announces that the observer moved.
    ObserverMoved {
        /// Pose after the move.
        pose: Pose,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Total simulated time after the tick.
        now: Duration,
    },
    /// Announces that a spawn point became eligible.
    SpawnPointActivated {
        /// Activated spawn point.
        spawn_point: SpawnPointId,
    },
    /// Announces that a spawn point stopped being eligible.
    SpawnPointDeactivated {
        /// Deactivated spawn point.
        spawn_point: SpawnPointId,
    },
    /// Instructs the host to instantiate an actor.
    ActorSpawnRequested {
        /// Archetype to instantiate.
        archetype: Archetype,
        /// Spawn point hosting the actor.
        spawn_point: SpawnPointId,
        /// Pose the actor is created at.
        pose: Pose,
        /// Patrol route handed to the actor.
        route: PatrolRoute,
    },
    /// Reports that the world refused to execute a command.
    CommandRejected {
        /// Specific reason the command failed.
        reason: RejectionReason,
    },
}

/// Reasons the world may refuse a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// No spawn point with the provided identifier exists.
    UnknownSpawnPoint(SpawnPointId),
    /// No waypoint with the provided identifier exists.
    UnknownWaypoint(WaypointId),
    /// The spawn point was already corrected or rejected.
    SpawnPointAlreadyResolved(SpawnPointId),
    /// The waypoint was already corrected or rejected.
    WaypointAlreadyResolved(WaypointId),
    /// The spawn point failed correction or was never corrected.
    InvalidSpawnPoint(SpawnPointId),
    /// The spawn point is not eligible this tick.
    InactiveSpawnPoint(SpawnPointId),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpawnPoint(id) => write!(f, "unknown spawn point {}", id.get()),
            Self::UnknownWaypoint(id) => write!(f, "unknown waypoint {}", id.get()),
            Self::SpawnPointAlreadyResolved(id) => {
                write!(f, "spawn point {} was already placed", id.get())
            }
            Self::WaypointAlreadyResolved(id) => {
                write!(f, "waypoint {} was already placed", id.get())
            }
            Self::InvalidSpawnPoint(id) => write!(f, "spawn point {} is invalid", id.get()),
            Self::InactiveSpawnPoint(id) => write!(f, "spawn point {} is inactive", id.get()),
        }
    }
}

/// Immutable representation of a single spawn point used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPointSnapshot {
    /// Identifier allocated by the world.
    pub id: SpawnPointId,
    /// Designer-facing name.
    pub name: String,
    /// Current pose; corrected once placement succeeded.
    pub pose: Pose,
    /// Whether correction succeeded.
    pub valid: bool,
    /// Whether the point is eligible this tick.
    pub active: bool,
}

/// Read-only snapshot describing every spawn point.
#[derive(Clone, Debug, Default)]
pub struct SpawnPointView {
    snapshots: Vec<SpawnPointSnapshot>,
}

impl SpawnPointView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SpawnPointSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SpawnPointSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single spawn point.
    #[must_use]
    pub fn get(&self, id: SpawnPointId) -> Option<&SpawnPointSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Immutable representation of a single waypoint used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointSnapshot {
    /// Identifier allocated by the world.
    pub id: WaypointId,
    /// Designer-facing name.
    pub name: String,
    /// Current pose; corrected once placement succeeded.
    pub pose: Pose,
    /// Whether correction succeeded.
    pub valid: bool,
}

/// Read-only snapshot describing every waypoint.
#[derive(Clone, Debug, Default)]
pub struct WaypointView {
    snapshots: Vec<WaypointSnapshot>,
}

impl WaypointView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WaypointSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &WaypointSnapshot> {
        self.snapshots.iter()
    }

    /// Corrected waypoints that may appear on patrol routes.
    pub fn valid(&self) -> impl Iterator<Item = &WaypointSnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.valid)
    }

    /// Looks up a single waypoint.
    #[must_use]
    pub fn get(&self, id: WaypointId) -> Option<&WaypointSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}
