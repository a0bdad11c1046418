#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestrator that wires the world, the placement passes and the
//! spawning systems together.
//!
//! A [`Director`] owns every piece of mutable state. Engines call
//! [`Director::initialize`] once with the raw scene markers and then
//! [`Director::tick`] every frame.

mod config;

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spawn_director_core::{
    ActorController, ActorHost, Archetype, Census, Command, EnvironmentQuery, Event, Observer,
    PatrolRoute, Pose, SpawnMarker, SpawnPointId, WaypointMarker,
};
use spawn_director_system_eligibility::Eligibility;
use spawn_director_system_population::PopulationBalancer;
use spawn_director_system_routing::Routing;
use spawn_director_system_spawn_correction::SpawnCorrection;
use spawn_director_system_waypoint_correction::WaypointCorrection;
use spawn_director_world::{self as world, query, World};

pub use config::{
    ConfigError, DirectorConfig, DistanceConfig, PlacementConfig, PopulationConfig,
    PrototypeConfig, RouteConfig,
};

/// Outcome of the placement passes run by [`Director::initialize`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitializationReport {
    /// Spawn points moved to their corrected position.
    pub spawn_points_placed: usize,
    /// Spawn points that failed correction.
    pub spawn_points_rejected: usize,
    /// Waypoints lifted above the floor.
    pub waypoints_placed: usize,
    /// Waypoints excluded from routes.
    pub waypoints_rejected: usize,
    /// Every event emitted by the world during initialization.
    pub events: Vec<Event>,
}

/// Actor handed to the host during a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRecord {
    /// Archetype that was instantiated.
    pub archetype: Archetype,
    /// Spawn point hosting the actor.
    pub spawn_point: SpawnPointId,
    /// Pose the actor was created at.
    pub pose: Pose,
    /// Patrol route given to the actor.
    pub route: PatrolRoute,
}

/// Summary of a single [`Director::tick`].
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// One-based index of the tick.
    pub tick: u64,
    /// Simulated time after the tick.
    pub now: Duration,
    /// Live population read from the host before spawning.
    pub census: Census,
    /// Spawn point throttle derived from the census.
    pub allowed: i64,
    /// Number of spawn points eligible this tick.
    pub eligible: usize,
    /// Actor spawned this tick, if any.
    pub spawned: Option<SpawnRecord>,
    /// Every event emitted by the world during the tick.
    pub events: Vec<Event>,
}

/// Owns the spawn director state and drives it one tick at a time.
#[derive(Debug)]
pub struct Director {
    world: World,
    spawn_correction: SpawnCorrection,
    waypoint_correction: WaypointCorrection,
    eligibility: Eligibility,
    balancer: PopulationBalancer,
    routing: Routing,
    prototypes: PrototypeConfig,
    rng: ChaCha8Rng,
}

impl Director {
    /// Builds a director from a validated configuration.
    pub fn new(config: &DirectorConfig, observer: Observer) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(observer),
            spawn_correction: SpawnCorrection::new(config.spawn_correction()),
            waypoint_correction: WaypointCorrection::new(config.waypoint_correction()),
            eligibility: Eligibility::new(config.eligibility()),
            balancer: PopulationBalancer::new(config.population()?),
            routing: Routing::new(config.routing()),
            prototypes: config.prototypes.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn points found eligible by the most recent tick.
    #[must_use]
    pub fn eligible(&self) -> &[SpawnPointId] {
        self.eligibility.eligible()
    }

    /// Registers the scene markers and runs both placement passes.
    ///
    /// Markers that fail correction stay registered but are never activated
    /// or routed through.
    pub fn initialize<E, S, W>(
        &mut self,
        spawn_markers: S,
        waypoint_markers: W,
        environment: &E,
    ) -> InitializationReport
    where
        E: EnvironmentQuery + ?Sized,
        S: IntoIterator<Item = SpawnMarker>,
        W: IntoIterator<Item = WaypointMarker>,
    {
        let mut report = InitializationReport::default();

        let registered = self.apply_all(
            spawn_markers
                .into_iter()
                .map(|marker| Command::RegisterSpawnPoint { marker }),
        );
        let mut commands = Vec::new();
        self.spawn_correction.handle(
            &registered,
            &query::spawn_point_view(&self.world),
            environment,
            &mut commands,
        );
        report.events.extend(registered);
        report.events.extend(self.apply_all(commands.drain(..)));

        let registered = self.apply_all(
            waypoint_markers
                .into_iter()
                .map(|marker| Command::RegisterWaypoint { marker }),
        );
        self.waypoint_correction.handle(
            &registered,
            &query::waypoint_view(&self.world),
            environment,
            &mut commands,
        );
        report.events.extend(registered);
        report.events.extend(self.apply_all(commands.drain(..)));

        for event in &report.events {
            match event {
                Event::SpawnPointRelocated { .. } => report.spawn_points_placed += 1,
                Event::SpawnPointRejected { .. } => report.spawn_points_rejected += 1,
                Event::WaypointRelocated { .. } => report.waypoints_placed += 1,
                Event::WaypointRejected { .. } => report.waypoints_rejected += 1,
                _ => {}
            }
        }

        tracing::info!(
            placed = report.spawn_points_placed,
            rejected = report.spawn_points_rejected,
            "spawn points corrected"
        );
        tracing::info!(
            placed = report.waypoints_placed,
            rejected = report.waypoints_rejected,
            "waypoints corrected"
        );

        report
    }

    /// Moves the observer used for distance, visibility and actor tracking.
    ///
    /// Returns the events emitted by the world for the move.
    pub fn set_observer_pose(&mut self, pose: Pose) -> Vec<Event> {
        let events = self.apply_all([Command::SetObserverPose { pose }]);
        for event in &events {
            match event {
                Event::ObserverMoved { pose } => {
                    tracing::debug!(position = ?pose.position, "observer moved");
                }
                Event::CommandRejected { reason } => {
                    tracing::warn!(%reason, "observer move refused by world");
                }
                _ => {}
            }
        }
        events
    }

    /// Advances the director by `dt`.
    ///
    /// The phases run in a fixed order every tick: the clock advances, the
    /// population is counted through `host`, eligibility is recomputed, and
    /// finally at most one actor is spawned.
    pub fn tick<E, H>(&mut self, dt: Duration, environment: &E, host: &mut H) -> TickReport
    where
        E: EnvironmentQuery + ?Sized,
        H: ActorHost + ?Sized,
    {
        let mut events = self.apply_all([Command::Tick { dt }]);

        let census = Census::from_host(&*host);
        self.balancer.refresh(census);
        let allowed = self.balancer.allowed_active_points();

        let observer = *query::observer(&self.world);
        let mut commands = Vec::new();
        self.eligibility.handle(
            &query::spawn_point_view(&self.world),
            &observer,
            allowed,
            environment,
            &mut commands,
        );
        events.extend(self.apply_all(commands));

        let spawned = self.spawn(&mut events, &observer, host);

        let report = TickReport {
            tick: query::tick_index(&self.world),
            now: query::now(&self.world),
            census,
            allowed,
            eligible: self.eligibility.eligible().len(),
            spawned,
            events,
        };
        tracing::trace!(
            tick = report.tick,
            census = %report.census,
            allowed = report.allowed,
            eligible = report.eligible,
            "tick processed"
        );
        report
    }

    fn spawn<H>(
        &mut self,
        events: &mut Vec<Event>,
        observer: &Observer,
        host: &mut H,
    ) -> Option<SpawnRecord>
    where
        H: ActorHost + ?Sized,
    {
        let decision = self
            .balancer
            .handle(&events[..], self.eligibility.eligible(), &mut self.rng)?;
        let route = self
            .routing
            .assign(&query::waypoint_view(&self.world), &mut self.rng);

        let outcome = self.apply_all([Command::SpawnActor {
            archetype: decision.archetype,
            spawn_point: decision.spawn_point,
            route,
        }]);

        let mut spawned = None;
        for event in &outcome {
            match event {
                Event::ActorSpawnRequested {
                    archetype,
                    spawn_point,
                    pose,
                    route,
                } => {
                    let prototype = self.prototypes.get(*archetype);
                    let mut actor = host.instantiate(*archetype, prototype, *pose);
                    actor.set_route(route.clone());
                    actor.set_observer(observer.id);
                    tracing::info!(
                        %archetype,
                        spawn_point = spawn_point.get(),
                        stops = route.len(),
                        bidirectional = route.is_bidirectional(),
                        "actor spawned"
                    );
                    spawned = Some(SpawnRecord {
                        archetype: *archetype,
                        spawn_point: *spawn_point,
                        pose: *pose,
                        route: route.clone(),
                    });
                }
                Event::CommandRejected { reason } => {
                    tracing::warn!(%reason, "spawn refused by world");
                }
                _ => {}
            }
        }
        events.extend(outcome);

        spawned
    }

    fn apply_all<I>(&mut self, commands: I) -> Vec<Event>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }
}
