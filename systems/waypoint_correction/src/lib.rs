#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement pass that lifts raw waypoints to a fixed fraction of the local
//! floor-to-ceiling clearance.

use glam::Vec3;
use spawn_director_core::{
    Command, EnvironmentQuery, Event, Pose, ProbeDirection, WaypointSnapshot, WaypointView,
};
use tracing::{debug, warn};

/// Configuration parameters required to construct the correction system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    ray_range: f32,
    ground_offset_divisor: f32,
}

impl Config {
    /// Creates a configuration from the vertical ray reach and the clearance divisor.
    ///
    /// A divisor of `10.0` places the waypoint a tenth of the clearance above
    /// the floor.
    #[must_use]
    pub const fn new(ray_range: f32, ground_offset_divisor: f32) -> Self {
        Self {
            ray_range,
            ground_offset_divisor,
        }
    }
}

/// Outcome of probing a single raw waypoint.
#[derive(Clone, Debug, PartialEq)]
pub enum Correction {
    /// Both rays hit; the waypoint moves to the contained position.
    Relocated(Vec3),
    /// A vertical ray escaped, so no clearance can be measured.
    Rejected {
        /// Ray directions that touched nothing within range.
        missed: Vec<ProbeDirection>,
    },
}

/// Pure system that resolves the placement of newly registered waypoints.
#[derive(Debug)]
pub struct WaypointCorrection {
    config: Config,
}

impl WaypointCorrection {
    /// Creates a new correction system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits a relocation or rejection for every waypoint registered in `events`.
    pub fn handle<E: EnvironmentQuery + ?Sized>(
        &self,
        events: &[Event],
        waypoints: &WaypointView,
        environment: &E,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::WaypointRegistered { waypoint } = event else {
                continue;
            };
            let Some(snapshot) = waypoints.get(*waypoint) else {
                continue;
            };

            out.push(self.resolve(snapshot, environment));
        }
    }

    /// Measures the clearance around `pose` and computes the lifted position.
    #[must_use]
    pub fn correct<E: EnvironmentQuery + ?Sized>(&self, pose: &Pose, environment: &E) -> Correction {
        let up = pose.up().normalize_or_zero();
        let ceiling = environment.ray_cast(pose.position, up, self.config.ray_range);
        let floor = environment.ray_cast(pose.position, -up, self.config.ray_range);

        match (ceiling, floor) {
            (Some(ceiling), Some(floor)) => {
                let clearance = floor.point.distance(ceiling.point);
                let lift = clearance / self.config.ground_offset_divisor;
                Correction::Relocated(Vec3::new(
                    pose.position.x,
                    floor.point.y + lift,
                    pose.position.z,
                ))
            }
            (ceiling, floor) => {
                let mut missed = Vec::with_capacity(2);
                if ceiling.is_none() {
                    missed.push(ProbeDirection::Up);
                }
                if floor.is_none() {
                    missed.push(ProbeDirection::Down);
                }
                Correction::Rejected { missed }
            }
        }
    }

    fn resolve<E: EnvironmentQuery + ?Sized>(
        &self,
        snapshot: &WaypointSnapshot,
        environment: &E,
    ) -> Command {
        match self.correct(&snapshot.pose, environment) {
            Correction::Relocated(position) => {
                debug!(
                    waypoint = snapshot.id.get(),
                    name = %snapshot.name,
                    to = ?position,
                    "waypoint relocated"
                );
                Command::RelocateWaypoint {
                    waypoint: snapshot.id,
                    position,
                }
            }
            Correction::Rejected { missed } => {
                warn!(
                    waypoint = snapshot.id.get(),
                    name = %snapshot.name,
                    missed = ?missed,
                    "waypoint has no floor or ceiling within range; excluded from patrol routes"
                );
                Command::RejectWaypoint {
                    waypoint: snapshot.id,
                    missed,
                }
            }
        }
    }
}
