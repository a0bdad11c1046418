#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement pass that pulls raw spawn markers toward the centre of the
//! surrounding cavity.
//!
//! Each newly registered spawn point is probed with six sweeps: capsules
//! shaped like the spawned actor along the lateral and longitudinal axes, and
//! spheres along the vertical axis. When every sweep touches geometry the
//! point is moved to the mean of the three opposing-pair midpoints. A single
//! miss means the marker sits outside the enclosed level and the point is
//! rejected for the rest of the session.

use glam::Vec3;
use spawn_director_core::{
    Command, EnvironmentQuery, Event, Pose, ProbeDirection, SpawnPointSnapshot, SpawnPointView,
};
use tracing::{debug, error};

const PROBES: [Probe; 6] = [
    Probe::capsule(ProbeDirection::Left),
    Probe::capsule(ProbeDirection::Right),
    Probe::capsule(ProbeDirection::Front),
    Probe::capsule(ProbeDirection::Back),
    Probe::sphere(ProbeDirection::Up),
    Probe::sphere(ProbeDirection::Down),
];

/// Configuration parameters required to construct the correction system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    capsule_radius: f32,
    capsule_half_height: f32,
    sweep_range: f32,
}

impl Config {
    /// Creates a configuration describing the probe volume and its reach.
    ///
    /// The capsule spans `position ± capsule_half_height` along world up. The
    /// vertical sphere probes reuse `capsule_radius`.
    #[must_use]
    pub const fn new(capsule_radius: f32, capsule_half_height: f32, sweep_range: f32) -> Self {
        Self {
            capsule_radius,
            capsule_half_height,
            sweep_range,
        }
    }
}

/// Outcome of probing a single raw pose.
#[derive(Clone, Debug, PartialEq)]
pub enum Correction {
    /// Every probe hit geometry; the point moves to the contained position.
    Relocated(Vec3),
    /// At least one probe escaped the level.
    Rejected {
        /// Probe directions that touched nothing within range.
        missed: Vec<ProbeDirection>,
    },
}

/// Pure system that resolves the placement of newly registered spawn points.
#[derive(Debug)]
pub struct SpawnCorrection {
    config: Config,
}

impl SpawnCorrection {
    /// Creates a new correction system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits a relocation or rejection for every spawn point registered in `events`.
    pub fn handle<E: EnvironmentQuery + ?Sized>(
        &self,
        events: &[Event],
        spawn_points: &SpawnPointView,
        environment: &E,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::SpawnPointRegistered { spawn_point } = event else {
                continue;
            };
            let Some(snapshot) = spawn_points.get(*spawn_point) else {
                continue;
            };

            out.push(self.resolve(snapshot, environment));
        }
    }

    /// Probes `pose` and computes where the spawn point should sit.
    #[must_use]
    pub fn correct<E: EnvironmentQuery + ?Sized>(&self, pose: &Pose, environment: &E) -> Correction {
        let mut hits = [Vec3::ZERO; 6];
        let mut missed = Vec::new();

        for (slot, probe) in hits.iter_mut().zip(PROBES) {
            match self.cast(probe, pose, environment) {
                Some(point) => *slot = point,
                None => missed.push(probe.direction),
            }
        }

        if !missed.is_empty() {
            return Correction::Rejected { missed };
        }

        let [left, right, front, back, up, down] = hits;
        let lateral = left.lerp(right, 0.5);
        let longitudinal = front.lerp(back, 0.5);
        let vertical = down.lerp(up, 0.5);
        Correction::Relocated((lateral + longitudinal + vertical) / 3.0)
    }

    fn resolve<E: EnvironmentQuery + ?Sized>(
        &self,
        snapshot: &SpawnPointSnapshot,
        environment: &E,
    ) -> Command {
        match self.correct(&snapshot.pose, environment) {
            Correction::Relocated(position) => {
                debug!(
                    spawn_point = snapshot.id.get(),
                    name = %snapshot.name,
                    from = ?snapshot.pose.position,
                    to = ?position,
                    "spawn point relocated"
                );
                Command::RelocateSpawnPoint {
                    spawn_point: snapshot.id,
                    position,
                }
            }
            Correction::Rejected { missed } => {
                for direction in &missed {
                    error!(
                        spawn_point = snapshot.id.get(),
                        name = %snapshot.name,
                        direction = %direction,
                        "{direction} probe of {} touched no geometry; make sure it is inside the level",
                        snapshot.name
                    );
                }
                Command::RejectSpawnPoint {
                    spawn_point: snapshot.id,
                    missed,
                }
            }
        }
    }

    fn cast<E: EnvironmentQuery + ?Sized>(
        &self,
        probe: Probe,
        pose: &Pose,
        environment: &E,
    ) -> Option<Vec3> {
        let direction = probe.direction.resolve(pose).normalize_or_zero();
        let origin = pose.position;
        let hit = match probe.shape {
            ProbeShape::Capsule => {
                let offset = Vec3::Y * self.config.capsule_half_height;
                environment.capsule_sweep(
                    origin - offset,
                    origin + offset,
                    self.config.capsule_radius,
                    direction,
                    self.config.sweep_range,
                )
            }
            ProbeShape::Sphere => environment.sphere_sweep(
                origin,
                self.config.capsule_radius,
                direction,
                self.config.sweep_range,
            ),
        };
        hit.map(|hit| hit.point)
    }
}

#[derive(Clone, Copy, Debug)]
enum ProbeShape {
    Capsule,
    Sphere,
}

#[derive(Clone, Copy, Debug)]
struct Probe {
    direction: ProbeDirection,
    shape: ProbeShape,
}

impl Probe {
    const fn capsule(direction: ProbeDirection) -> Self {
        Self {
            direction,
            shape: ProbeShape::Capsule,
        }
    }

    const fn sphere(direction: ProbeDirection) -> Self {
        Self {
            direction,
            shape: ProbeShape::Sphere,
        }
    }
}
