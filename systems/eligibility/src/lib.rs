#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which spawn points may host a spawn this tick.
//!
//! A point is eligible when it passed placement, the observer cannot see it,
//! and it lies strictly inside the configured distance band. The eligible set
//! is rebuilt from scratch every tick, closest point first.

use std::cmp::Ordering;

use glam::Vec3;
use spawn_director_core::{
    Command, DistanceBand, EnvironmentQuery, HitTarget, Observer, SpawnPointId,
    SpawnPointSnapshot, SpawnPointView,
};

/// Configuration parameters required to construct the eligibility system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    band: DistanceBand,
}

impl Config {
    /// Creates a configuration accepting distances strictly inside `band`.
    #[must_use]
    pub const fn new(band: DistanceBand) -> Self {
        Self { band }
    }
}

/// Eligibility system that reuses scratch buffers between ticks.
#[derive(Debug)]
pub struct Eligibility {
    config: Config,
    candidates: Vec<Candidate>,
    eligible: Vec<SpawnPointId>,
}

impl Eligibility {
    /// Creates a new eligibility system with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            candidates: Vec::new(),
            eligible: Vec::new(),
        }
    }

    /// Spawn points found eligible by the latest [`Eligibility::handle`] call,
    /// ordered from closest to farthest.
    #[must_use]
    pub fn eligible(&self) -> &[SpawnPointId] {
        &self.eligible
    }

    /// Recomputes eligibility for every spawn point.
    ///
    /// `allowed` is the throttle derived from the population headroom; when it
    /// is zero or negative every point is deactivated without being evaluated.
    /// Only state changes are pushed into `out`.
    pub fn handle<E: EnvironmentQuery + ?Sized>(
        &mut self,
        spawn_points: &SpawnPointView,
        observer: &Observer,
        allowed: i64,
        environment: &E,
        out: &mut Vec<Command>,
    ) {
        self.eligible.clear();

        if allowed <= 0 {
            for snapshot in spawn_points.iter() {
                push_transition(snapshot, false, out);
            }
            return;
        }

        self.prepare_candidates(spawn_points, observer);

        for candidate in &self.candidates {
            let Some(snapshot) = spawn_points.get(candidate.id) else {
                continue;
            };
            let active = snapshot.valid
                && self.config.band.contains(candidate.distance)
                && !is_seen(environment, observer, candidate.id, snapshot.pose.position);
            if active {
                self.eligible.push(candidate.id);
            }
            push_transition(snapshot, active, out);
        }
    }

    fn prepare_candidates(&mut self, spawn_points: &SpawnPointView, observer: &Observer) {
        self.candidates.clear();
        self.candidates
            .extend(spawn_points.iter().map(|snapshot| Candidate {
                id: snapshot.id,
                distance: observer.distance_to(snapshot.pose.position),
            }));
        self.candidates.sort_by(Candidate::closest_first);
    }
}

/// Reports whether the observer has an unobstructed view of `point`.
///
/// The point must project inside the view volume, and a ray from the observer
/// toward it must either reach it unobstructed or first touch the spawn point
/// itself.
#[must_use]
pub fn is_seen<E: EnvironmentQuery + ?Sized>(
    environment: &E,
    observer: &Observer,
    spawn_point: SpawnPointId,
    point: Vec3,
) -> bool {
    if !environment
        .viewport_project(observer, point)
        .is_inside_view_volume()
    {
        return false;
    }

    let offset = point - observer.position();
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return true;
    }

    match environment.ray_cast(observer.position(), offset / distance, distance) {
        None => true,
        Some(hit) => hit.target == HitTarget::SpawnPoint(spawn_point),
    }
}

fn push_transition(snapshot: &SpawnPointSnapshot, active: bool, out: &mut Vec<Command>) {
    if snapshot.active != active {
        out.push(Command::SetSpawnPointActive {
            spawn_point: snapshot.id,
            active,
        });
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    id: SpawnPointId,
    distance: f32,
}

impl Candidate {
    fn closest_first(left: &Self, right: &Self) -> Ordering {
        left.distance
            .total_cmp(&right.distance)
            .then_with(|| left.id.cmp(&right.id))
    }
}
