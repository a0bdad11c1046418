#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Builds randomised patrol routes from the corrected waypoint set.

use std::collections::HashSet;

use rand::Rng;
use spawn_director_core::{PatrolRoute, RouteStop, WaypointId, WaypointView};

/// Sampling attempts granted per requested route slot before giving up.
const ATTEMPTS_PER_SLOT: usize = 16;

/// Configuration parameters required to construct the routing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    waypoints_per_route: usize,
}

impl Config {
    /// Creates a configuration producing routes of up to `waypoints_per_route` stops.
    #[must_use]
    pub const fn new(waypoints_per_route: usize) -> Self {
        Self {
            waypoints_per_route,
        }
    }
}

/// Route assigner that reuses its candidate pool and visited set.
#[derive(Debug)]
pub struct Routing {
    config: Config,
    pool: Vec<RouteStop>,
    visited: HashSet<WaypointId>,
}

impl Routing {
    /// Creates a new routing system with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: Vec::new(),
            visited: HashSet::new(),
        }
    }

    /// Samples a route of distinct valid waypoints and picks its walking mode.
    ///
    /// Waypoints are drawn uniformly with rejection of repeats until the route
    /// is full, the pool is exhausted, or the attempt budget runs out. The
    /// route is bidirectional with probability one half.
    pub fn assign<R: Rng + ?Sized>(&mut self, waypoints: &WaypointView, rng: &mut R) -> PatrolRoute {
        self.pool.clear();
        self.pool.extend(waypoints.valid().map(|snapshot| RouteStop {
            waypoint: snapshot.id,
            position: snapshot.pose.position,
        }));
        self.visited.clear();

        let target = self.config.waypoints_per_route.min(self.pool.len());
        let mut stops = Vec::with_capacity(target);
        let mut attempts = target.saturating_mul(ATTEMPTS_PER_SLOT);

        while stops.len() < target && attempts > 0 {
            attempts -= 1;
            let candidate = self.pool[rng.gen_range(0..self.pool.len())];
            if self.visited.insert(candidate.waypoint) {
                stops.push(candidate);
            }
        }

        PatrolRoute::new(stops, rng.gen_bool(0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use spawn_director_core::{Pose, WaypointSnapshot};

    fn waypoints(valid: u32, invalid: u32) -> WaypointView {
        let snapshots = (0..valid + invalid)
            .map(|index| WaypointSnapshot {
                id: WaypointId::new(index),
                name: format!("waypoint_{index}"),
                pose: Pose::at(Vec3::new(index as f32, 0.5, 0.0)),
                valid: index < valid,
            })
            .collect();
        WaypointView::from_snapshots(snapshots)
    }

    #[test]
    fn routes_never_repeat_a_waypoint() {
        let mut routing = Routing::new(Config::new(5));
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let view = waypoints(12, 0);

        for _ in 0..200 {
            let route = routing.assign(&view, &mut rng);
            let unique: HashSet<WaypointId> = route.waypoints().collect();
            assert_eq!(unique.len(), route.len());
            assert!(route.len() <= 5);
        }
    }

    #[test]
    fn small_pool_terminates_with_every_waypoint() {
        let mut routing = Routing::new(Config::new(5));
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let view = waypoints(3, 0);

        let route = routing.assign(&view, &mut rng);

        assert_eq!(route.len(), 3);
        let mut ids: Vec<u32> = route.waypoints().map(|id| id.get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn rejected_waypoints_are_never_routed() {
        let mut routing = Routing::new(Config::new(4));
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let view = waypoints(2, 6);

        for _ in 0..50 {
            let route = routing.assign(&view, &mut rng);
            assert!(route.waypoints().all(|id| id.get() < 2));
        }
    }

    #[test]
    fn empty_pool_yields_an_empty_route() {
        let mut routing = Routing::new(Config::new(5));
        let mut rng = ChaCha8Rng::seed_from_u64(14);

        let route = routing.assign(&waypoints(0, 3), &mut rng);

        assert!(route.is_empty());
    }

    #[test]
    fn both_walking_modes_occur() {
        let mut routing = Routing::new(Config::new(2));
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        let view = waypoints(6, 0);

        let bidirectional = (0..200)
            .filter(|_| routing.assign(&view, &mut rng).is_bidirectional())
            .count();

        assert!((60..=140).contains(&bidirectional), "{bidirectional} of 200");
    }

    #[test]
    fn stops_carry_corrected_positions() {
        let mut routing = Routing::new(Config::new(3));
        let mut rng = ChaCha8Rng::seed_from_u64(16);

        let route = routing.assign(&waypoints(3, 0), &mut rng);

        for stop in route.stops() {
            assert_eq!(stop.position, Vec3::new(stop.waypoint.get() as f32, 0.5, 0.0));
        }
    }
}
