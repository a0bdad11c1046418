#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative registry of spawn points, waypoints and the observer.

use std::time::Duration;

use glam::Vec3;
use spawn_director_core::{
    Command, Event, Observer, Pose, RejectionReason, SpawnMarker, SpawnPointId, WaypointId,
    WaypointMarker,
};

/// Represents the authoritative spawn director world state.
#[derive(Debug)]
pub struct World {
    spawn_points: Vec<SpawnPoint>,
    waypoints: Vec<Waypoint>,
    observer: Observer,
    clock: Duration,
    tick_index: u64,
}

impl World {
    /// Creates an empty world watched by `observer`.
    #[must_use]
    pub fn new(observer: Observer) -> Self {
        Self {
            spawn_points: Vec::new(),
            waypoints: Vec::new(),
            observer,
            clock: Duration::ZERO,
            tick_index: 0,
        }
    }

    fn spawn_point_mut(&mut self, id: SpawnPointId) -> Option<&mut SpawnPoint> {
        let index = usize::try_from(id.get()).ok()?;
        self.spawn_points.get_mut(index)
    }

    fn waypoint_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        let index = usize::try_from(id.get()).ok()?;
        self.waypoints.get_mut(index)
    }

    fn register_spawn_point(&mut self, marker: SpawnMarker) -> SpawnPointId {
        let id = SpawnPointId::new(next_identifier(self.spawn_points.len()));
        self.spawn_points.push(SpawnPoint {
            id,
            name: marker.name,
            pose: marker.pose,
            placement: Placement::Pending,
            active: false,
        });
        id
    }

    fn register_waypoint(&mut self, marker: WaypointMarker) -> WaypointId {
        let id = WaypointId::new(next_identifier(self.waypoints.len()));
        self.waypoints.push(Waypoint {
            id,
            name: marker.name,
            pose: marker.pose,
            placement: Placement::Pending,
        });
        id
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RegisterSpawnPoint { marker } => {
            let spawn_point = world.register_spawn_point(marker);
            out_events.push(Event::SpawnPointRegistered { spawn_point });
        }
        Command::RegisterWaypoint { marker } => {
            let waypoint = world.register_waypoint(marker);
            out_events.push(Event::WaypointRegistered { waypoint });
        }
        Command::RelocateSpawnPoint {
            spawn_point,
            position,
        } => {
            let Some(point) = world.spawn_point_mut(spawn_point) else {
                reject(out_events, RejectionReason::UnknownSpawnPoint(spawn_point));
                return;
            };
            if point.placement != Placement::Pending {
                reject(
                    out_events,
                    RejectionReason::SpawnPointAlreadyResolved(spawn_point),
                );
                return;
            }

            let from = point.relocate(position);
            out_events.push(Event::SpawnPointRelocated {
                spawn_point,
                from,
                to: position,
            });
        }
        Command::RejectSpawnPoint {
            spawn_point,
            missed,
        } => {
            let Some(point) = world.spawn_point_mut(spawn_point) else {
                reject(out_events, RejectionReason::UnknownSpawnPoint(spawn_point));
                return;
            };
            if point.placement != Placement::Pending {
                reject(
                    out_events,
                    RejectionReason::SpawnPointAlreadyResolved(spawn_point),
                );
                return;
            }

            point.placement = Placement::Rejected;
            point.active = false;
            out_events.push(Event::SpawnPointRejected {
                spawn_point,
                missed,
            });
        }
        Command::RelocateWaypoint { waypoint, position } => {
            let Some(entry) = world.waypoint_mut(waypoint) else {
                reject(out_events, RejectionReason::UnknownWaypoint(waypoint));
                return;
            };
            if entry.placement != Placement::Pending {
                reject(out_events, RejectionReason::WaypointAlreadyResolved(waypoint));
                return;
            }

            let from = entry.pose.position;
            entry.pose = entry.pose.with_position(position);
            entry.placement = Placement::Placed;
            out_events.push(Event::WaypointRelocated {
                waypoint,
                from,
                to: position,
            });
        }
        Command::RejectWaypoint { waypoint, missed } => {
            let Some(entry) = world.waypoint_mut(waypoint) else {
                reject(out_events, RejectionReason::UnknownWaypoint(waypoint));
                return;
            };
            if entry.placement != Placement::Pending {
                reject(out_events, RejectionReason::WaypointAlreadyResolved(waypoint));
                return;
            }

            entry.placement = Placement::Rejected;
            out_events.push(Event::WaypointRejected { waypoint, missed });
        }
        Command::SetObserverPose { pose } => {
            world.observer.pose = pose;
            out_events.push(Event::ObserverMoved { pose });
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                now: world.clock,
            });
        }
        Command::SetSpawnPointActive {
            spawn_point,
            active,
        } => {
            let Some(point) = world.spawn_point_mut(spawn_point) else {
                reject(out_events, RejectionReason::UnknownSpawnPoint(spawn_point));
                return;
            };
            if active && point.placement != Placement::Placed {
                reject(out_events, RejectionReason::InvalidSpawnPoint(spawn_point));
                return;
            }
            if point.active == active {
                return;
            }

            point.active = active;
            if active {
                out_events.push(Event::SpawnPointActivated { spawn_point });
            } else {
                out_events.push(Event::SpawnPointDeactivated { spawn_point });
            }
        }
        Command::SpawnActor {
            archetype,
            spawn_point,
            route,
        } => {
            let Some(point) = world.spawn_point_mut(spawn_point) else {
                reject(out_events, RejectionReason::UnknownSpawnPoint(spawn_point));
                return;
            };
            if point.placement != Placement::Placed {
                reject(out_events, RejectionReason::InvalidSpawnPoint(spawn_point));
                return;
            }
            if !point.active {
                reject(out_events, RejectionReason::InactiveSpawnPoint(spawn_point));
                return;
            }

            out_events.push(Event::ActorSpawnRequested {
                archetype,
                spawn_point,
                pose: point.pose,
                route,
            });
        }
    }
}

fn reject(out_events: &mut Vec<Event>, reason: RejectionReason) {
    out_events.push(Event::CommandRejected { reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use spawn_director_core::{
        Observer, SpawnPointId, SpawnPointSnapshot, SpawnPointView, WaypointSnapshot,
        WaypointView,
    };

    use super::{Placement, World};

    /// Captures a read-only view of every registered spawn point.
    #[must_use]
    pub fn spawn_point_view(world: &World) -> SpawnPointView {
        SpawnPointView::from_snapshots(
            world
                .spawn_points
                .iter()
                .map(|point| SpawnPointSnapshot {
                    id: point.id,
                    name: point.name.clone(),
                    pose: point.pose,
                    valid: point.placement == Placement::Placed,
                    active: point.active,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every registered waypoint.
    #[must_use]
    pub fn waypoint_view(world: &World) -> WaypointView {
        WaypointView::from_snapshots(
            world
                .waypoints
                .iter()
                .map(|waypoint| WaypointSnapshot {
                    id: waypoint.id,
                    name: waypoint.name.clone(),
                    pose: waypoint.pose,
                    valid: waypoint.placement == Placement::Placed,
                })
                .collect(),
        )
    }

    /// Identifiers of spawn points that are active this tick.
    #[must_use]
    pub fn active_spawn_points(world: &World) -> Vec<SpawnPointId> {
        world
            .spawn_points
            .iter()
            .filter(|point| point.active)
            .map(|point| point.id)
            .collect()
    }

    /// Provides read-only access to the observer.
    #[must_use]
    pub fn observer(world: &World) -> &Observer {
        &world.observer
    }

    /// Total simulated time accumulated by `Tick` commands.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placement {
    Pending,
    Placed,
    Rejected,
}

#[derive(Clone, Debug)]
struct SpawnPoint {
    id: SpawnPointId,
    name: String,
    pose: Pose,
    placement: Placement,
    active: bool,
}

impl SpawnPoint {
    fn relocate(&mut self, position: Vec3) -> Vec3 {
        let from = self.pose.position;
        self.pose = self.pose.with_position(position);
        self.placement = Placement::Placed;
        from
    }
}

#[derive(Clone, Debug)]
struct Waypoint {
    id: WaypointId,
    name: String,
    pose: Pose,
    placement: Placement,
}

fn next_identifier(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
