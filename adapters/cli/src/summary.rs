//! Aggregates tick reports into the run summary printed by the CLI.

use std::{fmt, time::Duration};

use spawn_director_core::{Archetype, Census};
use spawn_director_geometry::SimulatedHost;
use spawn_director_system_director::{InitializationReport, TickReport};

#[derive(Debug, Default)]
pub(crate) struct Summary {
    spawn_points_placed: usize,
    spawn_points_rejected: usize,
    waypoints_placed: usize,
    waypoints_rejected: usize,
    ticks: u64,
    elapsed: Duration,
    spawned: [u64; Archetype::ALL.len()],
    idle_ticks: u64,
    peak_population: u32,
    retired: u64,
    final_census: Census,
}

impl Summary {
    pub(crate) fn new(initialization: &InitializationReport) -> Self {
        Self {
            spawn_points_placed: initialization.spawn_points_placed,
            spawn_points_rejected: initialization.spawn_points_rejected,
            waypoints_placed: initialization.waypoints_placed,
            waypoints_rejected: initialization.waypoints_rejected,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, report: &TickReport) {
        self.ticks = report.tick;
        self.elapsed = report.now;
        self.peak_population = self.peak_population.max(report.census.total());
        if report.eligible == 0 {
            self.idle_ticks += 1;
        }
        if let Some(record) = &report.spawned {
            self.spawned[record.archetype.index()] += 1;
        }
    }

    pub(crate) fn finish(&mut self, host: &SimulatedHost) {
        self.final_census = Census::from_host(host);
        self.retired = host.retired();
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ticks: {} ({:.1}s simulated)",
            self.ticks,
            self.elapsed.as_secs_f32()
        )?;
        writeln!(
            f,
            "spawn points: {} placed, {} rejected",
            self.spawn_points_placed, self.spawn_points_rejected
        )?;
        writeln!(
            f,
            "waypoints: {} placed, {} rejected",
            self.waypoints_placed, self.waypoints_rejected
        )?;
        for archetype in Archetype::ALL {
            writeln!(f, "spawned {archetype}: {}", self.spawned[archetype.index()])?;
        }
        writeln!(f, "ticks without eligible spawn points: {}", self.idle_ticks)?;
        writeln!(f, "peak population: {}", self.peak_population)?;
        writeln!(f, "retired actors: {}", self.retired)?;
        writeln!(f, "final census: {}", self.final_census)
    }
}
