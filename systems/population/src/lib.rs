#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Closed-loop population balancer.
//!
//! The balancer keeps the live ratio `secondary / primary` close to a target
//! by always spawning whichever archetype is under-represented, subject to a
//! hard population cap and a fixed cooldown between spawns.

use std::time::Duration;

use rand::Rng;
use spawn_director_core::{Archetype, Census, Event, SpawnPointId};

/// Configuration parameters required to construct the balancer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    cap: u32,
    target_ratio: f32,
    cooldown: Duration,
    primary: Archetype,
    secondary: Archetype,
}

impl Config {
    /// Creates a configuration balancing floaters against walkers.
    ///
    /// `target_ratio` is the desired `floaters / walkers` proportion.
    #[must_use]
    pub const fn new(cap: u32, target_ratio: f32, cooldown: Duration) -> Self {
        Self {
            cap,
            target_ratio,
            cooldown,
            primary: Archetype::Walker,
            secondary: Archetype::Floater,
        }
    }

    /// Overrides which archetypes form the numerator and denominator of the ratio.
    #[must_use]
    pub const fn with_archetypes(mut self, primary: Archetype, secondary: Archetype) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }
}

/// Spawn chosen by the balancer for the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnDecision {
    /// Archetype to instantiate.
    pub archetype: Archetype,
    /// Eligible spawn point hosting the actor.
    pub spawn_point: SpawnPointId,
}

/// Tracks the live population and decides when and what to spawn.
#[derive(Debug)]
pub struct PopulationBalancer {
    config: Config,
    census: Census,
    now: Duration,
    next_spawn_at: Duration,
}

impl PopulationBalancer {
    /// Creates a balancer that may spawn on the very first tick.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            census: Census::new(),
            now: Duration::ZERO,
            next_spawn_at: Duration::ZERO,
        }
    }

    /// Replaces the live counts with a fresh census from the host.
    pub fn refresh(&mut self, census: Census) {
        self.census = census;
    }

    /// Earliest simulated time at which the next spawn may happen.
    #[must_use]
    pub const fn next_spawn_at(&self) -> Duration {
        self.next_spawn_at
    }

    /// Number of spawn points the eligibility pass is allowed to consider.
    ///
    /// Half the remaining headroom under the cap, truncated toward zero. Zero
    /// or less means spawning is throttled for this tick.
    #[must_use]
    pub fn allowed_active_points(&self) -> i64 {
        (i64::from(self.config.cap) - i64::from(self.census.total())) / 2
    }

    /// Current `secondary / primary` ratio.
    ///
    /// An empty primary population yields `f32::INFINITY`, which makes the
    /// primary archetype the next pick.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        let primary = self.census.count(self.config.primary);
        if primary == 0 {
            return f32::INFINITY;
        }
        self.census.count(self.config.secondary) as f32 / primary as f32
    }

    /// Archetype that would be spawned given the current census.
    #[must_use]
    pub fn next_archetype(&self) -> Archetype {
        if self.ratio() > self.config.target_ratio {
            self.config.primary
        } else {
            self.config.secondary
        }
    }

    /// Consumes the tick's events and decides whether to spawn.
    ///
    /// A spawn is chosen only when the cooldown elapsed, `eligible` is not
    /// empty, and the population is below the cap. Choosing a spawn restarts
    /// the cooldown.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        events: &[Event],
        eligible: &[SpawnPointId],
        rng: &mut R,
    ) -> Option<SpawnDecision> {
        for event in events {
            if let Event::TimeAdvanced { now, .. } = event {
                self.now = *now;
            }
        }

        if self.now < self.next_spawn_at
            || eligible.is_empty()
            || self.census.total() >= self.config.cap
        {
            return None;
        }

        self.next_spawn_at = self.now.saturating_add(self.config.cooldown);
        let spawn_point = eligible[rng.gen_range(0..eligible.len())];
        Some(SpawnDecision {
            archetype: self.next_archetype(),
            spawn_point,
        })
    }
}
