//! Tuning surface for the director, loaded from TOML before the first tick.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use spawn_director_core::{Archetype, DistanceBand, PrototypeRef};
use thiserror::Error;

use spawn_director_system_eligibility as eligibility;
use spawn_director_system_population as population;
use spawn_director_system_routing as routing;
use spawn_director_system_spawn_correction as spawn_correction;
use spawn_director_system_waypoint_correction as waypoint_correction;

/// Errors raised while loading or validating a [`DirectorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read director config at {path}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration was not valid TOML or had unexpected fields.
    #[error("failed to parse director config")]
    Parse(#[from] toml::de::Error),
    /// The distance band is empty or negative.
    #[error("distance band requires 0 <= min < max, got min={min} max={max}")]
    InvalidDistanceBand {
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// The population cap allows no actors at all.
    #[error("population cap must be greater than zero")]
    ZeroCap,
    /// The target ratio is negative or not finite.
    #[error("target ratio must be a finite non-negative number, got {0}")]
    InvalidTargetRatio(f32),
    /// The cooldown cannot be represented as a duration.
    #[error("spawn cooldown must be a finite non-negative number of seconds, got {0}")]
    InvalidCooldown(f32),
    /// Both sides of the ratio name the same archetype.
    #[error("primary and secondary archetypes must differ, both are {0}")]
    DuplicateArchetype(Archetype),
    /// A length or divisor that must be positive is not.
    #[error("{field} must be greater than zero, got {value}")]
    NonPositive {
        /// Name of the offending setting.
        field: &'static str,
        /// Configured value.
        value: f32,
    },
    /// Routes would never contain a waypoint.
    #[error("waypoints_per_route must be greater than zero")]
    EmptyRoutes,
}

/// Root configuration for the director.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorConfig {
    /// Seed for every random decision the director makes.
    pub seed: u64,
    /// Acceptable observer distances for spawn points.
    pub distance: DistanceConfig,
    /// Population cap, ratio target and cadence.
    pub population: PopulationConfig,
    /// Prototype names the host instantiates for each archetype.
    pub prototypes: PrototypeConfig,
    /// Probe dimensions used by both placement passes.
    pub placement: PlacementConfig,
    /// Patrol route sizing.
    pub routes: RouteConfig,
}

/// Open distance band in which spawn points may be activated.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceConfig {
    /// Exclusive minimum distance to the observer.
    pub min: f32,
    /// Exclusive maximum distance to the observer.
    pub max: f32,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 50.0,
        }
    }
}

/// Population balancing parameters.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Maximum number of live actors.
    pub cap: u32,
    /// Desired `secondary / primary` ratio.
    pub target_ratio: f32,
    /// Seconds between successive spawns.
    pub cooldown_secs: f32,
    /// Denominator archetype of the ratio.
    pub primary: Archetype,
    /// Numerator archetype of the ratio.
    pub secondary: Archetype,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            cap: 10,
            target_ratio: 0.5,
            cooldown_secs: 1.5,
            primary: Archetype::Walker,
            secondary: Archetype::Floater,
        }
    }
}

/// Prototype names per archetype.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrototypeConfig {
    /// Prototype used for walkers.
    pub walker: PrototypeRef,
    /// Prototype used for floaters.
    pub floater: PrototypeRef,
}

impl PrototypeConfig {
    /// Prototype registered for `archetype`.
    #[must_use]
    pub fn get(&self, archetype: Archetype) -> &PrototypeRef {
        match archetype {
            Archetype::Walker => &self.walker,
            Archetype::Floater => &self.floater,
        }
    }
}

impl Default for PrototypeConfig {
    fn default() -> Self {
        Self {
            walker: PrototypeRef::new("walker"),
            floater: PrototypeRef::new("floater"),
        }
    }
}

/// Probe dimensions for spawn point and waypoint correction.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementConfig {
    /// Radius of the capsule and sphere probes.
    pub capsule_radius: f32,
    /// Distance from the probe centre to each capsule end.
    pub capsule_half_height: f32,
    /// Reach of spawn point sweeps.
    pub sweep_range: f32,
    /// Reach of the vertical waypoint rays.
    pub waypoint_ray_range: f32,
    /// Waypoints sit `clearance / ground_offset_divisor` above the floor.
    pub ground_offset_divisor: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            capsule_radius: 0.5,
            capsule_half_height: 1.0,
            sweep_range: 500.0,
            waypoint_ray_range: 10.0,
            ground_offset_divisor: 10.0,
        }
    }
}

/// Patrol route sizing.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    /// Upper bound on stops per route.
    pub waypoints_per_route: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            waypoints_per_route: 5,
        }
    }
}

impl DirectorConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every cross-field constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let DistanceConfig { min, max } = self.distance;
        if !(min >= 0.0 && min < max && max.is_finite()) {
            return Err(ConfigError::InvalidDistanceBand { min, max });
        }

        let population = &self.population;
        if population.cap == 0 {
            return Err(ConfigError::ZeroCap);
        }
        if !(population.target_ratio.is_finite() && population.target_ratio >= 0.0) {
            return Err(ConfigError::InvalidTargetRatio(population.target_ratio));
        }
        let _ = self.cooldown()?;
        if population.primary == population.secondary {
            return Err(ConfigError::DuplicateArchetype(population.primary));
        }

        let placement = &self.placement;
        for (field, value) in [
            ("capsule_radius", placement.capsule_radius),
            ("capsule_half_height", placement.capsule_half_height),
            ("sweep_range", placement.sweep_range),
            ("waypoint_ray_range", placement.waypoint_ray_range),
            ("ground_offset_divisor", placement.ground_offset_divisor),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.routes.waypoints_per_route == 0 {
            return Err(ConfigError::EmptyRoutes);
        }

        Ok(())
    }

    fn cooldown(&self) -> Result<Duration, ConfigError> {
        let seconds = self.population.cooldown_secs;
        Duration::try_from_secs_f32(seconds).map_err(|_| ConfigError::InvalidCooldown(seconds))
    }

    pub(crate) fn spawn_correction(&self) -> spawn_correction::Config {
        spawn_correction::Config::new(
            self.placement.capsule_radius,
            self.placement.capsule_half_height,
            self.placement.sweep_range,
        )
    }

    pub(crate) fn waypoint_correction(&self) -> waypoint_correction::Config {
        waypoint_correction::Config::new(
            self.placement.waypoint_ray_range,
            self.placement.ground_offset_divisor,
        )
    }

    pub(crate) fn eligibility(&self) -> eligibility::Config {
        eligibility::Config::new(DistanceBand::new(self.distance.min, self.distance.max))
    }

    pub(crate) fn population(&self) -> Result<population::Config, ConfigError> {
        Ok(population::Config::new(
            self.population.cap,
            self.population.target_ratio,
            self.cooldown()?,
        )
        .with_archetypes(self.population.primary, self.population.secondary))
    }

    pub(crate) fn routing(&self) -> routing::Config {
        routing::Config::new(self.routes.waypoints_per_route)
    }
}
