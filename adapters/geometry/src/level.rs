//! TOML level description: boxes, raw markers and the observer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use glam::{Quat, Vec3};
use serde::Deserialize;
use spawn_director_core::{
    Frustum, Observer, ObserverId, Pose, SpawnMarker, WaypointMarker,
};
use thiserror::Error;
use tracing::debug;

use crate::BoxLevel;

/// Name fragments of scene pieces that always block queries.
const STRUCTURAL_KEYWORDS: [&str; 4] = ["roof", "pipes", "floor", "wall"];

/// Errors raised while loading a level description.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level file could not be read.
    #[error("failed to read level at {path}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The level was not valid TOML or had unexpected fields.
    #[error("failed to parse level")]
    Parse(#[from] toml::de::Error),
    /// A geometry piece has a non-finite corner.
    #[error("geometry piece `{name}` has a non-finite corner")]
    NonFiniteGeometry {
        /// Name of the offending piece.
        name: String,
    },
    /// The observer camera cannot project anything.
    #[error("observer field of view must lie in (0, 180) degrees and aspect ratio must be positive")]
    InvalidCamera,
    /// The observer's clipping planes leave no visible depth range.
    #[error("observer clipping planes must satisfy 0 <= near < far, got near {near} and far {far}")]
    InvalidClipping {
        /// Configured near plane.
        near: f32,
        /// Configured far plane.
        far: f32,
    },
}

/// Fully loaded level ready to hand to a director.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    /// Queryable collision geometry.
    pub geometry: BoxLevel,
    /// Raw spawn markers awaiting correction.
    pub spawn_markers: Vec<SpawnMarker>,
    /// Raw waypoint markers awaiting correction.
    pub waypoint_markers: Vec<WaypointMarker>,
    /// Observer the director starts with.
    pub observer: Observer,
}

impl Level {
    /// Loads a level description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses a level description.
    ///
    /// Pieces without a collider are ignored by queries unless their name
    /// marks them as structural, in which case a collider is added.
    pub fn from_toml_str(contents: &str) -> Result<Self, LevelError> {
        let file: LevelFile = toml::from_str(contents)?;

        let mut geometry = BoxLevel::new();
        for piece in file.geometry {
            if !(piece.min.is_finite() && piece.max.is_finite()) {
                return Err(LevelError::NonFiniteGeometry { name: piece.name });
            }
            if !piece.collider {
                if !is_structural(&piece.name) {
                    continue;
                }
                debug!(name = %piece.name, "added missing collider to structural piece");
            }
            let _ = geometry.push(piece.name, piece.min, piece.max);
        }

        let observer = file.observer.into_observer()?;
        Ok(Self {
            geometry,
            spawn_markers: file
                .spawn
                .into_iter()
                .map(|marker| SpawnMarker {
                    pose: marker.pose(),
                    name: marker.name,
                })
                .collect(),
            waypoint_markers: file
                .waypoint
                .into_iter()
                .map(|marker| WaypointMarker {
                    pose: marker.pose(),
                    name: marker.name,
                })
                .collect(),
            observer,
        })
    }
}

fn is_structural(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    STRUCTURAL_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    #[serde(default)]
    observer: ObserverEntry,
    #[serde(default)]
    geometry: Vec<GeometryEntry>,
    #[serde(default)]
    spawn: Vec<MarkerEntry>,
    #[serde(default)]
    waypoint: Vec<MarkerEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeometryEntry {
    name: String,
    min: Vec3,
    max: Vec3,
    #[serde(default)]
    collider: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MarkerEntry {
    name: String,
    position: Vec3,
    #[serde(default)]
    yaw_degrees: f32,
}

impl MarkerEntry {
    fn pose(&self) -> Pose {
        Pose::new(self.position, Quat::from_rotation_y(self.yaw_degrees.to_radians()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ObserverEntry {
    id: u32,
    position: Vec3,
    yaw_degrees: f32,
    /// Positive values look down.
    pitch_degrees: f32,
    vertical_fov_degrees: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
}

impl Default for ObserverEntry {
    fn default() -> Self {
        let frustum = Frustum::default();
        Self {
            id: 0,
            position: Vec3::ZERO,
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            vertical_fov_degrees: frustum.vertical_fov.to_degrees(),
            aspect_ratio: frustum.aspect_ratio,
            near_plane: frustum.near,
            far_plane: frustum.far,
        }
    }
}

impl ObserverEntry {
    fn into_observer(self) -> Result<Observer, LevelError> {
        if !(self.vertical_fov_degrees > 0.0 && self.vertical_fov_degrees < 180.0)
            || !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite())
        {
            return Err(LevelError::InvalidCamera);
        }
        if !(self.near_plane >= 0.0 && self.far_plane > self.near_plane && self.far_plane.is_finite())
        {
            return Err(LevelError::InvalidClipping {
                near: self.near_plane,
                far: self.far_plane,
            });
        }

        let rotation = Quat::from_rotation_y(self.yaw_degrees.to_radians())
            * Quat::from_rotation_x(self.pitch_degrees.to_radians());
        Ok(Observer::new(
            ObserverId::new(self.id),
            Pose::new(self.position, rotation),
            Frustum {
                vertical_fov: self.vertical_fov_degrees.to_radians(),
                aspect_ratio: self.aspect_ratio,
                near: self.near_plane,
                far: self.far_plane,
            },
        ))
    }
}
