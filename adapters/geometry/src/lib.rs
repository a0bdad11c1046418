#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless engine stand-ins: a box-based level implementing
//! [`EnvironmentQuery`](spawn_director_core::EnvironmentQuery) and an
//! in-memory [`ActorHost`](spawn_director_core::ActorHost).

mod boxes;
mod host;
mod level;

pub use boxes::{BoxLevel, Solid};
pub use host::{ActorRecord, SimulatedActor, SimulatedHost};
pub use level::{Level, LevelError};
