//! Core types: identifiers, geometry, RNG, configuration, errors, time.
//!
//! Nothing in here knows about zones or events; every other module builds
//! on these.

pub mod ids;
pub mod geometry;
pub mod rng;
pub mod config;
pub mod error;
pub mod clock;
pub mod logging;

pub use ids::{CardId, ClientId, IdAllocator, ZoneId};
pub use geometry::{Pose, Vec3};
pub use rng::{GameRng, GameRngState};
pub use config::{AnimationConfig, LayoutConfig, ReplayConfig, TableConfig};
pub use error::{Result, TableError};
pub use clock::{Clock, ManualClock, SystemClock};
