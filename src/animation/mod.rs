//! Animation scheduling for visible card transitions.
//!
//! ## Key Types
//!
//! - `AnimationScheduler`: FIFO of animation groups, advanced per tick
//! - `AnimationSpec`: target pose, duration, path, optional callback
//! - `AnimationHandle`: pollable completion state of one tween
//!
//! Game state never waits on animations. Zones commit their collections
//! synchronously and hand the pose change to the scheduler; the scheduler
//! only decides *when* the change becomes visible.

pub mod scheduler;
pub mod tween;

pub use scheduler::AnimationScheduler;
pub use tween::{AnimationHandle, AnimationSpec, Completion, TweenPath};
