//! Tween specs, in-flight tweens, and completion handles.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::core::geometry::{quadratic_bezier, Pose, Vec3};

/// Shape of the positional path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TweenPath {
    /// Straight line from start to end.
    #[default]
    Linear,
    /// Arc lifted `height` above the midpoint of start and end.
    Arc { height: f32 },
    /// Quadratic curve through an explicit control point.
    Curve { control: Vec3 },
}

impl TweenPath {
    fn position(self, start: Vec3, end: Vec3, t: f32) -> Vec3 {
        match self {
            TweenPath::Linear => start.lerp(end, t),
            TweenPath::Arc { height } => {
                let control = start.lerp(end, 0.5) + Vec3::new(0.0, 0.0, height);
                quadratic_bezier(start, control, end, t)
            }
            TweenPath::Curve { control } => quadratic_bezier(start, control, end, t),
        }
    }
}

/// How a tween finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Pending,
    /// Reached its end pose.
    Finished,
    /// Replaced by a newer tween on the same object, or by an immediate placement.
    Superseded,
}

/// Shared view of a tween's completion state.
///
/// Multi-step choreography polls `is_complete` between ticks instead of
/// nesting callbacks.
#[derive(Clone, Debug)]
pub struct AnimationHandle {
    state: Rc<Cell<Completion>>,
}

impl AnimationHandle {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(Completion::Pending)),
        }
    }

    /// A handle that is already finished.
    #[must_use]
    pub fn finished() -> Self {
        let handle = Self::new();
        handle.state.set(Completion::Finished);
        handle
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.state.get()
    }

    /// True once the tween finished or was superseded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.get() != Completion::Pending
    }

    fn resolve(&self, how: Completion) {
        if self.state.get() == Completion::Pending {
            self.state.set(how);
        }
    }
}

type Callback = Box<dyn FnOnce()>;

/// Description of a tween to start.
pub struct AnimationSpec {
    pub to: Pose,
    pub from: Option<Pose>,
    pub duration_ms: u64,
    pub path: TweenPath,
    on_complete: Option<Callback>,
}

impl AnimationSpec {
    /// Tween to `to` over `duration_ms`, starting from wherever the object is.
    #[must_use]
    pub fn to(to: Pose, duration_ms: u64) -> Self {
        Self {
            to,
            from: None,
            duration_ms,
            path: TweenPath::Linear,
            on_complete: None,
        }
    }

    /// Start from an explicit pose.
    #[must_use]
    pub fn starting_at(mut self, from: Pose) -> Self {
        self.from = Some(from);
        self
    }

    /// Follow a curved path.
    #[must_use]
    pub fn path(mut self, path: TweenPath) -> Self {
        self.path = path;
        self
    }

    /// Run `callback` exactly once when the tween finishes or is superseded.
    #[must_use]
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSpec")
            .field("to", &self.to)
            .field("from", &self.from)
            .field("duration_ms", &self.duration_ms)
            .field("path", &self.path)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// An installed tween.
pub(crate) struct Tween<K> {
    pub target: K,
    pub from: Pose,
    pub from_explicit: bool,
    pub to: Pose,
    pub path: TweenPath,
    pub duration_ms: u64,
    pub start_ms: u64,
    on_complete: Option<Callback>,
    handle: AnimationHandle,
}

impl<K> Tween<K> {
    pub fn install(target: K, spec: AnimationSpec, current: Pose, now: u64) -> (Self, AnimationHandle) {
        let handle = AnimationHandle::new();
        let tween = Self {
            target,
            from_explicit: spec.from.is_some(),
            from: spec.from.unwrap_or(current),
            to: spec.to,
            path: spec.path,
            duration_ms: spec.duration_ms,
            start_ms: now,
            on_complete: spec.on_complete,
            handle: handle.clone(),
        };
        (tween, handle)
    }

    /// Elapsed fraction at `now`, clamped to [0, 1].
    pub fn fraction(&self, now: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_ms) as f32;
        (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Pose at fraction `t`.
    pub fn sample(&self, t: f32) -> Pose {
        if t >= 1.0 {
            return self.to;
        }
        Pose {
            position: self.path.position(self.from.position, self.to.position, t),
            rotation: self.from.rotation.lerp(self.to.rotation, t),
        }
    }

    /// Resolve the handle and fire the callback. Consumes the tween.
    pub fn complete(mut self, how: Completion) {
        self.handle.resolve(how);
        if let Some(callback) = self.on_complete.take() {
            callback();
        }
    }
}
