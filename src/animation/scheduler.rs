//! FIFO animation-group scheduler.
//!
//! The scheduler keeps a queue of groups that always holds at least one
//! group. New tweens go into the *write target* (the back of the queue);
//! only the *head* group is advanced. A group therefore fully drains before
//! anything queued behind it moves, which is how composite operations keep
//! step N's visuals ahead of step N+1's.
//!
//! Within a group an object has at most one tween. Starting another one on
//! the same object in the write target first completes the old one as
//! superseded, firing its callback exactly once.

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::tween::{AnimationHandle, AnimationSpec, Completion, Tween};
use crate::core::geometry::Pose;

struct AnimationGroup<K> {
    members: SmallVec<[Tween<K>; 4]>,
}

impl<K: PartialEq> AnimationGroup<K> {
    fn new() -> Self {
        Self {
            members: SmallVec::new(),
        }
    }

    fn position(&self, target: &K) -> Option<usize> {
        self.members.iter().position(|t| &t.target == target)
    }

    fn take(&mut self, target: &K) -> Option<Tween<K>> {
        let index = self.position(target)?;
        Some(self.members.remove(index))
    }
}

/// Queue of animation groups plus the current pose of every object.
pub struct AnimationScheduler<K> {
    groups: VecDeque<AnimationGroup<K>>,
    poses: FxHashMap<K, Pose>,
    now: u64,
}

impl<K> std::fmt::Debug for AnimationScheduler<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let in_flight: usize = self.groups.iter().map(|g| g.members.len()).sum();
        f.debug_struct("AnimationScheduler")
            .field("groups", &self.groups.len())
            .field("in_flight", &in_flight)
            .field("posed", &self.poses.len())
            .field("now", &self.now)
            .finish()
    }
}

impl<K: Clone + Eq + Hash> Default for AnimationScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> AnimationScheduler<K> {
    /// Create a scheduler with a single empty group.
    #[must_use]
    pub fn new() -> Self {
        let mut groups = VecDeque::new();
        groups.push_back(AnimationGroup::new());
        Self {
            groups,
            poses: FxHashMap::default(),
            now: 0,
        }
    }

    /// Time of the last `advance`.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of queued groups (always at least one).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// True when no tween is in flight anywhere.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.groups.iter().all(|g| g.members.is_empty())
    }

    /// Is `target` animating in any queued group?
    #[must_use]
    pub fn is_animating(&self, target: &K) -> bool {
        self.groups.iter().any(|g| g.position(target).is_some())
    }

    /// Push a new empty group; subsequent tweens go into it.
    pub fn enqueue_group(&mut self) {
        self.groups.push_back(AnimationGroup::new());
    }

    /// Current pose of `target`, if it has ever been placed.
    #[must_use]
    pub fn pose(&self, target: &K) -> Option<Pose> {
        self.poses.get(target).copied()
    }

    /// Pin `target` at its current visual pose and return it.
    ///
    /// Objects that were never placed are pinned at `fallback`.
    pub fn snapshot_pose(&mut self, target: &K, fallback: Pose) -> Pose {
        *self.poses.entry(target.clone()).or_insert(fallback)
    }

    /// Place `target` immediately, superseding any tween it has.
    pub fn place(&mut self, target: &K, pose: Pose) {
        self.cancel(target);
        self.poses.insert(target.clone(), pose);
    }

    /// Complete every tween on `target` as superseded, leaving it where it is.
    pub fn cancel(&mut self, target: &K) {
        for group in &mut self.groups {
            if let Some(tween) = group.take(target) {
                tween.complete(Completion::Superseded);
            }
        }
    }

    /// Cancel any tween on `target` and drop its pose.
    pub fn forget(&mut self, target: &K) {
        self.cancel(target);
        self.poses.remove(target);
    }

    /// Start a tween on `target` in the write-target group.
    pub fn animate(&mut self, target: K, spec: AnimationSpec) -> AnimationHandle {
        let now = self.now;
        let current = self.poses.get(&target).copied().unwrap_or(spec.to);
        let Some(group) = self.groups.back_mut() else {
            unreachable!("scheduler always holds at least one group");
        };

        if let Some(previous) = group.take(&target) {
            previous.complete(Completion::Superseded);
        }

        let (tween, handle) = Tween::install(target, spec, current, now);
        group.members.push(tween);
        handle
    }

    /// Advance the head group to `now`.
    ///
    /// Finished tweens snap to their end pose and complete. When the head
    /// empties and more groups are queued, it is dropped, every remaining
    /// tween restarts its clock at `now`, and the new head is advanced in
    /// the same call.
    pub fn advance(&mut self, now: u64) {
        self.now = now;
        loop {
            self.advance_head(now);

            let head_empty = self.groups.front().is_some_and(|g| g.members.is_empty());
            if !head_empty || self.groups.len() == 1 {
                break;
            }
            self.groups.pop_front();
            self.restart_queued(now);
            trace!(remaining = self.groups.len(), "animation group drained");
        }
    }

    fn advance_head(&mut self, now: u64) {
        let Some(head) = self.groups.front_mut() else {
            return;
        };

        let mut finished = SmallVec::<[usize; 4]>::new();
        for (index, tween) in head.members.iter().enumerate() {
            let t = tween.fraction(now);
            self.poses.insert(tween.target.clone(), tween.sample(t));
            if t >= 1.0 {
                finished.push(index);
            }
        }

        for index in finished.into_iter().rev() {
            let tween = head.members.remove(index);
            tween.complete(Completion::Finished);
        }
    }

    fn restart_queued(&mut self, now: u64) {
        for (depth, group) in self.groups.iter_mut().enumerate() {
            for tween in &mut group.members {
                tween.start_ms = now;
                if depth == 0 && !tween.from_explicit {
                    if let Some(pose) = self.poses.get(&tween.target) {
                        tween.from = *pose;
                    }
                }
            }
        }
    }
}
