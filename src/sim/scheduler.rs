/// Central registry of repeating tasks on a virtual millisecond clock.
///
/// ## Model
///
/// Every periodic behavior (gravity, walking, animation, the world's
/// collision/throw/pickup checks) is one `ScheduledTask`, keyed by its
/// owner and kind. Entities never hold timer handles; pausing an entity
/// means cancelling everything its owner key holds, resuming means
/// scheduling its current timer set again.
///
/// ## Firing order
///
/// `pop_due(now)` hands out one due occurrence at a time, earliest first,
/// ties broken by task id (creation order). The caller dispatches it and
/// asks again, so a handler that cancels other tasks takes effect before
/// the next occurrence is handed out.

use crate::domain::entity::EntityId;

/// Who a task belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Owner {
    World,
    Character,
    Enemy(EntityId),
    Cloud(EntityId),
    Projectile(EntityId),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TaskKind {
    Gravity,
    Movement,
    Animation,
    /// Projectile sideways travel.
    Flight,
    Collisions,
    Throwing,
    Collectables,
}

/// What to schedule: kind plus period.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerSpec {
    pub kind: TaskKind,
    pub period_ms: u64,
}

impl TimerSpec {
    pub const fn new(kind: TaskKind, period_ms: u64) -> Self {
        TimerSpec { kind, period_ms }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TaskId(u64);

#[derive(Clone, Debug)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub owner: Owner,
    pub kind: TaskKind,
    pub period_ms: u64,
    pub next_due: u64,
}

/// One occurrence handed out by `pop_due`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fired {
    pub id: TaskId,
    pub owner: Owner,
    pub kind: TaskKind,
    /// Scheduled time of this occurrence (not the time it was popped).
    pub at: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// Register a repeating task. First occurrence is one period after `now`.
    pub fn schedule(&mut self, owner: Owner, spec: TimerSpec, now: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let period_ms = spec.period_ms.max(1);
        self.tasks.push(ScheduledTask {
            id,
            owner,
            kind: spec.kind,
            period_ms,
            next_due: now + period_ms,
        });
        id
    }

    /// Schedule unless the owner already has a task of this kind.
    pub fn ensure(&mut self, owner: Owner, spec: TimerSpec, now: u64) -> TaskId {
        match self.find(owner, spec.kind) {
            Some(task) => task.id,
            None => self.schedule(owner, spec, now),
        }
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn cancel_kind(&mut self, owner: Owner, kind: TaskKind) -> bool {
        let mut cancelled = false;
        while let Some(id) = self.find(owner, kind).map(|t| t.id) {
            cancelled |= self.cancel(id);
        }
        cancelled
    }

    /// Cancel every task of `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: Owner) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        before - self.tasks.len()
    }

    /// Cancel the tasks of `owner` whose kind is not in `keep`.
    pub fn retain_kinds(&mut self, owner: Owner, keep: &[TaskKind]) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner || keep.contains(&t.kind));
        before - self.tasks.len()
    }

    /// Hard stop: drop every task.
    pub fn stop_all(&mut self) -> usize {
        let n = self.tasks.len();
        self.tasks.clear();
        n
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn count_for(&self, owner: Owner) -> usize {
        self.tasks.iter().filter(|t| t.owner == owner).count()
    }

    pub fn is_scheduled(&self, owner: Owner, kind: TaskKind) -> bool {
        self.find(owner, kind).is_some()
    }

    /// Earliest pending occurrence time.
    #[cfg(test)]
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.next_due).min()
    }

    /// Take the earliest occurrence due at or before `now` and advance
    /// that task by one period.
    pub fn pop_due(&mut self, now: u64) -> Option<Fired> {
        let task = self.tasks
            .iter_mut()
            .filter(|t| t.next_due <= now)
            .min_by_key(|t| (t.next_due, t.id))?;
        let fired = Fired {
            id: task.id,
            owner: task.owner,
            kind: task.kind,
            at: task.next_due,
        };
        task.next_due += task.period_ms;
        Some(fired)
    }

    fn find(&self, owner: Owner, kind: TaskKind) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.owner == owner && t.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: TimerSpec = TimerSpec::new(TaskKind::Movement, 10);
    const SLOW: TimerSpec = TimerSpec::new(TaskKind::Animation, 25);

    fn drain(s: &mut Scheduler, now: u64) -> Vec<(TaskKind, u64)> {
        std::iter::from_fn(|| s.pop_due(now)).map(|f| (f.kind, f.at)).collect()
    }

    #[test]
    fn fires_in_time_order_with_catch_up() {
        let mut s = Scheduler::new();
        s.schedule(Owner::Character, FAST, 0);
        s.schedule(Owner::Character, SLOW, 0);
        let fired = drain(&mut s, 50);
        assert_eq!(fired, vec![
            (TaskKind::Movement, 10),
            (TaskKind::Movement, 20),
            (TaskKind::Animation, 25),
            (TaskKind::Movement, 30),
            (TaskKind::Movement, 40),
            (TaskKind::Movement, 50),
            (TaskKind::Animation, 50),
        ]);
        assert_eq!(s.next_due(), Some(60));
    }

    #[test]
    fn ties_go_to_the_older_task() {
        let mut s = Scheduler::new();
        let a = s.schedule(Owner::World, TimerSpec::new(TaskKind::Collisions, 10), 0);
        let b = s.schedule(Owner::Character, TimerSpec::new(TaskKind::Gravity, 10), 0);
        assert_eq!(s.pop_due(10).map(|f| f.id), Some(a));
        assert_eq!(s.pop_due(10).map(|f| f.id), Some(b));
        assert_eq!(s.pop_due(10), None);
    }

    #[test]
    fn cancel_between_pops_takes_effect() {
        let mut s = Scheduler::new();
        s.schedule(Owner::Character, FAST, 0);
        let slow = s.schedule(Owner::Cloud(EntityId(3)), SLOW, 0);
        assert_eq!(s.pop_due(100).map(|f| f.kind), Some(TaskKind::Movement));
        assert!(s.cancel(slow));
        assert!(!s.cancel(slow));
        assert!(drain(&mut s, 100).iter().all(|(k, _)| *k == TaskKind::Movement));
    }

    #[test]
    fn cancel_kind_removes_every_copy() {
        let mut s = Scheduler::new();
        s.schedule(Owner::World, TimerSpec::new(TaskKind::Collisions, 200), 0);
        s.schedule(Owner::World, TimerSpec::new(TaskKind::Collisions, 200), 0);
        s.schedule(Owner::World, TimerSpec::new(TaskKind::Throwing, 50), 0);
        assert!(s.cancel_kind(Owner::World, TaskKind::Collisions));
        assert!(!s.cancel_kind(Owner::World, TaskKind::Collisions));
        assert_eq!(s.count_for(Owner::World), 1);
        assert!(s.is_scheduled(Owner::World, TaskKind::Throwing));
    }

    #[test]
    fn owner_operations() {
        let mut s = Scheduler::new();
        let chick = Owner::Enemy(EntityId(1));
        s.schedule(chick, FAST, 0);
        s.schedule(chick, SLOW, 0);
        s.schedule(Owner::Character, FAST, 0);
        assert_eq!(s.count_for(chick), 2);

        assert_eq!(s.retain_kinds(chick, &[TaskKind::Animation]), 1);
        assert!(s.is_scheduled(chick, TaskKind::Animation));
        assert!(!s.is_scheduled(chick, TaskKind::Movement));

        assert_eq!(s.cancel_owner(chick), 1);
        assert_eq!(s.active_count(), 1);
        assert_eq!(s.stop_all(), 1);
        assert_eq!(s.active_count(), 0);
        assert_eq!(s.pop_due(u64::MAX), None);
    }

    #[test]
    fn ensure_does_not_duplicate() {
        let mut s = Scheduler::new();
        let a = s.ensure(Owner::Character, FAST, 0);
        let b = s.ensure(Owner::Character, FAST, 5);
        assert_eq!(a, b);
        assert_eq!(s.active_count(), 1);
        assert!(s.cancel_kind(Owner::Character, TaskKind::Movement));
        assert_eq!(s.active_count(), 0);
    }
}
