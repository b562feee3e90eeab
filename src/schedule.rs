//! Deferred and repeating tasks driven by an external clock.
//!
//! The engine never sleeps; the transport calls [`Timers::due`] with the
//! current time and dispatches whatever fired. Tasks are tagged with the
//! match generation that scheduled them so the dispatcher can drop callbacks
//! that outlived their match.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    MatchTick,
    PowerUpRefresh,
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTask {
    pub handle: TaskHandle,
    pub kind: TaskKind,
    pub due_ms: u64,
    pub generation: u64,
}

#[derive(Clone, Debug)]
struct ScheduledTask {
    handle: TaskHandle,
    kind: TaskKind,
    due_ms: u64,
    every_ms: Option<u64>,
    generation: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Timers {
    tasks: Vec<ScheduledTask>,
    next_handle: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_once(&mut self, kind: TaskKind, due_ms: u64, generation: u64) -> TaskHandle {
        self.push(kind, due_ms, None, generation)
    }

    pub fn schedule_every(
        &mut self,
        kind: TaskKind,
        first_due_ms: u64,
        every_ms: u64,
        generation: u64,
    ) -> TaskHandle {
        self.push(kind, first_due_ms, Some(every_ms.max(1)), generation)
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|task| task.kind == kind)
    }

    /// Pops every task due at or before `now_ms`, oldest first.
    ///
    /// A repeating task fires once per elapsed period, so a late caller still
    /// sees every occurrence.
    pub fn due(&mut self, now_ms: u64) -> Vec<FiredTask> {
        let mut fired = Vec::new();
        let mut kept = Vec::with_capacity(self.tasks.len());
        for mut task in self.tasks.drain(..) {
            while task.due_ms <= now_ms {
                fired.push(FiredTask {
                    handle: task.handle,
                    kind: task.kind,
                    due_ms: task.due_ms,
                    generation: task.generation,
                });
                match task.every_ms {
                    Some(every_ms) => task.due_ms += every_ms,
                    None => break,
                }
            }
            if task.due_ms > now_ms {
                kept.push(task);
            }
        }
        self.tasks = kept;
        fired.sort_by_key(|task| (task.due_ms, task.handle.0));
        fired
    }

    fn push(
        &mut self,
        kind: TaskKind,
        due_ms: u64,
        every_ms: Option<u64>,
        generation: u64,
    ) -> TaskHandle {
        self.next_handle += 1;
        let handle = TaskHandle(self.next_handle);
        self.tasks.push(ScheduledTask {
            handle,
            kind,
            due_ms,
            every_ms,
            generation,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.schedule_once(TaskKind::Reset, 100, 1);
        assert!(timers.due(99).is_empty());
        let fired = timers.due(100);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, TaskKind::Reset);
        assert!(timers.due(1_000).is_empty());
        assert!(!timers.is_pending(TaskKind::Reset));
    }

    #[test]
    fn repeating_task_catches_up_on_late_poll() {
        let mut timers = Timers::new();
        timers.schedule_every(TaskKind::MatchTick, 1_000, 1_000, 1);
        let fired = timers.due(3_500);
        assert_eq!(
            fired.iter().map(|task| task.due_ms).collect::<Vec<_>>(),
            vec![1_000, 2_000, 3_000]
        );
        assert!(timers.due(3_999).is_empty());
        assert_eq!(timers.due(4_000)[0].due_ms, 4_000);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut timers = Timers::new();
        let handle = timers.schedule_once(TaskKind::Reset, 10, 1);
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.due(100).is_empty());
    }

    #[test]
    fn fired_tasks_are_ordered_by_due_time() {
        let mut timers = Timers::new();
        timers.schedule_every(TaskKind::PowerUpRefresh, 2_000, 2_000, 3);
        timers.schedule_every(TaskKind::MatchTick, 1_000, 1_000, 3);
        let kinds: Vec<TaskKind> = timers.due(2_000).into_iter().map(|task| task.kind).collect();
        assert_eq!(
            kinds,
            vec![TaskKind::MatchTick, TaskKind::PowerUpRefresh, TaskKind::MatchTick]
        );
    }

    #[test]
    fn generation_is_reported() {
        let mut timers = Timers::new();
        timers.schedule_once(TaskKind::Reset, 5, 7);
        assert_eq!(timers.due(5)[0].generation, 7);
    }
}
