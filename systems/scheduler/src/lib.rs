#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative timer scheduling for the Selker simulation.
//!
//! All behavior timers (shoot intervals, boss attack patterns, auto-fire)
//! are multiplexed onto the single simulation tick. The owner advances the
//! scheduler from its own tick path; while the simulation is paused the owner
//! simply does not call [`Scheduler::tick`], which freezes every
//! remaining-time counter exactly; timers never accumulate missed fires.
//!
//! Handles are never reused, so a cancelled handle retained by a destroyed
//! entity can never observe another entity's timer.

use std::time::Duration;

/// Opaque handle identifying a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug)]
struct Task {
    handle: TimerHandle,
    remaining: Duration,
    interval: Option<Duration>,
}

/// Deterministic cooperative timer wheel.
///
/// Due tasks fire in (due-time, handle) order so identical command scripts
/// replay identically.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_handle: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a task that fires once after the provided delay.
    pub fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.push_task(delay, None)
    }

    /// Schedules a task that fires every `interval`, starting one interval
    /// from now. A zero interval degenerates to a one-shot so a tick can
    /// never loop forever re-arming it.
    pub fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        if interval.is_zero() {
            return self.schedule_once(Duration::ZERO);
        }
        self.push_task(interval, Some(interval))
    }

    /// Cancels the task owned by the provided handle.
    ///
    /// Returns whether a live task was removed. Cancelling an already-fired
    /// or already-cancelled handle is a no-op, which lets destroyed entities
    /// dispose of their handles unconditionally.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    /// Reports whether the handle still owns a live task.
    #[must_use]
    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Reports whether no tasks are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advances every live task by `dt`, appending fired handles to `out`.
    ///
    /// Repeating tasks re-arm and may fire multiple times when `dt` spans
    /// several intervals; the catch-up happens inside this call and preserves
    /// due-time ordering across tasks.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<TimerHandle>) {
        if dt.is_zero() || self.tasks.is_empty() {
            return;
        }

        let mut fired: Vec<(Duration, TimerHandle)> = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            let task = &mut self.tasks[index];
            if task.remaining > dt {
                task.remaining -= dt;
                index += 1;
                continue;
            }

            let mut due_at = task.remaining;
            match task.interval {
                Some(interval) => {
                    fired.push((due_at, task.handle));
                    let mut elapsed = due_at;
                    loop {
                        let Some(next_due) = elapsed.checked_add(interval) else {
                            break;
                        };
                        if next_due > dt {
                            task.remaining = next_due - dt;
                            break;
                        }
                        elapsed = next_due;
                        due_at = next_due;
                        fired.push((due_at, task.handle));
                    }
                    index += 1;
                }
                None => {
                    fired.push((due_at, task.handle));
                    let _ = self.tasks.swap_remove(index);
                }
            }
        }

        fired.sort_by_key(|(due, handle)| (*due, *handle));
        out.extend(fired.into_iter().map(|(_, handle)| handle));
    }

    fn push_task(&mut self, delay: Duration, interval: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.tasks.push(Task {
            handle,
            remaining: delay,
            interval,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_and_disappears() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_once(Duration::from_millis(100));
        let mut fired = Vec::new();

        scheduler.tick(Duration::from_millis(50), &mut fired);
        assert!(fired.is_empty());

        scheduler.tick(Duration::from_millis(50), &mut fired);
        assert_eq!(fired, vec![handle]);
        assert!(!scheduler.is_scheduled(handle));

        fired.clear();
        scheduler.tick(Duration::from_secs(10), &mut fired);
        assert!(fired.is_empty());
    }

    #[test]
    fn repeating_task_catches_up_within_one_tick() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(100));
        let mut fired = Vec::new();

        scheduler.tick(Duration::from_millis(350), &mut fired);
        assert_eq!(fired, vec![handle, handle, handle]);

        fired.clear();
        scheduler.tick(Duration::from_millis(50), &mut fired);
        assert_eq!(fired, vec![handle]);
    }

    #[test]
    fn cancel_prevents_future_fires() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(10));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));

        let mut fired = Vec::new();
        scheduler.tick(Duration::from_secs(1), &mut fired);
        assert!(fired.is_empty());
    }

    #[test]
    fn fires_in_due_time_order_across_tasks() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule_once(Duration::from_millis(80));
        let early = scheduler.schedule_once(Duration::from_millis(20));
        let middle = scheduler.schedule_once(Duration::from_millis(50));

        let mut fired = Vec::new();
        scheduler.tick(Duration::from_millis(100), &mut fired);
        assert_eq!(fired, vec![early, middle, late]);
    }

    #[test]
    fn skipped_ticks_freeze_remaining_time() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_once(Duration::from_millis(100));
        let mut fired = Vec::new();

        scheduler.tick(Duration::from_millis(60), &mut fired);
        // A paused owner stops calling tick; nothing advances in between.
        scheduler.tick(Duration::from_millis(39), &mut fired);
        assert!(fired.is_empty());

        scheduler.tick(Duration::from_millis(1), &mut fired);
        assert_eq!(fired, vec![handle]);
    }

    #[test]
    fn zero_interval_degenerates_to_one_shot() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_repeating(Duration::ZERO);
        let mut fired = Vec::new();

        scheduler.tick(Duration::from_millis(1), &mut fired);
        assert_eq!(fired, vec![handle]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule_once(Duration::from_millis(1));
        assert!(scheduler.cancel(first));
        let second = scheduler.schedule_once(Duration::from_millis(1));
        assert_ne!(first, second);
    }
}
