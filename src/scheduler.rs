// ABOUTME: Single-threaded timer scheduler on a virtual millisecond clock
// ABOUTME: Provides cancellable one-shot and repeating timers for autoplay and resize debouncing

use std::collections::HashMap;

/// Handle returned when a timer is scheduled; pass it to [`Scheduler::clear`] to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    deadline: u64,
    period: Option<u64>,
    task: T,
}

/// Timers that carry a task payload instead of a callback. The owner pulls due
/// tasks with [`Scheduler::next_due`] and runs them itself, so a task's handler
/// is free to cancel or re-arm other timers before the next one fires.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_id: u64,
    timers: HashMap<u64, Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_id: 0,
            timers: HashMap::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle.0)
    }

    /// Run `task` once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerHandle {
        self.insert(delay_ms, None, task)
    }

    /// Run `task` every `period_ms`; a zero period is clamped to 1 ms
    pub fn set_interval(&mut self, period_ms: u64, task: T) -> TimerHandle {
        let period = period_ms.max(1);
        self.insert(period, Some(period), task)
    }

    fn insert(&mut self, delay_ms: u64, period: Option<u64>, task: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                deadline: self.now.saturating_add(delay_ms),
                period,
                task,
            },
        );
        TimerHandle(id)
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle.0).is_some()
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its
    /// deadline. Repeating timers are re-armed; ties fire in scheduling order.
    pub fn next_due(&mut self, until: u64) -> Option<(TimerHandle, T)> {
        let (&id, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(id, timer)| (timer.deadline, **id))?;

        let deadline = timer.deadline;
        let period = timer.period;
        let task = timer.task.clone();
        self.now = self.now.max(deadline);

        match period {
            Some(period) => {
                if let Some(timer) = self.timers.get_mut(&id) {
                    timer.deadline = deadline + period;
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }

        Some((TimerHandle(id), task))
    }

    /// Move the clock forward to `until` without firing anything. Callers drain
    /// [`next_due`](Self::next_due) first.
    pub fn advance_to(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, task)) = scheduler.next_due(until) {
            fired.push((scheduler.now(), task));
        }
        scheduler.advance_to(until);
        fired
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.set_timeout(250, "resize");

        assert!(drain(&mut scheduler, 249).is_empty());
        assert_eq!(drain(&mut scheduler, 1000), vec![(250, "resize")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_interval_rearms() {
        let mut scheduler = Scheduler::new();
        scheduler.set_interval(100, "tick");

        let fired = drain(&mut scheduler, 350);
        assert_eq!(fired, vec![(100, "tick"), (200, "tick"), (300, "tick")]);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.now(), 350);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.set_timeout(10, "x");

        assert!(scheduler.is_active(handle));
        assert!(scheduler.clear(handle));
        assert!(!scheduler.clear(handle));
        assert!(drain(&mut scheduler, 100).is_empty());
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.set_timeout(50, "first");
        scheduler.set_timeout(50, "second");

        let fired = drain(&mut scheduler, 50);
        assert_eq!(fired, vec![(50, "first"), (50, "second")]);
    }

    #[test]
    fn test_delays_are_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(1000);
        scheduler.set_timeout(10, "late");

        assert!(drain(&mut scheduler, 1009).is_empty());
        assert_eq!(drain(&mut scheduler, 1010), vec![(1010, "late")]);
    }
}
