//! Tick-driven scheduler for deferred gameplay effects
//!
//! Nothing here reads a wall clock. The owner advances time with
//! [`Scheduler::advance`] from its per-frame update and receives the payloads
//! whose delay has elapsed.

/// Cancellation token for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TimerHandle,
    due_ms: u64,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Scheduler-local time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Scheduled {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            payload,
        });
        handle
    }

    /// Remove a task before it fires, returning its payload
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let idx = self.pending.iter().position(|s| s.handle == handle)?;
        Some(self.pending.remove(idx).payload)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|s| s.handle == handle)
    }

    /// Milliseconds until `handle` fires
    pub fn remaining(&self, handle: TimerHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|s| s.handle == handle)
            .map(|s| s.due_ms.saturating_sub(self.now_ms))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advance the clock and return every payload now due, earliest first
    pub fn advance(&mut self, delta_ms: u64) -> Vec<T> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let now = self.now_ms;

        let (mut due, keep): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now);
        self.pending = keep;

        due.sort_by_key(|s| (s.due_ms, s.handle));
        due.into_iter().map(|s| s.payload).collect()
    }

    /// Drop every pending task, returning the payloads
    pub fn clear(&mut self) -> Vec<T> {
        self.pending.drain(..).map(|s| s.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300, "late");
        s.schedule(100, "early");
        assert!(s.advance(50).is_empty());
        assert_eq!(s.advance(50), vec!["early"]);
        assert_eq!(s.advance(1000), vec!["late"]);
        assert!(s.is_empty());
    }

    #[test]
    fn same_due_time_keeps_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(10, 1);
        s.schedule(10, 2);
        assert_eq!(s.advance(10), vec![1, 2]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = Scheduler::new();
        let h = s.schedule(100, "buff");
        assert_eq!(s.remaining(h), Some(100));
        assert_eq!(s.cancel(h), Some("buff"));
        assert!(!s.is_pending(h));
        assert!(s.advance(500).is_empty());
        assert_eq!(s.cancel(h), None);
    }
}
