use crate::foundation::core::Millis;

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<E> {
    id: TimerId,
    deadline: Millis,
    event: E,
}

/// Deterministic one-shot timer queue driven by host time.
///
/// Nothing fires on its own: the owner calls [`TimerQueue::pop_due`] with the current time, so
/// tests can advance fake time freely. Timers sharing a deadline fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<E> {
    next_id: u64,
    pending: Vec<Entry<E>>,
    fired: u64,
    cancelled: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
            fired: 0,
            cancelled: 0,
        }
    }

    /// Schedule `event` to fire once at `deadline`.
    pub fn schedule(&mut self, deadline: Millis, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entry {
            id,
            deadline,
            event,
        });
        id
    }

    /// Cancel one pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let Some(pos) = self.pending.iter().position(|e| e.id == id) else {
            return false;
        };
        self.pending.remove(pos);
        self.cancelled += 1;
        true
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        self.cancelled += n as u64;
        n
    }

    /// Remove and return the earliest timer whose deadline is `<= now`, with that deadline.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, E)> {
        let pos = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(i, _)| i)?;
        self.fired += 1;
        let entry = self.pending.remove(pos);
        Some((entry.deadline, entry.event))
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timer is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total timers fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Total timers cancelled so far.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/timer.rs"]
mod tests;
