//! Scheduling queue for deferred component effects.
//!
//! Every timer is tagged with the session that requested it. The host loop
//! drains the due timers once per iteration and hands them back to the
//! preview host, which drops any whose session is no longer live.

use super::SessionId;
use crate::component::Message;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

#[derive(Debug)]
struct Timer {
    due: Instant,
    seq: u64,
    session: SessionId,
    message: Message,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Timer>>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, session: SessionId, due: Instant, message: Message) {
        self.seq += 1;
        self.heap.push(Reverse(Timer {
            due,
            seq: self.seq,
            session,
            message,
        }));
    }

    /// Remove and return every timer due at or before `now`, earliest first.
    ///
    /// Timers scheduled while the returned ones are being handled wait for
    /// the next drain, so a zero-delay loop cannot starve the host.
    pub fn drain_due(&mut self, now: Instant) -> Vec<(SessionId, Message)> {
        let mut due = Vec::new();
        while self.heap.peek().is_some_and(|Reverse(t)| t.due <= now) {
            if let Some(Reverse(timer)) = self.heap.pop() {
                due.push((timer.session, timer.message));
            }
        }
        due
    }

    /// Drop all timers belonging to `session`.
    pub fn cancel_session(&mut self, session: SessionId) {
        self.heap.retain(|Reverse(t)| t.session != session);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(t)| t.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_drain_due_in_order() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(SessionId(1), now + Duration::from_millis(30), Message::Tick(3));
        timers.schedule(SessionId(1), now + Duration::from_millis(10), Message::Tick(1));
        timers.schedule(SessionId(1), now + Duration::from_millis(20), Message::Tick(2));

        assert!(timers.drain_due(now).is_empty());
        assert_eq!(timers.next_deadline(), Some(now + Duration::from_millis(10)));

        let due = timers.drain_due(now + Duration::from_millis(20));
        assert_eq!(
            due,
            vec![
                (SessionId(1), Message::Tick(1)),
                (SessionId(1), Message::Tick(2)),
            ]
        );
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_same_deadline_keeps_schedule_order() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(SessionId(1), now, Message::Tick(1));
        timers.schedule(SessionId(1), now, Message::Tick(2));
        let ids: Vec<Message> = timers.drain_due(now).into_iter().map(|(_, m)| m).collect();
        assert_eq!(ids, vec![Message::Tick(1), Message::Tick(2)]);
    }

    #[test]
    fn test_cancel_session() {
        let now = Instant::now();
        let mut timers = TimerQueue::new();
        timers.schedule(SessionId(1), now, Message::Tick(1));
        timers.schedule(SessionId(2), now, Message::Tick(2));
        timers.cancel_session(SessionId(1));
        assert_eq!(timers.drain_due(now), vec![(SessionId(2), Message::Tick(2))]);
        assert!(timers.is_empty());
    }
}
