use super::errors::SimError;
use super::event::{Event, Signal};
use super::types::{ProcessId, SimTime};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.event.time.total_cmp(&other.event.time) == Ordering::Equal
            && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Time-ordered event queue that owns the simulation clock.
///
/// Events with equal timestamps come out in the order they were scheduled.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    now: SimTime,
}

impl EventScheduler {
    /// Create a new EventScheduler at time zero
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: 0.0,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule a resumption of `target` after the specified delay
    pub fn schedule_after(
        &mut self,
        delay: SimTime,
        target: ProcessId,
        signal: Signal,
    ) -> Result<(), SimError> {
        if delay.is_nan() || delay < 0.0 {
            return Err(SimError::InvalidDelay(delay));
        }

        let scheduled_event = ScheduledEvent {
            sequence_num: self.sequence_counter,
            event: Event::new(self.now + delay, target, signal),
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
        Ok(())
    }

    /// Pop the earliest event if it is due at or before `horizon`, advancing the clock to it
    pub fn pop_due(&mut self, horizon: SimTime) -> Option<Event> {
        let due = self.peek_next_time().map_or(false, |time| time <= horizon);
        if !due {
            return None;
        }

        let scheduled = self.event_queue.pop()?;
        self.now = scheduled.event.time;
        Some(scheduled.event)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the next event time without removing it
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.event.time)
    }

    /// Drop every pending event, returning how many were abandoned
    pub fn discard_pending(&mut self) -> usize {
        let abandoned = self.event_queue.len();
        self.event_queue.clear();
        abandoned
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
