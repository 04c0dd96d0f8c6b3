use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Callbacks a carousel asks its timer source to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Recurring auto-advance tick.
    AutoAdvance,
    /// Settle delay after an animated move elapsed; check wraparound and unlock.
    Settle,
    /// Re-enable animated transitions after a non-animated layout.
    RestoreTransition,
}

pub trait TimerSource {
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerId;
    fn schedule_repeating(&mut self, period: Duration, event: TimerEvent) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    id: TimerId,
    event: TimerEvent,
    period: Option<Duration>,
}

/// Virtual clock with an ordered deadline queue.
///
/// Time only moves when [`Timeline::pop_due`] or [`Timeline::advance_to`] is
/// called, which makes carousel behavior reproducible in tests and lets the
/// async runner map deadlines onto tokio time. Entries sharing a deadline fire
/// in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Removes and returns the earliest event due at or before `until`,
    /// moving the clock to its deadline. Repeating entries are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerEvent> {
        let (&(at, key), _) = self.queue.iter().next()?;
        if at > until {
            return None;
        }
        let entry = self.queue.remove(&(at, key))?;
        self.now = self.now.max(at);
        if let Some(period) = entry.period {
            self.insert(at + period, entry);
        }
        Some(entry.event)
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_to(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }

    fn insert(&mut self, at: Duration, entry: Scheduled) {
        self.seq += 1;
        self.queue.insert((at, self.seq), entry);
    }

    fn next_id(&mut self) -> TimerId {
        self.seq += 1;
        TimerId(self.seq)
    }
}

impl TimerSource for Timeline {
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
        let id = self.next_id();
        let at = self.now + delay;
        self.insert(
            at,
            Scheduled {
                id,
                event,
                period: None,
            },
        );
        id
    }

    fn schedule_repeating(&mut self, period: Duration, event: TimerEvent) -> TimerId {
        let id = self.next_id();
        let at = self.now + period;
        self.insert(
            at,
            Scheduled {
                id,
                event,
                period: Some(period),
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|_, entry| entry.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut tl = Timeline::new();
        tl.schedule_once(ms(50), TimerEvent::RestoreTransition);
        tl.schedule_once(ms(10), TimerEvent::Settle);
        tl.schedule_once(ms(50), TimerEvent::Settle);

        assert_eq!(tl.pop_due(ms(5)), None);
        assert_eq!(tl.pop_due(ms(100)), Some(TimerEvent::Settle));
        assert_eq!(tl.now(), ms(10));
        assert_eq!(tl.pop_due(ms(100)), Some(TimerEvent::RestoreTransition));
        assert_eq!(tl.pop_due(ms(100)), Some(TimerEvent::Settle));
        assert_eq!(tl.pop_due(ms(100)), None);
    }

    #[test]
    fn repeating_rearms_and_cancels() {
        let mut tl = Timeline::new();
        let id = tl.schedule_repeating(ms(3000), TimerEvent::AutoAdvance);
        let mut ticks = 0;
        while tl.pop_due(ms(9000)).is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(tl.next_deadline(), Some(ms(12000)));

        tl.cancel(id);
        assert_eq!(tl.pending(), 0);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut tl = Timeline::new();
        tl.advance_to(ms(1000));
        tl.schedule_once(ms(650), TimerEvent::Settle);
        assert_eq!(tl.next_deadline(), Some(ms(1650)));
    }
}
