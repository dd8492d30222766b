use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Emits a tick every `tick_interval` and a render whenever a tick or a
/// terminal event has changed the state. If no tick interval is set, the
/// loop only waits for terminal events.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` with ticks disabled.
    pub(super) fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to disable tick events. Re-enabling ticks restarts the
    /// tick timer, so the first tick comes one full interval later.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        if self.tick_interval.is_none() && interval.is_some() {
            self.last_tick = Instant::now();
        }
        self.tick_interval = interval;
    }

    /// Returns the next event.
    ///
    /// Blocks until the next tick is due, a render is pending or a crossterm
    /// event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.last_tick + self.tick_interval?;
        Some(next_tick_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_timeout_without_ticks() {
        let events = EventLoop::new();
        assert_eq!(events.compute_timeout(Instant::now()), None);
    }

    #[test]
    fn test_timeout_until_next_tick() {
        let mut events = EventLoop::new();
        events.set_tick_interval(Some(Duration::from_millis(500)));
        let start = events.last_tick;

        let timeout = events.compute_timeout(start + Duration::from_millis(200));
        assert_eq!(timeout, Some(Duration::from_millis(300)));

        let overdue = events.compute_timeout(start + Duration::from_secs(1));
        assert_eq!(overdue, Some(Duration::ZERO));
    }

    #[test]
    fn test_reenabling_ticks_restarts_timer() {
        let mut events = EventLoop::new();
        events.last_tick = Instant::now().checked_sub(Duration::from_secs(5)).unwrap();
        events.set_tick_interval(Some(Duration::from_secs(1)));
        assert!(events.last_tick.elapsed() < Duration::from_secs(1));

        // Changing an active interval keeps the timer running
        let last_tick = events.last_tick;
        events.set_tick_interval(Some(Duration::from_millis(950)));
        assert_eq!(events.last_tick, last_tick);
        assert_eq!(events.tick_interval(), Some(Duration::from_millis(950)));
    }

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::new();
        assert!(events.next().unwrap().is_render());
    }
}
