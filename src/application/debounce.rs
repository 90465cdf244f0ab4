// src/application/debounce.rs
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
enum DebounceState<T> {
    Idle,
    Armed { value: T, deadline: Instant },
}

/// Coalesces a burst of inputs into the last one, once `delay` has passed
/// without a newer input. Only a single value is ever pending.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    state: DebounceState<T>,
    current: T,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
            current: initial,
        }
    }

    /// Cancel whatever is pending and re-arm with `value`.
    pub fn input(&mut self, value: T, now: Instant) {
        self.state = DebounceState::Armed {
            value,
            deadline: now + self.delay,
        };
    }

    /// When the pending value is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Idle => None,
            DebounceState::Armed { deadline, .. } => Some(*deadline),
        }
    }

    /// Fire the timer if it is due. Returns the value when it changes the output.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.state, DebounceState::Armed { deadline, .. } if now >= *deadline);
        if !due {
            return None;
        }
        let DebounceState::Armed { value, .. } = std::mem::replace(&mut self.state, DebounceState::Idle)
        else {
            return None;
        };
        if value == self.current {
            return None;
        }
        self.current = value.clone();
        Some(value)
    }

    /// The last value that made it through.
    pub fn current(&self) -> &T {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn given_burst_of_inputs_when_window_passes_then_emits_last_once() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        for (i, text) in ["m", "me", "mee", "meet", "meeting"].iter().enumerate() {
            let at = start + Duration::from_millis(100 * i as u64);
            debouncer.input(text.to_string(), at);
            assert_eq!(debouncer.poll(at), None);
        }

        let last_input = start + Duration::from_millis(400);
        assert_eq!(debouncer.poll(last_input + Duration::from_millis(499)), None);
        assert_eq!(
            debouncer.poll(last_input + DELAY),
            Some("meeting".to_string())
        );
        assert_eq!(debouncer.poll(last_input + DELAY * 4), None);
        assert_eq!(debouncer.current(), "meeting");
    }

    #[test]
    fn given_new_input_when_armed_then_deadline_moves() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        debouncer.input("a".to_string(), start);
        debouncer.input("ab".to_string(), start + Duration::from_millis(300));

        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(800))
        );
        assert_eq!(debouncer.poll(start + DELAY), None);
    }

    #[test]
    fn given_input_equal_to_current_when_fired_then_no_emission() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new("work".to_string(), DELAY);

        debouncer.input("wor".to_string(), start);
        debouncer.input("work".to_string(), start + Duration::from_millis(10));

        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn given_idle_debouncer_when_polling_then_nothing() {
        let mut debouncer = Debouncer::new(0u32, DELAY);
        assert_eq!(debouncer.poll(Instant::now()), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
