use std::time::{Duration, Instant};

/// Delay an action until a quiet period with no new triggering events.
///
/// Callers `touch` on every triggering event and `poll` on ticks; `poll`
/// reports true exactly once per quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// A triggering event happened; push the deadline out.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True once the quiet period has elapsed; arms again on next `touch`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_keystrokes_fire_exactly_once() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));

        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(100));
        debounce.touch(start + Duration::from_millis(200));

        // 500ms after the first keystroke, but only 300ms after the last
        assert!(!debounce.poll(start + Duration::from_millis(500)));
        // 500ms after the last keystroke
        assert!(debounce.poll(start + Duration::from_millis(700)));
        // and never again until the next keystroke
        assert!(!debounce.poll(start + Duration::from_millis(900)));
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        assert!(!debounce.poll(Instant::now()));
        assert!(!debounce.pending());
    }

    #[test]
    fn touch_rearms_after_a_fire() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(500));
        debounce.touch(start);
        assert!(debounce.poll(start + Duration::from_millis(500)));

        debounce.touch(start + Duration::from_millis(600));
        assert!(!debounce.poll(start + Duration::from_millis(1000)));
        assert!(debounce.poll(start + Duration::from_millis(1100)));
    }
}
