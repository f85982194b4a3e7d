use std::time::{Duration, Instant};

/// Rate limiter for gesture-driven navigation.
///
/// The first attempt always fires; later attempts fire only once `window`
/// has passed since the last one that did.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.is_cooling(now) {
            return false;
        }
        self.last_fired = Some(now);
        true
    }

    pub fn is_cooling(&self, now: Instant) -> bool {
        self.last_fired
            .map(|last| now.saturating_duration_since(last) < self.window)
            .unwrap_or(false)
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(800);

    #[test]
    fn first_attempt_fires() {
        let mut cooldown = Cooldown::new(WINDOW);
        assert!(cooldown.try_fire(Instant::now()));
    }

    #[test]
    fn attempts_inside_window_are_dropped() {
        let mut cooldown = Cooldown::new(WINDOW);
        let start = Instant::now();
        assert!(cooldown.try_fire(start));
        assert!(!cooldown.try_fire(start + Duration::from_millis(100)));
        assert!(!cooldown.try_fire(start + Duration::from_millis(799)));
        assert!(cooldown.try_fire(start + WINDOW));
    }

    #[test]
    fn dropped_attempts_do_not_extend_window() {
        let mut cooldown = Cooldown::new(WINDOW);
        let start = Instant::now();
        cooldown.try_fire(start);
        for ms in (50..800).step_by(50) {
            assert!(!cooldown.try_fire(start + Duration::from_millis(ms)));
        }
        assert!(cooldown.try_fire(start + Duration::from_millis(850)));
    }

    #[test]
    fn fired_attempts_are_spaced_by_window() {
        let mut cooldown = Cooldown::new(WINDOW);
        let start = Instant::now();
        let fired: Vec<u64> = (0..40)
            .map(|step| step * 100)
            .filter(|ms| cooldown.try_fire(start + Duration::from_millis(*ms)))
            .collect();
        assert_eq!(fired, vec![0, 800, 1600, 2400, 3200]);
        assert!(fired.windows(2).all(|pair| pair[1] - pair[0] >= 800));
    }

    #[test]
    fn reset_allows_immediate_fire() {
        let mut cooldown = Cooldown::new(WINDOW);
        let start = Instant::now();
        cooldown.try_fire(start);
        cooldown.reset();
        assert!(cooldown.try_fire(start + Duration::from_millis(1)));
    }
}
