use std::time::{Duration, Instant};

/// A point on the gallery's timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Instant handed to the host and the selection state.
    pub at: Instant,
    /// Seconds since the source was created or last reset.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

/// Abstraction over where frame times originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let at = Instant::now();
        let sample = TimeSample {
            at,
            seconds: at.saturating_duration_since(self.origin).as_secs_f32(),
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Simulated clock that advances by exactly one step per sample.
///
/// Used for headless snapshots so the output only depends on the requested
/// time, never on how fast the machine renders.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepSource {
    origin: Instant,
    step: Duration,
    frame: u64,
}

impl FixedStepSource {
    pub fn new(origin: Instant, step: Duration) -> Self {
        Self {
            origin,
            step,
            frame: 0,
        }
    }

    /// A 60 Hz source starting at `origin`.
    pub fn sixty_hz(origin: Instant) -> Self {
        Self::new(origin, Duration::from_secs(1) / 60)
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Number of samples needed to reach `seconds`, counting the first
    /// frame at zero.
    pub fn frames_until(&self, seconds: f32) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 || self.step.is_zero() {
            return 1;
        }
        (seconds / self.step.as_secs_f32()).round() as u64 + 1
    }
}

impl TimeSource for FixedStepSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let offset = self.step.saturating_mul(u32::try_from(self.frame).unwrap_or(u32::MAX));
        let sample = TimeSample {
            at: self.origin + offset,
            seconds: offset.as_secs_f32(),
            frame_index: self.frame,
        };
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Spaces redraws out to honour an optional frame-rate cap.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    last_rendered: Option<Instant>,
}

impl FramePacer {
    /// `None`, zero or non-finite caps render as often as asked.
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .and_then(|fps| Duration::try_from_secs_f64(1.0 / f64::from(fps)).ok());
        Self {
            interval,
            last_rendered: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match self.next_deadline() {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.last_rendered?.checked_add(self.interval?)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_rendered = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_rendered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_advances_exactly() {
        let origin = Instant::now();
        let mut source = FixedStepSource::new(origin, Duration::from_millis(20));
        let first = source.sample();
        let second = source.sample();
        let third = source.sample();
        assert_eq!(first.at, origin);
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.at, origin + Duration::from_millis(20));
        assert!((third.seconds - 0.04).abs() < 1e-6);
        source.reset();
        assert_eq!(source.sample().at, origin);
    }

    #[test]
    fn frames_until_counts_the_first_frame() {
        let source = FixedStepSource::sixty_hz(Instant::now());
        assert_eq!(source.frames_until(0.0), 1);
        assert_eq!(source.frames_until(-3.0), 1);
        assert_eq!(source.frames_until(1.0), 61);
        assert_eq!(source.frames_until(f32::NAN), 1);
    }

    #[test]
    fn system_source_counts_frames() {
        let mut source = SystemTimeSource::new();
        assert_eq!(source.sample().frame_index, 0);
        assert_eq!(source.sample().frame_index, 1);
        source.reset();
        let sample = source.sample();
        assert_eq!(sample.frame_index, 0);
        assert!(sample.seconds >= 0.0);
    }

    #[test]
    fn uncapped_pacer_is_always_ready() {
        let now = Instant::now();
        for cap in [None, Some(0.0), Some(f32::INFINITY)] {
            let mut pacer = FramePacer::new(cap);
            pacer.mark_rendered(now);
            assert!(pacer.ready_for_frame(now));
            assert_eq!(pacer.next_deadline(), None);
        }
    }

    #[test]
    fn capped_pacer_waits_for_interval() {
        let now = Instant::now();
        let mut pacer = FramePacer::new(Some(50.0));
        assert!(pacer.ready_for_frame(now));
        pacer.mark_rendered(now);
        assert!(!pacer.ready_for_frame(now + Duration::from_millis(10)));
        let interval = pacer.interval().unwrap();
        assert!(interval.abs_diff(Duration::from_millis(20)) < Duration::from_micros(1));
        assert_eq!(pacer.next_deadline(), Some(now + interval));
        assert!(pacer.ready_for_frame(now + Duration::from_millis(21)));
        pacer.reset();
        assert!(pacer.ready_for_frame(now));
    }

    #[test]
    fn vanishing_fps_cap_does_not_overflow() {
        let mut pacer = FramePacer::new(Some(f32::MIN_POSITIVE / 1024.0));
        let now = Instant::now();
        pacer.mark_rendered(now);
        assert!(pacer.ready_for_frame(now));
        assert_eq!(pacer.next_deadline(), None);
    }
}
