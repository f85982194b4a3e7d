use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use galleryconfig::GalleryConfig;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("gallery must contain at least one artwork")]
    EmptyGallery,
}

/// Emitted once a requested transition has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: usize,
    pub current: usize,
    pub settled_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    target: usize,
    requested_at: Instant,
}

/// Which artwork is showing, and whether a switch is underway.
///
/// A request does not take effect immediately: it raises `transitioning`
/// and settles on the first `tick` at or after `transition_delay` has
/// elapsed. A newer request made while one is pending replaces the target
/// and restarts the delay.
pub struct GallerySelection {
    len: usize,
    current: usize,
    pending: Option<PendingTransition>,
    transition_delay: Duration,
    subscribers: Vec<Sender<SelectionChange>>,
}

impl GallerySelection {
    pub fn new(len: usize, start: usize, transition_delay: Duration) -> Result<Self, SelectionError> {
        if len == 0 {
            return Err(SelectionError::EmptyGallery);
        }
        Ok(Self {
            len,
            current: start.min(len - 1),
            pending: None,
            transition_delay,
            subscribers: Vec::new(),
        })
    }

    pub fn from_config(len: usize, config: &GalleryConfig) -> Result<Self, SelectionError> {
        Self::new(len, config.display.start, config.navigation.transition)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_target(&self) -> Option<usize> {
        self.pending.map(|pending| pending.target)
    }

    /// Instant at which the pending transition settles, if any. `None` as
    /// well when the delay reaches past what `Instant` can represent.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .and_then(|pending| pending.requested_at.checked_add(self.transition_delay))
    }

    /// Fraction of the gallery shown so far, `(current + 1) / len`.
    pub fn progress(&self) -> f32 {
        (self.current + 1) as f32 / self.len as f32
    }

    fn saturate(&self, index: i64) -> usize {
        if index <= 0 {
            0
        } else {
            (index as u64).min((self.len - 1) as u64) as usize
        }
    }

    fn effective_target(&self) -> usize {
        self.pending_target().unwrap_or(self.current)
    }

    /// Requests a switch to `index`, saturated into range.
    ///
    /// Returns `false` when the request changes nothing.
    pub fn request(&mut self, index: i64, now: Instant) -> bool {
        let target = self.saturate(index);
        if target == self.effective_target() {
            return false;
        }

        if target == self.current {
            self.pending = None;
            debug!(index = target, "pending transition cancelled");
            return true;
        }

        self.pending = Some(PendingTransition {
            target,
            requested_at: now,
        });
        debug!(
            from = self.current,
            to = target,
            delay_ms = self.transition_delay.as_millis() as u64,
            "transition requested"
        );
        true
    }

    pub fn next(&mut self, now: Instant) -> bool {
        let target = (self.effective_target() + 1) % self.len;
        self.request(target as i64, now)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        let target = (self.effective_target() + self.len - 1) % self.len;
        self.request(target as i64, now)
    }

    /// Settles the pending transition once it is due.
    pub fn tick(&mut self, now: Instant) -> Option<SelectionChange> {
        let pending = self.pending?;
        if now.saturating_duration_since(pending.requested_at) < self.transition_delay {
            return None;
        }
        self.pending = None;

        let change = SelectionChange {
            previous: self.current,
            current: pending.target,
            settled_at: now,
        };
        self.current = pending.target;
        info!(index = self.current, "switched to artwork {}", self.current + 1);
        self.subscribers
            .retain(|subscriber| subscriber.send(change).is_ok());
        Some(change)
    }

    /// Registers an observer; dropped receivers are pruned on the next change.
    pub fn subscribe(&mut self) -> Receiver<SelectionChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }
}
