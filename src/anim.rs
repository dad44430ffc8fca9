//! Time-based animation primitives.
//!
//! The chart animates a single scalar (the reveal angle) instead of binding
//! to a platform animator: a [`Tween`] describes the motion, a [`TweenRun`]
//! is one in-flight playback of it that the host samples once per frame.

use std::time::{Duration, Instant};

/// Easing curves for a [`Tween`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// `1 - (1 - t)^2`: fast at the start, slowing into the end.
    Decelerate,
}

impl Easing {
    /// Maps linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A scalar animation: `from` to `to` over `duration`, shaped by `easing`.
///
/// A tween is inert data; [`start`](Tween::start) produces a [`TweenRun`]
/// that can be sampled with timestamps. The same tween can be started any
/// number of times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    /// Begins a playback whose progress is measured from `now`.
    pub fn start(self, now: Instant) -> TweenRun {
        TweenRun {
            last: self.from,
            tween: self,
            started: now,
        }
    }
}

/// One playback of a [`Tween`].
///
/// Sampling never moves backwards, even if the supplied timestamps do, and
/// the value freezes at the target once the duration has elapsed.
#[derive(Debug, Clone)]
pub struct TweenRun {
    tween: Tween,
    started: Instant,
    last: f64,
}

impl TweenRun {
    /// Advances the playback to `now` and returns the current value.
    pub fn sample(&mut self, now: Instant) -> f64 {
        let eased = self.tween.easing.apply(self.progress(now));
        let value = self.tween.from + (self.tween.to - self.tween.from) * eased;
        let forward = if self.tween.to >= self.tween.from {
            value > self.last
        } else {
            value < self.last
        };
        if forward {
            self.last = value;
        }
        self.last
    }

    /// The value of the most recent [`sample`](Self::sample).
    pub fn value(&self) -> f64 {
        self.last
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.tween.duration
    }

    /// Rewinds to the starting value with progress measured from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.started = now;
        self.last = self.tween.from;
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.tween.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        elapsed.as_secs_f64() / self.tween.duration.as_secs_f64()
    }
}

/// Identity token for one committed dataset's animation.
///
/// Committing new data bumps the owning chart's generation; a frame callback
/// still holding an older token is stale and must no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(pub(crate) u64);
