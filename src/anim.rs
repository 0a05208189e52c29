/// Score-count duration in seconds.
pub const SCORE_COUNT_SECS: f64 = 2.0;
/// Per-row delay before a roster row starts entering.
pub const ROW_STAGGER_SECS: f64 = 0.05;
/// Duration of a roster row's entrance fade.
pub const ROW_FADE_SECS: f64 = 0.5;

/// Ease-out quadratic: fast start, decelerating toward the end value.
pub fn ease_out_quad(progress: f64) -> f64 {
    1.0 - (1.0 - progress) * (1.0 - progress)
}

/// A counter driven from `start` to `end` over `duration` seconds by an
/// external tick. Once progress reaches 1 it stops accepting ticks and
/// `value()` returns exactly `end`.
#[derive(Debug, Clone)]
pub struct ScoreCounter {
    start: f64,
    end: f64,
    duration: f64,
    elapsed: f64,
}

impl ScoreCounter {
    pub fn new(start: f64, end: f64, duration: f64) -> Self {
        Self {
            start,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn counting_to(end: f64) -> Self {
        Self::new(0.0, end, SCORE_COUNT_SECS)
    }

    pub fn idle() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Advances the counter by `dt` seconds. No-op once finished.
    pub fn advance(&mut self, dt: f64) {
        if self.is_done() {
            return;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }

    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).min(1.0)
    }

    pub fn value(&self) -> f64 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.end;
        }
        self.start + (self.end - self.start) * ease_out_quad(progress)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Entrance phase of a staggered roster row at `elapsed` seconds since the
/// table was (re)built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowEntrance {
    Hidden,
    /// Fading in; the payload is fade progress in [0, 1).
    Entering(f64),
    Settled,
}

pub fn row_entrance(elapsed: f64, row_index: usize) -> RowEntrance {
    let delay = row_index as f64 * ROW_STAGGER_SECS;
    if elapsed < delay {
        return RowEntrance::Hidden;
    }
    let progress = (elapsed - delay) / ROW_FADE_SECS;
    if progress >= 1.0 {
        RowEntrance::Settled
    } else {
        RowEntrance::Entering(progress)
    }
}
