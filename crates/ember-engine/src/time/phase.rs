use thiserror::Error;

/// Increment applied to the timer on every [`Phase::advance`].
pub const DEFAULT_STEP: f32 = 0.05;

/// Rejected phase step.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
#[error("phase step must be positive and finite, got {0}")]
pub struct InvalidStep(pub f32);

/// Fixed-step timer whose sine drives the per-frame shader input.
///
/// The timer is derived from the frame count rather than accumulated, so every
/// advance adds exactly one step no matter how long the loop runs. There is no
/// reset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Phase {
    step: f32,
    frame_index: u64,
}

impl Phase {
    /// Creates a phase starting at zero.
    pub fn new(step: f32) -> Result<Self, InvalidStep> {
        if !(step.is_finite() && step > 0.0) {
            return Err(InvalidStep(step));
        }
        Ok(Self {
            step,
            frame_index: 0,
        })
    }

    /// Advances the timer by one step and returns the new shader input, `sin(timer)`.
    pub fn advance(&mut self) -> f32 {
        self.frame_index = self.frame_index.saturating_add(1);
        self.value()
    }

    /// Current shader input without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.timer().sin() as f32
    }

    #[inline]
    pub fn timer(&self) -> f64 {
        self.frame_index as f64 * self.step as f64
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of advances so far.
    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            frame_index: 0,
        }
    }
}
