//! Fixed-timestep accumulation.

use thiserror::Error;

/// A step size that is zero, negative, or not finite.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Fixed step size must be positive and finite, got {0}")]
pub struct InvalidStepSize(pub f32);

/// Converts variable frame deltas into zero or more fixed-size steps.
///
/// Each frame's delta is added to a residual; while the residual exceeds the
/// step size, one step is dispatched and the step size subtracted. Leftover
/// time carries into the next frame instead of being discarded, so the
/// simulation advances in identical increments no matter how irregular the
/// frame timing is.
///
/// The residual is kept in `f64` so long sessions do not drift.
///
/// # Example
///
/// ```
/// use cadence_core::FixedStepAccumulator;
///
/// let mut physics = FixedStepAccumulator::new(0.016);
/// let mut simulated = 0.0;
/// let steps = physics.advance(0.05, |step| simulated += step);
///
/// assert_eq!(steps, 3);
/// assert!((physics.accumulator() - 0.002).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStepAccumulator {
    step: f64,
    accumulator: f64,
    total_steps: u64,
}

impl FixedStepAccumulator {
    /// Nominal simulation step in seconds.
    pub const DEFAULT_STEP: f32 = 0.016;

    /// Create an accumulator with the given step size in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `step` is not a positive, finite number. Use
    /// [`try_new`](Self::try_new) for step sizes read from configuration.
    pub fn new(step: f32) -> Self {
        match Self::try_new(step) {
            Ok(physics) => physics,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create an accumulator, rejecting step sizes that are not positive
    /// and finite.
    pub fn try_new(step: f32) -> Result<Self, InvalidStepSize> {
        if !(step.is_finite() && step > 0.0) {
            return Err(InvalidStepSize(step));
        }
        Ok(Self {
            step: f64::from(step),
            accumulator: 0.0,
            total_steps: 0,
        })
    }

    /// Add a frame's delta time and run every step that is now due.
    ///
    /// `step_fn` receives the step size and must return only once that
    /// simulation step has completed. Returns the number of steps run.
    pub fn advance(&mut self, delta_time: f32, mut step_fn: impl FnMut(f32)) -> u32 {
        self.accumulator += f64::from(delta_time.max(0.0));

        let step = self.step as f32;
        let mut steps = 0;
        while self.accumulator > self.step {
            step_fn(step);
            self.accumulator -= self.step;
            steps += 1;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Residual time not yet consumed by a step, in seconds.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Step size in seconds.
    pub fn step_size(&self) -> f32 {
        self.step as f32
    }

    /// Steps dispatched since construction or the last reset.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// How far the residual is into the next step, in `[0, 1]`.
    ///
    /// Useful for interpolating rendered state between the last two
    /// simulation states.
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0) as f32
    }

    /// Discard the residual and the step count.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.total_steps = 0;
    }
}

impl Default for FixedStepAccumulator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}
