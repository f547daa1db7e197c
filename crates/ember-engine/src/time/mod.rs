//! Time subsystem.
//!
//! The renderer animates with a fixed-step [`Phase`] rather than wall-clock
//! time: one advance per rendered frame, so the animation speed follows the
//! swapchain's pacing.

mod phase;

pub use phase::{DEFAULT_STEP, InvalidStep, Phase};
