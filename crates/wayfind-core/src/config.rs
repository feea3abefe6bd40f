/// Relative tolerance used by the relaxation test when none is configured.
pub const DEFAULT_EPSILON: f32 = 1e-5;

/// Tunables of the search driver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// A neighbour is only updated when its new fitness `f'` satisfies
    /// `f' < f * (1 - epsilon)`. Paths that are merely equal, or better by
    /// less than this fraction, keep the route found first.
    pub epsilon: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl SearchConfig {
    /// Set the relaxation tolerance (builder). Clamped to `[0, 1)`.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = if epsilon.is_nan() {
            DEFAULT_EPSILON
        } else {
            epsilon.clamp(0.0, 1.0 - f32::EPSILON)
        };
        self
    }

    /// Whether `candidate` is a meaningful improvement over `current`.
    #[inline]
    pub fn improves(&self, candidate: f32, current: f32) -> bool {
        candidate < current * (1.0 - self.epsilon)
    }
}
