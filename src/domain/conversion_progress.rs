use std::fmt;

/// Fraction of the conversion that has completed, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ConversionProgress(f64);

impl ConversionProgress {
    pub const START: Self = Self(0.0);
    pub const COMPLETE: Self = Self(1.0);

    /// Engines are not guaranteed to report sane values, so out of range
    /// readings are clamped and non-finite ones count as no progress.
    pub fn new(fraction: f64) -> Self {
        if !fraction.is_finite() {
            return Self::START;
        }
        Self(fraction.clamp(0.0, 1.0))
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    pub fn percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl fmt::Display for ConversionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}
