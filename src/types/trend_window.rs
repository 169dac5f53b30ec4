use crate::error::InvalidInput;
use std::fmt;
use std::num::NonZeroUsize;

/// Number of trailing days averaged into the trend metric, current day included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrendWindow(NonZeroUsize);

impl TrendWindow {
    pub const DEFAULT_DAYS: usize = 7;

    /// # Errors
    ///
    /// Returns [`InvalidInput::ZeroTrendWindow`] for a zero-day window.
    pub fn new(days: usize) -> Result<Self, InvalidInput> {
        NonZeroUsize::new(days)
            .map(Self)
            .ok_or(InvalidInput::ZeroTrendWindow)
    }

    pub fn days(&self) -> usize {
        self.0.get()
    }
}

impl Default for TrendWindow {
    fn default() -> Self {
        Self(NonZeroUsize::new(Self::DEFAULT_DAYS).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-day", self.0)
    }
}
