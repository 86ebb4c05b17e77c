//! Level window validation.

use std::fmt;

use crate::domain::error::RangeError;

/// A validated level window: `1 <= bottom <= top <= max_level`.
///
/// Only obtainable through [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    top: usize,
    bottom: usize,
}

impl DisplayWindow {
    /// Level whose nodes form the root set.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Highest level that is collapsed.
    pub fn bottom(&self) -> usize {
        self.bottom
    }

    /// Initial window after load: the roots open and the level below them
    /// collapsed. None for an empty hierarchy.
    pub fn initial(max_level: usize) -> Option<Self> {
        let top = max_level as i64;
        let bottom = (top - 1).max(1);
        validate(top, bottom, max_level).ok()
    }
}

impl fmt::Display for DisplayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.top, self.bottom)
    }
}

/// Check a requested window against the indexed level bounds.
///
/// Rules are checked in a fixed order and the first failure wins:
/// top above `max_level`, then bottom below 1, then top below bottom.
pub fn validate(top: i64, bottom: i64, max_level: usize) -> Result<DisplayWindow, RangeError> {
    if top > max_level as i64 {
        return Err(RangeError::TopTooLarge { max_level });
    }
    if bottom < 1 {
        return Err(RangeError::BottomTooSmall);
    }
    if top < bottom {
        return Err(RangeError::TopBelowBottom);
    }
    Ok(DisplayWindow {
        top: top as usize,
        bottom: bottom as usize,
    })
}
