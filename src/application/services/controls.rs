//! Level inputs: the two numeric fields feeding the visibility controller.

use std::num::ParseIntError;

use tracing::{debug, warn};

use crate::application::services::visibility::VisibilityController;
use crate::domain::{DisplayWindow, DomainError, DomainResult, InputField, RangeError};

/// Value assumed for an empty top input.
pub const TOP_INPUT_DEFAULT: i64 = 1_000_000;

/// Value assumed for an empty bottom input.
pub const BOTTOM_INPUT_DEFAULT: i64 = 1;

/// Parse a raw level input; blank means "use the default".
pub fn parse_level_input(raw: &str) -> Result<Option<i64>, ParseIntError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some)
}

/// Current contents of the top/bottom inputs plus the window in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelControls {
    top_input: i64,
    bottom_input: i64,
    window: DisplayWindow,
}

impl LevelControls {
    /// Render the initial window and fill the inputs with it.
    pub fn initialize(controller: &mut VisibilityController) -> DomainResult<Self> {
        let window =
            DisplayWindow::initial(controller.max_level()).ok_or(DomainError::EmptyHierarchy)?;
        controller.render(window);
        Ok(Self {
            top_input: window.top() as i64,
            bottom_input: window.bottom() as i64,
            window,
        })
    }

    /// Window currently in effect.
    pub fn window(&self) -> DisplayWindow {
        self.window
    }

    pub fn top_input(&self) -> i64 {
        self.top_input
    }

    pub fn bottom_input(&self) -> i64 {
        self.bottom_input
    }

    /// Submit new inputs.
    ///
    /// On success the window is rendered and becomes current. On failure the
    /// current window stays in effect and the offending input, if the error
    /// names one, is reset to its last valid value.
    pub fn apply(
        &mut self,
        controller: &mut VisibilityController,
        top: Option<i64>,
        bottom: Option<i64>,
    ) -> Result<DisplayWindow, RangeError> {
        self.top_input = top.unwrap_or(TOP_INPUT_DEFAULT);
        self.bottom_input = bottom.unwrap_or(BOTTOM_INPUT_DEFAULT);

        match controller.validate(self.top_input, self.bottom_input) {
            Ok(window) => {
                controller.render(window);
                self.window = window;
                debug!("applied window {}", window);
                Ok(window)
            }
            Err(e) => {
                warn!(
                    "rejected window top={} bottom={}: {}",
                    self.top_input, self.bottom_input, e
                );
                match e.reset_field() {
                    Some(InputField::Top) => self.top_input = self.window.top() as i64,
                    Some(InputField::Bottom) => self.bottom_input = self.window.bottom() as i64,
                    None => {}
                }
                Err(e)
            }
        }
    }
}
