//! Shared component rendering context
//!
//! `ComponentContext` carries what a component may need to know about the
//! window it lives in: whether it has keyboard focus and how its session's
//! connection currently looks.

use crate::session::StatusIndicator;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    indicator: StatusIndicator,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            indicator: StatusIndicator::Inactive,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Connection indicator of the owning session.
    pub const fn indicator(&self) -> StatusIndicator {
        self.indicator
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_indicator(mut self, indicator: StatusIndicator) -> Self {
        self.indicator = indicator;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
