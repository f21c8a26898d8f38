use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::layout::ResizeEdge;
use crate::session::StatusIndicator;
use crate::ui::{UiFrame, truncate_to_width};

/// Width of the close button drawn at the right end of the header.
pub const CLOSE_BUTTON_WIDTH: u16 = 3;
const CLOSE_LABEL: &str = "[x]";
const MAX_BADGE_LABEL: usize = 28;

/// Status badge shown in the header, left of the close button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBadge {
    pub indicator: StatusIndicator,
    pub label: String,
}

impl HeaderBadge {
    pub fn new(indicator: StatusIndicator, label: impl Into<String>) -> Self {
        Self {
            indicator,
            label: label.into(),
        }
    }
}

/// Everything the decorator needs to draw one window's chrome.
#[derive(Debug, Clone)]
pub struct FrameChrome<'a> {
    pub title: &'a str,
    pub icon: &'a str,
    pub badge: Option<&'a HeaderBadge>,
    pub focused: bool,
    pub resize_edges: &'a [ResizeEdge],
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, chrome: &FrameChrome<'_>);
}

#[derive(Debug, Default)]
pub struct DefaultDecorator;

impl WindowDecorator for DefaultDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, rect: Rect, chrome: &FrameChrome<'_>) {
        if rect.width < 4 || rect.height < 2 {
            return;
        }
        let header_bg = if chrome.focused {
            crate::theme::header_focused_bg()
        } else {
            crate::theme::header_bg()
        };
        let header_style = Style::default().bg(header_bg).fg(crate::theme::header_fg());
        let border_style = Style::default().fg(if chrome.focused {
            crate::theme::border_focused()
        } else {
            crate::theme::border()
        });

        let left = rect.x;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        let end_x = right.saturating_add(1);

        // Header
        frame.fill(
            Rect {
                height: 1,
                ..rect
            },
            " ",
            header_style,
        );
        let close_x = end_x.saturating_sub(CLOSE_BUTTON_WIDTH);
        frame.set_string_clipped(
            close_x,
            rect.y,
            CLOSE_LABEL,
            end_x,
            header_style.fg(crate::theme::close_button_fg()),
        );

        let mut title_limit = close_x.saturating_sub(1);
        if let Some(badge) = chrome.badge {
            let label = truncate_to_width(&badge.label, MAX_BADGE_LABEL);
            let full = format!("{} {}", badge.indicator.symbol(), label);
            let full_width = full.chars().count() as u16;
            let min_title_room = left.saturating_add(6);
            let badge_style = header_style.fg(badge.indicator.color());
            let text = if title_limit.saturating_sub(full_width) >= min_title_room {
                full
            } else {
                badge.indicator.symbol().to_string()
            };
            let width = text.chars().count() as u16;
            let start = title_limit.saturating_sub(width);
            if start > left {
                frame.set_string_clipped(start, rect.y, &text, title_limit, badge_style);
                title_limit = start.saturating_sub(1);
            }
        }

        let heading = if chrome.icon.is_empty() {
            chrome.title.to_string()
        } else {
            format!("{} {}", chrome.icon, chrome.title)
        };
        let room = title_limit.saturating_sub(left.saturating_add(1)) as usize;
        let heading = truncate_to_width(&heading, room);
        frame.set_string_clipped(
            left.saturating_add(1),
            rect.y,
            &heading,
            title_limit,
            header_style.add_modifier(Modifier::BOLD),
        );

        // Sides
        for y in rect.y.saturating_add(1)..bottom {
            frame.set_cell(left, y, "│", border_style);
            frame.set_cell(right, y, "│", border_style);
        }

        // Bottom
        if bottom > rect.y {
            for x in left..=right {
                let symbol = if x == left {
                    "└"
                } else if x == right {
                    "┘"
                } else {
                    "─"
                };
                frame.set_cell(x, bottom, symbol, border_style);
            }
        }

        // Resize grips
        let grip_style = Style::default().fg(crate::theme::resize_grip());
        for edge in chrome.resize_edges {
            let (x, y, symbol) = match edge {
                ResizeEdge::BottomRight => (right, bottom, "◢"),
                ResizeEdge::BottomLeft => (left, bottom, "◣"),
                _ => continue,
            };
            if bottom > rect.y {
                frame.set_cell(x, y, symbol, grip_style);
            }
        }
    }
}
