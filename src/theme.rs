use ratatui::style::Color;

// Centralized palette. Colors stay on the 16-color set so the chrome reads
// the same on terminals without truecolor support.

// Window header
pub fn header_focused_bg() -> Color {
    Color::Blue
}
pub fn header_bg() -> Color {
    Color::DarkGray
}
pub fn header_fg() -> Color {
    Color::White
}
pub fn close_button_fg() -> Color {
    Color::LightRed
}

// Window border
pub fn border() -> Color {
    Color::DarkGray
}
pub fn border_focused() -> Color {
    Color::Gray
}
pub fn resize_grip() -> Color {
    Color::Yellow
}

// Connection status indicator
pub fn status_pending() -> Color {
    Color::Yellow
}
pub fn status_active() -> Color {
    Color::LightGreen
}
pub fn status_inactive() -> Color {
    Color::Gray
}
pub fn status_error() -> Color {
    Color::LightRed
}

// Status bar
pub fn status_bar_bg() -> Color {
    Color::DarkGray
}
pub fn status_bar_fg() -> Color {
    Color::White
}

// Content placeholder when a session has no terminal attached
pub fn placeholder_fg() -> Color {
    Color::DarkGray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_are_distinct() {
        let colors = [
            status_pending(),
            status_active(),
            status_inactive(),
            status_error(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
