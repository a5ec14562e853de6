use crate::constants::THINKING_TEXT;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// The "assistant is thinking" line under the transcript.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
    }

    /// Draws the indicator only while `thinking`; otherwise the row stays blank.
    pub fn render(&self, frame: &mut Frame, area: Rect, thinking: bool) {
        if !thinking {
            return;
        }

        let status = Line::from(vec![
            Span::styled(self.frame(), Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(
                THINKING_TEXT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]);

        frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), area);
    }
}
