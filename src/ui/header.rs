use crate::constants::TITLE;
use crate::models::BackendStatus;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn status_color(status: BackendStatus) -> Color {
    match status {
        BackendStatus::Unknown => Color::DarkGray,
        BackendStatus::Online => Color::LightGreen,
        BackendStatus::Offline => Color::LightRed,
    }
}

/// Draws the title bar with the backend status dot.
pub fn draw_header(f: &mut Frame<'_>, area: Rect, status: BackendStatus) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let title = Line::from(vec![
        Span::styled("● ", Style::default().fg(status_color(status))),
        Span::styled(
            TITLE,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    f.render_widget(
        Paragraph::new(title)
            .alignment(Alignment::Left)
            .block(block),
        area,
    );
}
