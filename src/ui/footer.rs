use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

/// Draws the footer with key hints; the hint changes while a question is in
/// flight since typing is disabled then.
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, loading: bool) {
    let instructions = if loading {
        "Waiting for the assistant... PgUp/PgDn to scroll, Esc to quit."
    } else {
        "Enter to send, PgUp/PgDn to scroll, Esc to quit."
    };

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
