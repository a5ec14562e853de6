use crate::chat_message::render_message;
use crate::chat_view::ChatView;
use crate::constants::{INPUT_PLACEHOLDER, SENDING_LABEL, SEND_LABEL};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SEND_WIDTH: u16 = 10;

/// Draws the transcript and records its scrollable range.
pub fn draw_messages(f: &mut Frame<'_>, view: &mut ChatView, area: Rect) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in view.state.messages() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(render_message(message, area.width));
    }

    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    view.scroll.set_bounds(total_lines, area.height);

    let msgs_para = Paragraph::new(lines).scroll((view.scroll.offset(), 0));
    f.render_widget(msgs_para, area);
}

/// Draws the input field and the send control side by side.
pub fn draw_input(f: &mut Frame<'_>, view: &mut ChatView, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(SEND_WIDTH)])
        .split(area);

    let loading = view.is_loading();
    let input = view.state.input();

    let border_style = if loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::LightYellow)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let text = if input.is_empty() {
        Line::from(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        let style = if loading {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(Span::styled(input.to_string(), style))
    };

    let visible_width = chunks[0].width.saturating_sub(2);
    let text_width = u16::try_from(input.width()).unwrap_or(u16::MAX);
    let scroll_offset = text_width.saturating_sub(visible_width.saturating_sub(1));

    f.render_widget(
        Paragraph::new(text).block(block).scroll((0, scroll_offset)),
        chunks[0],
    );

    let (label, send_style) = if loading {
        (SENDING_LABEL, Style::default().fg(Color::DarkGray))
    } else if view.state.can_send() {
        (
            SEND_LABEL,
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (SEND_LABEL, Style::default().fg(Color::DarkGray))
    };

    let send_area = Rect {
        x: chunks[1].x,
        y: chunks[1].y + chunks[1].height / 2,
        width: chunks[1].width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(label, send_style)))
            .alignment(ratatui::layout::Alignment::Center),
        send_area,
    );
    view.send_button = send_area;

    if !loading {
        let cursor_x = chunks[0].x + 1 + (text_width - scroll_offset);
        f.set_cursor_position((cursor_x, chunks[0].y + 1));
    }
}
