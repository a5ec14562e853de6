use crate::models::{Message, Sender};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

const USER_INDENT: &str = "    ";

/// Renders a transcript message as a bubble of pre-wrapped lines.
///
/// Lines are wrapped here rather than by the paragraph so the caller knows
/// the exact line count for scrolling.
pub fn render_message(message: &Message, width: u16) -> Vec<Line<'static>> {
    let style = base_style(message.sender);
    let indent = indent_for(message.sender);
    let mut lines = Vec::new();

    render_header(&mut lines, message, style, indent);
    render_content(&mut lines, message, width, style, indent);
    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╰─".to_string(), style),
    ]));

    lines
}

fn base_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Rgb(255, 223, 128)),
        Sender::Bot => Style::default().fg(Color::Rgb(144, 238, 144)),
    }
}

fn indent_for(sender: Sender) -> &'static str {
    match sender {
        Sender::User => USER_INDENT,
        Sender::Bot => "",
    }
}

fn render_header(lines: &mut Vec<Line<'static>>, message: &Message, style: Style, indent: &str) {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Assistant",
    };
    let timestamp = message.timestamp.format("%H:%M").to_string();

    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("╭─ ".to_string(), style),
        Span::styled(who.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(" ".to_string(), style),
        Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
    ]));
}

fn render_content(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    width: u16,
    style: Style,
    indent: &str,
) {
    let wrap_width = (width as usize)
        .saturating_sub(indent.len() + 2)
        .max(1);

    for paragraph in message.text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled("│".to_string(), style),
            ]));
            continue;
        }
        for wrapped_line in wrap(paragraph, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped_line.to_string(), style),
            ]));
        }
    }
}
