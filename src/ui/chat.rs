//! AI chat transcript view

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::store::{ChatRole, StoreState};

use super::draw_placeholder;

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    if snapshot.chat_messages.is_empty() {
        draw_placeholder(
            frame,
            " Chat ",
            "Ask about a ticker, strategy, or the market. Press i to type.",
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    for message in &snapshot.chat_messages {
        let (label, style) = match message.role {
            ChatRole::User => (
                "you",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            ChatRole::Assistant => (
                "assistant",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), style),
            Span::raw(format!(
                "[{}]",
                message.timestamp.format("%H:%M:%S")
            )),
        ]));

        if message.loading {
            lines.push(Line::from(Span::styled(
                "  thinking...",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for text_line in message.content.lines() {
                lines.push(Line::from(format!("  {}", text_line)));
            }
        }
        lines.push(Line::from(""));
    }

    // Keep the tail of the transcript in view
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Chat "));
    frame.render_widget(widget, area);
}
