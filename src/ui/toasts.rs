//! Toast notification overlay

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::store::{StoreState, Toast, ToastKind};

/// How many toasts to stack in the corner at once
const MAX_VISIBLE: usize = 4;

fn toast_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Warning => Color::Yellow,
        ToastKind::Info => Color::Blue,
    }
}

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    if snapshot.toasts.is_empty() {
        return;
    }

    let width = area.width.min(46);
    let x = area.width.saturating_sub(width + 1);

    let recent: Vec<&Toast> = snapshot
        .toasts
        .iter()
        .rev()
        .take(MAX_VISIBLE)
        .collect();

    for (i, toast) in recent.iter().enumerate() {
        let y = area.height.saturating_sub(((i as u16) + 1) * 3 + 1);
        if y == 0 {
            break;
        }
        let rect = Rect {
            x,
            y,
            width,
            height: 3,
        };

        let widget = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(toast_color(toast.kind)))
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(Clear, rect);
        frame.render_widget(widget, rect);
    }
}
