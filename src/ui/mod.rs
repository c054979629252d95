//! UI widgets for the dashboard
//!
//! Stateless renders of a store snapshot; no widget mutates state.

pub mod account;
pub mod analysis;
pub mod chat;
pub mod dashboard;
pub mod scanner;
pub mod toasts;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::store::{StoreState, View};

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App) {
    let snapshot = app.store.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with tabs
            Constraint::Min(0),    // Active view
            Constraint::Length(3), // Footer / input line
        ])
        .split(frame.area());

    draw_header(frame, &snapshot, chunks[0]);

    match snapshot.active_view {
        View::Dashboard => dashboard::draw(frame, &snapshot, chunks[1]),
        View::Analysis => analysis::draw(frame, &snapshot, chunks[1]),
        View::Scanner => scanner::draw(frame, &snapshot, chunks[1]),
        View::Account => account::draw(frame, &snapshot, chunks[1]),
        View::Chat => chat::draw(frame, &snapshot, chunks[1]),
    }

    draw_footer(frame, app, &snapshot, chunks[2]);
    toasts::draw(frame, &snapshot, frame.area());
}

fn draw_header(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", snapshot.selected_ticker),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    for (i, view) in View::all().iter().enumerate() {
        let label = format!(" [{}] {} ", i + 1, view.title());
        let style = if *view == snapshot.active_view {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Options Terminal "),
    );

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, app: &App, snapshot: &StoreState, area: Rect) {
    let text = match app.input_mode {
        InputMode::TickerSearch => format!(" Ticker: {}_ (Enter=select, Esc=cancel)", app.input_buffer),
        InputMode::ChatInput => format!(" > {}_ (Enter=send, Esc=done)", app.input_buffer),
        InputMode::Normal => {
            let hint = match snapshot.active_view {
                View::Chat => "1-5=view /=ticker i=type q=quit",
                View::Scanner => "1-5=view /=ticker s=scan r=refresh q=quit",
                _ => "1-5=view /=ticker r=refresh s=scan q=quit",
            };
            format!(" {} | {}", snapshot.selected_ticker, hint)
        }
    };

    let style = match app.input_mode {
        InputMode::Normal => Style::default().fg(Color::Gray),
        _ => Style::default().fg(Color::Yellow),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

/// Shared empty-state panel for views whose data has not arrived
pub(crate) fn draw_placeholder(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let widget = Paragraph::new(format!(" {}", message))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(widget, area);
}
