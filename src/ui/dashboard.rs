//! Watchlist grid view

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::format::{format_compact, format_currency, format_percent, signal_color};
use crate::store::StoreState;

use super::draw_placeholder;

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    if snapshot.watchlist_loading && snapshot.watchlist_data.is_empty() {
        draw_placeholder(frame, " Watchlist ", "Loading watchlist...", area);
        return;
    }

    if snapshot.watchlist_data.is_empty() {
        draw_placeholder(
            frame,
            " Watchlist ",
            "No data. Is the backend running? (r to retry)",
            area,
        );
        return;
    }

    let header = Row::new(vec!["Ticker", "Price", "Change", "RSI", "Volume", "Signal"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = snapshot
        .watchlist
        .iter()
        .filter_map(|symbol| {
            // Failed symbols stay absent from the map and are skipped
            let data = snapshot.watchlist_data.get(symbol)?;
            let change_style = Style::default().fg(signal_color(if data.change_pct >= 0.0 {
                market_client::Signal::Bullish
            } else {
                market_client::Signal::Bearish
            }));

            Some(Row::new(vec![
                Cell::from(symbol.clone()),
                Cell::from(format_currency(Some(data.current_price))),
                Cell::from(format_percent(Some(data.change_pct), 2)).style(change_style),
                Cell::from(
                    data.rsi
                        .map(|r| format!("{:.0}", r))
                        .unwrap_or_else(|| "N/A".to_string()),
                ),
                Cell::from(format_compact(Some(data.volume))),
                Cell::from(data.signal.as_str())
                    .style(Style::default().fg(signal_color(data.signal))),
            ]))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Watchlist "));

    frame.render_widget(table, area);
}
