//! Paper-trading account view

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::format::format_pl;
use crate::store::StoreState;

use super::draw_placeholder;

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(4)])
        .split(area);

    draw_account(frame, snapshot, chunks[0]);
    draw_positions(frame, snapshot, chunks[1]);
}

/// Money fields arrive as strings from the broker passthrough
fn parse_money(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}

fn draw_account(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(account) = &snapshot.account else {
        // Backend not configured for paper trading: placeholder, no error
        draw_placeholder(frame, " Account ", "Paper trading not configured", area);
        return;
    };

    let dollars = |raw: &str| {
        parse_money(raw)
            .map(|v| crate::format::format_currency(Some(v)))
            .unwrap_or_else(|| "N/A".to_string())
    };

    let lines = vec![
        Line::from(format!(
            "Equity: {}    Cash: {}",
            dollars(&account.equity),
            dollars(&account.cash)
        )),
        Line::from(format!(
            "Buying Power: {}    Portfolio Value: {}",
            dollars(&account.buying_power),
            dollars(&account.portfolio_value)
        )),
        Line::from(format!("Status: {}", account.status)),
    ];

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Account "));
    frame.render_widget(widget, area);
}

fn draw_positions(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(positions) = &snapshot.positions else {
        draw_placeholder(frame, " Positions ", "No position data", area);
        return;
    };

    if positions.is_empty() {
        draw_placeholder(frame, " Positions ", "No open positions", area);
        return;
    }

    let header = Row::new(vec![
        "Symbol", "Qty", "Side", "Entry", "Current", "Mkt Value", "P/L",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = positions
        .iter()
        .map(|p| {
            let (pl_text, pl_color) = format_pl(parse_money(&p.unrealized_pl));
            Row::new(vec![
                Cell::from(p.symbol.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(p.qty.clone()),
                Cell::from(p.side.clone()),
                Cell::from(p.avg_entry_price.clone()),
                Cell::from(p.current_price.clone()),
                Cell::from(p.market_value.clone()),
                Cell::from(pl_text).style(Style::default().fg(pl_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Positions "));

    frame.render_widget(table, area);
}
