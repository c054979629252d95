//! Unusual-activity scanner view

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::format::format_compact;
use crate::store::StoreState;

use super::draw_placeholder;

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    if snapshot.scanner_loading {
        draw_placeholder(frame, " Unusual Activity ", "Scanning...", area);
        return;
    }

    let Some(data) = &snapshot.scanner else {
        draw_placeholder(
            frame,
            " Unusual Activity ",
            "Press s to run a scan",
            area,
        );
        return;
    };

    if data.alerts.is_empty() {
        draw_placeholder(frame, " Unusual Activity ", "No alerts found", area);
        return;
    }

    let header = Row::new(vec![
        "Ticker", "Type", "Strike", "Exp", "Vol/OI", "Premium", "Interpretation",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = data
        .alerts
        .iter()
        .map(|alert| {
            Row::new(vec![
                Cell::from(alert.ticker.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(alert.alert_type.clone()),
                Cell::from(
                    alert
                        .strike
                        .map(|s| format!("{:.0}", s))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(alert.expiration.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(
                    alert
                        .vol_oi_ratio
                        .map(|r| format!("{:.1}x", r))
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(format_compact(Some(alert.premium_flow)))
                    .style(Style::default().fg(Color::Yellow)),
                Cell::from(alert.interpretation.clone()),
            ])
        })
        .collect();

    let title = format!(
        " Unusual Activity ({} alerts, scanned {}) ",
        data.total_alerts, data.scan_time
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}
