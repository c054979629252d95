//! Analysis view: technical, IV, price history, strategy, and news panels

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

use crate::format::{
    format_compact, format_currency, format_number, format_percent, signal_color, time_ago,
};
use crate::store::StoreState;

use super::draw_placeholder;

pub fn draw(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Technical + IV
            Constraint::Length(6),  // Price history sparkline
            Constraint::Min(8),     // Options chain
            Constraint::Length(8),  // Strategy + news
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    draw_technical(frame, snapshot, top[0]);
    draw_iv(frame, snapshot, top[1]);
    draw_price_history(frame, snapshot, rows[1]);
    draw_chain(frame, snapshot, rows[2]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[3]);

    draw_strategy(frame, snapshot, bottom[0]);
    draw_news(frame, snapshot, bottom[1]);
}

fn draw_technical(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let title = format!(" Technical: {} ", snapshot.selected_ticker);

    let Some(data) = &snapshot.technical else {
        let msg = if snapshot.technical_loading {
            "Loading..."
        } else {
            "No data"
        };
        draw_placeholder(frame, &title, msg, area);
        return;
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format_currency(Some(data.current_price)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format_percent(Some(data.change_pct), 2),
                Style::default().fg(signal_color(if data.change_pct >= 0.0 {
                    market_client::Signal::Bullish
                } else {
                    market_client::Signal::Bearish
                })),
            ),
        ]),
        Line::from(format!(
            "SMA 20/50/200: {} / {} / {}",
            format_currency(data.sma20),
            format_currency(data.sma50),
            format_currency(data.sma200)
        )),
        Line::from(format!(
            "RSI: {}  ({})",
            data.rsi
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "N/A".to_string()),
            data.rsi_signal
        )),
        Line::from(format!(
            "MACD: {}  hist {}  ({})",
            data.macd
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            data.macd_histogram
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "N/A".to_string()),
            data.macd_cross
        )),
        Line::from(format!(
            "Vol: {}  ({:.1}x avg)   Support {}  Resistance {}",
            format_compact(Some(data.volume)),
            data.volume_ratio,
            format_currency(Some(data.support_20d)),
            format_currency(Some(data.resistance_20d))
        )),
        Line::from(vec![
            Span::raw("Signal: "),
            Span::styled(
                data.signal.as_str(),
                Style::default()
                    .fg(signal_color(data.signal))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  strength {:.0}", data.strength)),
        ]),
    ];

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn draw_iv(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(data) = &snapshot.iv else {
        let msg = if snapshot.iv_loading { "Loading..." } else { "No data" };
        draw_placeholder(frame, " Implied Volatility ", msg, area);
        return;
    };

    let pct = |v: Option<f64>| {
        v.map(|x| format!("{:.1}%", x))
            .unwrap_or_else(|| "N/A".to_string())
    };

    let mut lines = vec![
        Line::from(format!("Current IV:    {}", pct(data.current_iv))),
        Line::from(format!("IV Percentile: {}", pct(data.iv_percentile))),
        Line::from(format!("IV Rank:       {}", pct(data.iv_rank))),
        Line::from(format!(
            "Range: {} - {}  ({} points)",
            pct(data.iv_min),
            pct(data.iv_max),
            data.data_points
        )),
    ];

    if let Some(message) = &data.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Implied Volatility "),
    );
    frame.render_widget(widget, area);
}

fn draw_price_history(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(bars) = &snapshot.price_history else {
        let msg = if snapshot.price_history_loading {
            "Loading..."
        } else {
            "No data"
        };
        draw_placeholder(frame, " Price History (6mo) ", msg, area);
        return;
    };

    if bars.is_empty() {
        draw_placeholder(frame, " Price History (6mo) ", "No data", area);
        return;
    }

    // Sparkline wants u64 values; rescale closes into the panel height
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let min = closes.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = closes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(f64::EPSILON);
    let scaled: Vec<u64> = closes
        .iter()
        .map(|c| (((c - min) / span) * 100.0) as u64)
        .collect();

    let title = format!(
        " Price History (6mo)  low {}  high {} ",
        format_currency(Some(min)),
        format_currency(Some(max))
    );

    let widget = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::Cyan))
        .data(&scaled);
    frame.render_widget(widget, area);
}

fn draw_chain(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(data) = &snapshot.chain else {
        let msg = if snapshot.chain_loading {
            "Loading..."
        } else {
            "No data"
        };
        draw_placeholder(frame, " Options Chain ", msg, area);
        return;
    };

    if let Some(error) = &data.error {
        draw_placeholder(frame, " Options Chain ", error, area);
        return;
    }

    let header = Row::new(vec![
        "Type", "Strike", "Expiry", "Bid", "Ask", "Vol", "OI", "IV", "Delta", "Theta",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let spot = snapshot.technical.as_ref().map(|t| t.current_price);
    let greek = |v: Option<f64>| {
        v.map(|x| format!("{:.3}", x))
            .unwrap_or_else(|| "N/A".to_string())
    };

    let visible = (area.height as usize).saturating_sub(3);
    let rows: Vec<Row> = data
        .contracts
        .iter()
        .take(visible.max(1))
        .map(|c| {
            let is_call = c.contract_type == "call";
            let in_the_money = spot.map_or(false, |price| {
                (is_call && c.strike < price) || (!is_call && c.strike > price)
            });
            let strike_style = if in_the_money {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(c.contract_type.to_uppercase()).style(Style::default().fg(
                    if is_call { Color::Green } else { Color::Red },
                )),
                Cell::from(format_currency(Some(c.strike))).style(strike_style),
                Cell::from(c.expiry.clone()),
                Cell::from(format_number(c.bid, 2)),
                Cell::from(format_number(c.ask, 2)),
                Cell::from(format_compact(Some(c.volume))),
                Cell::from(format_compact(Some(c.open_interest))),
                Cell::from(
                    c.iv.map(|iv| format!("{:.1}%", iv * 100.0))
                        .unwrap_or_else(|| "N/A".to_string()),
                )
                .style(Style::default().fg(Color::Yellow)),
                Cell::from(greek(c.delta)),
                Cell::from(greek(c.theta)),
            ])
        })
        .collect();

    let avg_iv = data
        .summary
        .avg_iv
        .map(|iv| format!("{:.1}%", iv * 100.0))
        .unwrap_or_else(|| "N/A".to_string());
    let title = format!(
        " Options Chain ({} contracts, avg IV {}) ",
        data.count, avg_iv
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Min(7),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn draw_strategy(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(data) = &snapshot.strategy else {
        let msg = if snapshot.strategy_loading {
            "Loading..."
        } else {
            "No recommendations"
        };
        draw_placeholder(frame, " Strategies ", msg, area);
        return;
    };

    let mut lines = Vec::new();
    for rec in data.recommendations.iter().take(3) {
        lines.push(Line::from(Span::styled(
            rec.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "  max profit {}  max loss {}  PoP {}",
            format_currency(rec.max_profit),
            format_currency(rec.max_loss),
            rec.probability_of_profit
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "N/A".to_string()),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No recommendations",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Strategies "));
    frame.render_widget(widget, area);
}

fn draw_news(frame: &mut Frame, snapshot: &StoreState, area: Rect) {
    let Some(data) = &snapshot.news else {
        let msg = if snapshot.news_loading { "Loading..." } else { "No news" };
        draw_placeholder(frame, " News ", msg, area);
        return;
    };

    let mut lines = Vec::new();
    for article in data.articles.iter().take((area.height as usize).saturating_sub(2)) {
        let age = time_ago(&article.published);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>8} ", age),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(article.title.clone()),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No news",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" News "));
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_chain_panel_renders_contract_rows() {
        let mut snapshot = StoreState::new(&DashboardConfig::default());
        snapshot.chain = Some(
            serde_json::from_value(serde_json::json!({
                "underlying": "TSLA",
                "count": 2,
                "contracts": [
                    {"ticker": "TSLA", "type": "call", "strike": 250.0,
                     "expiry": "2026-09-18", "bid": 4.1, "ask": 4.3,
                     "volume": 1200.0, "open_interest": 5400.0,
                     "iv": 0.42, "delta": 0.55},
                    {"ticker": "TSLA", "type": "put", "strike": 240.0,
                     "expiry": "2026-09-18", "bid": 3.0, "ask": 3.2,
                     "volume": 800.0, "open_interest": 2100.0,
                     "iv": 0.47, "delta": -0.44}
                ],
                "summary": {"total_contracts": 2, "avg_iv": 0.445}
            }))
            .unwrap(),
        );

        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_chain(frame, &snapshot, frame.area()))
            .unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("Options Chain (2 contracts, avg IV 44.5%)"));
        assert!(text.contains("CALL"));
        assert!(text.contains("PUT"));
        assert!(text.contains("$250.00"));
        assert!(text.contains("2026-09-18"));
        assert!(text.contains("42.0%"));
    }

    #[test]
    fn test_chain_panel_shows_backend_error() {
        let mut snapshot = StoreState::new(&DashboardConfig::default());
        snapshot.chain = Some(
            serde_json::from_value(serde_json::json!({
                "underlying": "TSLA",
                "error": "chain provider unavailable"
            }))
            .unwrap(),
        );

        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_chain(frame, &snapshot, frame.area()))
            .unwrap();

        let text = rendered_text(&terminal);
        assert!(text.contains("chain provider unavailable"));
    }
}
