//! Panel 1: Query form. Index, ticker list, date range.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, FormField};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_form(f, chunks[0], app);
    render_ticker_list(f, chunks[1], app);
}

fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.form;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]field [h/l]change [H/L]jump [e]dit [r]eload [Enter]run",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let value = match field {
            FormField::Index => form
                .index
                .map(|i| i.label().to_string())
                .unwrap_or_else(|| "(none)".to_string()),
            FormField::Ticker => {
                if form.universe_loading {
                    "loading...".to_string()
                } else {
                    form.selected_ticker()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "(none)".to_string())
                }
            }
            FormField::Start => form.start.to_string(),
            FormField::End => format!("{} (exclusive)", form.end),
        };

        let focused = field == form.focus;
        let marker = if focused { "▸ " } else { "  " };
        let value_style = if focused {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, theme::accent()),
            Span::styled(format!("{:<12}", field.label()), theme::neutral()),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::from(""));
    if app.query_in_progress {
        lines.push(Line::from(Span::styled(
            "Fetching prices, profile and recommendations...",
            theme::warning(),
        )));
    } else if let Some(d) = &app.dashboard {
        lines.push(Line::from(vec![
            Span::styled("Last query: ", theme::muted()),
            Span::styled(d.request.symbol.to_string(), theme::accent_bold()),
            Span::styled(
                format!(" {} .. {}", d.request.start, d.request.end),
                theme::text_secondary(),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_ticker_list(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.form;
    let mut lines: Vec<Line> = Vec::new();

    let header = match form.index {
        Some(index) if !form.tickers.is_empty() => {
            format!("{} ({} tickers)", index.label(), form.tickers.len())
        }
        Some(index) if form.universe_loading => format!("{}: loading...", index.label()),
        Some(index) => format!("{}: no constituents", index.label()),
        None => "Select an index".to_string(),
    };
    lines.push(Line::from(Span::styled(header, theme::accent_bold())));

    let visible = area.height.saturating_sub(1) as usize;
    if visible > 0 && !form.tickers.is_empty() {
        // Keep the cursor roughly centered.
        let start = form
            .ticker_cursor
            .saturating_sub(visible / 2)
            .min(form.tickers.len().saturating_sub(visible));
        let end = (start + visible).min(form.tickers.len());

        for (i, ticker) in form.tickers[start..end].iter().enumerate() {
            let style = if start + i == form.ticker_cursor {
                theme::accent().add_modifier(Modifier::REVERSED)
            } else {
                theme::text_secondary()
            };
            lines.push(Line::from(Span::styled(format!(" {ticker}"), style)));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
