//! Panel 4: Chart. Close prices over time with the fitted trend line.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

use screener_core::format;
use screener_core::Dashboard;

use crate::app::AppState;
use crate::theme;
use crate::ui::{padded_bounds, render_no_dashboard};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.dashboard {
        Some(d) if !d.prices.is_empty() => render_chart(f, area, d),
        _ => render_no_dashboard(f, area, app),
    }
}

/// (days since first bar, close) points; same x axis the trend was fit on.
fn close_points(d: &Dashboard) -> Vec<(f64, f64)> {
    let Some(first) = d.prices.first_date() else {
        return Vec::new();
    };
    d.prices
        .bars()
        .iter()
        .filter(|b| b.close.is_finite())
        .map(|b| ((b.date - first).num_days() as f64, b.close))
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, d: &Dashboard) {
    let points = close_points(d);
    let x_max = points.last().map_or(1.0, |(x, _)| x.max(1.0));

    let trend = [
        (0.0, d.price_trend.predict(0.0)),
        (x_max, d.price_trend.predict(x_max)),
    ];

    let [y_min, y_max] = padded_bounds(
        points
            .iter()
            .map(|(_, y)| *y)
            .chain(trend.iter().map(|(_, y)| *y)),
    );

    let trend_label = format!("trend {:+.4}/day", d.price_trend.slope);
    let datasets = vec![
        Dataset::default()
            .name(d.request.symbol.to_string())
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::ACCENT))
            .graph_type(GraphType::Scatter)
            .data(&points),
        Dataset::default()
            .name(trend_label)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::WARNING))
            .graph_type(GraphType::Line)
            .data(&trend),
    ];

    let first = d.prices.first_date().map(|x| x.to_string()).unwrap_or_default();
    let last = d.prices.last_date().map(|x| x.to_string()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(first, theme::muted()),
                    Span::styled(last, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format::price(y_min), theme::muted()),
                    Span::styled(format::price(y_max), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
