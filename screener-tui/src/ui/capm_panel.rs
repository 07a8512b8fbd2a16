//! Panel 5: CAPM. Stock vs benchmark daily returns with the regression line.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use screener_core::format;
use screener_core::Dashboard;

use crate::app::AppState;
use crate::theme;
use crate::ui::{padded_bounds, render_no_dashboard};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(d) = &app.dashboard else {
        render_no_dashboard(f, area, app);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    render_header(f, chunks[0], d);
    render_scatter(f, chunks[1], d);
}

fn render_header(f: &mut Frame, area: Rect, d: &Dashboard) {
    let stats = &d.capm.stats;
    let line = Line::from(vec![
        Span::styled("Beta: ", theme::muted()),
        Span::styled(
            format::beta(stats.beta),
            Style::default().fg(theme::beta_color(stats.beta)),
        ),
        Span::styled("  Intercept: ", theme::muted()),
        Span::styled(
            format::intercept(stats.intercept),
            Style::default().fg(theme::return_color(stats.intercept)),
        ),
        Span::styled(
            format!("  ({} paired days vs {})", stats.observations, d.benchmark),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_scatter(f: &mut Frame, area: Rect, d: &Dashboard) {
    let points: Vec<(f64, f64)> = d
        .capm
        .samples
        .iter()
        .map(|s| (s.benchmark, s.stock))
        .collect();

    let [x_min, x_max] = padded_bounds(points.iter().map(|(x, _)| *x));
    let stats = &d.capm.stats;
    let fit = [
        (x_min, stats.beta * x_min + stats.intercept),
        (x_max, stats.beta * x_max + stats.intercept),
    ];
    let [y_min, y_max] = padded_bounds(
        points
            .iter()
            .map(|(_, y)| *y)
            .chain(fit.iter().map(|(_, y)| *y)),
    );

    let datasets = vec![
        Dataset::default()
            .name("daily returns")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::ACCENT))
            .graph_type(GraphType::Scatter)
            .data(&points),
        Dataset::default()
            .name(format!("fit beta={}", format::beta(stats.beta)))
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::WARNING))
            .graph_type(GraphType::Line)
            .data(&fit),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled(format!("{} return", d.benchmark), theme::muted()))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(format::pct(x_min), theme::muted()),
                    Span::styled(format::pct(x_max), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    format!("{} return", d.request.symbol),
                    theme::muted(),
                ))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format::pct(y_min), theme::muted()),
                    Span::styled(format::pct(y_max), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
