//! Top-level UI layout: one full-size panel plus a status bar.

pub mod capm_panel;
pub mod chart_panel;
pub mod help_panel;
pub mod overlays;
pub mod overview_panel;
pub mod prices_panel;
pub mod query_panel;
pub mod recommendations_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    // Overlays on top.
    match app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::Edit(field) => overlays::render_edit(f, main_area, field, &app.edit_input),
        Overlay::None => {}
    }
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let mut title = format!(" {} [{}] ", panel.label(), panel.index() + 1);
    if let Some(d) = &app.dashboard {
        if panel != Panel::Query && panel != Panel::Help {
            title = format!(" {} [{}] {} ", panel.label(), panel.index() + 1, d.request.symbol);
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(title)
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Query => query_panel::render(f, inner, app),
        Panel::Overview => overview_panel::render(f, inner, app),
        Panel::Prices => prices_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Capm => capm_panel::render(f, inner, app),
        Panel::Recommendations => recommendations_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Placeholder for result panels before any query has completed.
pub(crate) fn render_no_dashboard(f: &mut Frame, area: Rect, app: &AppState) {
    let message = if app.query_in_progress {
        Span::styled("Query running...", theme::warning())
    } else {
        Span::styled(
            "No query yet. Fill in the form on the Query panel (press 1) and press Enter.",
            theme::muted(),
        )
    };
    let lines = vec![Line::from(""), Line::from(""), Line::from(message)];
    f.render_widget(Paragraph::new(lines), area);
}

/// Axis bounds over `values` with 5% padding; never a zero-width range.
pub(crate) fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let span = max - min;
    let padding = if span > 0.0 {
        span * 0.05
    } else {
        min.abs().max(1.0) * 0.05
    };
    [min - padding, max + padding]
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
