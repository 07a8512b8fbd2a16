//! Panel 7: Help. Keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-7", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "E", "Open error history");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Query");
    key(&mut lines, "j / k", "Move between fields");
    key(&mut lines, "h / l", "Change index, ticker, or date by one day");
    key(&mut lines, "H / L", "Ticker by 20, date by 30 days");
    key(&mut lines, "e or /", "Type a ticker prefix or a YYYY-MM-DD date");
    key(&mut lines, "r", "Reload index constituents");
    key(&mut lines, "Enter", "Run the query (any result panel too)");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3: Prices");
    key(&mut lines, "j / k", "Scroll one row");
    key(&mut lines, "PgUp / PgDn", "Scroll one page");
    key(&mut lines, "g / G", "Jump to first / last row");
    lines.push(Line::from(""));

    section(&mut lines, "Panels 2, 4, 5, 6");
    key(&mut lines, "", "Overview, price trend, CAPM scatter, analyst grades");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 7: Help (this panel)");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Statistics");
    key(&mut lines, "Beta", "Slope of stock returns on benchmark returns");
    key(&mut lines, "Intercept", "Average daily return not explained by the benchmark");
    key(&mut lines, "Trend", "Least-squares line of close on calendar days");

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
