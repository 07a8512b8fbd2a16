//! Panel 3: Prices. Scrollable OHLCV table, oldest first.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use screener_core::format;

use crate::app::AppState;
use crate::theme;
use crate::ui::render_no_dashboard;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(d) = &app.dashboard else {
        render_no_dashboard(f, area, app);
        return;
    };
    let bars = d.prices.bars();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(format!("{} rows", bars.len()), theme::accent()),
        Span::styled("  [j/k]scroll [PgUp/PgDn]page [g/G]top/bottom", theme::muted()),
    ]));
    lines.push(Line::from(""));

    if bars.is_empty() {
        lines.push(Line::from(Span::styled(
            "No price rows in this range.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>15}",
            "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
        ),
        theme::accent_bold(),
    )));

    let visible_height = area.height.saturating_sub(3) as usize;
    let start = app.prices_scroll.min(bars.len().saturating_sub(1));
    let end = (start + visible_height).min(bars.len());

    for i in start..end {
        let bar = &bars[i];
        let change_style = if i == 0 {
            theme::text()
        } else {
            let prev = bars[i - 1].close;
            Style::default().fg(theme::return_color(bar.close - prev))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10} ", bar.date), theme::muted()),
            Span::styled(format!("{:>10} ", format::price(bar.open)), theme::text()),
            Span::styled(format!("{:>10} ", format::price(bar.high)), theme::text()),
            Span::styled(format!("{:>10} ", format::price(bar.low)), theme::text()),
            Span::styled(format!("{:>10} ", format::price(bar.close)), change_style),
            Span::styled(
                format!("{:>10} ", format::price(bar.adj_close)),
                theme::text_secondary(),
            ),
            Span::styled(format!("{:>15}", format::volume(bar.volume)), theme::muted()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
