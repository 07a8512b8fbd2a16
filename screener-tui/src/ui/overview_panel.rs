//! Panel 2: Overview. Company metadata and the CAPM headline.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
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
    let p = &d.profile;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(p.long_name.clone(), theme::accent_bold()),
        Span::styled(format!("  ({})", p.symbol), theme::muted()),
    ]));
    lines.push(Line::from(""));

    field(&mut lines, "Sector", p.sector.as_deref());
    field(&mut lines, "Industry", p.industry.as_deref());
    field(&mut lines, "Website", p.website.as_deref());
    field(&mut lines, "Logo", p.logo_url.as_deref());
    lines.push(Line::from(""));

    let stats = &d.capm.stats;
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>12}: ", "Beta"), theme::muted()),
        Span::styled(
            format::beta(stats.beta),
            Style::default().fg(theme::beta_color(stats.beta)),
        ),
        Span::styled(format!("  vs {}", d.benchmark), theme::muted()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>12}: ", "Intercept"), theme::muted()),
        Span::styled(
            format::intercept(stats.intercept),
            Style::default().fg(theme::return_color(stats.intercept)),
        ),
        Span::styled(format!("  n={}", stats.observations), theme::muted()),
    ]));
    if let (Some(first), Some(last)) = (d.prices.bars().first(), d.prices.bars().last()) {
        let change = last.adjusted_close() / first.adjusted_close() - 1.0;
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>12}: ", "Change"), theme::muted()),
            Span::styled(
                format::pct(change),
                Style::default().fg(theme::return_color(change)),
            ),
            Span::styled(
                format!("  {} .. {}", first.date, last.date),
                theme::muted(),
            ),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Business summary", theme::neutral())));
    lines.push(Line::from(Span::styled(
        p.business_summary
            .clone()
            .unwrap_or_else(|| "No summary available.".to_string()),
        theme::text(),
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn field(lines: &mut Vec<Line<'_>>, label: &str, value: Option<&str>) {
    let (text, style) = match value {
        Some(v) if !v.is_empty() => (v.to_string(), theme::accent()),
        _ => ("-".to_string(), theme::muted()),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:>12}: "), theme::muted()),
        Span::styled(text, style),
    ]));
}
