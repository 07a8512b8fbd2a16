//! Panel 6: Recommendations. Latest analyst grades.

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
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("Latest {} analyst recommendations", d.recommendations.len()),
        theme::muted(),
    )));
    lines.push(Line::from(""));

    if d.recommendations.is_empty() {
        lines.push(Line::from(Span::styled(
            "No recommendations published for this symbol.",
            theme::muted(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("{:<10}  {:<32}  {}", "Date", "Firm", "To Grade"),
            theme::accent_bold(),
        )));
        for row in &d.recommendations {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<10}  ", row.date), theme::muted()),
                Span::styled(
                    format!("{:<32}  ", format::truncate(&row.firm, 32)),
                    theme::text(),
                ),
                Span::styled(
                    row.to_grade.clone(),
                    Style::default().fg(theme::grade_color(&row.to_grade)),
                ),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
