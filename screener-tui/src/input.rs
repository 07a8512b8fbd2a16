//! Keyboard input dispatch: overlays → global keys → panel-specific handlers.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, FormField, Overlay, Panel};

const PAGE: usize = 20;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Edit(field) => {
            handle_edit_overlay(app, key, field);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='7') => {
            let idx = c as usize - '1' as usize;
            if let Some(panel) = Panel::from_index(idx) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('E') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Query => handle_query_key(app, key),
        Panel::Prices => handle_prices_key(app, key),
        Panel::Help => handle_help_key(app, key),
        Panel::Overview | Panel::Chart | Panel::Capm | Panel::Recommendations => {
            if key.code == KeyCode::Enter {
                app.submit_query();
            }
        }
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('E') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_edit_overlay(app: &mut AppState, key: KeyEvent, field: FormField) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.edit_input.clear();
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.edit_input);
            app.overlay = Overlay::None;
            commit_edit(app, field, &input);
        }
        KeyCode::Backspace => {
            app.edit_input.pop();
        }
        KeyCode::Char(c) => {
            app.edit_input.push(c);
        }
        _ => {}
    }
}

fn commit_edit(app: &mut AppState, field: FormField, input: &str) {
    match field {
        FormField::Ticker => {
            if app.form.tickers.is_empty() {
                app.set_warning("No constituents loaded; pick an index first");
            } else if !app.form.jump_to_ticker(input) {
                let index = app.form.index.map(|i| i.label()).unwrap_or("index");
                app.set_warning(format!("'{}' is not in {index}", input.trim()));
            }
        }
        FormField::Start | FormField::End => {
            match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
                Ok(date) if field == FormField::Start => app.form.start = date,
                Ok(date) => app.form.end = date,
                Err(_) => app.set_warning(format!(
                    "'{}' is not a date (expected YYYY-MM-DD)",
                    input.trim()
                )),
            }
        }
        FormField::Index => {}
    }
}

fn handle_query_key(app: &mut AppState, key: KeyEvent) {
    let focus = app.form.focus;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.form.focus = focus.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.form.focus = focus.prev();
        }
        KeyCode::Char('l') | KeyCode::Right => change_value(app, focus, 1),
        KeyCode::Char('h') | KeyCode::Left => change_value(app, focus, -1),
        KeyCode::Char('L') | KeyCode::PageDown => change_value(app, focus, PAGE as isize),
        KeyCode::Char('H') | KeyCode::PageUp => change_value(app, focus, -(PAGE as isize)),
        KeyCode::Char('e') | KeyCode::Char('/') => {
            if focus != FormField::Index {
                app.edit_input.clear();
                app.overlay = Overlay::Edit(focus);
            }
        }
        KeyCode::Char('r') => app.request_universe(),
        KeyCode::Enter => app.submit_query(),
        _ => {}
    }
}

/// Step the focused field: index option, ticker position, or date.
///
/// Dates move by one day per step; a page step moves them by 30 days.
fn change_value(app: &mut AppState, field: FormField, steps: isize) {
    match field {
        FormField::Index => {
            app.form.cycle_index(steps > 0);
            app.request_universe();
            if app.form.index.is_none() {
                app.set_status("No index selected");
            }
        }
        FormField::Ticker => app.form.move_ticker(steps),
        FormField::Start | FormField::End => {
            let days = if steps.unsigned_abs() >= PAGE {
                30 * steps.signum() as i64
            } else {
                steps as i64
            };
            app.form.shift_date(field, days);
        }
    }
}

fn handle_prices_key(app: &mut AppState, key: KeyEvent) {
    let rows = app.dashboard.as_ref().map_or(0, |d| d.prices.len());
    let max = rows.saturating_sub(1);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.prices_scroll = (app.prices_scroll + 1).min(max);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prices_scroll = app.prices_scroll.saturating_sub(1);
        }
        KeyCode::PageDown => {
            app.prices_scroll = (app.prices_scroll + PAGE).min(max);
        }
        KeyCode::PageUp => {
            app.prices_scroll = app.prices_scroll.saturating_sub(PAGE);
        }
        KeyCode::Char('g') | KeyCode::Home => app.prices_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.prices_scroll = max,
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char('e') {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerCommand;
    use screener_core::domain::TickerSymbol;
    use screener_core::universe::IndexUniverse;
    use std::path::PathBuf;
    use std::sync::mpsc::Receiver;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (tx, rx) = std::sync::mpsc::channel();
        let (_tx2, rx2) = std::sync::mpsc::channel();
        let app = AppState::new(tx, rx2, d(2020, 1, 1), d(2020, 1, 10), PathBuf::from("."));
        (app, rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn number_keys_switch_panels() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active_panel, Panel::Chart);
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.active_panel, Panel::Help);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Query);
    }

    #[test]
    fn welcome_dismissed_by_any_key() {
        let (mut app, _rx) = app();
        app.overlay = Overlay::Welcome;
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
    }

    #[test]
    fn choosing_index_requests_constituents() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.form.index, Some(IndexUniverse::Sp500));
        assert!(matches!(
            rx.try_recv().unwrap(),
            WorkerCommand::ResolveUniverse {
                index: IndexUniverse::Sp500
            }
        ));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.form.index, None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn date_fields_step_by_day_and_month() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.form.focus, FormField::Start);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.form.start, d(2020, 1, 2));
        press(&mut app, KeyCode::Char('H'));
        assert_eq!(app.form.start, d(2019, 12, 3));
    }

    #[test]
    fn edit_overlay_sets_date() {
        let (mut app, _rx) = app();
        app.form.focus = FormField::End;
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::Edit(FormField::End));
        type_str(&mut app, "2021-03-15");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.form.end, d(2021, 3, 15));
    }

    #[test]
    fn edit_overlay_rejects_bad_date() {
        let (mut app, _rx) = app();
        app.form.focus = FormField::Start;
        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, "yesterday");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.start, d(2020, 1, 1));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn ticker_search_then_submit() {
        let (mut app, rx) = app();
        app.form.index = Some(IndexUniverse::Djia);
        app.form.set_tickers(
            ["AAPL", "AMGN", "MMM"]
                .iter()
                .map(|s| TickerSymbol::new(s).unwrap())
                .collect(),
        );
        app.form.focus = FormField::Ticker;
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "mm");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.selected_ticker().unwrap().as_str(), "MMM");

        press(&mut app, KeyCode::Enter);
        match rx.try_recv().unwrap() {
            WorkerCommand::RunQuery { request } => {
                assert_eq!(request.symbol.as_str(), "MMM");
                assert_eq!(request.end, d(2020, 1, 10));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn quit_key_stops_app() {
        let (mut app, _rx) = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
