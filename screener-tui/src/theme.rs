//! Neon-on-charcoal style tokens.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, highlights, price series)
//! - **Positive**: Neon green (gains, upgrades)
//! - **Negative**: Hot pink (losses, downgrades, errors)
//! - **Warning**: Neon orange (alerts, trend lines)
//! - **Neutral**: Cool purple (section labels)
//! - **Muted**: Steel blue (hints, secondary text)

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Green for gains, pink for losses.
pub fn return_color(value: f64) -> Color {
    if value >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}

/// Beta bands: defensive, market-like, aggressive, inverse.
pub fn beta_color(beta: f64) -> Color {
    match beta {
        b if b < 0.0 => NEGATIVE,
        b if b < 0.8 => NEUTRAL,
        b if b <= 1.2 => ACCENT,
        _ => WARNING,
    }
}

/// Color for an analyst grade by its wording.
pub fn grade_color(grade: &str) -> Color {
    let g = grade.to_ascii_lowercase();
    if ["buy", "outperform", "overweight", "positive"]
        .iter()
        .any(|w| g.contains(w))
    {
        POSITIVE
    } else if ["sell", "underperform", "underweight", "negative", "reduce"]
        .iter()
        .any(|w| g.contains(w))
    {
        NEGATIVE
    } else {
        TEXT_SECONDARY
    }
}
