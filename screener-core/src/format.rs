//! Display formatting shared by the CLI and TUI.

use crate::stats::CapmStats;

pub fn beta(value: f64) -> String {
    format!("{value:.4}")
}

/// Intercept is a daily return fraction; shown as a percentage.
pub fn intercept(value: f64) -> String {
    format!("{:.4}%", value * 100.0)
}

pub fn price(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "-".to_string()
    }
}

/// Return as a signed percentage, e.g. `+1.2345%`.
pub fn pct(value: f64) -> String {
    format!("{:+.4}%", value * 100.0)
}

/// Integer with thousands separators: `1234567` → `1,234,567`.
pub fn volume(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Beta: 1.2345  Intercept: 0.0123%  (n=250)`
pub fn capm_summary(stats: &CapmStats) -> String {
    format!(
        "Beta: {}  Intercept: {}  (n={})",
        beta(stats.beta),
        intercept(stats.intercept),
        stats.observations
    )
}

/// Shorten to at most `max` characters, appending `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
