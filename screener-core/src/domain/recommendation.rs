//! Analyst recommendation records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One analyst rating change as reported by the provider.
///
/// Every field except the date may be missing upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub date: NaiveDate,
    pub firm: Option<String>,
    pub to_grade: Option<String>,
    pub from_grade: Option<String>,
    pub action: Option<String>,
}

/// Displayed projection of a recommendation: the "from grade" and "action"
/// columns are not part of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRow {
    pub date: NaiveDate,
    pub firm: String,
    pub to_grade: String,
}

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The `limit` most recent complete rows, in chronological order.
///
/// Rows missing a firm or a to-grade are dropped before the limit applies.
pub fn latest_rows(recs: &[Recommendation], limit: usize) -> Vec<RecommendationRow> {
    let mut rows: Vec<RecommendationRow> = recs
        .iter()
        .filter_map(|r| {
            Some(RecommendationRow {
                date: r.date,
                firm: present(&r.firm)?,
                to_grade: present(&r.to_grade)?,
            })
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    let skip = rows.len().saturating_sub(limit);
    rows.split_off(skip)
}
