//! Helpers shared by several pages

use serde::Serialize;

use crate::config::ProfileConfig;
use crate::data::Engager;
use crate::view::components::{self, SourceInfo};
use crate::view::{format_fixed, Element};

/// Engagement count at which a contact is a hot lead
pub const HOT_LEAD_THRESHOLD: f64 = 5.0;

/// "About this data" footer stamped with the configured update date
pub fn footer(profile: &ProfileConfig, source: &str, notes: &str) -> Element {
    components::source_footer(&SourceInfo {
        source: source.to_string(),
        updated: profile.updated.clone(),
        notes: notes.to_string(),
    })
}

/// `part / whole` as a one-decimal percentage (`12.5%`); `whole` below 1 counts as 1
pub fn percent_of(part: f64, whole: f64) -> String {
    format!("{}%", format_fixed(part / whole.max(1.0) * 100.0, 1))
}

/// Date portion of an ISO timestamp
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Mean of `values`, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Occurrences of one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: f64,
}

/// Count non-empty labels, most frequent first (ties keep first appearance)
pub fn count_by<'a>(labels: impl IntoIterator<Item = Option<&'a str>>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in labels.into_iter().flatten().filter(|l| !l.is_empty()) {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(existing) => existing.count += 1.0,
            None => counts.push(LabelCount {
                label: label.to_string(),
                count: 1.0,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.total_cmp(&a.count));
    counts
}

/// Engagement rolled up per company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyTotal {
    pub company: String,
    pub total: f64,
    pub people: f64,
}

/// Per-company totals for engagers with a company, largest total first
pub fn company_totals<'a>(engagers: impl IntoIterator<Item = &'a Engager>) -> Vec<CompanyTotal> {
    let mut totals: Vec<CompanyTotal> = Vec::new();
    for engager in engagers {
        let Some(company) = engager.company.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        match totals.iter_mut().find(|t| t.company == company) {
            Some(existing) => {
                existing.total += engager.total_engagements;
                existing.people += 1.0;
            }
            None => totals.push(CompanyTotal {
                company: company.to_string(),
                total: engager.total_engagements,
                people: 1.0,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}
