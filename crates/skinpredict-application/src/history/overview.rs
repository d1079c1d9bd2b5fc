//! Summary statistics over a user's scan history.

use std::collections::HashMap;

use skinpredict_core::session::ScanHistoryEntry;

/// Characters of the last message shown per row.
const PREVIEW_CHARS: usize = 60;

/// One row of the history list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub session_id: String,
    pub created_at: String,
    pub skin_type: String,
    pub issue_count: usize,
    pub last_message: Option<String>,
}

/// Dashboard numbers for a user's scans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryOverview {
    pub total: usize,
    /// `None` when there are no scans. Ties go to the type seen first.
    pub most_common_skin_type: Option<String>,
    pub total_issues: usize,
    pub average_issue_count: f64,
    /// Creation time of the newest scan.
    pub latest: Option<String>,
    pub rows: Vec<HistoryRow>,
}

impl HistoryOverview {
    /// Builds the overview from entries ordered newest first.
    pub fn from_entries(entries: &[ScanHistoryEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for entry in entries {
            let skin_type = entry.skin_type();
            let count = counts.entry(skin_type).or_insert(0);
            if *count == 0 {
                order.push(skin_type);
            }
            *count += 1;
        }
        let mut most_common: Option<(&str, usize)> = None;
        for skin_type in order {
            let count = counts[skin_type];
            if most_common.is_none_or(|(_, best)| count > best) {
                most_common = Some((skin_type, count));
            }
        }

        let total_issues: usize = entries.iter().map(ScanHistoryEntry::issue_count).sum();

        Self {
            total: entries.len(),
            most_common_skin_type: most_common.map(|(skin_type, _)| skin_type.to_string()),
            total_issues,
            average_issue_count: total_issues as f64 / entries.len() as f64,
            latest: entries.first().map(|entry| entry.created_at.clone()),
            rows: entries
                .iter()
                .map(|entry| HistoryRow {
                    session_id: entry.session_id.clone(),
                    created_at: entry.created_at.clone(),
                    skin_type: entry.skin_type().to_string(),
                    issue_count: entry.issue_count(),
                    last_message: entry.last_message_preview(PREVIEW_CHARS),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skinpredict_core::analysis::{SkinAnalysisResult, SkinIssue, SkinTypeAssessment};

    fn entry(id: &str, skin_type: &str, issues: usize) -> ScanHistoryEntry {
        ScanHistoryEntry {
            session_id: id.into(),
            user_id: "u1".into(),
            created_at: format!("2024-05-0{}T10:00:00Z", id.len()),
            updated_at: String::new(),
            analysis: SkinAnalysisResult {
                skin_type: SkinTypeAssessment {
                    kind: skin_type.into(),
                    confidence: 50.0,
                },
                skin_issues: (0..issues)
                    .map(|i| SkinIssue {
                        name: format!("Issue {i}"),
                        confidence: 10.0,
                    })
                    .collect(),
                ai_response: None,
                demographics: None,
                personalized_advice: None,
            },
            messages: vec![],
        }
    }

    #[test]
    fn test_empty_history() {
        let overview = HistoryOverview::from_entries(&[]);
        assert_eq!(overview.total, 0);
        assert!(overview.most_common_skin_type.is_none());
        assert_eq!(overview.average_issue_count, 0.0);
    }

    #[test]
    fn test_counts_and_ties() {
        let entries = vec![
            entry("c", "Oily", 2),
            entry("b", "Dry", 1),
            entry("a", "Dry", 0),
            entry("d", "Oily", 1),
        ];
        let overview = HistoryOverview::from_entries(&entries);

        assert_eq!(overview.total, 4);
        // Two each: the first type seen wins.
        assert_eq!(overview.most_common_skin_type.as_deref(), Some("Oily"));
        assert_eq!(overview.total_issues, 4);
        assert_eq!(overview.average_issue_count, 1.0);
        assert_eq!(overview.latest, Some(entries[0].created_at.clone()));
        assert_eq!(overview.rows[1].skin_type, "Dry");
        assert!(overview.rows[0].last_message.is_none());
    }
}
