//! Skin analysis results as returned by the analysis backend.

use serde::{Deserialize, Serialize};

/// The skin type assessment of a single scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTypeAssessment {
    /// Skin type label, e.g. "Dry", "Oily", "Normal".
    #[serde(rename = "type")]
    pub kind: String,
    /// Confidence in percent (0-100).
    pub confidence: f64,
}

/// A detected skin issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinIssue {
    pub name: String,
    /// Confidence in percent (0-100).
    pub confidence: f64,
}

/// Per-field confidence of the demographic estimate (0-1).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemographicConfidence {
    #[serde(default)]
    pub gender: f64,
    #[serde(default)]
    pub age: f64,
    #[serde(default)]
    pub race: f64,
}

/// Demographic estimate attached by the backend when its face model is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// "Male" or "Female".
    pub gender: String,
    /// Age bracket, e.g. "20-29".
    pub age: String,
    pub race: String,
    #[serde(default)]
    pub confidence: DemographicConfidence,
}

/// Result of one scan. Produced once by the analyzer and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinAnalysisResult {
    pub skin_type: SkinTypeAssessment,
    #[serde(default)]
    pub skin_issues: Vec<SkinIssue>,
    /// Free-form narrative from the vision model, when that path was used.
    #[serde(default, rename = "ai_response", skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalized_advice: Option<String>,
}

impl SkinAnalysisResult {
    /// Lowercased skin type, the key used by the knowledge base.
    pub fn skin_type_key(&self) -> String {
        self.skin_type.kind.trim().to_lowercase()
    }

    /// Lowercased issue names in detection order.
    pub fn issue_keys(&self) -> Vec<String> {
        self.skin_issues
            .iter()
            .map(|issue| issue.name.trim().to_lowercase())
            .collect()
    }

    pub fn has_issues(&self) -> bool {
        !self.skin_issues.is_empty()
    }

    /// Builds the catalog filtering profile for this result.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            skin_type: self.skin_type.kind.clone(),
            skin_issues: self.skin_issues.iter().map(|i| i.name.clone()).collect(),
            gender: self.demographics.as_ref().map(|d| d.gender.clone()),
            age_group: self.demographics.as_ref().map(|d| d.age.clone()),
        }
    }
}

/// Applicability profile used to filter catalog items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub skin_type: String,
    #[serde(default)]
    pub skin_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
}
