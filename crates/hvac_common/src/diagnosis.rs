//! Diagnostic data model.
//!
//! Everything here is request-scoped: a `Diagnosis` is built atomically per
//! submission and never mutated after it is returned. Nothing is persisted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Symptom category used by the classifier buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCategory {
    Cooling,
    Electrical,
    Mechanical,
    Visual,
}

/// Priority of a recommended action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

/// Severity of a safety warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Critical,
    High,
    Medium,
    Low,
}

/// A likely root cause with an estimated probability (0-100)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub cause: String,
    pub probability: u8,
}

/// A single actionable recommendation for the technician
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    pub priority: ActionPriority,
}

/// One ordered troubleshooting step. Order is meaningful: safety
/// preparation always comes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TroubleshootingStep {
    pub title: String,
    pub description: String,
    pub safety_note: String,
    pub expected_result: String,
}

/// A safety warning with the code or standard it cites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyWarning {
    pub level: WarningLevel,
    pub category: String,
    pub message: String,
    pub compliance: String,
}

/// Input fields collected from a technician for one submission.
///
/// Symptom ids outside the known catalog are ignored by classification but
/// still echoed verbatim on the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticInput {
    pub equipment_type: String,
    pub location: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub measurements: Map<String, Value>,
    #[serde(default)]
    pub error_codes: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// The engine's output.
///
/// The four list fields are never empty: every code path produces at least
/// a fallback entry. `confidence_score` is always in 0-100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub primary_issue: String,
    pub summary: String,
    pub confidence_score: u8,
    pub likely_causes: Vec<Cause>,
    pub recommended_actions: Vec<RecommendedAction>,
    pub troubleshooting_steps: Vec<TroubleshootingStep>,
    pub safety_warnings: Vec<SafetyWarning>,
    /// True when the summary came from the text-generation backend
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub enhanced: bool,
    /// Kind of enhanced analysis, set only when `enhanced` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_kind: Option<String>,
}

/// How a session was submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Guided,
    QuickSubmit,
}

/// Wraps a diagnosis with a short identifier, a creation timestamp, and the
/// echoed input fields. Lives only for the duration of the HTTP response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticSession {
    pub id: String,
    pub session_type: SessionType,
    pub equipment_type: String,
    pub location: String,
    pub symptoms: Vec<String>,
    pub measurements: Map<String, Value>,
    pub error_codes: Vec<String>,
    pub description: String,
    pub created_at: String,
    pub status: String,
    pub confidence_score: u8,
    pub diagnosis: Diagnosis,
}

impl DiagnosticSession {
    /// Build a completed session around a finished diagnosis
    pub fn new(session_type: SessionType, input: DiagnosticInput, diagnosis: Diagnosis) -> Self {
        Self {
            id: short_session_id(),
            session_type,
            equipment_type: input.equipment_type,
            location: input.location,
            symptoms: input.symptoms,
            measurements: input.measurements,
            error_codes: input.error_codes,
            description: input.description,
            created_at: Utc::now().to_rfc3339(),
            status: "completed".to_string(),
            confidence_score: diagnosis.confidence_score,
            diagnosis,
        }
    }
}

/// Short session identifier: first 8 hex chars of a v4 UUID
fn short_session_id() -> String {
    let id = Uuid::new_v4().to_string();
    id[..8].to_string()
}
