//! Request/response types for the hvacd HTTP API.

use crate::catalog::{EquipmentType, Symptom};
use crate::diagnosis::DiagnosticSession;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response for the equipment-type listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentTypesResponse {
    pub success: bool,
    pub equipment_types: Vec<EquipmentType>,
}

/// Response for the symptom listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomsResponse {
    pub success: bool,
    pub symptoms: Vec<Symptom>,
}

/// Full guided diagnostic submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuidedDiagnosticRequest {
    pub equipment_type: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub measurements: Map<String, Value>,
    #[serde(default)]
    pub error_codes: Vec<String>,
    #[serde(default)]
    pub additional_notes: String,
}

/// Minimal free-text submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuickSubmitRequest {
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Envelope for a completed diagnostic session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: DiagnosticSession,
}

/// Diagnostic context echoed back with a follow-up question
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpContext {
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub measurements: Option<Value>,
}

/// Follow-up question against a previously returned analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpRequest {
    #[serde(default)]
    pub original_analysis: String,
    #[serde(default)]
    pub follow_up_question: String,
    #[serde(default)]
    pub diagnostic_context: FollowUpContext,
}

/// Successful follow-up answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpResponse {
    pub follow_up_response: String,
    pub timestamp: String,
}

/// Error envelope for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub llm_enabled: bool,
    pub llm_configured: bool,
}

/// Canned analysis returned by the image-upload stub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisStub {
    pub text_detected: String,
    pub components_identified: Vec<String>,
    pub safety_concerns: Vec<String>,
}

/// Image-upload stub response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub success: bool,
    pub message: String,
    pub analysis: ImageAnalysisStub,
}
