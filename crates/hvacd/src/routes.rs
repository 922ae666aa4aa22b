//! API routes for hvacd.
//!
//! Thin handlers: collect input fields, call the diagnosis engine, wrap the
//! result into a session record. The diagnostic routes cannot fail - the
//! engine is total - so only the follow-up route maps errors to statuses.

use crate::enhance;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use hvac_common::api::{
    EquipmentTypesResponse, ErrorResponse, FollowUpRequest, FollowUpResponse,
    GuidedDiagnosticRequest, HealthResponse, ImageAnalysisStub, ImageUploadResponse,
    QuickSubmitRequest, SessionResponse, SymptomsResponse,
};
use hvac_common::{catalog, DiagnosticInput, DiagnosticSession, HvacError, SessionType};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Equipment Routes
// ============================================================================

pub fn equipment_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/equipment/types", get(equipment_types))
        .route("/api/equipment/symptoms", get(list_symptoms))
}

async fn equipment_types() -> Json<EquipmentTypesResponse> {
    Json(EquipmentTypesResponse {
        success: true,
        equipment_types: catalog::equipment_types(),
    })
}

async fn list_symptoms() -> Json<SymptomsResponse> {
    Json(SymptomsResponse {
        success: true,
        symptoms: catalog::symptoms(),
    })
}

// ============================================================================
// Diagnostic Routes
// ============================================================================

pub fn diagnostic_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/diagnostic/guided", post(guided_diagnostic))
        .route("/api/diagnostic/quick-submit", post(quick_submit))
}

async fn guided_diagnostic(
    State(state): State<AppStateArc>,
    Json(req): Json<GuidedDiagnosticRequest>,
) -> Json<SessionResponse> {
    let input = DiagnosticInput {
        equipment_type: req.equipment_type.unwrap_or_else(|| "unknown".to_string()),
        location: req.location.unwrap_or_default(),
        symptoms: req.symptoms,
        measurements: req.measurements,
        error_codes: req.error_codes,
        description: req.additional_notes,
    };

    info!(
        "[DIAG] guided submission: equipment {}, {} symptoms",
        input.equipment_type,
        input.symptoms.len()
    );

    let report = enhance::diagnose(&input, state.generator.as_deref()).await;
    info!("[DIAG] outcome: {:?}", report.outcome);

    let session = DiagnosticSession::new(SessionType::Guided, input, report.diagnosis);
    Json(SessionResponse {
        success: true,
        session,
    })
}

async fn quick_submit(
    State(state): State<AppStateArc>,
    Json(req): Json<QuickSubmitRequest>,
) -> Json<SessionResponse> {
    // Free-text only: no equipment selection, no structured symptoms
    let input = DiagnosticInput {
        equipment_type: "unknown".to_string(),
        location: req.location.unwrap_or_else(|| "unknown".to_string()),
        description: req.description.unwrap_or_default(),
        ..DiagnosticInput::default()
    };

    info!("[DIAG] quick submission from {}", input.location);

    let report = enhance::diagnose(&input, state.generator.as_deref()).await;
    let session = DiagnosticSession::new(SessionType::QuickSubmit, input, report.diagnosis);
    Json(SessionResponse {
        success: true,
        session,
    })
}

// ============================================================================
// Follow-up Routes
// ============================================================================

pub fn followup_routes() -> Router<AppStateArc> {
    Router::new().route("/api/follow-up", post(follow_up))
}

async fn follow_up(
    State(state): State<AppStateArc>,
    Json(req): Json<FollowUpRequest>,
) -> Result<Json<FollowUpResponse>, (StatusCode, Json<ErrorResponse>)> {
    match enhance::answer_followup(
        &req.original_analysis,
        &req.follow_up_question,
        &req.diagnostic_context,
        state.generator.as_deref(),
    )
    .await
    {
        Ok(text) => Ok(Json(FollowUpResponse {
            follow_up_response: text,
            timestamp: Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!("[FOLLOWUP] failed: {}", e);
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            // Validation errors are told apart; backend failures stay generic
            let message = match e {
                HvacError::EmptyQuestion => e.to_string(),
                _ => "Failed to process follow-up question".to_string(),
            };
            Err((status, Json(ErrorResponse { error: message })))
        }
    }
}

// ============================================================================
// Image Routes (stub)
// ============================================================================

pub fn image_routes() -> Router<AppStateArc> {
    Router::new().route("/api/images/upload", post(upload_image))
}

/// Image analysis is out of scope; the endpoint answers with a canned
/// payload so the frontend flow stays testable.
async fn upload_image() -> Json<ImageUploadResponse> {
    Json(ImageUploadResponse {
        success: true,
        message: "Image upload functionality will be available in the full version".to_string(),
        analysis: ImageAnalysisStub {
            text_detected: "Model: ABC123, Error: E1".to_string(),
            components_identified: vec!["Compressor".to_string(), "Control Board".to_string()],
            safety_concerns: vec!["High voltage warning visible".to_string()],
        },
    })
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "HVAC Diagnostic Assistant API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        llm_enabled: state.config.llm.enabled,
        llm_configured: state.generator.is_some(),
    })
}
