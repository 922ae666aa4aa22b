//! Session wrapping tests.

use hvac_common::llm::FakeTextGenerator;
use hvac_common::{DiagnosticInput, DiagnosticSession, SessionType};
use hvacd::enhance;

#[tokio::test]
async fn test_session_echoes_input_verbatim() {
    let input = DiagnosticInput {
        equipment_type: "split_system".to_string(),
        location: "roof".to_string(),
        // One known id, one unknown: the unknown is ignored by
        // classification but still echoed on the session
        symptoms: vec!["not_cooling".to_string(), "strange_new_symptom".to_string()],
        error_codes: vec!["E1".to_string(), "E4".to_string()],
        description: "observed at startup".to_string(),
        ..DiagnosticInput::default()
    };

    let report = enhance::diagnose(&input, None).await;
    let session = DiagnosticSession::new(SessionType::Guided, input.clone(), report.diagnosis);

    assert_eq!(session.symptoms, input.symptoms);
    assert_eq!(session.error_codes, input.error_codes);
    assert_eq!(session.equipment_type, "split_system");
    assert_eq!(session.location, "roof");
    assert_eq!(session.description, "observed at startup");
    assert_eq!(session.status, "completed");
    assert_eq!(session.id.len(), 8);
}

#[tokio::test]
async fn test_session_confidence_matches_diagnosis() {
    let input = DiagnosticInput {
        symptoms: vec!["frequent_breaker_trips".to_string()],
        ..DiagnosticInput::default()
    };

    let fake = FakeTextGenerator::always_text("writeup");
    let report = enhance::diagnose(&input, Some(&fake)).await;
    let session = DiagnosticSession::new(SessionType::Guided, input, report.diagnosis);

    // 88 baseline + 10 capped at 95
    assert_eq!(session.confidence_score, 95);
    assert_eq!(session.confidence_score, session.diagnosis.confidence_score);
}

#[tokio::test]
async fn test_quick_submit_session_shape() {
    let input = DiagnosticInput {
        equipment_type: "unknown".to_string(),
        location: "unknown".to_string(),
        description: "unit making noise, no other details".to_string(),
        ..DiagnosticInput::default()
    };

    let report = enhance::diagnose(&input, None).await;
    let session = DiagnosticSession::new(SessionType::QuickSubmit, input, report.diagnosis);

    assert_eq!(session.session_type, SessionType::QuickSubmit);
    // No structured symptoms: classification falls through to the catch-all
    assert_eq!(session.diagnosis.primary_issue, "System Diagnostic Required");

    let json = serde_json::to_string(&session).unwrap();
    assert!(json.contains("\"session_type\":\"quick_submit\""));
    assert!(json.contains("\"created_at\""));
}
