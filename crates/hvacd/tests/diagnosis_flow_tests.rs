//! End-to-end diagnosis flow tests.
//!
//! These tests are DETERMINISTIC - no network, no real LLM. The enhancement
//! path is driven with fake generators so both the enhanced and the
//! degraded flows are exercised.

use hvac_common::llm::{FakeTextGenerator, LlmError};
use hvac_common::{DiagnosticInput, WarningLevel};
use hvacd::engine::{self, ISSUE_RULES};
use hvacd::enhance::{self, EnhancementOutcome, ENHANCED_ANALYSIS_LABEL};

fn input(equipment: &str, symptoms: &[&str]) -> DiagnosticInput {
    DiagnosticInput {
        equipment_type: equipment.to_string(),
        location: "mechanical room".to_string(),
        symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        ..DiagnosticInput::default()
    }
}

// ============================================================================
// Rule Priority
// ============================================================================

/// Ice formation wins whenever ice buildup rides along with any cooling symptom
#[test]
fn test_ice_formation_for_every_cooling_combination() {
    for cooling in ["not_cooling", "insufficient_cooling", "intermittent_cooling"] {
        let diagnosis = engine::diagnose_baseline(&input("split_system", &[cooling, "ice_buildup"]));
        assert_eq!(
            diagnosis.primary_issue, "Refrigerant System with Ice Formation",
            "cooling symptom {} with ice should classify as ice formation",
            cooling
        );
        assert_eq!(diagnosis.confidence_score, 85);
    }
}

/// Visual-only symptom sets never gate a branch of their own
#[test]
fn test_visual_only_sets_fall_through() {
    for symptoms in [
        vec!["water_leak"],
        vec!["ice_buildup"],
        vec!["burning_smell"],
        vec!["water_leak", "ice_buildup", "burning_smell"],
    ] {
        let diagnosis = engine::diagnose_baseline(&input("mini_split", &symptoms));
        assert_eq!(diagnosis.primary_issue, "System Diagnostic Required");
        assert_eq!(diagnosis.confidence_score, 70);
    }
}

/// Scenario from the field: split system that stopped cooling, backend down
#[tokio::test]
async fn test_not_cooling_scenario_with_backend_down() {
    let fake = FakeTextGenerator::always_error(LlmError::Http("connection refused".to_string()));
    let report = enhance::diagnose(&input("split_system", &["not_cooling"]), Some(&fake)).await;

    assert_eq!(report.diagnosis.primary_issue, "Cooling System Failure");
    assert_eq!(report.diagnosis.confidence_score, 82);
    assert_eq!(report.diagnosis.likely_causes[0].cause, "Compressor failure");
    assert_eq!(report.diagnosis.likely_causes[0].probability, 75);
    assert!(matches!(report.outcome, EnhancementOutcome::Fallback { .. }));
}

/// Scenario: breaker trips plus burning smell
#[test]
fn test_breaker_trips_with_burning_smell() {
    let diagnosis = engine::diagnose_baseline(&input(
        "package_unit",
        &["frequent_breaker_trips", "burning_smell"],
    ));

    // Cooling bucket empty, electrical non-empty, breaker-trip sub-branch
    assert_eq!(diagnosis.primary_issue, "Electrical Overload Issue");

    // Two bookends plus fire-safety plus electrical-overload
    assert_eq!(diagnosis.safety_warnings.len(), 4);
    assert!(diagnosis
        .safety_warnings
        .iter()
        .any(|w| w.category == "fire_safety" && w.level == WarningLevel::Critical));
    assert!(diagnosis
        .safety_warnings
        .iter()
        .any(|w| w.message.contains("do not reset breaker")));
}

// ============================================================================
// Output Invariants
// ============================================================================

/// Actions never exceed three, whatever the bucket combination
#[test]
fn test_actions_capped_for_all_bucket_combinations() {
    let combos: Vec<Vec<&str>> = vec![
        vec![],
        vec!["water_leak"],
        vec!["not_cooling"],
        vec!["not_cooling", "unit_not_starting"],
        vec!["not_cooling", "unit_not_starting", "fan_not_spinning"],
        vec![
            "not_cooling",
            "insufficient_cooling",
            "intermittent_cooling",
            "unit_not_starting",
            "frequent_breaker_trips",
            "display_errors",
            "fan_not_spinning",
            "unusual_noise",
            "excessive_vibration",
            "ice_buildup",
            "water_leak",
            "burning_smell",
        ],
    ];

    for symptoms in combos {
        let diagnosis = engine::diagnose_baseline(&input("heat_pump", &symptoms));
        assert!(
            diagnosis.recommended_actions.len() <= 3,
            "actions for {:?} exceed 3",
            symptoms
        );
        assert!(!diagnosis.recommended_actions.is_empty());
    }
}

/// Lockout warning first and ventilation warning last, for every input
#[test]
fn test_safety_warning_bookends_for_all_inputs() {
    let combos: Vec<Vec<&str>> = vec![
        vec![],
        vec!["burning_smell"],
        vec!["frequent_breaker_trips"],
        vec!["not_cooling", "ice_buildup", "burning_smell", "frequent_breaker_trips"],
    ];

    for symptoms in combos {
        let diagnosis = engine::diagnose_baseline(&input("split_system", &symptoms));
        let warnings = &diagnosis.safety_warnings;

        let first = warnings.first().unwrap();
        assert_eq!(first.level, WarningLevel::Critical);
        assert!(first.message.contains("Turn off power at the breaker"));

        let last = warnings.last().unwrap();
        assert_eq!(last.category, "refrigerant_safety");
        assert_eq!(last.compliance, "EPA 608");
    }
}

// ============================================================================
// Enhancement Semantics
// ============================================================================

/// Same input, failing backend both times: byte-identical baseline output
#[tokio::test]
async fn test_idempotent_under_backend_failure() {
    let submission = input("split_system", &["not_cooling", "ice_buildup"]);

    let fake = FakeTextGenerator::always_error(LlmError::Http("rate limit".to_string()));
    let first = enhance::diagnose(&submission, Some(&fake)).await;
    let second = enhance::diagnose(&submission, Some(&fake)).await;

    let first_json = serde_json::to_string(&first.diagnosis).unwrap();
    let second_json = serde_json::to_string(&second.diagnosis).unwrap();
    assert_eq!(first_json, second_json);
    assert_eq!(fake.call_count(), 2);
}

/// Enhanced confidence is always min(95, baseline + 10)
#[tokio::test]
async fn test_enhancement_confidence_monotonicity() {
    let cases: Vec<Vec<&str>> = vec![
        vec![],                         // 70
        vec!["insufficient_cooling"],   // 78
        vec!["unit_not_starting"],      // 80
        vec!["not_cooling"],            // 82
        vec!["fan_not_spinning"],       // 83
        vec!["not_cooling", "ice_buildup"], // 85
        vec!["frequent_breaker_trips"], // 88
    ];

    for symptoms in cases {
        let submission = input("heat_pump", &symptoms);
        let baseline = engine::diagnose_baseline(&submission);

        let fake = FakeTextGenerator::always_text("long-form writeup");
        let report = enhance::diagnose(&submission, Some(&fake)).await;

        let expected = (baseline.confidence_score + 10).min(95);
        assert_eq!(
            report.diagnosis.confidence_score, expected,
            "confidence for {:?}",
            symptoms
        );
    }
}

/// Enhancement replaces only the issue label and summary
#[tokio::test]
async fn test_enhancement_preserves_baseline_lists() {
    let submission = input("split_system", &["not_cooling", "frequent_breaker_trips"]);
    let baseline = engine::diagnose_baseline(&submission);

    let fake = FakeTextGenerator::always_text("## Diagnosis\ndetails");
    let report = enhance::diagnose(&submission, Some(&fake)).await;

    assert_eq!(report.outcome, EnhancementOutcome::Enhanced);
    assert_eq!(report.diagnosis.primary_issue, ENHANCED_ANALYSIS_LABEL);
    assert_eq!(report.diagnosis.summary, "## Diagnosis\ndetails");
    assert_eq!(report.diagnosis.likely_causes, baseline.likely_causes);
    assert_eq!(report.diagnosis.recommended_actions, baseline.recommended_actions);
    assert_eq!(report.diagnosis.troubleshooting_steps, baseline.troubleshooting_steps);
    assert_eq!(report.diagnosis.safety_warnings, baseline.safety_warnings);
}

/// A backend that recovers between calls changes the outcome, not the baseline
#[tokio::test]
async fn test_outcome_tracks_backend_availability() {
    let submission = input("split_system", &["unusual_noise"]);
    let fake = FakeTextGenerator::new(vec![
        Err(LlmError::Http("first call fails".to_string())),
        Ok("writeup".to_string()),
    ]);

    let degraded = enhance::diagnose(&submission, Some(&fake)).await;
    assert!(matches!(degraded.outcome, EnhancementOutcome::Fallback { .. }));
    assert!(!degraded.diagnosis.enhanced);

    let enhanced = enhance::diagnose(&submission, Some(&fake)).await;
    assert_eq!(enhanced.outcome, EnhancementOutcome::Enhanced);
    assert!(enhanced.diagnosis.enhanced);

    // The deterministic fields agree across both outcomes
    assert_eq!(
        degraded.diagnosis.likely_causes,
        enhanced.diagnosis.likely_causes
    );
}

// ============================================================================
// Rule Table Shape
// ============================================================================

/// Every rule id is unique and the catch-all sits last
#[test]
fn test_rule_table_is_well_formed() {
    let mut ids: Vec<&str> = ISSUE_RULES.iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), ISSUE_RULES.len(), "duplicate rule ids");

    assert_eq!(ISSUE_RULES.last().unwrap().id, "diagnostic-required");

    for rule in ISSUE_RULES {
        assert!(rule.outcome.confidence <= 100);
        assert!(!rule.outcome.causes.is_empty());
        for (_, probability) in rule.outcome.causes {
            assert!(*probability <= 100);
        }
    }
}
