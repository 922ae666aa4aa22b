//! Rule-based diagnosis engine.
//!
//! Pure symptom classification: every submission gets a fully deterministic
//! baseline diagnosis, whether or not the LLM enhancement pass runs
//! afterwards. Primary-issue selection is a data-driven rule table evaluated
//! top-to-bottom with first-match-wins semantics.

use hvac_common::catalog;
use hvac_common::{
    ActionPriority, Cause, Diagnosis, DiagnosticInput, RecommendedAction, SafetyWarning,
    TroubleshootingStep, WarningLevel,
};

/// Symptom ids in the cooling bucket
const COOLING_SYMPTOMS: &[&str] = &["not_cooling", "insufficient_cooling", "intermittent_cooling"];

/// Symptom ids in the electrical bucket
const ELECTRICAL_SYMPTOMS: &[&str] =
    &["unit_not_starting", "frequent_breaker_trips", "display_errors"];

/// Symptom ids in the mechanical bucket
const MECHANICAL_SYMPTOMS: &[&str] = &["fan_not_spinning", "unusual_noise", "excessive_vibration"];

/// Symptom ids in the visual bucket. Visual symptoms never gate a
/// classification branch on their own; they only modify the ice-formation
/// rule and the safety warnings.
const VISUAL_SYMPTOMS: &[&str] = &["ice_buildup", "water_leak", "burning_smell"];

/// Reported symptoms partitioned into the classifier buckets.
///
/// Ids outside all four buckets are kept in `reported` (they are echoed on
/// the session and counted in the summary) but ignored for classification.
#[derive(Debug, Clone, Default)]
pub struct SymptomBuckets {
    pub cooling: Vec<String>,
    pub electrical: Vec<String>,
    pub mechanical: Vec<String>,
    pub visual: Vec<String>,
    /// All distinct reported ids in input order, known or not
    pub reported: Vec<String>,
}

impl SymptomBuckets {
    /// Partition a raw symptom list. Duplicates collapse, input order is kept.
    pub fn partition(symptoms: &[String]) -> Self {
        let mut buckets = Self::default();

        for id in symptoms {
            if buckets.reported.iter().any(|seen| seen == id) {
                continue;
            }
            buckets.reported.push(id.clone());

            if COOLING_SYMPTOMS.contains(&id.as_str()) {
                buckets.cooling.push(id.clone());
            } else if ELECTRICAL_SYMPTOMS.contains(&id.as_str()) {
                buckets.electrical.push(id.clone());
            } else if MECHANICAL_SYMPTOMS.contains(&id.as_str()) {
                buckets.mechanical.push(id.clone());
            } else if VISUAL_SYMPTOMS.contains(&id.as_str()) {
                buckets.visual.push(id.clone());
            }
        }

        buckets
    }

    /// Whether the given id was reported at all
    pub fn has(&self, id: &str) -> bool {
        self.reported.iter().any(|seen| seen == id)
    }

    /// Count of distinct reported symptoms
    pub fn distinct_count(&self) -> usize {
        self.reported.len()
    }
}

/// Outcome of a primary-issue rule: issue label, classifier confidence, and
/// the fixed cause list with probabilities.
#[derive(Debug, Clone, Copy)]
pub struct IssueOutcome {
    pub issue: &'static str,
    pub confidence: u8,
    pub causes: &'static [(&'static str, u8)],
}

/// A single classification rule. The table is evaluated in order and the
/// first matching rule wins; branches never combine.
pub struct IssueRule {
    pub id: &'static str,
    pub matches: fn(&SymptomBuckets) -> bool,
    pub outcome: IssueOutcome,
}

fn cooling_with_ice(buckets: &SymptomBuckets) -> bool {
    !buckets.cooling.is_empty() && buckets.has("ice_buildup")
}

fn cooling_total_failure(buckets: &SymptomBuckets) -> bool {
    !buckets.cooling.is_empty() && buckets.has("not_cooling")
}

fn cooling_underperforming(buckets: &SymptomBuckets) -> bool {
    !buckets.cooling.is_empty()
}

fn electrical_overload(buckets: &SymptomBuckets) -> bool {
    !buckets.electrical.is_empty() && buckets.has("frequent_breaker_trips")
}

fn electrical_malfunction(buckets: &SymptomBuckets) -> bool {
    !buckets.electrical.is_empty()
}

fn mechanical_failure(buckets: &SymptomBuckets) -> bool {
    !buckets.mechanical.is_empty()
}

fn any_submission(_buckets: &SymptomBuckets) -> bool {
    true
}

/// Catch-all outcome. Also the answer for visual-only and empty symptom
/// sets, and the safety net should the table ever be inconsistent.
const DIAGNOSTIC_REQUIRED: IssueOutcome = IssueOutcome {
    issue: "System Diagnostic Required",
    confidence: 70,
    causes: &[("Multiple potential issues", 60), ("Maintenance required", 70)],
};

/// Primary-issue rule table, strict priority order.
pub const ISSUE_RULES: &[IssueRule] = &[
    IssueRule {
        id: "cooling-ice-formation",
        matches: cooling_with_ice,
        outcome: IssueOutcome {
            issue: "Refrigerant System with Ice Formation",
            confidence: 85,
            causes: &[
                ("Low refrigerant charge", 80),
                ("Dirty evaporator coil", 70),
                ("Restricted airflow", 60),
            ],
        },
    },
    IssueRule {
        id: "cooling-failure",
        matches: cooling_total_failure,
        outcome: IssueOutcome {
            issue: "Cooling System Failure",
            confidence: 82,
            causes: &[
                ("Compressor failure", 75),
                ("Refrigerant leak", 70),
                ("Faulty expansion valve", 55),
            ],
        },
    },
    IssueRule {
        id: "cooling-insufficient",
        matches: cooling_underperforming,
        outcome: IssueOutcome {
            issue: "Insufficient Cooling Performance",
            confidence: 78,
            causes: &[
                ("Dirty air filter", 85),
                ("Low refrigerant", 65),
                ("Oversized/undersized system", 45),
            ],
        },
    },
    IssueRule {
        id: "electrical-overload",
        matches: electrical_overload,
        outcome: IssueOutcome {
            issue: "Electrical Overload Issue",
            confidence: 88,
            causes: &[
                ("Compressor hard start", 80),
                ("Short circuit in wiring", 75),
                ("Faulty contactor", 60),
            ],
        },
    },
    IssueRule {
        id: "electrical-malfunction",
        matches: electrical_malfunction,
        outcome: IssueOutcome {
            issue: "Electrical System Malfunction",
            confidence: 80,
            causes: &[
                ("Thermostat failure", 70),
                ("Control board issue", 65),
                ("Wiring problem", 55),
            ],
        },
    },
    IssueRule {
        id: "mechanical-failure",
        matches: mechanical_failure,
        outcome: IssueOutcome {
            issue: "Mechanical Component Failure",
            confidence: 83,
            causes: &[
                ("Fan motor failure", 80),
                ("Belt wear/breakage", 65),
                ("Bearing wear", 50),
            ],
        },
    },
    IssueRule {
        id: "diagnostic-required",
        matches: any_submission,
        outcome: DIAGNOSTIC_REQUIRED,
    },
];

/// Select the primary issue. First matching table entry wins; falls back to
/// the generic outcome if no rule matches.
pub fn classify(buckets: &SymptomBuckets) -> IssueOutcome {
    ISSUE_RULES
        .iter()
        .find(|rule| (rule.matches)(buckets))
        .map(|rule| rule.outcome)
        .unwrap_or(DIAGNOSTIC_REQUIRED)
}

/// Run the full deterministic pipeline. Total: never fails, never panics.
pub fn diagnose_baseline(input: &DiagnosticInput) -> Diagnosis {
    let buckets = SymptomBuckets::partition(&input.symptoms);
    let outcome = classify(&buckets);

    let likely_causes = outcome
        .causes
        .iter()
        .map(|(cause, probability)| Cause {
            cause: (*cause).to_string(),
            probability: *probability,
        })
        .collect();

    Diagnosis {
        primary_issue: outcome.issue.to_string(),
        summary: build_summary(&input.equipment_type, outcome.issue, buckets.distinct_count()),
        confidence_score: outcome.confidence,
        likely_causes,
        recommended_actions: recommended_actions(&buckets),
        troubleshooting_steps: troubleshooting_steps(&buckets),
        safety_warnings: safety_warnings(&buckets),
        enhanced: false,
        analysis_kind: None,
    }
}

fn action(text: &str, priority: ActionPriority) -> RecommendedAction {
    RecommendedAction {
        action: text.to_string(),
        priority,
    }
}

/// Per-bucket action lists, appended independently (unlike primary-issue
/// selection, the buckets are not mutually exclusive here), capped at 3.
fn recommended_actions(buckets: &SymptomBuckets) -> Vec<RecommendedAction> {
    let mut actions = Vec::new();

    if !buckets.cooling.is_empty() {
        actions.push(action(
            "Check refrigerant levels and pressures",
            ActionPriority::High,
        ));
        actions.push(action(
            "Inspect evaporator and condenser coils",
            ActionPriority::High,
        ));
        actions.push(action("Verify proper airflow", ActionPriority::Medium));
    }

    if !buckets.electrical.is_empty() {
        actions.push(action(
            "Test electrical connections and voltage",
            ActionPriority::High,
        ));
        actions.push(action("Inspect control components", ActionPriority::High));
        actions.push(action("Check thermostat operation", ActionPriority::Medium));
    }

    if !buckets.mechanical.is_empty() {
        actions.push(action("Inspect fan motors and belts", ActionPriority::High));
        actions.push(action("Check for loose components", ActionPriority::Medium));
        actions.push(action(
            "Lubricate moving parts if needed",
            ActionPriority::Low,
        ));
    }

    if actions.is_empty() {
        actions.push(action(
            "Perform comprehensive system inspection",
            ActionPriority::High,
        ));
        actions.push(action(
            "Check all electrical connections",
            ActionPriority::Medium,
        ));
        actions.push(action("Test system operation", ActionPriority::Medium));
    }

    actions.truncate(3);
    actions
}

fn step(title: &str, description: &str, safety_note: &str, expected_result: &str) -> TroubleshootingStep {
    TroubleshootingStep {
        title: title.to_string(),
        description: description.to_string(),
        safety_note: safety_note.to_string(),
        expected_result: expected_result.to_string(),
    }
}

/// Ordered troubleshooting sequence: safety preparation always first,
/// component inspection always last, system checks in between per bucket.
fn troubleshooting_steps(buckets: &SymptomBuckets) -> Vec<TroubleshootingStep> {
    let mut steps = vec![step(
        "Safety Preparation",
        "Turn off power at the breaker and gather proper PPE including safety glasses, insulated gloves, and hard hat",
        "Never work on energized equipment - always follow lockout/tagout procedures",
        "Safe working environment established",
    )];

    if !buckets.cooling.is_empty() {
        steps.push(step(
            "Refrigerant System Check",
            "Connect manifold gauges and check suction and discharge pressures against manufacturer specifications",
            "Wear safety glasses and ensure adequate ventilation when working with refrigerant",
            "Pressures should match specifications for current ambient temperature",
        ));
    }

    if !buckets.electrical.is_empty() {
        steps.push(step(
            "Electrical System Test",
            "Use multimeter to check voltage at contactor, compressor, and fan motor terminals",
            "Use insulated tools and proper PPE when testing electrical components",
            "Voltage readings should match nameplate specifications",
        ));
    }

    steps.push(step(
        "Component Inspection",
        "Visually inspect all accessible components for signs of damage, wear, or overheating",
        "Look for burn marks, unusual wear patterns, or damaged wiring",
        "Identify any obvious physical problems or safety hazards",
    ));

    steps
}

fn warning(level: WarningLevel, category: &str, message: &str, compliance: &str) -> SafetyWarning {
    SafetyWarning {
        level,
        category: category.to_string(),
        message: message.to_string(),
        compliance: compliance.to_string(),
    }
}

/// Ordered safety warnings: electrical lockout first, refrigerant
/// ventilation last, symptom-specific warnings in between.
fn safety_warnings(buckets: &SymptomBuckets) -> Vec<SafetyWarning> {
    let mut warnings = vec![warning(
        WarningLevel::Critical,
        "electrical_safety",
        "Turn off power at the breaker before performing any electrical work",
        "NFPA 70E",
    )];

    if buckets.has("burning_smell") {
        warnings.push(warning(
            WarningLevel::Critical,
            "fire_safety",
            "Burning smell detected - shut down system immediately and investigate source",
            "NFPA 70",
        ));
    }

    if buckets.has("frequent_breaker_trips") {
        warnings.push(warning(
            WarningLevel::High,
            "electrical_safety",
            "Electrical overload condition present - do not reset breaker without identifying cause",
            "NFPA 70E",
        ));
    }

    warnings.push(warning(
        WarningLevel::High,
        "refrigerant_safety",
        "Ensure adequate ventilation and wear eye protection when working with refrigerant",
        "EPA 608",
    ));

    warnings
}

fn build_summary(equipment_id: &str, issue: &str, symptom_count: usize) -> String {
    format!(
        "Based on the {} symptoms and diagnostic information, the system appears to have {}. {} symptoms were identified requiring immediate attention.",
        catalog::equipment_name(equipment_id),
        issue.to_lowercase(),
        symptom_count
    )
}
