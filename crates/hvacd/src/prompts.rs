//! Prompt building for the enhancement and follow-up passes.
//!
//! The backend's reply is never parsed: it is dropped into the diagnosis
//! summary verbatim, so the prompts carry the full section template the
//! response is expected to follow.

use hvac_common::api::FollowUpContext;
use hvac_common::catalog;
use hvac_common::{Cause, Diagnosis, DiagnosticInput};
use serde_json::{Map, Value};

pub const DIAGNOSIS_SYSTEM_PROMPT: &str = "You are a master HVAC technician with 25+ years of experience providing detailed diagnostic analysis to field technicians. Always format responses with clear sections and step-by-step instructions.";

pub const FOLLOWUP_SYSTEM_PROMPT: &str = "You are an expert HVAC diagnostic assistant providing professional follow-up support to experienced technicians.";

/// Fixed section layout the backend is asked to follow
const RESPONSE_FORMAT: &str = r#"**REQUIRED FORMAT:**

## 🔧 **Primary Diagnosis**
[Provide definitive diagnosis with confidence level]

## 📊 **Root Cause Analysis**
[Detailed analysis of why this issue occurred, considering all provided data]

## ⚡ **Immediate Actions Required**
1. [First critical step with specific details]
2. [Second critical step with specific details]
3. [Third critical step with specific details]

## 🔍 **Detailed Troubleshooting Steps**

### Step 1: [Title]
- **Action:** [Specific action to take]
- **Tools Needed:** [Specific tools/equipment]
- **Expected Reading:** [What measurements/observations to expect]
- **If Normal:** [Next step if readings are normal]
- **If Abnormal:** [What abnormal readings indicate]

### Step 2: [Title]
[Continue same format for 3-5 steps total]

## ⚠️ **Safety Considerations**
- [Equipment-specific safety warnings]
- [PPE requirements for this specific situation]
- [Electrical/refrigerant safety based on symptoms]

## 🛠️ **Parts & Materials Likely Needed**
- [Specific part numbers if possible]
- [Estimated costs and availability]
- [Alternative options if primary parts unavailable]

## ⏱️ **Estimated Repair Time**
[Realistic time estimate with breakdown]

## 💡 **Pro Tips**
[Advanced technician insights and best practices for this specific issue]

**TONE:** Professional, confident, detailed but concise. Write for an experienced technician who needs actionable guidance, not basic explanations."#;

/// Build the enhancement prompt embedding the submission and the baseline
/// rule-engine result
pub fn build_diagnosis_prompt(input: &DiagnosticInput, baseline: &Diagnosis) -> String {
    let equipment_name = catalog::equipment_name(&input.equipment_type);
    let symptom_names = catalog::symptom_names(&input.symptoms).join(", ");

    format!(
        r#"You are an expert HVAC diagnostic assistant integrated into a professional troubleshooting application used by experienced HVAC technicians in the field.

**CONTEXT:**
- Application: Professional diagnostic tool for field technicians
- User: Experienced HVAC technician with 5+ years experience
- Purpose: Provide detailed, actionable diagnostic analysis for complex HVAC issues
- Setting: On-site service call requiring professional-grade guidance

**DIAGNOSTIC DATA COLLECTED:**
Equipment Type: {}
Location: {}
Reported Symptoms: {}
Measurements Taken: {}
Error Codes: {}
Technician Notes: {}

**PRELIMINARY ANALYSIS:**
Primary Issue: {}
Confidence: {}%
Top Likely Causes: {}

**INSTRUCTIONS:**
Provide a comprehensive diagnostic analysis with clear sections and step-by-step guidance. Your response should be detailed enough for an experienced technician to follow without additional research.

{}"#,
        equipment_name,
        input.location,
        symptom_names,
        format_measurements(&input.measurements),
        format_error_codes(&input.error_codes),
        format_notes(&input.description),
        baseline.primary_issue,
        baseline.confidence_score,
        format_causes(&baseline.likely_causes),
        RESPONSE_FORMAT
    )
}

/// Build the follow-up prompt against a previously returned analysis
pub fn build_followup_prompt(
    original_analysis: &str,
    question: &str,
    context: &FollowUpContext,
) -> String {
    let equipment = context
        .equipment_type
        .clone()
        .unwrap_or_else(|| "Not specified".to_string());
    let symptoms = if context.symptoms.is_empty() {
        "Not specified".to_string()
    } else {
        catalog::symptom_names(&context.symptoms).join(", ")
    };
    let measurements = match &context.measurements {
        Some(value) => value.to_string(),
        None => "Not provided".to_string(),
    };

    format!(
        r#"You are an expert HVAC technician assistant providing follow-up support for a previous diagnostic analysis.

ORIGINAL ANALYSIS CONTEXT:
{}

DIAGNOSTIC CONTEXT:
- Equipment Type: {}
- Symptoms: {}
- Measurements: {}

TECHNICIAN'S FOLLOW-UP QUESTION:
{}

Please provide a detailed, professional response that:
1. Directly addresses the technician's specific question
2. References the original analysis when relevant
3. Provides additional technical details or clarification
4. Includes safety considerations if applicable
5. Suggests next steps or additional diagnostics if needed

Format your response with clear headers and bullet points for easy reading."#,
        original_analysis, equipment, symptoms, measurements, question
    )
}

fn format_measurements(measurements: &Map<String, Value>) -> String {
    if measurements.is_empty() {
        return "None provided".to_string();
    }
    serde_json::to_string_pretty(measurements).unwrap_or_else(|_| "None provided".to_string())
}

fn format_error_codes(error_codes: &[String]) -> String {
    if error_codes.is_empty() {
        "None reported".to_string()
    } else {
        error_codes.join(", ")
    }
}

fn format_notes(description: &str) -> String {
    if description.trim().is_empty() {
        "None provided".to_string()
    } else {
        description.to_string()
    }
}

fn format_causes(causes: &[Cause]) -> String {
    causes
        .iter()
        .take(3)
        .map(|c| format!("{} ({}%)", c.cause, c.probability))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn sample_input() -> DiagnosticInput {
        DiagnosticInput {
            equipment_type: "split_system".to_string(),
            location: "rooftop unit 3".to_string(),
            symptoms: vec!["not_cooling".to_string(), "ice_buildup".to_string()],
            error_codes: vec!["E4".to_string()],
            description: "short-cycles every few minutes".to_string(),
            ..DiagnosticInput::default()
        }
    }

    #[test]
    fn test_diagnosis_prompt_embeds_submission() {
        let input = sample_input();
        let baseline = engine::diagnose_baseline(&input);
        let prompt = build_diagnosis_prompt(&input, &baseline);

        assert!(prompt.contains("Equipment Type: Split System"));
        assert!(prompt.contains("Location: rooftop unit 3"));
        assert!(prompt.contains("Not Cooling, Ice Buildup"));
        assert!(prompt.contains("Error Codes: E4"));
        assert!(prompt.contains("short-cycles every few minutes"));
    }

    #[test]
    fn test_diagnosis_prompt_embeds_baseline_analysis() {
        let input = sample_input();
        let baseline = engine::diagnose_baseline(&input);
        let prompt = build_diagnosis_prompt(&input, &baseline);

        assert!(prompt.contains("Primary Issue: Refrigerant System with Ice Formation"));
        assert!(prompt.contains("Confidence: 85%"));
        assert!(prompt.contains("Low refrigerant charge (80%)"));
    }

    #[test]
    fn test_diagnosis_prompt_placeholders_for_missing_data() {
        let input = DiagnosticInput::default();
        let baseline = engine::diagnose_baseline(&input);
        let prompt = build_diagnosis_prompt(&input, &baseline);

        assert!(prompt.contains("Measurements Taken: None provided"));
        assert!(prompt.contains("Error Codes: None reported"));
        assert!(prompt.contains("Technician Notes: None provided"));
    }

    #[test]
    fn test_diagnosis_prompt_carries_response_template() {
        let input = sample_input();
        let baseline = engine::diagnose_baseline(&input);
        let prompt = build_diagnosis_prompt(&input, &baseline);

        assert!(prompt.contains("**Primary Diagnosis**"));
        assert!(prompt.contains("**Pro Tips**"));
    }

    #[test]
    fn test_followup_prompt_embeds_question_and_context() {
        let context = FollowUpContext {
            equipment_type: Some("Heat Pump".to_string()),
            symptoms: vec!["unusual_noise".to_string()],
            measurements: None,
        };
        let prompt = build_followup_prompt(
            "the original analysis text",
            "what torque spec for the fan hub?",
            &context,
        );

        assert!(prompt.contains("the original analysis text"));
        assert!(prompt.contains("what torque spec for the fan hub?"));
        assert!(prompt.contains("Equipment Type: Heat Pump"));
        assert!(prompt.contains("Symptoms: Unusual Noise"));
        assert!(prompt.contains("Measurements: Not provided"));
    }

    #[test]
    fn test_followup_prompt_defaults() {
        let prompt = build_followup_prompt("", "anything", &FollowUpContext::default());
        assert!(prompt.contains("Equipment Type: Not specified"));
        assert!(prompt.contains("Symptoms: Not specified"));
    }
}
