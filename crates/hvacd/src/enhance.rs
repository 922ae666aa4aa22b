//! LLM enhancement pass and follow-up answering.
//!
//! The diagnosis path degrades gracefully: any backend failure is logged
//! and the deterministic baseline is returned untouched. The follow-up path
//! is deliberately asymmetric and surfaces failures to the caller.

use crate::engine;
use crate::prompts;
use hvac_common::api::FollowUpContext;
use hvac_common::llm::TextGenerator;
use hvac_common::{Diagnosis, DiagnosticInput, HvacError};
use tracing::{info, warn};

/// Primary-issue label used when the backend writeup replaces the summary
pub const ENHANCED_ANALYSIS_LABEL: &str = "AI-Assisted Professional Analysis";

/// Analysis kind recorded on an enhanced diagnosis
pub const ENHANCED_ANALYSIS_KIND: &str = "comprehensive_professional";

const DIAGNOSIS_MAX_TOKENS: u32 = 2000;
const FOLLOWUP_MAX_TOKENS: u32 = 1000;
const GENERATION_TEMPERATURE: f32 = 0.3;

/// Enhanced confidence never exceeds this ceiling
const CONFIDENCE_CEILING: u8 = 95;
const CONFIDENCE_BOOST: u8 = 10;

/// Which path produced the returned diagnosis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementOutcome {
    /// Backend produced the long-form writeup
    Enhanced,
    /// Backend call failed; baseline returned unmodified
    Fallback { reason: String },
    /// No backend injected; baseline returned
    Disabled,
}

/// A finished diagnosis plus the path that produced it
#[derive(Debug, Clone)]
pub struct DiagnosisReport {
    pub diagnosis: Diagnosis,
    pub outcome: EnhancementOutcome,
}

/// Run the rule engine, then the enhancement pass when a backend is
/// available. Never fails: every error on this path collapses into the
/// baseline result.
///
/// The baseline is always fully computed first, even when enhancement
/// succeeds - its list fields stay on the enhanced diagnosis as fallback
/// data for the caller.
pub async fn diagnose(
    input: &DiagnosticInput,
    generator: Option<&dyn TextGenerator>,
) -> DiagnosisReport {
    let baseline = engine::diagnose_baseline(input);

    let Some(generator) = generator else {
        return DiagnosisReport {
            diagnosis: baseline,
            outcome: EnhancementOutcome::Disabled,
        };
    };

    let user_prompt = prompts::build_diagnosis_prompt(input, &baseline);
    match generator
        .generate(
            prompts::DIAGNOSIS_SYSTEM_PROMPT,
            &user_prompt,
            DIAGNOSIS_MAX_TOKENS,
            GENERATION_TEMPERATURE,
        )
        .await
    {
        Ok(text) => {
            info!("[ENHANCE] backend writeup accepted ({} chars)", text.len());
            DiagnosisReport {
                diagnosis: apply_enhancement(baseline, text),
                outcome: EnhancementOutcome::Enhanced,
            }
        }
        Err(e) => {
            warn!("[ENHANCE] backend failed, returning baseline diagnosis: {}", e);
            DiagnosisReport {
                diagnosis: baseline,
                outcome: EnhancementOutcome::Fallback {
                    reason: e.to_string(),
                },
            }
        }
    }
}

/// Fold the backend writeup into the baseline. Only the issue label,
/// summary, and confidence change; the rule-engine lists are retained
/// unchanged.
fn apply_enhancement(baseline: Diagnosis, writeup: String) -> Diagnosis {
    Diagnosis {
        primary_issue: ENHANCED_ANALYSIS_LABEL.to_string(),
        summary: writeup,
        confidence_score: baseline
            .confidence_score
            .saturating_add(CONFIDENCE_BOOST)
            .min(CONFIDENCE_CEILING),
        enhanced: true,
        analysis_kind: Some(ENHANCED_ANALYSIS_KIND.to_string()),
        ..baseline
    }
}

/// Answer a free-form follow-up question against a previous analysis.
///
/// Unlike `diagnose`, this path fails loudly: a blank question is a
/// validation error and a backend failure is surfaced to the caller.
pub async fn answer_followup(
    original_analysis: &str,
    question: &str,
    context: &FollowUpContext,
    generator: Option<&dyn TextGenerator>,
) -> Result<String, HvacError> {
    if question.trim().is_empty() {
        return Err(HvacError::EmptyQuestion);
    }

    let generator = generator.ok_or_else(|| {
        HvacError::Collaborator("no text generation backend configured".to_string())
    })?;

    let user_prompt = prompts::build_followup_prompt(original_analysis, question, context);
    generator
        .generate(
            prompts::FOLLOWUP_SYSTEM_PROMPT,
            &user_prompt,
            FOLLOWUP_MAX_TOKENS,
            GENERATION_TEMPERATURE,
        )
        .await
        .map_err(|e| HvacError::Collaborator(e.to_string()))
}
