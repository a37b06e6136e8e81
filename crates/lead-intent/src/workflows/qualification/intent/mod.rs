//! Model-backed intent classification with a deterministic fallback ladder.
//!
//! A classification walks a small state machine:
//!
//! ```text
//! CallPending ──reply──▶ ParseSuccess ─────────────▶ IntentResult (model verdict)
//!      │           └───▶ ParseFailure ─────────────▶ IntentResult (text scan)
//!      └──error/timeout─▶ CallFailure ─────────────▶ IntentResult (lead heuristics)
//! ```
//!
//! Every terminal state yields a valid [`IntentResult`], so callers never see an error.

mod gemini;
mod model;
pub(crate) mod prompt;

pub use gemini::GeminiModel;
pub use model::{IntentModel, ModelError};
pub use prompt::build_prompt;

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use super::domain::{Intent, IntentResult, Lead, Offer};
use super::rules::{is_decision_maker, use_case_prefix};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(20);

pub const FORMAT_CORRECTION_REASONING: &str =
    "AI response processed successfully but required format correction.";

/// Substrings scanned in order when the reply is not valid JSON; first hit wins.
const TEXT_MARKERS: &[(&str, Intent)] = &[
    ("high intent", Intent::High),
    ("high", Intent::High),
    ("medium intent", Intent::Medium),
    ("medium", Intent::Medium),
];

/// Where a classification currently stands.
#[derive(Debug)]
pub enum ClassificationState {
    CallPending,
    ParseSuccess(IntentResult),
    ParseFailure { raw: String },
    CallFailure { error: ModelError },
}

/// How the final intent was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    Model,
    TextFallback,
    HeuristicFallback,
}

#[derive(Debug, Deserialize)]
struct ModelVerdict {
    intent: Option<String>,
    reasoning: Option<String>,
}

/// Classifies buying intent through an [`IntentModel`], never failing.
pub struct IntentClassifier<M> {
    model: M,
    timeout: Duration,
}

impl<M> IntentClassifier<M>
where
    M: IntentModel,
{
    pub fn new(model: M) -> Self {
        Self::with_timeout(model, DEFAULT_CALL_TIMEOUT)
    }

    pub fn with_timeout(model: M, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn classify(&self, lead: &Lead, offer: &Offer) -> IntentResult {
        self.classify_traced(lead, offer).await.0
    }

    /// Same as [`IntentClassifier::classify`], also reporting which rung of the ladder answered.
    pub async fn classify_traced(
        &self,
        lead: &Lead,
        offer: &Offer,
    ) -> (IntentResult, ResolutionPath) {
        let mut state = ClassificationState::CallPending;
        loop {
            state = match state {
                ClassificationState::CallPending => self.call(lead, offer).await,
                ClassificationState::ParseSuccess(result) => {
                    return (result, ResolutionPath::Model);
                }
                ClassificationState::ParseFailure { raw } => {
                    warn!(lead = %lead.name, "intent reply was not in the expected format");
                    return (scan_reply_text(&raw), ResolutionPath::TextFallback);
                }
                ClassificationState::CallFailure { error } => {
                    warn!(
                        lead = %lead.name,
                        %error,
                        "intent model call failed, using lead heuristics"
                    );
                    return (heuristic_intent(lead, offer), ResolutionPath::HeuristicFallback);
                }
            };
        }
    }

    async fn call(&self, lead: &Lead, offer: &Offer) -> ClassificationState {
        let prompt = build_prompt(lead, offer);
        match tokio::time::timeout(self.timeout, self.model.generate(&prompt)).await {
            Ok(Ok(raw)) => parse_reply(raw),
            Ok(Err(error)) => ClassificationState::CallFailure { error },
            Err(_) => ClassificationState::CallFailure {
                error: ModelError::Timeout(self.timeout),
            },
        }
    }
}

/// Returns the first `{ ... }` span, ending at the first closing brace after the opening one.
fn first_braced_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw[start..].find('}')? + start;
    Some(&raw[start..=end])
}

fn parse_reply(raw: String) -> ClassificationState {
    let verdict = first_braced_span(&raw)
        .and_then(|span| serde_json::from_str::<ModelVerdict>(span).ok())
        .and_then(|verdict| {
            let intent = Intent::from_label(verdict.intent.as_deref()?)?;
            let reasoning = verdict.reasoning?.trim().to_string();
            (!reasoning.is_empty()).then_some(IntentResult { intent, reasoning })
        });

    match verdict {
        Some(result) => ClassificationState::ParseSuccess(result),
        None => ClassificationState::ParseFailure { raw },
    }
}

fn scan_reply_text(raw: &str) -> IntentResult {
    let lowered = raw.to_lowercase();
    let intent = TEXT_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Low);

    IntentResult {
        intent,
        reasoning: FORMAT_CORRECTION_REASONING.to_string(),
    }
}

/// Intent derived from the lead alone when the model cannot be reached.
pub fn heuristic_intent(lead: &Lead, offer: &Offer) -> IntentResult {
    let role = lead.role.to_lowercase();
    let industry = lead.industry.to_lowercase();
    let bio = lead.linkedin_bio.to_lowercase();

    let decision_maker = is_decision_maker(&role);
    let relevant = offer.ideal_use_cases.iter().any(|use_case| {
        let use_case = use_case.to_lowercase();
        let prefix = use_case_prefix(&use_case);
        industry.contains(prefix) || bio.contains(prefix)
    });

    let (intent, reasoning) = match (decision_maker, relevant) {
        (true, true) => (
            Intent::High,
            "AI service unavailable; fallback analysis found a decision maker in a relevant industry.",
        ),
        (true, false) => (
            Intent::Medium,
            "AI service unavailable; fallback analysis matched a decision-maker role but no relevant industry or bio.",
        ),
        (false, true) => (
            Intent::Medium,
            "AI service unavailable; fallback analysis matched industry or bio relevance but not a decision-maker role.",
        ),
        (false, false) => (
            Intent::Low,
            "AI service unavailable; fallback analysis matched neither role nor industry signals.",
        ),
    };

    IntentResult {
        intent,
        reasoning: reasoning.to_string(),
    }
}
