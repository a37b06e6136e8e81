use std::panic::AssertUnwindSafe;

use futures::{FutureExt, StreamExt};
use tracing::{error, info};

use super::domain::{Intent, IntentResult, Lead, Offer, ScoredLead};
use super::intent::{IntentClassifier, IntentModel};
use super::rules::{RuleScore, RuleScorer};

pub const OUTER_FALLBACK_REASONING: &str = "AI scoring failed, using fallback";

/// Batch-level precondition failures; per-lead problems never surface here.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("no offer found; create an offer before scoring")]
    NoActiveOffer,
    #[error("no leads uploaded; upload leads before scoring")]
    NoLeads,
}

/// Runs the rule scorer and the intent classifier for every lead in a batch.
pub struct ScoringOrchestrator<M> {
    rules: RuleScorer,
    classifier: IntentClassifier<M>,
    concurrency: usize,
}

impl<M> ScoringOrchestrator<M>
where
    M: IntentModel,
{
    pub fn new(classifier: IntentClassifier<M>) -> Self {
        Self {
            rules: RuleScorer::new(),
            classifier,
            concurrency: 1,
        }
    }

    /// Allow up to `limit` classifications in flight. Output order is unaffected.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn classifier(&self) -> &IntentClassifier<M> {
        &self.classifier
    }

    /// Score every lead against the active offer, preserving input order.
    pub async fn score_batch(
        &self,
        leads: &[Lead],
        offer: Option<&Offer>,
    ) -> Result<Vec<ScoredLead>, ScoringError> {
        let offer = offer.ok_or(ScoringError::NoActiveOffer)?;
        if leads.is_empty() {
            return Err(ScoringError::NoLeads);
        }

        // A borrowing closure inside the stream makes the batch future non-`Send`.
        let pending: Vec<_> = leads
            .iter()
            .map(|lead| self.score_lead(lead, offer))
            .collect();
        let results: Vec<ScoredLead> = futures::stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let high = results
            .iter()
            .filter(|result| result.intent == Intent::High)
            .count();
        info!(
            offer = %offer.name,
            scored = results.len(),
            high_intent = high,
            "lead batch scored"
        );

        Ok(results)
    }

    async fn score_lead(&self, lead: &Lead, offer: &Offer) -> ScoredLead {
        let step = async {
            let rule = self.rules.score(lead, offer);
            let intent = self.classifier.classify(lead, offer).await;
            combine(lead, rule, intent)
        };

        match AssertUnwindSafe(step).catch_unwind().await {
            Ok(scored) => scored,
            Err(_) => {
                error!(
                    lead = %lead.name,
                    "lead scoring step failed unexpectedly, using fallback intent"
                );
                let intent = IntentResult {
                    intent: Intent::Low,
                    reasoning: OUTER_FALLBACK_REASONING.to_string(),
                };
                combine(lead, self.rules.score(lead, offer), intent)
            }
        }
    }
}

/// Final score is the rule total plus the fixed points for the intent.
pub fn combine(lead: &Lead, rule: RuleScore, intent: IntentResult) -> ScoredLead {
    ScoredLead {
        name: lead.name.clone(),
        role: lead.role.clone(),
        company: lead.company.clone(),
        intent: intent.intent,
        score: rule.total_rule_score + intent.intent.points(),
        reasoning: intent.reasoning,
        rule_breakdown: rule.breakdown,
    }
}
