//! Lead qualification: offer intake, lead ingestion, and the scoring engine that combines a
//! rule-based score with a model-derived buying intent.

pub mod domain;
pub mod export;
pub mod ingest;
pub mod intent;
pub mod orchestrator;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Intent, IntentResult, Lead, LeadId, Offer, OfferError, OfferId, OfferSubmission, OneOrMany,
    RuleBreakdown, ScoredLead,
};
pub use export::{export_filename, results_to_csv, EXPORT_COLUMNS};
pub use ingest::{parse_leads, LeadImportError, REQUIRED_COLUMNS};
pub use intent::{GeminiModel, IntentClassifier, IntentModel, ModelError, ResolutionPath};
pub use orchestrator::{ScoringError, ScoringOrchestrator};
pub use repository::{InMemoryQualificationStore, QualificationStore, StoreError};
pub use router::qualification_router;
pub use rules::{RuleScore, RuleScorer, MAX_RULE_SCORE};
pub use service::{QualificationService, QualificationServiceError};
