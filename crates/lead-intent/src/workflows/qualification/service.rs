use std::io::Cursor;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Lead, Offer, OfferError, OfferSubmission, ScoredLead};
use super::export::results_to_csv;
use super::ingest::{parse_leads, LeadImportError};
use super::intent::IntentModel;
use super::orchestrator::{ScoringError, ScoringOrchestrator};
use super::repository::{QualificationStore, StoreError};

/// Service composing the store, the scoring orchestrator, and the export surfaces.
pub struct QualificationService<S, M> {
    store: Arc<S>,
    orchestrator: Arc<ScoringOrchestrator<M>>,
}

impl<S, M> QualificationService<S, M>
where
    S: QualificationStore + 'static,
    M: IntentModel + 'static,
{
    pub fn new(store: Arc<S>, orchestrator: ScoringOrchestrator<M>) -> Self {
        Self {
            store,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Validate an offer and make it the active one, replacing any previous offer.
    pub fn create_offer(
        &self,
        submission: OfferSubmission,
    ) -> Result<Offer, QualificationServiceError> {
        let offer = submission.into_offer(Utc::now())?;
        self.store.set_offer(offer.clone())?;
        info!(offer_id = %offer.id.0, name = %offer.name, "active offer replaced");
        Ok(offer)
    }

    /// Offers currently on record; at most one.
    pub fn offers(&self) -> Result<Vec<Offer>, QualificationServiceError> {
        Ok(self.store.active_offer()?.into_iter().collect())
    }

    /// Parse a lead sheet and replace the stored lead set with it.
    pub fn upload_leads(&self, csv_text: &str) -> Result<Vec<Lead>, QualificationServiceError> {
        let leads = parse_leads(Cursor::new(csv_text.as_bytes()), Utc::now())?;
        self.store.set_leads(leads.clone())?;
        info!(count = leads.len(), "lead set replaced");
        Ok(leads)
    }

    pub fn leads(&self) -> Result<Arc<Vec<Lead>>, QualificationServiceError> {
        Ok(self.store.leads()?)
    }

    /// Score the stored leads against the active offer and publish the new result set.
    pub async fn score(&self) -> Result<Vec<ScoredLead>, QualificationServiceError> {
        let offer = self.store.active_offer()?;
        let leads = self.store.leads()?;

        let results = self
            .orchestrator
            .score_batch(leads.as_slice(), offer.as_ref())
            .await?;

        self.store.set_results(results.clone())?;
        Ok(results)
    }

    pub fn results(&self) -> Result<Arc<Vec<ScoredLead>>, QualificationServiceError> {
        Ok(self.store.results()?)
    }

    /// CSV rendering of the latest results.
    pub fn export_csv(&self) -> Result<String, QualificationServiceError> {
        let results = self.store.results()?;
        if results.is_empty() {
            return Err(QualificationServiceError::NoResults);
        }
        Ok(results_to_csv(&results))
    }
}

/// Error raised by the qualification service.
#[derive(Debug, thiserror::Error)]
pub enum QualificationServiceError {
    #[error(transparent)]
    Offer(#[from] OfferError),
    #[error(transparent)]
    Import(#[from] LeadImportError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no results available for export")]
    NoResults,
}
