use std::sync::{Arc, RwLock};

use super::domain::{Lead, Offer, ScoredLead};

/// Storage abstraction holding the active offer, the uploaded leads, and the latest results.
///
/// Every setter replaces its slot wholesale; readers observe either the previous or the new
/// contents, never a mix.
pub trait QualificationStore: Send + Sync {
    fn set_offer(&self, offer: Offer) -> Result<(), StoreError>;
    fn active_offer(&self) -> Result<Option<Offer>, StoreError>;
    fn set_leads(&self, leads: Vec<Lead>) -> Result<(), StoreError>;
    fn leads(&self) -> Result<Arc<Vec<Lead>>, StoreError>;
    fn set_results(&self, results: Vec<ScoredLead>) -> Result<(), StoreError>;
    fn results(&self) -> Result<Arc<Vec<ScoredLead>>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; each slot swaps an `Arc` snapshot under its own lock.
#[derive(Debug, Default)]
pub struct InMemoryQualificationStore {
    offer: RwLock<Option<Offer>>,
    leads: RwLock<Arc<Vec<Lead>>>,
    results: RwLock<Arc<Vec<ScoredLead>>>,
}

impl InMemoryQualificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(slot: &str) -> StoreError {
    StoreError::Unavailable(format!("{slot} lock poisoned"))
}

impl QualificationStore for InMemoryQualificationStore {
    fn set_offer(&self, offer: Offer) -> Result<(), StoreError> {
        let mut guard = self.offer.write().map_err(|_| poisoned("offer"))?;
        *guard = Some(offer);
        Ok(())
    }

    fn active_offer(&self) -> Result<Option<Offer>, StoreError> {
        let guard = self.offer.read().map_err(|_| poisoned("offer"))?;
        Ok(guard.clone())
    }

    fn set_leads(&self, leads: Vec<Lead>) -> Result<(), StoreError> {
        let snapshot = Arc::new(leads);
        let mut guard = self.leads.write().map_err(|_| poisoned("leads"))?;
        *guard = snapshot;
        Ok(())
    }

    fn leads(&self) -> Result<Arc<Vec<Lead>>, StoreError> {
        let guard = self.leads.read().map_err(|_| poisoned("leads"))?;
        Ok(Arc::clone(&guard))
    }

    fn set_results(&self, results: Vec<ScoredLead>) -> Result<(), StoreError> {
        let snapshot = Arc::new(results);
        let mut guard = self.results.write().map_err(|_| poisoned("results"))?;
        *guard = snapshot;
        Ok(())
    }

    fn results(&self) -> Result<Arc<Vec<ScoredLead>>, StoreError> {
        let guard = self.results.read().map_err(|_| poisoned("results"))?;
        Ok(Arc::clone(&guard))
    }
}
