use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::qualification::domain::{Lead, LeadId, Offer, OfferId, OfferSubmission};
use crate::workflows::qualification::intent::{IntentClassifier, IntentModel, ModelError};
use crate::workflows::qualification::repository::InMemoryQualificationStore;
use crate::workflows::qualification::{
    qualification_router, QualificationService, ScoringOrchestrator,
};

pub(super) const VALID_HIGH_REPLY: &str =
    r#"{"intent": "High", "reasoning": "VP in a SaaS company that matches the ICP."}"#;

pub(super) fn acme_offer() -> Offer {
    Offer {
        id: OfferId("offer-test".to_string()),
        name: "Acme CRM".to_string(),
        value_props: vec!["saves time".to_string()],
        ideal_use_cases: vec!["B2B SaaS mid-market".to_string()],
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
    }
}

pub(super) fn acme_submission() -> OfferSubmission {
    OfferSubmission {
        name: "Acme CRM".to_string(),
        value_props: vec!["saves time"].into(),
        ideal_use_cases: vec!["B2B SaaS mid-market"].into(),
    }
}

pub(super) fn lead(name: &str, role: &str, industry: &str) -> Lead {
    Lead {
        id: LeadId(format!("lead-{}", name.to_lowercase().replace(' ', "-"))),
        name: name.to_string(),
        role: role.to_string(),
        company: "Acme".to_string(),
        industry: industry.to_string(),
        location: "NY".to_string(),
        linkedin_bio: "loves CRM tools".to_string(),
        uploaded_at: Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap(),
    }
}

pub(super) fn jane_doe() -> Lead {
    lead("Jane Doe", "VP Sales", "SaaS")
}

pub(super) const LEAD_SHEET: &str = "name,role,company,industry,location,linkedin_bio\n\
Jane Doe,VP Sales,Acme,SaaS,NY,loves CRM tools\n\
Sam Lee,Senior Analyst,Globex,Retail,Austin,\n\
Ana Ruiz,Intern,Initech,Healthcare,Madrid,student\n";

/// Model that returns the same canned outcome for every prompt and records prompts.
#[derive(Default)]
pub(super) struct ScriptedModel {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the service were unreachable.
    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl IntentModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| ModelError::Server {
                status: 503,
                body: "connection refused".to_string(),
            })
    }
}

/// Model that never answers.
pub(super) struct HangingModel;

#[async_trait]
impl IntentModel for HangingModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        futures::future::pending::<()>().await;
        Ok(String::new())
    }
}

/// Model that panics whenever the prompt mentions `poison`.
pub(super) struct PanickingModel {
    pub(super) poison: &'static str,
}

#[async_trait]
impl IntentModel for PanickingModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        if prompt.contains(self.poison) {
            panic!("model adapter bug");
        }
        Ok(VALID_HIGH_REPLY.to_string())
    }
}

/// Model whose reply latency depends on the lead, so completion order differs from input order.
pub(super) struct StaggeredModel;

#[async_trait]
impl IntentModel for StaggeredModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let delay = if prompt.contains("<name>Lead 0</name>") {
            40
        } else if prompt.contains("<name>Lead 1</name>") {
            20
        } else {
            1
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(r#"{"intent": "Medium", "reasoning": "Staggered."}"#.to_string())
    }
}

pub(super) fn orchestrator<M: IntentModel>(model: M) -> ScoringOrchestrator<M> {
    ScoringOrchestrator::new(IntentClassifier::with_timeout(
        model,
        Duration::from_millis(200),
    ))
}

pub(super) fn build_service<M: IntentModel + 'static>(
    model: M,
) -> (
    QualificationService<InMemoryQualificationStore, M>,
    Arc<InMemoryQualificationStore>,
) {
    let store = Arc::new(InMemoryQualificationStore::new());
    let service = QualificationService::new(store.clone(), orchestrator(model));
    (service, store)
}

pub(super) fn router_with_model<M: IntentModel + 'static>(model: M) -> axum::Router {
    let (service, _) = build_service(model);
    qualification_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
