use lead_intent::config::AppConfig;
use lead_intent::workflows::qualification::{
    GeminiModel, InMemoryQualificationStore, IntentClassifier, QualificationService,
    ScoringOrchestrator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

pub(crate) type LeadService = QualificationService<InMemoryQualificationStore, GeminiModel>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the in-memory store and the hosted model into a qualification service.
pub(crate) fn build_lead_service(config: &AppConfig) -> LeadService {
    let model = GeminiModel::from_config(&config.intent_model);
    if !model.has_api_key() {
        warn!("GEMINI_API_KEY is not set; intent falls back to lead heuristics");
    }

    let classifier = IntentClassifier::with_timeout(model, config.intent_model.timeout);
    let orchestrator =
        ScoringOrchestrator::new(classifier).with_concurrency(config.scoring.concurrency);

    QualificationService::new(Arc::new(InMemoryQualificationStore::new()), orchestrator)
}
