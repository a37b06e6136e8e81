//! End-to-end scenarios for the offer, upload, score, and export workflow.
//!
//! Scenarios drive the public service facade and HTTP router with scripted intent models so the
//! combined rule and intent scoring can be checked without network access.

mod common {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use lead_intent::workflows::qualification::{
        InMemoryQualificationStore, IntentClassifier, IntentModel, ModelError, OfferSubmission,
        QualificationService, ScoringOrchestrator,
    };

    pub(super) const LEAD_SHEET: &str = "\
Name,Role,Company,Industry,Location,LinkedIn_Bio
Jane Doe,VP Sales,Acme,SaaS,NY,Scaling B2B revenue teams
Priya Shah,Senior Analyst,Northwind,Retail,Austin,
Tom Reed,Intern,Initech,Healthcare,Madrid,Student
";

    pub(super) fn submission() -> OfferSubmission {
        OfferSubmission {
            name: "AI Outreach Automation".to_string(),
            value_props: vec!["24/7 outreach", "6x more meetings"].into(),
            ideal_use_cases: vec!["B2B SaaS mid-market"].into(),
        }
    }

    /// Replies per lead name; leads without a reply see a failing model.
    #[derive(Default)]
    pub(super) struct LeadScriptedModel {
        replies: Vec<(&'static str, &'static str)>,
        calls: Mutex<usize>,
    }

    impl LeadScriptedModel {
        pub(super) fn with_reply(mut self, lead: &'static str, reply: &'static str) -> Self {
            self.replies.push((lead, reply));
            self
        }

        pub(super) fn calls(&self) -> usize {
            *self.calls.lock().expect("lock")
        }
    }

    #[async_trait]
    impl IntentModel for LeadScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            *self.calls.lock().expect("lock") += 1;
            self.replies
                .iter()
                .find(|(lead, _)| prompt.contains(&format!("<name>{lead}</name>")))
                .map(|(_, reply)| reply.to_string())
                .ok_or_else(|| ModelError::Server {
                    status: 503,
                    body: "scripted outage".to_string(),
                })
        }
    }

    pub(super) type Service =
        QualificationService<InMemoryQualificationStore, Arc<LeadScriptedModel>>;

    pub(super) fn build_service(model: Arc<LeadScriptedModel>) -> Service {
        let store = Arc::new(InMemoryQualificationStore::new());
        let orchestrator =
            ScoringOrchestrator::new(IntentClassifier::new(model)).with_concurrency(2);
        QualificationService::new(store, orchestrator)
    }
}

mod scoring {
    use std::sync::Arc;

    use super::common::*;
    use lead_intent::workflows::qualification::{Intent, QualificationServiceError, ScoringError};

    #[tokio::test]
    async fn mixed_model_outcomes_still_score_every_lead() {
        let model = Arc::new(
            LeadScriptedModel::default()
                .with_reply(
                    "Jane Doe",
                    r#"{"intent": "High", "reasoning": "Revenue leader at a SaaS company."}"#,
                )
                .with_reply("Priya Shah", "Probably a medium intent prospect."),
        );
        let service = build_service(model.clone());
        service.create_offer(submission()).expect("offer accepted");
        let uploaded = service.upload_leads(LEAD_SHEET).expect("sheet parses");
        assert_eq!(uploaded.len(), 3);

        let results = service.score().await.expect("scoring succeeds");

        assert_eq!(model.calls(), 3);
        let jane = &results[0];
        assert_eq!(jane.intent, Intent::High);
        assert_eq!(jane.score, 100);
        assert_eq!(jane.reasoning, "Revenue leader at a SaaS company.");

        let priya = &results[1];
        assert_eq!(priya.intent, Intent::Medium);
        assert_eq!(priya.rule_breakdown.role_score, 10);
        assert_eq!(priya.rule_breakdown.completeness_score, 8);
        assert_eq!(priya.rule_breakdown.completeness_reason, "5/6 fields complete");

        let tom = &results[2];
        assert_eq!(tom.intent, Intent::Low);
        assert!(tom.reasoning.contains("fallback"));
        assert_eq!(tom.score, tom.rule_score() + 10);
    }

    #[tokio::test]
    async fn scoring_without_offer_is_rejected_before_model_calls() {
        let model = Arc::new(LeadScriptedModel::default());
        let service = build_service(model.clone());
        service.upload_leads(LEAD_SHEET).expect("sheet parses");

        match service.score().await {
            Err(QualificationServiceError::Scoring(ScoringError::NoActiveOffer)) => {}
            other => panic!("expected missing offer, got {other:?}"),
        }
        assert_eq!(model.calls(), 0);
        assert!(service.results().expect("results readable").is_empty());
    }
}

mod routing {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use lead_intent::workflows::qualification::qualification_router;

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    #[tokio::test]
    async fn upload_score_and_download_through_router() {
        let model = Arc::new(LeadScriptedModel::default().with_reply(
            "Jane Doe",
            r#"{"intent": "High", "reasoning": "Owns the \"pipeline\" number."}"#,
        ));
        let router = qualification_router(Arc::new(build_service(model)));

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/offer",
                Some(json!({
                    "name": "AI Outreach Automation",
                    "value_props": "24/7 outreach",
                    "ideal_use_cases": ["B2B SaaS mid-market"],
                })),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(request(
                "POST",
                "/api/v1/leads/upload",
                Some(json!({ "csv_data": LEAD_SHEET })),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(request("POST", "/api/v1/score", None))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(request("GET", "/api/v1/results/csv", None))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let exported = String::from_utf8(body.to_vec()).expect("utf-8");
        let mut reader = csv::Reader::from_reader(exported.as_bytes());
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("csv parses");

        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "Jane Doe");
        assert_eq!(&rows[0][3], "High");
        assert_eq!(&rows[0][5], "Owns the \"pipeline\" number.");
        assert_eq!(&rows[2][0], "Tom Reed");
        assert_eq!(&rows[2][3], "Low");
    }
}
