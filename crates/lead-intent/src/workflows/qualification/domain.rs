use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

/// Identifier wrapper for uploaded leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

static OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_offer_id() -> OfferId {
    let id = OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OfferId(format!("offer-{id:06}"))
}

pub(crate) fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

/// Product or service the leads are being qualified against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw offer payload as submitted by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSubmission {
    pub name: String,
    pub value_props: OneOrMany,
    pub ideal_use_cases: OneOrMany,
}

/// Accepts either a bare string or a list of strings for list-valued offer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_entries(self) -> Vec<String> {
        let raw = match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        };
        raw.into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Validation errors raised while accepting an offer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OfferError {
    #[error("offer name must be a non-empty string")]
    MissingName,
    #[error("offer requires at least one value proposition")]
    MissingValueProps,
    #[error("offer requires at least one ideal use case")]
    MissingUseCases,
}

impl OfferSubmission {
    /// Validate the submission and stamp it as the new active offer.
    pub fn into_offer(self, created_at: DateTime<Utc>) -> Result<Offer, OfferError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(OfferError::MissingName);
        }

        let value_props = self.value_props.into_entries();
        if value_props.is_empty() {
            return Err(OfferError::MissingValueProps);
        }

        let ideal_use_cases = self.ideal_use_cases.into_entries();
        if ideal_use_cases.is_empty() {
            return Err(OfferError::MissingUseCases);
        }

        Ok(Offer {
            id: next_offer_id(),
            name,
            value_props,
            ideal_use_cases,
            created_at,
        })
    }
}

/// Prospect profile taken from an uploaded lead sheet. Every field but `name` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub linkedin_bio: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Lead {
    /// The profile fields counted towards data completeness, in column order.
    pub fn profile_fields(&self) -> [&str; 6] {
        [
            &self.name,
            &self.role,
            &self.company,
            &self.industry,
            &self.location,
            &self.linkedin_bio,
        ]
    }
}

/// Buying-intent category assigned by the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    High,
    Medium,
    #[default]
    Low,
}

impl Intent {
    pub const ALL: [Intent; 3] = [Intent::High, Intent::Medium, Intent::Low];

    pub const fn label(self) -> &'static str {
        match self {
            Intent::High => "High",
            Intent::Medium => "Medium",
            Intent::Low => "Low",
        }
    }

    /// Points contributed to the final score.
    pub const fn points(self) -> u8 {
        match self {
            Intent::High => 50,
            Intent::Medium => 30,
            Intent::Low => 10,
        }
    }

    /// Exact, case-sensitive match against the three labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }
}

/// Classifier verdict for a single lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    pub reasoning: String,
}

/// Per-component explanation of the rule score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub role_score: u8,
    pub role_reason: String,
    pub industry_score: u8,
    pub industry_reason: String,
    pub completeness_score: u8,
    pub completeness_reason: String,
}

impl RuleBreakdown {
    pub fn total(&self) -> u8 {
        self.role_score + self.industry_score + self.completeness_score
    }
}

/// Final record produced for each lead in a scoring run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub intent: Intent,
    pub score: u8,
    pub reasoning: String,
    pub rule_breakdown: RuleBreakdown,
}

impl ScoredLead {
    pub fn rule_score(&self) -> u8 {
        self.rule_breakdown.total()
    }

    pub fn ai_score(&self) -> u8 {
        self.intent.points()
    }
}
