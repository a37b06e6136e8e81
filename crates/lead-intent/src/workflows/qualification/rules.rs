//! Deterministic, rule-based half of the lead score (0-50 points).
//!
//! Each component is a table of tiers evaluated top-down; the first tier whose
//! predicate matches decides the points and the reason.

use serde::{Deserialize, Serialize};

use super::domain::{Lead, Offer, RuleBreakdown};

pub const MAX_RULE_SCORE: u8 = 50;
pub const MAX_ROLE_SCORE: u8 = 20;
pub const MAX_INDUSTRY_SCORE: u8 = 20;
pub const MAX_COMPLETENESS_SCORE: u8 = 10;

pub(crate) const DECISION_MAKER_TERMS: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "founder",
    "director",
    "head",
    "manager",
    "vp",
    "vice president",
];

const INFLUENCER_TERMS: &[&str] = &["lead", "senior", "specialist", "analyst", "coordinator"];

const ADJACENT_INDUSTRY_TERMS: &[&str] =
    &["tech", "software", "saas", "technology", "digital", "startup"];

/// Lower-cased inputs shared by the industry predicates.
struct IndustryContext<'a> {
    industry: &'a str,
    use_cases: &'a [String],
}

struct RoleTier {
    terms: &'static [&'static str],
    points: u8,
    reason: &'static str,
}

const ROLE_TIERS: &[RoleTier] = &[
    RoleTier {
        terms: DECISION_MAKER_TERMS,
        points: 20,
        reason: "Decision maker role",
    },
    RoleTier {
        terms: INFLUENCER_TERMS,
        points: 10,
        reason: "Influencer role",
    },
];

const OTHER_ROLE: (u8, &str) = (0, "Other role");

struct IndustryTier {
    matches: fn(&IndustryContext<'_>) -> bool,
    points: u8,
    reason: &'static str,
}

const INDUSTRY_TIERS: &[IndustryTier] = &[
    IndustryTier {
        matches: is_icp_match,
        points: 20,
        reason: "Exact ICP match",
    },
    IndustryTier {
        matches: is_adjacent_match,
        points: 10,
        reason: "Adjacent industry match",
    },
];

const NO_INDUSTRY_MATCH: (u8, &str) = (0, "No industry match");

/// Output of the rule scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScore {
    pub total_rule_score: u8,
    pub max_rule_score: u8,
    pub breakdown: RuleBreakdown,
}

/// Stateless scorer for the role, industry, and completeness components.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleScorer;

impl RuleScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, lead: &Lead, offer: &Offer) -> RuleScore {
        let (role_score, role_reason) = score_role(&lead.role);
        let (industry_score, industry_reason) =
            score_industry(&lead.industry, &offer.ideal_use_cases);
        let (completeness_score, completeness_reason) = score_completeness(lead);

        let breakdown = RuleBreakdown {
            role_score,
            role_reason: role_reason.to_string(),
            industry_score,
            industry_reason: industry_reason.to_string(),
            completeness_score,
            completeness_reason,
        };

        RuleScore {
            total_rule_score: breakdown.total(),
            max_rule_score: MAX_RULE_SCORE,
            breakdown,
        }
    }
}

pub(crate) fn is_decision_maker(role_lower: &str) -> bool {
    DECISION_MAKER_TERMS
        .iter()
        .any(|term| role_lower.contains(term))
}

/// First space-separated token of a lower-cased use case, used as its prefix key.
pub(crate) fn use_case_prefix(use_case: &str) -> &str {
    use_case.split(' ').next().unwrap_or_default()
}

fn score_role(role: &str) -> (u8, &'static str) {
    let role = role.to_lowercase();
    ROLE_TIERS
        .iter()
        .find(|tier| tier.terms.iter().any(|term| role.contains(term)))
        .map(|tier| (tier.points, tier.reason))
        .unwrap_or(OTHER_ROLE)
}

fn score_industry(industry: &str, use_cases: &[String]) -> (u8, &'static str) {
    let industry = industry.to_lowercase();
    let use_cases: Vec<String> = use_cases.iter().map(|uc| uc.to_lowercase()).collect();
    let context = IndustryContext {
        industry: &industry,
        use_cases: &use_cases,
    };

    INDUSTRY_TIERS
        .iter()
        .find(|tier| (tier.matches)(&context))
        .map(|tier| (tier.points, tier.reason))
        .unwrap_or(NO_INDUSTRY_MATCH)
}

// An empty industry is contained in every use case and therefore counts as a match.
fn is_icp_match(context: &IndustryContext<'_>) -> bool {
    context.use_cases.iter().any(|use_case| {
        use_case.contains(context.industry) || context.industry.contains(use_case_prefix(use_case))
    })
}

fn is_adjacent_match(context: &IndustryContext<'_>) -> bool {
    ADJACENT_INDUSTRY_TERMS.iter().any(|term| {
        context.industry.contains(term) || context.use_cases.iter().any(|uc| uc.contains(term))
    })
}

fn score_completeness(lead: &Lead) -> (u8, String) {
    let fields = lead.profile_fields();
    let required = fields.len();
    let present = fields
        .iter()
        .filter(|value| !value.trim().is_empty())
        .count();

    if present == required {
        (MAX_COMPLETENESS_SCORE, "All fields present".to_string())
    } else {
        let points = (usize::from(MAX_COMPLETENESS_SCORE) * present / required) as u8;
        (points, format!("{present}/{required} fields complete"))
    }
}
